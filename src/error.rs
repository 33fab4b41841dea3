use thiserror::Error;

/// Errors that can occur when using BaggageContext
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BaggageError {
    /// No value is stored under the requested key
    #[error("no baggage value stored for key `{key}`")]
    Missing {
        /// Name of the key that was looked up
        key: &'static str,
    },
}
