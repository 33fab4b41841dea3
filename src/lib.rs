//! # sovran-baggage
//!
//! A type-safe heterogeneous context carrier with value semantics.
//!
//! `sovran-baggage` provides [`BaggageContext`], a small container used to propagate
//! cross-cutting metadata (trace IDs, request IDs, deadlines and so on) through call
//! chains without every component needing to know about every other component's
//! metadata type. Values are keyed by *types* rather than strings: each
//! [`BaggageKey`] names a slot and fixes the type of value it may hold, so reading a
//! value back with the wrong type is a compile error rather than a runtime surprise.
//!
//! ## Key Features
//!
//! - **Type-safe**: Each key declares its value type; the compiler enforces it
//! - **Value semantics**: Cloning a carrier yields an independent copy
//! - **Cheap to copy**: Values are shared between copies until one side writes
//! - **Thread-friendly**: `BaggageContext` is `Send + Sync`; hand each thread its own copy
//! - **Log-ready**: Render the contents as [`BaggageMetadata`] or open a `tracing` span
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use sovran_baggage::{BaggageContext, BaggageKey};
//!
//! enum TraceIdKey {}
//!
//! impl BaggageKey for TraceIdKey {
//!     type Value = u64;
//! }
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Customer {
//!     id: String,
//!     name: String,
//! }
//!
//! enum CustomerKey {}
//!
//! impl BaggageKey for CustomerKey {
//!     type Value = Customer;
//! }
//!
//! let mut baggage = BaggageContext::new();
//! baggage.set::<TraceIdKey>(Some(42));
//! baggage.set::<CustomerKey>(Some(Customer {
//!     id: "u1".to_string(),
//!     name: "jane".to_string(),
//! }));
//!
//! assert_eq!(baggage.get::<TraceIdKey>(), Some(&42));
//! assert_eq!(baggage.get::<CustomerKey>().map(|c| c.name.as_str()), Some("jane"));
//!
//! // Copies never alias
//! let mut copy = baggage.clone();
//! copy.set::<TraceIdKey>(Some(99));
//! assert_eq!(baggage.get::<TraceIdKey>(), Some(&42));
//! assert_eq!(copy.get::<TraceIdKey>(), Some(&99));
//!
//! // Setting `None` clears the slot
//! copy.set::<TraceIdKey>(None);
//! assert_eq!(copy.get::<TraceIdKey>(), None);
//! ```
//!
//! ### Convenience Accessors
//!
//! Libraries that define keys usually offer named accessors through an extension trait:
//!
//! ```rust
//! use sovran_baggage::{BaggageContext, BaggageKey};
//!
//! pub enum DeadlineKey {}
//!
//! impl BaggageKey for DeadlineKey {
//!     type Value = std::time::Duration;
//! }
//!
//! pub trait DeadlineExt {
//!     fn deadline(&self) -> Option<std::time::Duration>;
//!     fn set_deadline(&mut self, deadline: Option<std::time::Duration>);
//! }
//!
//! impl DeadlineExt for BaggageContext {
//!     fn deadline(&self) -> Option<std::time::Duration> {
//!         self.get_cloned::<DeadlineKey>()
//!     }
//!
//!     fn set_deadline(&mut self, deadline: Option<std::time::Duration>) {
//!         self.set::<DeadlineKey>(deadline);
//!     }
//! }
//!
//! let mut baggage = BaggageContext::new();
//! baggage.set_deadline(Some(std::time::Duration::from_millis(250)));
//! assert_eq!(baggage.deadline(), Some(std::time::Duration::from_millis(250)));
//! ```
//!
//! ### Type Safety
//!
//! A value of the wrong type cannot be stored under a key:
//!
//! ```compile_fail
//! use sovran_baggage::{BaggageContext, BaggageKey};
//!
//! enum TraceIdKey {}
//!
//! impl BaggageKey for TraceIdKey {
//!     type Value = u64;
//! }
//!
//! let mut baggage = BaggageContext::new();
//! baggage.set::<TraceIdKey>(Some("not a number".to_string()));
//! ```
//!
//! Nor can a value be read back as anything other than the key's type:
//!
//! ```compile_fail
//! use sovran_baggage::{BaggageContext, BaggageKey};
//!
//! enum TraceIdKey {}
//!
//! impl BaggageKey for TraceIdKey {
//!     type Value = u64;
//! }
//!
//! let baggage = BaggageContext::new();
//! let id: Option<&String> = baggage.get::<TraceIdKey>();
//! ```
//!
//! Values must be cloneable so copies of a carrier stay independent:
//!
//! ```compile_fail
//! use sovran_baggage::BaggageKey;
//!
//! #[derive(Debug)]
//! struct Handle;
//!
//! enum HandleKey {}
//!
//! impl BaggageKey for HandleKey {
//!     type Value = Handle;
//! }
//! ```
//!
//! ### Handling Absence
//!
//! ```rust
//! use sovran_baggage::{BaggageContext, BaggageError, BaggageKey};
//!
//! enum RequestIdKey {}
//!
//! impl BaggageKey for RequestIdKey {
//!     type Value = String;
//! }
//!
//! let baggage = BaggageContext::new();
//!
//! // Absence is a normal result, not an error
//! let request_id = baggage.get_cloned::<RequestIdKey>().unwrap_or_else(|| "unknown".to_string());
//! assert_eq!(request_id, "unknown");
//!
//! // Unless the caller asks for one
//! match baggage.require::<RequestIdKey>() {
//!     Ok(id) => println!("Request: {}", id),
//!     Err(BaggageError::Missing { key }) => println!("Key ({}) not set", key),
//! }
//! ```

mod any_value;
mod context;
mod error;
mod key;
mod metadata;

pub use context::{BaggageContext, Entry, Iter};
pub use error::BaggageError;
pub use key::{BaggageKey, KeyId};
pub use metadata::{BaggageMetadata, MetadataIter};
