use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// A type that names a slot in a [`BaggageContext`](crate::BaggageContext).
///
/// A key is never instantiated. Its only job is to fix, at compile time, the type of
/// value that may be stored under it. Uninhabited enums make good keys:
///
/// ```
/// use sovran_baggage::BaggageKey;
///
/// enum RequestIdKey {}
///
/// impl BaggageKey for RequestIdKey {
///     type Value = String;
/// }
///
/// assert_eq!(RequestIdKey::name(), "RequestIdKey");
/// ```
pub trait BaggageKey: 'static {
    /// The type of value uniquely identified by this key.
    ///
    /// Values must be `Clone` so copies of a carrier stay independent, and `Debug`
    /// so [`BaggageMetadata`](crate::BaggageMetadata) can render them for logs.
    /// Wrap a value lacking `Debug` in a newtype with a manual impl to use it here.
    type Value: Any + Clone + Debug + Send + Sync;

    /// Human readable name used in diagnostics and log metadata.
    ///
    /// Defaults to the key's type name without its module path. Identity never
    /// depends on this name, so two keys sharing a name remain distinct slots.
    fn name() -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Runtime identity of a [`BaggageKey`] type.
///
/// Two `KeyId`s compare equal exactly when they were produced from the same key type.
#[derive(Clone, Copy)]
pub struct KeyId {
    type_id: TypeId,
    name: &'static str,
}

impl KeyId {
    /// Returns the identity of key type `K`.
    pub fn of<K: BaggageKey>() -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            name: K::name(),
        }
    }

    /// The key's display name, see [`BaggageKey::name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if this identity belongs to key type `K`.
    pub fn is<K: BaggageKey>(&self) -> bool {
        self.type_id == TypeId::of::<K>()
    }
}

impl PartialEq for KeyId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for KeyId {}

impl Hash for KeyId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("KeyId").field(&self.name).finish()
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Strips the module path from a type name, leaving generic arguments intact.
///
/// Only a plain path (optionally followed by generic arguments) is shortened.
/// References, tuples, arrays and the like keep their full name.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let path_end = full
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
        .unwrap_or(full.len());
    let (path, rest) = full.split_at(path_end);
    if path.is_empty() || !(rest.is_empty() || rest.starts_with('<')) {
        return full;
    }
    let start = path.rfind("::").map(|i| i + 2).unwrap_or(0);
    &full[start..]
}
