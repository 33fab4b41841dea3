use crate::any_value::AnyValue;
use crate::error::BaggageError;
use crate::key::{BaggageKey, KeyId};
use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt::{self, Debug};

/// A heterogeneous, type-safe carrier for cross-cutting metadata with value semantics.
///
/// Values are identified by [`BaggageKey`] types, and each key fixes the type of value
/// that may be stored under it. Cloning a `BaggageContext` yields an independent carrier:
/// writes to the clone never show up in the original and vice versa. Values are shared
/// between clones until one side writes, at which point that side gets its own copy.
///
/// # Examples
///
/// ```
/// use sovran_baggage::{BaggageContext, BaggageKey};
///
/// enum TestIdKey {}
///
/// impl BaggageKey for TestIdKey {
///     type Value = String;
/// }
///
/// let mut baggage = BaggageContext::new();
///
/// // set a new value
/// baggage.set::<TestIdKey>(Some("abc".to_string()));
/// // retrieve a stored value
/// assert_eq!(baggage.get::<TestIdKey>().map(String::as_str).unwrap_or("default"), "abc");
/// // remove a stored value
/// baggage.set::<TestIdKey>(None);
/// assert!(baggage.get::<TestIdKey>().is_none());
/// ```
#[derive(Clone, Default)]
pub struct BaggageContext {
    storage: HashMap<KeyId, AnyValue>,
}

impl BaggageContext {
    /// Creates an empty `BaggageContext`.
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
        }
    }

    /// Returns the value stored under `K`, if any.
    pub fn get<K: BaggageKey>(&self) -> Option<&K::Value> {
        self.storage.get(&KeyId::of::<K>()).map(recover::<K>)
    }

    /// Returns a copy of the value stored under `K`, if any.
    pub fn get_cloned<K: BaggageKey>(&self) -> Option<K::Value> {
        self.get::<K>().cloned()
    }

    /// Returns the value stored under `K`, or [`BaggageError::Missing`] if there is none.
    ///
    /// Useful in functions that already return a `Result` and cannot proceed
    /// without the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_baggage::{BaggageContext, BaggageError, BaggageKey};
    ///
    /// enum TenantKey {}
    ///
    /// impl BaggageKey for TenantKey {
    ///     type Value = String;
    /// }
    ///
    /// fn tenant(baggage: &BaggageContext) -> Result<String, BaggageError> {
    ///     Ok(baggage.require::<TenantKey>()?.to_uppercase())
    /// }
    ///
    /// let mut baggage = BaggageContext::new();
    /// assert_eq!(tenant(&baggage), Err(BaggageError::Missing { key: "TenantKey" }));
    ///
    /// baggage.insert::<TenantKey>("acme".to_string());
    /// assert_eq!(tenant(&baggage).as_deref(), Ok("ACME"));
    /// ```
    pub fn require<K: BaggageKey>(&self) -> Result<&K::Value, BaggageError> {
        self.get::<K>()
            .ok_or(BaggageError::Missing { key: K::name() })
    }

    /// Stores `value` under `K`, or removes the entry for `K` when `value` is `None`.
    pub fn set<K: BaggageKey>(&mut self, value: Option<K::Value>) {
        match value {
            Some(value) => {
                tracing::trace!(key = K::name(), "baggage value set");
                self.storage.insert(KeyId::of::<K>(), AnyValue::new(value));
            }
            None => {
                self.remove::<K>();
            }
        }
    }

    /// Stores `value` under `K`, returning the value it replaced.
    pub fn insert<K: BaggageKey>(&mut self, value: K::Value) -> Option<K::Value> {
        tracing::trace!(key = K::name(), "baggage value set");
        self.storage
            .insert(KeyId::of::<K>(), AnyValue::new(value))
            .map(take::<K>)
    }

    /// Removes the entry for `K`, returning its value.
    pub fn remove<K: BaggageKey>(&mut self) -> Option<K::Value> {
        let removed = self.storage.remove(&KeyId::of::<K>())?;
        tracing::trace!(key = K::name(), "baggage value removed");
        Some(take::<K>(removed))
    }

    /// Returns a mutable reference to the value stored under `K`, if any.
    ///
    /// If the value is still shared with a clone of this carrier, it is copied first.
    pub fn get_mut<K: BaggageKey>(&mut self) -> Option<&mut K::Value> {
        self.storage.get_mut(&KeyId::of::<K>()).map(recover_mut::<K>)
    }

    /// Returns the value stored under `K`, inserting the result of `f` first if absent.
    pub fn get_or_insert_with<K, F>(&mut self, f: F) -> &mut K::Value
    where
        K: BaggageKey,
        F: FnOnce() -> K::Value,
    {
        let slot = self.storage.entry(KeyId::of::<K>()).or_insert_with(|| {
            tracing::trace!(key = K::name(), "baggage value set");
            AnyValue::new(f())
        });
        recover_mut::<K>(slot)
    }

    /// Runs `f` with read access to the value stored under `K`.
    ///
    /// Returns `None` without calling `f` if no value is stored.
    pub fn with<K, F, R>(&self, f: F) -> Option<R>
    where
        K: BaggageKey,
        F: FnOnce(&K::Value) -> R,
    {
        self.get::<K>().map(f)
    }

    /// Runs `f` with write access to the value stored under `K`.
    ///
    /// Returns `None` without calling `f` if no value is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use sovran_baggage::{BaggageContext, BaggageKey};
    ///
    /// enum HopsKey {}
    ///
    /// impl BaggageKey for HopsKey {
    ///     type Value = Vec<String>;
    /// }
    ///
    /// let mut baggage = BaggageContext::new();
    /// baggage.insert::<HopsKey>(vec!["gateway".to_string()]);
    ///
    /// let hops = baggage.with_mut::<HopsKey, _, _>(|hops| {
    ///     hops.push("billing".to_string());
    ///     hops.len()
    /// });
    /// assert_eq!(hops, Some(2));
    /// ```
    pub fn with_mut<K, F, R>(&mut self, f: F) -> Option<R>
    where
        K: BaggageKey,
        F: FnOnce(&mut K::Value) -> R,
    {
        self.get_mut::<K>().map(f)
    }

    /// Returns true if a value is stored under `K`.
    pub fn contains<K: BaggageKey>(&self) -> bool {
        self.storage.contains_key(&KeyId::of::<K>())
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no values are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Removes every stored value.
    pub fn clear(&mut self) {
        tracing::trace!(count = self.storage.len(), "baggage cleared");
        self.storage.clear();
    }

    /// Iterates over the stored entries in no particular order.
    ///
    /// Entries are read-only views; values can only be written back through
    /// their key type.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.storage.iter(),
        }
    }
}

impl Debug for BaggageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<Entry<'_>> = self.iter().collect();
        entries.sort_by_key(|entry| entry.name());
        f.debug_map()
            .entries(entries.iter().map(|entry| (entry.name(), entry.value())))
            .finish()
    }
}

impl<'a> IntoIterator for &'a BaggageContext {
    type Item = Entry<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`BaggageContext`], created by [`BaggageContext::iter`].
pub struct Iter<'a> {
    inner: hash_map::Iter<'a, KeyId, AnyValue>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| Entry { key: *key, value })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// A read-only view of one stored value.
#[derive(Clone, Copy)]
pub struct Entry<'a> {
    key: KeyId,
    value: &'a AnyValue,
}

impl<'a> Entry<'a> {
    /// Identity of the key the value is stored under.
    pub fn key(&self) -> KeyId {
        self.key
    }

    /// Display name of the key, see [`BaggageKey::name`].
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Full type name of the stored value.
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// The stored value, viewable through its `Debug` representation.
    pub fn value(&self) -> &'a dyn Debug {
        self.value.as_debug()
    }

    /// Returns the typed value if this entry belongs to key `K`.
    pub fn get<K: BaggageKey>(&self) -> Option<&'a K::Value> {
        if self.key.is::<K>() {
            Some(recover::<K>(self.value))
        } else {
            None
        }
    }
}

impl Debug for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.name())
            .field("value", self.value.as_debug())
            .finish()
    }
}

// Every entry is written through a typed `K`, so a failed downcast means the
// storage was corrupted and continuing would hand out a wrong value.
#[cold]
#[inline(never)]
fn invariant_violated<K: BaggageKey>(stored: &'static str) -> ! {
    panic!(
        "baggage entry for key `{}` holds `{}`, expected `{}`",
        K::name(),
        stored,
        std::any::type_name::<K::Value>()
    )
}

fn recover<K: BaggageKey>(value: &AnyValue) -> &K::Value {
    match value.downcast_ref::<K::Value>() {
        Some(value) => value,
        None => invariant_violated::<K>(value.type_name()),
    }
}

fn recover_mut<K: BaggageKey>(value: &mut AnyValue) -> &mut K::Value {
    let stored = value.type_name();
    match value.downcast_mut::<K::Value>() {
        Some(value) => value,
        None => invariant_violated::<K>(stored),
    }
}

fn take<K: BaggageKey>(value: AnyValue) -> K::Value {
    let stored = value.type_name();
    match value.into_inner::<K::Value>() {
        Some(value) => value,
        None => invariant_violated::<K>(stored),
    }
}
