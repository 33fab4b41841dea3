use crate::context::BaggageContext;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// A flat, printable snapshot of a [`BaggageContext`] for log output.
///
/// Each entry maps a key's [`name`](crate::BaggageKey::name) to the `Debug`
/// rendering of its value. Entries are ordered by key name. If two distinct keys
/// share a name, the entry with the smaller rendering is kept.
///
/// # Examples
///
/// ```
/// use sovran_baggage::{BaggageContext, BaggageKey, BaggageMetadata};
///
/// enum TraceIdKey {}
///
/// impl BaggageKey for TraceIdKey {
///     type Value = u64;
/// }
///
/// let mut baggage = BaggageContext::new();
/// baggage.insert::<TraceIdKey>(42);
///
/// let metadata = baggage.metadata();
/// assert_eq!(metadata.get("TraceIdKey"), Some("42"));
/// assert_eq!(metadata.to_string(), "TraceIdKey=42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaggageMetadata {
    fields: BTreeMap<&'static str, String>,
}

impl BaggageMetadata {
    /// Returns the rendered value for the key named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(key name, rendered value)` pairs ordered by key name.
    pub fn iter(&self) -> MetadataIter<'_> {
        MetadataIter {
            inner: self.fields.iter(),
        }
    }
}

impl From<&BaggageContext> for BaggageMetadata {
    fn from(baggage: &BaggageContext) -> Self {
        let mut rendered: Vec<(&'static str, String)> = baggage
            .iter()
            .map(|entry| (entry.name(), format!("{:?}", entry.value())))
            .collect();
        rendered.sort();

        let mut fields = BTreeMap::new();
        for (name, value) in rendered {
            match fields.entry(name) {
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                btree_map::Entry::Occupied(_) => {
                    tracing::debug!(key = name, "baggage key name collision, keeping first value");
                }
            }
        }
        Self { fields }
    }
}

impl fmt::Display for BaggageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BaggageMetadata {
    type Item = (&'static str, &'a str);
    type IntoIter = MetadataIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the fields of a [`BaggageMetadata`].
pub struct MetadataIter<'a> {
    inner: btree_map::Iter<'a, &'static str, String>,
}

impl<'a> Iterator for MetadataIter<'a> {
    type Item = (&'static str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, value)| (*name, value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MetadataIter<'_> {}

impl BaggageContext {
    /// Renders every stored value into a [`BaggageMetadata`] snapshot.
    pub fn metadata(&self) -> BaggageMetadata {
        BaggageMetadata::from(self)
    }

    /// Creates an `INFO` span named `baggage` carrying this carrier's metadata.
    ///
    /// Events emitted while the span is entered are annotated with the
    /// carrier's contents by any subscriber that prints span fields.
    ///
    /// ```
    /// use sovran_baggage::{BaggageContext, BaggageKey};
    ///
    /// enum RequestIdKey {}
    ///
    /// impl BaggageKey for RequestIdKey {
    ///     type Value = String;
    /// }
    ///
    /// let mut baggage = BaggageContext::new();
    /// baggage.insert::<RequestIdKey>("req-1".to_string());
    ///
    /// let span = baggage.span();
    /// let _guard = span.enter();
    /// tracing::info!("handling request");
    /// ```
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("baggage", baggage = %self.metadata())
    }
}
