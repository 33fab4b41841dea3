use std::any::{Any, TypeId};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Object-safe view of a stored value
trait ErasedValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_debug(&self) -> &dyn Debug;
    fn clone_arc(&self) -> Arc<dyn ErasedValue>;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Clone + Debug + Send + Sync> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_debug(&self) -> &dyn Debug {
        self
    }

    fn clone_arc(&self) -> Arc<dyn ErasedValue> {
        Arc::new(self.clone())
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A container for type-erased values that preserves type information
///
/// Cloning an `AnyValue` shares the underlying allocation. Any mutable access
/// detaches the value first, so clones never observe each other's writes.
#[derive(Clone)]
pub(crate) struct AnyValue {
    type_id: TypeId,
    type_name: &'static str,
    value: Arc<dyn ErasedValue>,
}

impl AnyValue {
    /// Create a new AnyValue from any cloneable, debuggable, thread-safe value
    pub(crate) fn new<T: Any + Clone + Debug + Send + Sync>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Check if the contained value is of type T
    pub(crate) fn is_type<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Full type name of the contained value
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn as_debug(&self) -> &dyn Debug {
        (*self.value).as_debug()
    }

    /// Get a reference to the contained value if it is of type T
    pub(crate) fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.value).as_any().downcast_ref::<T>()
    }

    /// Get a mutable reference to the contained value if it is of type T
    ///
    /// A value still shared with another clone is copied before the reference
    /// is handed out.
    pub(crate) fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if !self.is_type::<T>() {
            return None;
        }
        if Arc::get_mut(&mut self.value).is_none() {
            self.value = ErasedValue::clone_arc(&*self.value);
        }
        Arc::get_mut(&mut self.value)?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Take the contained value if it is of type T, cloning it only when shared
    pub(crate) fn into_inner<T: Any + Clone + Send + Sync>(self) -> Option<T> {
        if !self.is_type::<T>() {
            return None;
        }
        ErasedValue::into_any_arc(self.value)
            .downcast::<T>()
            .ok()
            .map(Arc::unwrap_or_clone)
    }

    #[cfg(test)]
    fn is_shared(&self) -> bool {
        Arc::strong_count(&self.value) > 1
    }
}

impl Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_debug().fmt(f)
    }
}
