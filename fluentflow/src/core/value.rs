//! The erased value threaded through a pipeline.

use super::TypeTag;
use std::any::Any;
use std::fmt;

/// A type-erased value passed from one step to the next.
///
/// The value remembers the [`TypeTag`] it was created with so that a
/// rejected downcast can report what was actually received.
pub struct Value {
    inner: Box<dyn Any + Send>,
    tag: TypeTag,
}

impl Value {
    /// Erases a concrete value.
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            inner: Box::new(value),
            tag: TypeTag::of::<T>(),
        }
    }

    /// Returns the tag of the contained value.
    #[must_use]
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Returns the type name of the contained value.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.tag.name()
    }

    /// Returns true if the contained value is a `T`.
    #[must_use]
    pub fn is<T: Send + 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrows the contained value as a `T`.
    #[must_use]
    pub fn downcast_ref<T: Send + 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Recovers the contained value as a `T`.
    ///
    /// # Errors
    ///
    /// Returns the value unchanged when it is not a `T`.
    pub fn downcast<T: Send + 'static>(self) -> Result<T, Self> {
        let Self { inner, tag } = self;
        match inner.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(inner) => Err(Self { inner, tag }),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.tag.name())
            .finish_non_exhaustive()
    }
}
