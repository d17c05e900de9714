//! The dynamic value handed out by the container.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A resolved instance with its concrete type erased.
///
/// Internally this always wraps an `Arc<T>` (which is itself `Sized`, so
/// `T` may be a trait object). Cloning is cheap and shares the instance.
#[derive(Clone)]
pub struct Value {
  inner: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Value {
  /// Wraps an owned value.
  pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an already shared value, keeping its identity.
  pub fn from_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
    Self {
      inner: Arc::new(value),
      type_name: type_name::<T>(),
    }
  }

  /// Recovers the shared instance if it was stored as a `T`.
  pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
    self.inner.downcast_ref::<Arc<T>>().cloned()
  }

  pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
    self.inner.is::<Arc<T>>()
  }

  /// Name of the stored type.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Whether both handles refer to the same instance.
  pub fn ptr_eq(&self, other: &Value) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl fmt::Debug for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Value")
      .field("type", &self.type_name)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Shape: Send + Sync {
    fn sides(&self) -> u32;
  }
  struct Square;
  impl Shape for Square {
    fn sides(&self) -> u32 {
      4
    }
  }

  #[test]
  fn downcast_to_concrete_and_trait_object() {
    let concrete = Value::new(String::from("hi"));
    assert_eq!(*concrete.downcast::<String>().unwrap(), "hi");
    assert!(concrete.downcast::<u32>().is_none());

    let shape: Arc<dyn Shape> = Arc::new(Square);
    let erased = Value::from_arc(shape.clone());
    let back = erased.downcast::<dyn Shape>().unwrap();
    assert_eq!(back.sides(), 4);
    assert!(Arc::ptr_eq(&shape, &back));
    assert!(erased.is::<dyn Shape>());
    assert!(!erased.is::<Square>());
  }

  #[test]
  fn clones_share_identity() {
    let a = Value::new(5u8);
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&Value::new(5u8)));
    assert!(Arc::ptr_eq(&a.downcast::<u8>().unwrap(), &b.downcast::<u8>().unwrap()));
  }
}
