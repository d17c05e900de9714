//! Field injection for existing struct instances.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::invoke::{downcast, Resolver};
use crate::key::Key;
use std::sync::Arc;

/// A struct whose fields can be filled from a container.
///
/// Implement it next to the struct (by hand or with [`autowire!`](crate::autowire!))
/// so that private fields are reachable. Fields the implementation does not
/// mention are left untouched.
pub trait AutoWire {
  fn autowire(&mut self, wirer: &Wirer<'_>) -> Result<()>;
}

/// A field that can receive a resolved value.
pub trait Slot {
  /// The type the field is resolved as.
  type Target: ?Sized + Send + Sync + 'static;

  fn fill(&mut self, value: Arc<Self::Target>);
}

impl<T: ?Sized + Send + Sync + 'static> Slot for Arc<T> {
  type Target = T;

  fn fill(&mut self, value: Arc<T>) {
    *self = value;
  }
}

impl<T: ?Sized + Send + Sync + 'static> Slot for Option<Arc<T>> {
  type Target = T;

  fn fill(&mut self, value: Arc<T>) {
    *self = Some(value);
  }
}

macro_rules! impl_cloned_slot {
  ($($ty:ty),* $(,)?) => {
    $(
      impl Slot for $ty {
        type Target = $ty;

        fn fill(&mut self, value: Arc<$ty>) {
          *self = (*value).clone();
        }
      }
    )*
  };
}

impl_cloned_slot!(
  String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

/// Fills individual fields during [`AutoWire::autowire`].
pub struct Wirer<'a> {
  resolver: Resolver<'a>,
}

impl<'a> Wirer<'a> {
  pub(crate) fn new(resolver: Resolver<'a>) -> Self {
    Self { resolver }
  }

  /// Resolves the field by its declared type, exactly like a callable
  /// parameter of that type.
  pub fn by_type<S: Slot>(&self, field: &'static str, slot: &mut S) -> Result<()> {
    let value = self
      .resolver
      .instance_of::<S::Target>()
      .map_err(|err| field_error(field, err))?;
    slot.fill(value);
    Ok(())
  }

  /// Resolves the field from the value bound under `key`.
  pub fn by_key<S: Slot>(&self, field: &'static str, key: &str, slot: &mut S) -> Result<()> {
    let key = Key::name(key);
    let value = self
      .resolver
      .get(key.clone())
      .and_then(|value| downcast::<S::Target>(&key, &value))
      .map_err(|err| field_error(field, err))?;
    slot.fill(value);
    Ok(())
  }
}

fn field_error(field: &'static str, source: Error) -> Error {
  Error::Field {
    field,
    source: Box::new(source),
  }
}

impl Container {
  /// Fills the fields `target` declares as injectable. Stops at the first
  /// field that fails; fields filled before it keep their new values.
  pub fn autowire<T: AutoWire + ?Sized>(&self, target: &mut T) -> Result<()> {
    tracing::trace!(target_type = std::any::type_name::<T>(), "autowiring");
    target.autowire(&Wirer::new(Resolver::new(self, None)))
  }

  pub fn must_autowire<T: AutoWire + ?Sized>(&self, target: &mut T) {
    self.must(self.autowire(target))
  }
}
