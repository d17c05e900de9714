//! Bindings guarded by a predicate evaluated at bind time.

use crate::error::BoxError;

/// A factory paired with the predicate deciding whether it is bound.
///
/// The predicate is an injectable callable like any other: its parameters are
/// resolved from the container the binding is added to.
///
/// ```
/// use fibre_wire::{Conditional, Container, Lifetime};
///
/// struct Cache;
///
/// let container = Container::new();
/// container.must_bind_value("cache.enabled", false);
/// container
///   .bind_conditional(
///     Conditional::new(|| Cache, |c: fibre_wire::Container| {
///       c.get_value::<bool>("cache.enabled").map(|on| *on)
///     }),
///     Lifetime::Singleton,
///     false,
///   )
///   .unwrap();
///
/// assert!(!container.has_bound(fibre_wire::Key::of::<Cache>()));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Conditional<F, P> {
  factory: F,
  predicate: P,
}

impl<F, P> Conditional<F, P> {
  pub fn new(factory: F, predicate: P) -> Self {
    Self { factory, predicate }
  }

  pub(crate) fn into_parts(self) -> (F, P) {
    (self.factory, self.predicate)
  }
}

/// What a predicate may return: a plain `bool`, or a `Result<bool, E>` whose
/// error fails the bind.
pub trait Condition {
  fn into_condition(self) -> Result<bool, BoxError>;
}

impl Condition for bool {
  fn into_condition(self) -> Result<bool, BoxError> {
    Ok(self)
  }
}

impl<E: Into<BoxError>> Condition for Result<bool, E> {
  fn into_condition(self) -> Result<bool, BoxError> {
    self.map_err(Into::into)
  }
}
