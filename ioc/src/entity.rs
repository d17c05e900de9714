//! The binding record and its lazy materialization.

use crate::error::{BoxError, Error, Result};
use crate::invoke::Resolver;
use crate::key::Key;
use crate::value::Value;
use once_cell::sync::OnceCell;
use std::fmt;

/// How often a binding's factory runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
  /// Built once, on first resolution, then shared for the owner's lifetime.
  #[default]
  Singleton,
  /// Built afresh on every resolution.
  Prototype,
}

/// Type-erased factory. The outer `Result` carries resolution failures of the
/// factory's own arguments, the inner one the factory's reported failure.
pub(crate) type BoxedFactory =
  Box<dyn Fn(&Resolver<'_>) -> Result<std::result::Result<Value, BoxError>> + Send + Sync>;

pub(crate) struct Entity {
  key: Key,
  type_name: &'static str,
  lifetime: Lifetime,
  overridable: bool,
  factory: Option<BoxedFactory>,
  cell: OnceCell<Value>,
}

impl Entity {
  pub(crate) fn lazy(
    key: Key,
    type_name: &'static str,
    factory: BoxedFactory,
    lifetime: Lifetime,
    overridable: bool,
  ) -> Self {
    Self {
      key,
      type_name,
      lifetime,
      overridable,
      factory: Some(factory),
      cell: OnceCell::new(),
    }
  }

  /// An entity that is materialized from the start.
  pub(crate) fn ready(key: Key, value: Value, overridable: bool) -> Self {
    Self {
      key,
      type_name: value.type_name(),
      lifetime: Lifetime::Singleton,
      overridable,
      factory: None,
      cell: OnceCell::with_value(value),
    }
  }

  pub(crate) fn key(&self) -> &Key {
    &self.key
  }

  pub(crate) fn overridable(&self) -> bool {
    self.overridable
  }

  pub(crate) fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  /// Produces the entity's value, building it if needed.
  ///
  /// For singletons the cell admits a single initializer at a time; the value
  /// is only stored when the factory succeeds, so a failed attempt can be
  /// retried by the next caller.
  pub(crate) fn materialize(&self, resolver: &Resolver<'_>) -> Result<Value> {
    match self.lifetime {
      Lifetime::Prototype => self.produce(resolver),
      Lifetime::Singleton => self
        .cell
        .get_or_try_init(|| {
          tracing::trace!(key = %self.key, "materializing singleton");
          self.produce(resolver)
        })
        .cloned(),
    }
  }

  fn produce(&self, resolver: &Resolver<'_>) -> Result<Value> {
    let factory = self.factory.as_ref().ok_or_else(|| {
      Error::invalid_args(format!("entity {} has neither a value nor a factory", self.key))
    })?;

    factory(resolver)?.map_err(|source| Error::Factory {
      key: self.key.to_string(),
      source,
    })
  }
}

impl fmt::Debug for Entity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Entity")
      .field("key", &self.key)
      .field("type", &self.type_name)
      .field("lifetime", &self.lifetime)
      .field("overridable", &self.overridable)
      .field("materialized", &self.cell.get().is_some())
      .finish()
  }
}
