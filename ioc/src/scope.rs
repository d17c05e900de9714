//! Request-scoped bindings that shadow a container for selected calls.

use crate::binding::erase;
use crate::entity::{Entity, Lifetime};
use crate::error::Result;
use crate::invoke::Factory;
use crate::key::Key;
use crate::lookup::Lookup;
use crate::value::Value;
use std::sync::Arc;

/// An immutable list of extra bindings, held by the caller and passed
/// explicitly to [`Container::call_with_scope`](crate::Container::call_with_scope)
/// and friends.
///
/// Each entry is a singleton for as long as the `Scope` lives: reusing the
/// same scope across calls reuses the values it already built, a new scope
/// builds them again.
#[derive(Debug, Clone, Default)]
pub struct Scope {
  entities: Arc<Vec<Arc<Entity>>>,
}

impl Scope {
  pub fn builder() -> ScopeBuilder {
    ScopeBuilder::default()
  }

  pub fn len(&self) -> usize {
    self.entities.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entities.is_empty()
  }

  /// The identities this scope provides, in the order they were supplied.
  pub fn keys(&self) -> Vec<Key> {
    self.entities.iter().map(|e| e.key().clone()).collect()
  }

  pub(crate) fn find(&self, lookup: &Lookup) -> Option<Arc<Entity>> {
    lookup.candidates().iter().find_map(|candidate| {
      self
        .entities
        .iter()
        .find(|entity| entity.key() == candidate)
        .cloned()
    })
  }
}

/// Collects the factories of a [`Scope`].
#[derive(Debug, Default)]
pub struct ScopeBuilder {
  entities: Vec<Arc<Entity>>,
}

impl ScopeBuilder {
  /// Adds a factory; its entity is keyed by the factory's product type.
  pub fn provide<Args, F: Factory<Args>>(mut self, factory: F) -> Result<Self> {
    let key = Key::of::<F::Product>();
    let boxed = erase(factory, Value::new)?;
    self.entities.push(Arc::new(Entity::lazy(
      key,
      std::any::type_name::<F::Product>(),
      boxed,
      Lifetime::Singleton,
      true,
    )));
    Ok(self)
  }

  /// Adds an already built instance.
  pub fn instance<T: Send + Sync + 'static>(mut self, value: T) -> Self {
    self
      .entities
      .push(Arc::new(Entity::ready(Key::of::<T>(), Value::new(value), true)));
    self
  }

  pub fn build(self) -> Scope {
    Scope {
      entities: Arc::new(self.entities),
    }
  }
}
