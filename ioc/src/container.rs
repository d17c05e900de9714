//! The main `Container` struct: binding table, parent chain and lookups.

use crate::builder::ContainerBuilder;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::invoke::{downcast, Resolver};
use crate::key::Key;
use crate::lookup::Lookup;
use crate::scope::Scope;
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Identity → entity map plus the registration order.
///
/// Every index entry points at exactly one slot of `entries`; an override
/// replaces the slot in place so the original position is kept.
#[derive(Default)]
struct Table {
  index: HashMap<Key, usize>,
  entries: Vec<Arc<Entity>>,
}

impl Table {
  /// A table holding only `entity`.
  fn seeded(entity: Entity) -> Self {
    Self {
      index: HashMap::from([(entity.key().clone(), 0)]),
      entries: vec![Arc::new(entity)],
    }
  }

  /// Returns `true` if an existing entity was replaced.
  fn bind(&mut self, entity: Entity) -> Result<bool> {
    match self.index.get(entity.key()) {
      Some(&slot) => {
        if !self.entries[slot].overridable() {
          return Err(Error::RepeatedBind {
            key: entity.key().to_string(),
          });
        }
        self.entries[slot] = Arc::new(entity);
        Ok(true)
      }
      None => {
        self.index.insert(entity.key().clone(), self.entries.len());
        self.entries.push(Arc::new(entity));
        Ok(false)
      }
    }
  }

  fn get(&self, key: &Key) -> Option<&Arc<Entity>> {
    self.index.get(key).map(|&slot| &self.entries[slot])
  }
}

struct Inner {
  table: RwLock<Table>,
  parent: RwLock<Option<Container>>,
}

/// The dependency container.
///
/// `Container` is a cheap handle: clones share the same bindings. It is
/// thread-safe, bindings can be added at any time, and a container can
/// delegate lookups it cannot satisfy to a parent.
#[derive(Clone)]
pub struct Container {
  inner: Arc<Inner>,
}

impl Container {
  /// Creates a root container with a fresh, never-cancelled
  /// `CancellationToken` bound as its context.
  pub fn new() -> Self {
    ContainerBuilder::new().build()
  }

  /// Creates a root container with `context` bound as a singleton.
  pub fn with_context(context: CancellationToken) -> Self {
    ContainerBuilder::new().context(context).build()
  }

  /// Creates an empty child of `parent`. Lookups the child cannot satisfy
  /// fall back to the parent; the parent never sees the child's bindings.
  pub fn extend(parent: &Container) -> Self {
    ContainerBuilder::new().parent(parent).build()
  }

  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  /// A container whose table holds at most `seed`.
  pub(crate) fn seeded(parent: Option<Container>, seed: Option<Entity>) -> Self {
    Self {
      inner: Arc::new(Inner {
        table: RwLock::new(seed.map(Table::seeded).unwrap_or_default()),
        parent: RwLock::new(parent),
      }),
    }
  }

  /// Makes `parent` this container's fallback, replacing any previous one.
  pub fn extend_from(&self, parent: &Container) {
    tracing::debug!("linking container to a parent");
    *self.inner.parent.write() = Some(parent.clone());
  }

  pub fn parent(&self) -> Option<Container> {
    self.inner.parent.read().clone()
  }

  /// Whether both handles refer to the same container.
  pub fn ptr_eq(&self, other: &Container) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }

  /// Unwraps `result`, panicking with the error otherwise.
  ///
  /// # Panics
  ///
  /// Panics if `result` is an `Err`.
  #[track_caller]
  pub fn must<T>(&self, result: Result<T>) -> T {
    match result {
      Ok(value) => value,
      Err(err) => panic!("{err}"),
    }
  }

  // --- Table access ---

  pub(crate) fn insert(&self, entity: Entity) -> Result<()> {
    let key = entity.key().clone();
    let lifetime = entity.lifetime();
    let overridable = entity.overridable();

    let replaced = self.inner.table.write().bind(entity)?;
    if replaced {
      tracing::debug!(key = %key, ?lifetime, overridable, "overrode binding");
    } else {
      tracing::debug!(key = %key, ?lifetime, overridable, "bound");
    }
    Ok(())
  }

  /// Finds the first entity matching the lookup's candidates, trying the
  /// scope before the local table. Parents are not consulted.
  pub(crate) fn find(&self, lookup: &Lookup, scope: Option<&Scope>) -> Option<Arc<Entity>> {
    if let Some(entity) = scope.and_then(|s| s.find(lookup)) {
      return Some(entity);
    }

    let table = self.inner.table.read();
    lookup
      .candidates()
      .iter()
      .find_map(|candidate| table.get(candidate).cloned())
  }

  /// Resolves a lookup here, then up the parent chain.
  ///
  /// The scope only applies to this container; parents resolve without it.
  /// The table lock is released before the entity is materialized, so
  /// factories may bind to or resolve from the same container.
  pub(crate) fn resolve_lookup(&self, lookup: &Lookup, scope: Option<&Scope>) -> Result<Value> {
    let mut current = self.clone();
    let mut scope = scope;
    loop {
      if let Some(entity) = current.find(lookup, scope) {
        tracing::trace!(key = %lookup.key(), matched = %entity.key(), "resolved");
        return entity.materialize(&Resolver::new(&current, scope));
      }
      match current.parent() {
        Some(parent) => {
          current = parent;
          scope = None;
        }
        None => return Err(lookup.not_found()),
      }
    }
  }

  // --- Resolution ---

  /// Resolves `key` to its value.
  pub fn get(&self, key: impl Into<Key>) -> Result<Value> {
    self.resolve_lookup(&Lookup::new(key.into()), None)
  }

  /// Resolves the binding keyed by `T`.
  pub fn get_type<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
    let key = Key::of::<T>();
    let value = self.get(key.clone())?;
    downcast(&key, &value)
  }

  /// Resolves a value bound under `name`.
  pub fn get_value<V: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<V>> {
    let key = Key::name(name);
    let value = self.get(key.clone())?;
    downcast(&key, &value)
  }

  pub fn must_get(&self, key: impl Into<Key>) -> Value {
    self.must(self.get(key))
  }

  pub fn must_get_type<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
    self.must(self.get_type::<T>())
  }

  pub fn must_get_value<V: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Arc<V> {
    self.must(self.get_value::<V>(name))
  }

  // --- Introspection ---

  /// Every identity bound directly in this container, in registration order.
  pub fn keys(&self) -> Vec<Key> {
    let table = self.inner.table.read();
    table.entries.iter().map(|e| e.key().clone()).collect()
  }

  /// Whether the identity bound here may be replaced by a later bind.
  ///
  /// Fails with `ObjectNotFound` if this container has no such binding.
  pub fn can_override(&self, key: impl Into<Key>) -> Result<bool> {
    let key = key.into();
    let table = self.inner.table.read();
    table
      .get(&key)
      .map(|entity| entity.overridable())
      .ok_or_else(|| Error::ObjectNotFound {
        key: key.to_string(),
        hint: None,
      })
  }

  /// Whether exactly this identity is bound in this container (parents are
  /// not consulted).
  pub fn has_bound(&self, key: impl Into<Key>) -> bool {
    self.inner.table.read().get(&key.into()).is_some()
  }

  /// Whether a value is bound under `name` in this container.
  pub fn has_bound_value(&self, name: &str) -> bool {
    self.has_bound(Key::name(name))
  }
}

impl Default for Container {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let table = self.inner.table.read();
    f.debug_struct("Container")
      .field("bindings", &table.entries.len())
      .field("has_parent", &self.inner.parent.read().is_some())
      .finish()
  }
}
