//! The binding surface of `Container`.

use crate::condition::{Condition, Conditional};
use crate::container::Container;
use crate::entity::{BoxedFactory, Entity, Lifetime};
use crate::error::{Error, Result};
use crate::invoke::{Factory, Injectable, Resolver};
use crate::key::{Key, TypeKey, TypeKind};
use crate::value::Value;
use std::any::type_name;
use std::sync::Arc;

/// Reserved field marker of the autowiring syntax; never a valid value key.
pub(crate) const TYPE_MARKER: &str = "@";

/// Boxes `factory`, wrapping its product with `wrap`.
///
/// Rejects factories that produce `()` (no result) and plain factories that
/// produce a `Result` (they should have been wrapped in `fallible`).
pub(crate) fn erase<Args, F>(factory: F, wrap: fn(F::Product) -> Value) -> Result<BoxedFactory>
where
  F: Factory<Args>,
{
  let product = TypeKey::of::<F::Product>();
  if product.kind() == TypeKind::Unit {
    return Err(Error::InvalidReturnValueCount {
      message: "expected the factory to return a value, got ()".to_owned(),
    });
  }
  if product.name().starts_with("core::result::Result<") {
    return Err(Error::invalid_args(format!(
      "factory returns {}; wrap it with `fallible` to report its errors",
      product.name()
    )));
  }

  let boxed: BoxedFactory = Box::new(move |resolver: &Resolver<'_>| {
    factory.produce(resolver).map(|outcome| outcome.map(wrap))
  });
  Ok(boxed)
}

fn check_key_kind(key: &TypeKey) -> Result<()> {
  if key.kind().is_bindable() {
    return Ok(());
  }
  Err(Error::invalid_args(format!(
    "the type of key can not be {:?}: {}",
    key.kind(),
    key.name()
  )))
}

fn check_name(name: &str) -> Result<()> {
  if name.is_empty() || name == TYPE_MARKER {
    return Err(Error::invalid_args(format!(
      "key can not be empty or the reserved marker ({TYPE_MARKER})"
    )));
  }
  Ok(())
}

fn check_explicit_key(key: &Key) -> Result<()> {
  match key {
    Key::Type(_) => Ok(()),
    Key::Name(name) => check_name(name),
    Key::Value(value) => check_key_kind(value.type_key()),
  }
}

impl Container {
  // --- PRIVATE HELPERS ---

  fn bind_erased(
    &self,
    key: Key,
    type_name: &'static str,
    factory: BoxedFactory,
    lifetime: Lifetime,
    overridable: bool,
  ) -> Result<()> {
    self.insert(Entity::lazy(key, type_name, factory, lifetime, overridable))
  }

  fn bind_ready<T: Send + Sync + 'static>(&self, key: Key, value: T, overridable: bool) -> Result<()> {
    if TypeKey::of::<T>().kind() == TypeKind::Unit {
      return Err(Error::invalid_args("value is nil"));
    }
    self.insert(Entity::ready(key, Value::new(value), overridable))
  }

  // --- PUBLIC API ---

  // --- Binding by inferred type ---

  /// Binds `factory` under the type it produces.
  ///
  /// Only structs/enums, trait objects and pointer types are accepted as
  /// inferred keys; primitives, strings, collections and functions are
  /// rejected with `InvalidArgs`.
  pub fn bind<Args, F: Factory<Args>>(&self, factory: F, lifetime: Lifetime, overridable: bool) -> Result<()> {
    let boxed = erase(factory, Value::new)?;
    let key = TypeKey::of::<F::Product>();
    check_key_kind(&key)?;
    self.bind_erased(Key::Type(key), type_name::<F::Product>(), boxed, lifetime, overridable)
  }

  pub fn singleton<Args, F: Factory<Args>>(&self, factory: F) -> Result<()> {
    self.bind(factory, Lifetime::Singleton, false)
  }

  pub fn prototype<Args, F: Factory<Args>>(&self, factory: F) -> Result<()> {
    self.bind(factory, Lifetime::Prototype, false)
  }

  pub fn singleton_override<Args, F: Factory<Args>>(&self, factory: F) -> Result<()> {
    self.bind(factory, Lifetime::Singleton, true)
  }

  pub fn prototype_override<Args, F: Factory<Args>>(&self, factory: F) -> Result<()> {
    self.bind(factory, Lifetime::Prototype, true)
  }

  // --- Binding against a contract ---

  /// Binds a factory returning `Arc<I>` under `I`, typically a trait object.
  ///
  /// Lookups for `Arc<I>` fall through to this binding as well.
  pub fn bind_contract<I, Args, F>(&self, factory: F, lifetime: Lifetime, overridable: bool) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    let boxed = erase(factory, Value::from_arc::<I>)?;
    let key = TypeKey::of::<I>();
    check_key_kind(&key)?;
    TypeKey::pointer_to::<I>();
    self.bind_erased(Key::Type(key), type_name::<I>(), boxed, lifetime, overridable)
  }

  pub fn singleton_contract<I, Args, F>(&self, factory: F) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.bind_contract(factory, Lifetime::Singleton, false)
  }

  pub fn prototype_contract<I, Args, F>(&self, factory: F) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.bind_contract(factory, Lifetime::Prototype, false)
  }

  /// Binds a factory returning `Arc<I>` under `key`, resolvable as `I`.
  ///
  /// `get_value::<dyn Trait>("name")` then yields the trait object, where
  /// `bind_with_key` would have stored the `Arc<dyn Trait>` itself.
  pub fn bind_contract_with_key<I, Args, F>(
    &self,
    key: impl Into<Key>,
    factory: F,
    lifetime: Lifetime,
    overridable: bool,
  ) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    let key = key.into();
    check_explicit_key(&key)?;
    let boxed = erase(factory, Value::from_arc::<I>)?;
    TypeKey::pointer_to::<I>();
    self.bind_erased(key, type_name::<I>(), boxed, lifetime, overridable)
  }

  pub fn singleton_contract_with_key<I, Args, F>(&self, key: impl Into<Key>, factory: F) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.bind_contract_with_key(key, factory, Lifetime::Singleton, false)
  }

  pub fn prototype_contract_with_key<I, Args, F>(&self, key: impl Into<Key>, factory: F) -> Result<()>
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.bind_contract_with_key(key, factory, Lifetime::Prototype, false)
  }

  // --- Binding under an explicit key ---

  /// Binds `factory` under `key` regardless of the type it produces.
  ///
  /// Name keys follow the value-key rules; value keys must be of a bindable
  /// kind; type keys are taken as given.
  pub fn bind_with_key<Args, F: Factory<Args>>(
    &self,
    key: impl Into<Key>,
    factory: F,
    lifetime: Lifetime,
    overridable: bool,
  ) -> Result<()> {
    let key = key.into();
    check_explicit_key(&key)?;
    let boxed = erase(factory, Value::new)?;
    self.bind_erased(key, type_name::<F::Product>(), boxed, lifetime, overridable)
  }

  pub fn singleton_with_key<Args, F: Factory<Args>>(&self, key: impl Into<Key>, factory: F) -> Result<()> {
    self.bind_with_key(key, factory, Lifetime::Singleton, false)
  }

  pub fn prototype_with_key<Args, F: Factory<Args>>(&self, key: impl Into<Key>, factory: F) -> Result<()> {
    self.bind_with_key(key, factory, Lifetime::Prototype, false)
  }

  pub fn singleton_with_key_override<Args, F: Factory<Args>>(
    &self,
    key: impl Into<Key>,
    factory: F,
  ) -> Result<()> {
    self.bind_with_key(key, factory, Lifetime::Singleton, true)
  }

  pub fn prototype_with_key_override<Args, F: Factory<Args>>(
    &self,
    key: impl Into<Key>,
    factory: F,
  ) -> Result<()> {
    self.bind_with_key(key, factory, Lifetime::Prototype, true)
  }

  // --- Pre-built instances ---

  /// Binds an already built instance under its own type.
  pub fn bind_instance<T: Send + Sync + 'static>(&self, instance: T) -> Result<()> {
    let key = TypeKey::of::<T>();
    check_key_kind(&key)?;
    self.bind_ready(Key::Type(key), instance, false)
  }

  pub fn bind_instance_override<T: Send + Sync + 'static>(&self, instance: T) -> Result<()> {
    let key = TypeKey::of::<T>();
    check_key_kind(&key)?;
    self.bind_ready(Key::Type(key), instance, true)
  }

  // --- Literal values ---

  /// Binds a value under a string key.
  pub fn bind_value<V: Send + Sync + 'static>(&self, name: &str, value: V) -> Result<()> {
    check_name(name)?;
    self.bind_ready(Key::name(name), value, false)
  }

  pub fn bind_value_override<V: Send + Sync + 'static>(&self, name: &str, value: V) -> Result<()> {
    check_name(name)?;
    self.bind_ready(Key::name(name), value, true)
  }

  // --- Conditional binding ---

  /// Evaluates the predicate once, now, and binds the factory under its
  /// product type only if it holds. A predicate that does not hold is not an
  /// error; a predicate that fails fails the bind.
  pub fn bind_conditional<FArgs, PArgs, F, P>(
    &self,
    conditional: Conditional<F, P>,
    lifetime: Lifetime,
    overridable: bool,
  ) -> Result<()>
  where
    F: Factory<FArgs>,
    P: Injectable<PArgs>,
    P::Output: Condition,
  {
    let (factory, predicate) = conditional.into_parts();
    let matched = self
      .call(predicate)?
      .into_condition()
      .map_err(|source| Error::Condition { source })?;

    if !matched {
      tracing::debug!(product = type_name::<F::Product>(), "condition not met, binding skipped");
      return Ok(());
    }
    self.bind(factory, lifetime, overridable)
  }

  // --- Abort-on-failure variants ---

  pub fn must_bind<Args, F: Factory<Args>>(&self, factory: F, lifetime: Lifetime, overridable: bool) {
    self.must(self.bind(factory, lifetime, overridable))
  }

  pub fn must_singleton<Args, F: Factory<Args>>(&self, factory: F) {
    self.must(self.singleton(factory))
  }

  pub fn must_prototype<Args, F: Factory<Args>>(&self, factory: F) {
    self.must(self.prototype(factory))
  }

  pub fn must_singleton_override<Args, F: Factory<Args>>(&self, factory: F) {
    self.must(self.singleton_override(factory))
  }

  pub fn must_prototype_override<Args, F: Factory<Args>>(&self, factory: F) {
    self.must(self.prototype_override(factory))
  }

  pub fn must_bind_contract<I, Args, F>(&self, factory: F, lifetime: Lifetime, overridable: bool)
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.must(self.bind_contract(factory, lifetime, overridable))
  }

  pub fn must_singleton_contract<I, Args, F>(&self, factory: F)
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.must(self.singleton_contract(factory))
  }

  pub fn must_bind_contract_with_key<I, Args, F>(
    &self,
    key: impl Into<Key>,
    factory: F,
    lifetime: Lifetime,
    overridable: bool,
  ) where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.must(self.bind_contract_with_key(key, factory, lifetime, overridable))
  }

  pub fn must_singleton_contract_with_key<I, Args, F>(&self, key: impl Into<Key>, factory: F)
  where
    I: ?Sized + Send + Sync + 'static,
    F: Factory<Args, Product = Arc<I>>,
  {
    self.must(self.singleton_contract_with_key(key, factory))
  }

  pub fn must_bind_with_key<Args, F: Factory<Args>>(
    &self,
    key: impl Into<Key>,
    factory: F,
    lifetime: Lifetime,
    overridable: bool,
  ) {
    self.must(self.bind_with_key(key, factory, lifetime, overridable))
  }

  pub fn must_singleton_with_key<Args, F: Factory<Args>>(&self, key: impl Into<Key>, factory: F) {
    self.must(self.singleton_with_key(key, factory))
  }

  pub fn must_prototype_with_key<Args, F: Factory<Args>>(&self, key: impl Into<Key>, factory: F) {
    self.must(self.prototype_with_key(key, factory))
  }

  pub fn must_bind_instance<T: Send + Sync + 'static>(&self, instance: T) {
    self.must(self.bind_instance(instance))
  }

  pub fn must_bind_value<V: Send + Sync + 'static>(&self, name: &str, value: V) {
    self.must(self.bind_value(name, value))
  }

  pub fn must_bind_value_override<V: Send + Sync + 'static>(&self, name: &str, value: V) {
    self.must(self.bind_value_override(name, value))
  }

  pub fn must_bind_conditional<FArgs, PArgs, F, P>(
    &self,
    conditional: Conditional<F, P>,
    lifetime: Lifetime,
    overridable: bool,
  ) where
    F: Factory<FArgs>,
    P: Injectable<PArgs>,
    P::Output: Condition,
  {
    self.must(self.bind_conditional(conditional, lifetime, overridable))
  }
}
