//! Argument injection for arbitrary callables.
//!
//! A callable's parameters are resolved from the container by type, in
//! declaration order, before the callable runs. Any parameter type that
//! implements [`Inject`] can appear in a factory or callback signature:
//!
//! - `Arc<T>` resolves the binding keyed by `T` (a struct, or a `dyn Trait`).
//! - `Container` receives the container performing the resolution.

use crate::container::Container;
use crate::error::{BoxError, Error, Result};
use crate::key::Key;
use crate::lookup::Lookup;
use crate::scope::Scope;
use crate::value::Value;
use std::any::type_name;
use std::sync::Arc;

/// The resolution context handed to factories and callables: the container
/// that is resolving, and the request scope, if any.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
  container: &'a Container,
  scope: Option<&'a Scope>,
}

impl<'a> Resolver<'a> {
  pub(crate) fn new(container: &'a Container, scope: Option<&'a Scope>) -> Self {
    Self { container, scope }
  }

  pub fn container(&self) -> &'a Container {
    self.container
  }

  pub fn scope(&self) -> Option<&'a Scope> {
    self.scope
  }

  /// Looks `key` up in the scope, the container, then its parents.
  pub fn get(&self, key: impl Into<Key>) -> Result<Value> {
    self.container.resolve_lookup(&Lookup::new(key.into()), self.scope)
  }

  /// Resolves the binding keyed by `T` the way a parameter is resolved.
  pub fn instance_of<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
    let key = Key::of::<T>();
    let value = self.get(key.clone()).map_err(Error::into_arg_error)?;
    downcast(&key, &value)
  }
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(key: &Key, value: &Value) -> Result<Arc<T>> {
  value.downcast::<T>().ok_or_else(|| Error::TypeMismatch {
    key: key.to_string(),
    expected: type_name::<T>(),
    found: value.type_name(),
  })
}

/// A parameter type the container knows how to supply.
pub trait Inject: Sized {
  fn inject(resolver: &Resolver<'_>) -> Result<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Inject for Arc<T> {
  fn inject(resolver: &Resolver<'_>) -> Result<Self> {
    resolver.instance_of::<T>()
  }
}

impl Inject for Container {
  fn inject(resolver: &Resolver<'_>) -> Result<Self> {
    Ok(resolver.container().clone())
  }
}

/// A callable whose arguments can all be injected.
///
/// Implemented for every `Fn` of up to twelve [`Inject`] parameters; `Args`
/// is the tuple of parameter types and only exists to keep the impls apart.
pub trait Injectable<Args> {
  type Output;

  fn invoke(&self, resolver: &Resolver<'_>) -> Result<Self::Output>;
}

/// A callable that can back a binding.
///
/// Plain functions produce their return value. Functions returning a
/// `Result` must be wrapped in [`fallible`] so that their `Err` is reported
/// as a factory failure rather than stored as a value.
pub trait Factory<Args>: Send + Sync + 'static {
  type Product: Send + Sync + 'static;

  /// Runs the factory. The outer error is a resolution failure of one of its
  /// arguments; the inner one is the failure the factory itself reported.
  fn produce(&self, resolver: &Resolver<'_>) -> Result<std::result::Result<Self::Product, BoxError>>;
}

/// Marks a `Result`-returning function as a fallible factory.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

/// Wraps a function returning `Result<T, E>` so it binds as a factory of `T`.
///
/// `E` may be any error type, or a `String`/`&str` message.
pub fn fallible<F>(factory: F) -> Fallible<F> {
  Fallible(factory)
}

/// What a callback passed to `resolve` may return: `()` or a `Result`,
/// whose `Ok` value is dropped. Other outputs go through `Container::call`.
pub trait Outcome {
  fn into_outcome(self) -> std::result::Result<(), BoxError>;
}

impl Outcome for () {
  fn into_outcome(self) -> std::result::Result<(), BoxError> {
    Ok(())
  }
}

impl<T, E: Into<BoxError>> Outcome for std::result::Result<T, E> {
  fn into_outcome(self) -> std::result::Result<(), BoxError> {
    self.map(|_| ()).map_err(Into::into)
  }
}

macro_rules! impl_callable {
  ($($arg:ident),*) => {
    impl<Func, Out, $($arg,)*> Injectable<($($arg,)*)> for Func
    where
      Func: Fn($($arg),*) -> Out,
      $($arg: Inject,)*
    {
      type Output = Out;

      #[allow(non_snake_case, unused_variables)]
      fn invoke(&self, resolver: &Resolver<'_>) -> Result<Out> {
        $(let $arg = <$arg as Inject>::inject(resolver)?;)*
        Ok((self)($($arg),*))
      }
    }

    impl<Func, Out, $($arg,)*> Factory<($($arg,)*)> for Func
    where
      Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
      Out: Send + Sync + 'static,
      $($arg: Inject,)*
    {
      type Product = Out;

      fn produce(&self, resolver: &Resolver<'_>) -> Result<std::result::Result<Out, BoxError>> {
        <Self as Injectable<($($arg,)*)>>::invoke(self, resolver).map(Ok)
      }
    }

    impl<Func, T, E, $($arg,)*> Factory<($($arg,)*)> for Fallible<Func>
    where
      Func: Fn($($arg),*) -> std::result::Result<T, E> + Send + Sync + 'static,
      T: Send + Sync + 'static,
      E: Into<BoxError>,
      $($arg: Inject,)*
    {
      type Product = T;

      #[allow(non_snake_case, unused_variables)]
      fn produce(&self, resolver: &Resolver<'_>) -> Result<std::result::Result<T, BoxError>> {
        $(let $arg = <$arg as Inject>::inject(resolver)?;)*
        Ok((self.0)($($arg),*).map_err(Into::into))
      }
    }
  };
}

impl_callable!();
impl_callable!(A1);
impl_callable!(A1, A2);
impl_callable!(A1, A2, A3);
impl_callable!(A1, A2, A3, A4);
impl_callable!(A1, A2, A3, A4, A5);
impl_callable!(A1, A2, A3, A4, A5, A6);
impl_callable!(A1, A2, A3, A4, A5, A6, A7);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11);
impl_callable!(A1, A2, A3, A4, A5, A6, A7, A8, A9, A10, A11, A12);

// --- Invocation ---
impl Container {
  /// Resolves every parameter of `callable`, then calls it and returns what it
  /// returned. Nothing runs unless all parameters resolve.
  pub fn call<Args, F: Injectable<Args>>(&self, callable: F) -> Result<F::Output> {
    callable.invoke(&Resolver::new(self, None))
  }

  /// Like [`Container::call`], with `scope` shadowing the container's bindings.
  pub fn call_with_scope<Args, F: Injectable<Args>>(&self, callable: F, scope: &Scope) -> Result<F::Output> {
    callable.invoke(&Resolver::new(self, Some(scope)))
  }

  /// Calls `callable` for its effect. If it returns a `Result`, its error is
  /// surfaced as [`Error::Callable`].
  pub fn resolve<Args, F>(&self, callable: F) -> Result<()>
  where
    F: Injectable<Args>,
    F::Output: Outcome,
  {
    Self::settle(self.call(callable)?)
  }

  pub fn resolve_with_scope<Args, F>(&self, callable: F, scope: &Scope) -> Result<()>
  where
    F: Injectable<Args>,
    F::Output: Outcome,
  {
    Self::settle(self.call_with_scope(callable, scope)?)
  }

  fn settle(outcome: impl Outcome) -> Result<()> {
    outcome
      .into_outcome()
      .map_err(|source| Error::Callable { source })
  }

  pub fn must_call<Args, F: Injectable<Args>>(&self, callable: F) -> F::Output {
    self.must(self.call(callable))
  }

  pub fn must_call_with_scope<Args, F: Injectable<Args>>(&self, callable: F, scope: &Scope) -> F::Output {
    self.must(self.call_with_scope(callable, scope))
  }

  pub fn must_resolve<Args, F>(&self, callable: F)
  where
    F: Injectable<Args>,
    F::Output: Outcome,
  {
    self.must(self.resolve(callable))
  }

  pub fn must_resolve_with_scope<Args, F>(&self, callable: F, scope: &Scope)
  where
    F: Injectable<Args>,
    F::Output: Outcome,
  {
    self.must(self.resolve_with_scope(callable, scope))
  }
}
