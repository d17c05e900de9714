//! # Fibre Wire
//!
//! A thread-safe, runtime dependency-injection container for Rust.
//!
//! Fibre Wire keeps a table of factories keyed by type, by name or by value,
//! and builds instances on demand by resolving each factory's parameters from
//! the same container. Bindings can be added at any time, containers can be
//! chained to a parent, and callers can shadow bindings for a single call with
//! a [`Scope`].
//!
//! ## Core Concepts
//!
//! - **Container**: a cheap, clonable handle to a binding table plus an
//!   optional parent it falls back to.
//! - **Factories**: any `Fn` of up to twelve injectable parameters (`Arc<T>`
//!   or `Container`). Wrap `Result`-returning functions in [`fallible`].
//! - **Lifetimes**: singletons are built once on first use, prototypes on
//!   every resolution.
//! - **Contracts**: factories returning `Arc<dyn Trait>` bind under the trait
//!   and are resolved as trait objects.
//! - **Autowiring**: existing structs get fields filled through [`AutoWire`].
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wire::{fallible, resolve, Container};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct Settings {
//!   greeting: String,
//! }
//!
//! struct EnglishGreeter {
//!   settings: Arc<Settings>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.settings.greeting.clone()
//!   }
//! }
//!
//! let container = Container::new();
//!
//! container.must_singleton(|| Settings { greeting: "Hello, World!".into() });
//!
//! // Factory parameters are resolved from the container.
//! container.must_singleton_contract::<dyn Greeter, _, _>(|settings: Arc<Settings>| {
//!   Arc::new(EnglishGreeter { settings }) as Arc<dyn Greeter>
//! });
//!
//! // Fallible factories report their own errors.
//! container.must_bind_with_key(
//!   "port",
//!   fallible(|| "8080".parse::<u16>()),
//!   fibre_wire::Lifetime::Singleton,
//!   false,
//! );
//!
//! let greeter = resolve!(container, trait Greeter);
//! assert_eq!(greeter.greet(), "Hello, World!");
//! assert_eq!(*resolve!(container, u16, "port"), 8080);
//!
//! // Callables get their arguments injected too.
//! let shout = container
//!   .call(|g: Arc<dyn Greeter>| g.greet().to_uppercase())
//!   .unwrap();
//! assert_eq!(shout, "HELLO, WORLD!");
//! ```

mod autowire;
mod binding;
mod builder;
mod condition;
mod container;
mod entity;
mod error;
mod invoke;
mod key;
mod lookup;
mod macros;
mod scope;
mod value;

pub use autowire::{AutoWire, Slot, Wirer};
pub use builder::ContainerBuilder;
pub use condition::{Condition, Conditional};
pub use container::Container;
pub use entity::Lifetime;
pub use error::{BoxError, Error, Result};
pub use invoke::{fallible, Fallible, Factory, Inject, Injectable, Outcome, Resolver};
pub use key::{Key, TypeKey, TypeKind, ValueKey};
pub use scope::{Scope, ScopeBuilder};
pub use value::Value;

/// Re-exported so callers can supply a context without a direct dependency.
pub use tokio_util::sync::CancellationToken;
