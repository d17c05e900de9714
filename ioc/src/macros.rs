//! Public macros for ergonomic service resolution and field wiring.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// # Panics
///
/// Panics with the resolution error if the service is missing, its factory
/// fails, or the bound value has another type. For a non-panicking version,
/// use [`maybe_resolve!`] or the container's `get_*` methods.
///
/// # Examples
///
/// ```
/// use fibre_wire::{resolve, Container};
///
/// struct Config {
///   port: u16,
/// }
///
/// let container = Container::new();
/// container.must_singleton(|| Config { port: 8080 });
/// container.must_bind_value("greeting", String::from("hello"));
///
/// let config = resolve!(container, Config);
/// assert_eq!(config.port, 8080);
///
/// let greeting = resolve!(container, String, "greeting");
/// assert_eq!(*greeting, "hello");
/// ```
///
/// ```
/// use fibre_wire::{resolve, Container};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let container = Container::new();
/// container.must_singleton_contract::<dyn Greeter, _, _>(|| Arc::new(EnglishGreeter) as Arc<dyn Greeter>);
///
/// let greeter = resolve!(container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
  // resolve!(container, trait MyTrait)
  ($container:expr, trait $trait_ident:ident) => {
    $container.must_get_type::<dyn $trait_ident>()
  };

  // resolve!(container, String, "name")
  ($container:expr, $type:ty, $name:expr) => {
    $container.must_get_value::<$type>($name)
  };

  // resolve!(container, MyService)
  ($container:expr, $type:ty) => {
    $container.must_get_type::<$type>()
  };
}

/// Like [`resolve!`], but yields `None` instead of panicking.
///
/// ```
/// use fibre_wire::{maybe_resolve, Container};
///
/// struct Missing;
///
/// let container = Container::new();
/// assert!(maybe_resolve!(container, Missing).is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
  ($container:expr, trait $trait_ident:ident) => {
    $container.get_type::<dyn $trait_ident>().ok()
  };

  ($container:expr, $type:ty, $name:expr) => {
    $container.get_value::<$type>($name).ok()
  };

  ($container:expr, $type:ty) => {
    $container.get_type::<$type>().ok()
  };
}

/// Implements [`AutoWire`](crate::AutoWire) for a struct from a list of
/// `field: marker` pairs.
///
/// `@` resolves the field by its declared type; a string literal resolves it
/// from the value bound under that key. Invoke the macro in the struct's own
/// module to reach private fields.
///
/// ```
/// use fibre_wire::{autowire, Container};
/// use std::sync::Arc;
///
/// struct Database;
///
/// #[derive(Default)]
/// struct Handler {
///   db: Option<Arc<Database>>,
///   name: String,
///   hits: u64,
/// }
///
/// autowire!(Handler { db: @, name: "handler.name" });
///
/// let container = Container::new();
/// container.must_singleton(|| Database);
/// container.must_bind_value("handler.name", String::from("users"));
///
/// let mut handler = Handler { hits: 3, ..Default::default() };
/// container.autowire(&mut handler).unwrap();
/// assert!(handler.db.is_some());
/// assert_eq!(handler.name, "users");
/// assert_eq!(handler.hits, 3);
/// ```
#[macro_export]
macro_rules! autowire {
  ($type:ty { $($field:ident : $marker:tt),* $(,)? }) => {
    impl $crate::AutoWire for $type {
      fn autowire(&mut self, wirer: &$crate::Wirer<'_>) -> $crate::Result<()> {
        $($crate::__autowire_field!(self, wirer, $field, $marker);)*
        Ok(())
      }
    }
  };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __autowire_field {
  ($target:ident, $wirer:ident, $field:ident, @) => {
    $wirer.by_type(stringify!($field), &mut $target.$field)?
  };
  ($target:ident, $wirer:ident, $field:ident, $key:literal) => {
    $wirer.by_key(stringify!($field), $key, &mut $target.$field)?
  };
}
