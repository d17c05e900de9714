//! Identities under which entities are stored and looked up.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// The broad shape of a type, as far as binding rules care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// A struct or enum.
  Record,
  /// A trait object (`dyn Trait`).
  Contract,
  /// `Arc`, `Rc`, `Box`, `Weak`, `NonNull`, references and raw pointers.
  Pointer,
  /// Primitives, `String` and `&str`.
  Scalar,
  /// Slices, arrays, tuples, `Vec` and the std collections.
  Collection,
  /// Function pointers and closures.
  Function,
  /// `()`.
  Unit,
}

const SCALARS: &[&str] = &[
  "bool",
  "char",
  "str",
  "&str",
  "i8",
  "i16",
  "i32",
  "i64",
  "i128",
  "isize",
  "u8",
  "u16",
  "u32",
  "u64",
  "u128",
  "usize",
  "f32",
  "f64",
  "alloc::string::String",
];

const POINTER_PREFIXES: &[&str] = &[
  "&",
  "*const ",
  "*mut ",
  "alloc::sync::Arc<",
  "alloc::sync::Weak<",
  "alloc::rc::Rc<",
  "alloc::rc::Weak<",
  "alloc::boxed::Box<",
  "core::ptr::non_null::NonNull<",
];

const COLLECTION_PREFIXES: &[&str] = &[
  "[",
  "(",
  "alloc::vec::Vec<",
  "alloc::collections::",
  "std::collections::",
];

impl TypeKind {
  /// Classifies a type from its `type_name`.
  pub(crate) fn classify(name: &str) -> Self {
    if name == "()" {
      return TypeKind::Unit;
    }
    if SCALARS.contains(&name) {
      return TypeKind::Scalar;
    }
    if name.starts_with("dyn ") {
      return TypeKind::Contract;
    }
    if name.starts_with("fn(")
      || name.starts_with("unsafe ")
      || name.starts_with("extern ")
      || name.contains("{{closure}}")
    {
      return TypeKind::Function;
    }
    if POINTER_PREFIXES.iter().any(|p| name.starts_with(p)) {
      return TypeKind::Pointer;
    }
    if COLLECTION_PREFIXES.iter().any(|p| name.starts_with(p)) {
      return TypeKind::Collection;
    }
    TypeKind::Record
  }

  /// Whether a type of this kind may serve as an inferred binding key.
  pub fn is_bindable(self) -> bool {
    matches!(self, TypeKind::Record | TypeKind::Contract | TypeKind::Pointer)
  }
}

/// A nominal type descriptor.
///
/// Equality and hashing only consider the `TypeId`; the name and kind are
/// carried for diagnostics and binding rules.
#[derive(Clone)]
pub struct TypeKey {
  id: TypeId,
  name: &'static str,
  kind: TypeKind,
}

// `TypeId` of `Arc<T>` -> descriptor of `T`, for every `T` that was ever
// named through `pointer_to`. Keys of the same type then agree on their
// pointee however they were built.
static POINTEES: Lazy<RwLock<HashMap<TypeId, TypeKey>>> = Lazy::new(Default::default);

impl TypeKey {
  /// The descriptor of `T`.
  pub fn of<T: ?Sized + 'static>() -> Self {
    let name = type_name::<T>();
    Self {
      id: TypeId::of::<T>(),
      name,
      kind: TypeKind::classify(name),
    }
  }

  /// The descriptor of `Arc<T>`, registering `T` as its pointee.
  ///
  /// This is the lookup marker for "whatever is bound under `T`": if `T` is a
  /// trait object the lookup falls through to it, otherwise `T` only shows up
  /// as a suggestion in the not-found error.
  pub fn pointer_to<T: ?Sized + 'static>() -> Self {
    let pointer = Self::of::<Arc<T>>();
    if !POINTEES.read().contains_key(&pointer.id) {
      POINTEES.write().insert(pointer.id, Self::of::<T>());
    }
    pointer
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn kind(&self) -> TypeKind {
    self.kind
  }

  /// The pointed-to type, if this is an `Arc<T>` whose `T` has been named
  /// through [`TypeKey::pointer_to`] (contract bindings do so).
  pub fn pointee(&self) -> Option<TypeKey> {
    if self.kind != TypeKind::Pointer {
      return None;
    }
    POINTEES.read().get(&self.id).cloned()
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({}, {:?})", self.name, self.kind)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}

// Object-safe view of an `Eq + Hash` value so heterogeneous values can share
// one map.
trait KeyValue: Any + Send + Sync {
  fn as_any(&self) -> &dyn Any;
  fn dyn_eq(&self, other: &dyn KeyValue) -> bool;
  fn dyn_hash(&self, state: &mut dyn Hasher);
  fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> KeyValue for T
where
  T: Any + Eq + Hash + fmt::Debug + Send + Sync,
{
  fn as_any(&self) -> &dyn Any {
    self
  }

  fn dyn_eq(&self, other: &dyn KeyValue) -> bool {
    other
      .as_any()
      .downcast_ref::<T>()
      .is_some_and(|other| self == other)
  }

  fn dyn_hash(&self, mut state: &mut dyn Hasher) {
    self.hash(&mut state);
  }

  fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self, f)
  }
}

/// A concrete value used as an identity.
#[derive(Clone)]
pub struct ValueKey {
  value: Arc<dyn KeyValue>,
  type_key: TypeKey,
  pointer_hint: TypeKey,
}

impl ValueKey {
  pub fn new<T>(value: T) -> Self
  where
    T: Any + Eq + Hash + fmt::Debug + Send + Sync,
  {
    Self {
      value: Arc::new(value),
      type_key: TypeKey::of::<T>(),
      pointer_hint: TypeKey::pointer_to::<T>(),
    }
  }

  /// The runtime type of the wrapped value.
  pub fn type_key(&self) -> &TypeKey {
    &self.type_key
  }

  /// `Arc<T>` for a value of type `T`.
  pub(crate) fn pointer_hint(&self) -> &TypeKey {
    &self.pointer_hint
  }

  /// Borrows the wrapped value if it is a `T`.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.as_any().downcast_ref::<T>()
  }
}

impl PartialEq for ValueKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_key == other.type_key && self.value.dyn_eq(other.value.as_ref())
  }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_key.hash(state);
    self.value.dyn_hash(state);
  }
}

impl fmt::Debug for ValueKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.value.dyn_fmt(f)
  }
}

/// The identity of a binding: a type, a literal name, or a concrete value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
  Type(TypeKey),
  Name(String),
  Value(ValueKey),
}

impl Key {
  pub fn of<T: ?Sized + 'static>() -> Self {
    Key::Type(TypeKey::of::<T>())
  }

  pub fn pointer_to<T: ?Sized + 'static>() -> Self {
    Key::Type(TypeKey::pointer_to::<T>())
  }

  pub fn name(name: impl Into<String>) -> Self {
    Key::Name(name.into())
  }

  pub fn value<T>(value: T) -> Self
  where
    T: Any + Eq + Hash + fmt::Debug + Send + Sync,
  {
    Key::Value(ValueKey::new(value))
  }

  pub fn as_type(&self) -> Option<&TypeKey> {
    match self {
      Key::Type(t) => Some(t),
      _ => None,
    }
  }

  pub fn as_name(&self) -> Option<&str> {
    match self {
      Key::Name(n) => Some(n),
      _ => None,
    }
  }
}

impl fmt::Debug for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Type(t) => write!(f, "Key::Type({})", t.name),
      Key::Name(n) => write!(f, "Key::Name({n:?})"),
      Key::Value(v) => write!(f, "Key::Value({v:?})"),
    }
  }
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Type(t) => f.write_str(t.name),
      Key::Name(n) => f.write_str(n),
      Key::Value(v) => write!(f, "{v:?}"),
    }
  }
}

impl From<TypeKey> for Key {
  fn from(key: TypeKey) -> Self {
    Key::Type(key)
  }
}

impl From<ValueKey> for Key {
  fn from(key: ValueKey) -> Self {
    Key::Value(key)
  }
}

impl From<&str> for Key {
  fn from(name: &str) -> Self {
    Key::Name(name.to_owned())
  }
}

impl From<String> for Key {
  fn from(name: String) -> Self {
    Key::Name(name)
  }
}

impl From<&Key> for Key {
  fn from(key: &Key) -> Self {
    key.clone()
  }
}
