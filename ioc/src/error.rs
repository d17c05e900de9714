//! Error types for binding, resolution and injection.

use thiserror::Error;

/// A boxed, thread-safe error produced by user code (factories, predicates,
/// callables) and carried through the container untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while binding or resolving.
#[derive(Debug, Error)]
pub enum Error {
  /// No entity matched any candidate identity, anywhere in the container chain.
  #[error("object not found: key={key}{}", .hint.as_ref().map(|h| format!(", did you mean {h}?")).unwrap_or_default())]
  ObjectNotFound {
    key: String,
    /// A near-miss identity that would have matched, for diagnostics only.
    hint: Option<String>,
  },

  /// A callable parameter (or a type-tagged field) could not be resolved.
  #[error("args not instanced: {source}")]
  ArgsNotInstanced {
    #[source]
    source: Box<Error>,
  },

  /// A factory declares no result.
  #[error("invalid return value count: {message}")]
  InvalidReturnValueCount { message: String },

  /// The identity is already bound and its entity does not allow overriding.
  #[error("repeated bind: key={key} is already bound and not overridable")]
  RepeatedBind { key: String },

  /// The arguments of a bind call were rejected.
  #[error("invalid args: {message}")]
  InvalidArgs { message: String },

  /// A factory ran and reported a failure.
  #[error("({key}) {source}")]
  Factory {
    key: String,
    #[source]
    source: BoxError,
  },

  /// The predicate of a conditional binding reported a failure.
  #[error("condition failed: {source}")]
  Condition {
    #[source]
    source: BoxError,
  },

  /// A callable passed to `resolve` returned an error.
  #[error("{source}")]
  Callable {
    #[source]
    source: BoxError,
  },

  /// Autowiring a single field failed.
  #[error("{field}: {source}")]
  Field {
    field: &'static str,
    #[source]
    source: Box<Error>,
  },

  /// A bound value was found but holds a different type than requested.
  #[error("type mismatch: key={key} holds {found}, expected {expected}")]
  TypeMismatch {
    key: String,
    expected: &'static str,
    found: &'static str,
  },
}

impl Error {
  pub(crate) fn invalid_args(message: impl Into<String>) -> Self {
    Error::InvalidArgs {
      message: message.into(),
    }
  }

  /// Wraps a lookup failure the way parameter resolution reports it.
  ///
  /// Only `ObjectNotFound` is wrapped; other failures (a dependency's factory
  /// failing, for instance) pass through unchanged.
  pub(crate) fn into_arg_error(self) -> Self {
    match self {
      err @ Error::ObjectNotFound { .. } => Error::ArgsNotInstanced {
        source: Box::new(err),
      },
      other => other,
    }
  }

  /// Returns `true` if the requested identity is missing, directly or as the
  /// cause of an unresolved argument or field.
  pub fn is_not_found(&self) -> bool {
    match self {
      Error::ObjectNotFound { .. } => true,
      Error::ArgsNotInstanced { source } | Error::Field { source, .. } => source.is_not_found(),
      _ => false,
    }
  }

  pub fn is_args_not_instanced(&self) -> bool {
    match self {
      Error::ArgsNotInstanced { .. } => true,
      Error::Field { source, .. } => source.is_args_not_instanced(),
      _ => false,
    }
  }

  pub fn is_repeated_bind(&self) -> bool {
    matches!(self, Error::RepeatedBind { .. })
  }

  pub fn is_invalid_args(&self) -> bool {
    matches!(self, Error::InvalidArgs { .. })
  }
}
