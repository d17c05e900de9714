//! Turns a lookup key into the identities worth trying.

use crate::error::Error;
use crate::key::{Key, TypeKey, TypeKind};

/// The candidate identities for one lookup, in the order they are tried,
/// plus a near-miss suggestion for the not-found error.
#[derive(Debug, Clone)]
pub(crate) struct Lookup {
  key: Key,
  candidates: Vec<Key>,
  hint: Option<Key>,
}

impl Lookup {
  pub(crate) fn new(key: Key) -> Self {
    let mut candidates = vec![key.clone()];
    let mut hint = None;

    let effective = match &key {
      Key::Type(t) => t.clone(),
      Key::Name(_) => {
        let t = TypeKey::of::<String>();
        candidates.push(Key::Type(t.clone()));
        t
      }
      Key::Value(v) => {
        candidates.push(Key::Type(v.type_key().clone()));
        v.type_key().clone()
      }
    };

    if let Some(pointee) = effective.pointee() {
      if pointee.kind() == TypeKind::Contract {
        candidates.push(Key::Type(pointee));
      } else {
        hint = Some(Key::Type(pointee));
      }
    }

    if let Key::Value(v) = &key {
      if v.type_key().kind() == TypeKind::Record {
        hint = Some(Key::Type(v.pointer_hint().clone()));
      }
    }

    Self {
      key,
      candidates,
      hint,
    }
  }

  pub(crate) fn key(&self) -> &Key {
    &self.key
  }

  pub(crate) fn candidates(&self) -> &[Key] {
    &self.candidates
  }

  pub(crate) fn not_found(&self) -> Error {
    Error::ObjectNotFound {
      key: self.key.to_string(),
      hint: self.hint.as_ref().map(Key::to_string),
    }
  }
}
