use crate::container::Container;
use crate::entity::Entity;
use crate::key::Key;
use crate::value::Value;

use tokio_util::sync::CancellationToken;

/// A builder for creating `Container` instances.
///
/// Root containers carry a `CancellationToken` context by default: the one
/// supplied, or a fresh token that is never cancelled. Child containers only
/// bind a context when one is supplied and otherwise see the parent's
/// through the lookup chain.
#[derive(Debug)]
pub struct ContainerBuilder {
  parent: Option<Container>,
  context: Option<CancellationToken>,
  bind_context: bool,
}

impl Default for ContainerBuilder {
  fn default() -> Self {
    Self {
      parent: None,
      context: None,
      bind_context: true,
    }
  }
}

impl ContainerBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the container lookups fall back to.
  pub fn parent(mut self, parent: &Container) -> Self {
    self.parent = Some(parent.clone());
    self
  }

  /// Sets the cancellation context bound in the new container.
  ///
  /// The container never observes the token; it is only handed to factories
  /// and callables that ask for it.
  pub fn context(mut self, context: CancellationToken) -> Self {
    self.context = Some(context);
    self
  }

  /// Whether to bind a context at all. Defaults to `true`.
  pub fn bind_context(mut self, enabled: bool) -> Self {
    self.bind_context = enabled;
    self
  }

  pub fn build(self) -> Container {
    let context = match (self.bind_context, self.context, &self.parent) {
      (false, _, _) => None,
      (true, Some(context), _) => Some(context),
      (true, None, None) => Some(CancellationToken::new()),
      (true, None, Some(_)) => None,
    };

    let seed = context.map(|context| {
      Entity::ready(Key::of::<CancellationToken>(), Value::new(context), false)
    });
    if seed.is_some() {
      tracing::debug!("bound cancellation context");
    }
    Container::seeded(self.parent, seed)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn roots_bind_a_context_children_inherit_it() {
    let root = ContainerBuilder::new().build();
    assert!(root.has_bound(Key::of::<CancellationToken>()));

    let child = ContainerBuilder::new().parent(&root).build();
    assert!(!child.has_bound(Key::of::<CancellationToken>()));
    assert!(child.get_type::<CancellationToken>().is_ok());

    let bare = ContainerBuilder::new().bind_context(false).build();
    assert!(bare.keys().is_empty());
  }

  #[test]
  fn seeded_context_is_final_and_supplied_token_is_kept() {
    let token = CancellationToken::new();
    let root = ContainerBuilder::new().context(token.clone()).build();

    assert_eq!(root.keys(), vec![Key::of::<CancellationToken>()]);
    assert_eq!(root.can_override(Key::of::<CancellationToken>()).ok(), Some(false));
    assert!(root.bind_instance(CancellationToken::new()).unwrap_err().is_repeated_bind());

    token.cancel();
    assert!(root.get_type::<CancellationToken>().unwrap().is_cancelled());
  }
}
