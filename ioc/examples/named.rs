use fibre_wire::{resolve, Container};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() -> fibre_wire::Result<()> {
  let container = Container::new();

  // --- Registration ---
  // Register both implementations under their own string keys.
  container.singleton_contract_with_key::<dyn MessageSender, _, _>("email", || {
    Arc::new(EmailSender) as Arc<dyn MessageSender>
  })?;
  container.singleton_contract_with_key::<dyn MessageSender, _, _>("sms", || {
    Arc::new(SmsSender) as Arc<dyn MessageSender>
  })?;

  // --- Resolution ---
  // Pick the implementation at the point of resolution.
  let email_notifier = resolve!(container, dyn MessageSender, "email");
  let sms_notifier = resolve!(container, dyn MessageSender, "sms");

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));

  Ok(())
}
