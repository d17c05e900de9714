use fibre_wire::{resolve, Container};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> fibre_wire::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter("fibre_wire=debug")
    .init();

  let container = Container::new();

  // --- Registration ---

  // The factory hands out an `Arc<dyn Logger>`; the binding is keyed by the trait.
  container.singleton_contract::<dyn Logger, _, _>(|| Arc::new(ConsoleLogger) as Arc<dyn Logger>)?;

  // The logger is injected into the factory as a parameter.
  container.singleton(|logger: Arc<dyn Logger>| ReportService { logger })?;

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, ReportService);

  println!("Using the service...");
  report_service.generate_report();

  Ok(())
}
