use fibre_wire::{autowire, fallible, Container, Scope};
use std::sync::Arc;

struct Database {
  dsn: String,
}

// Built once per request scope.
struct RequestId(String);

#[derive(Default)]
struct AuditLog {
  db: Option<Arc<Database>>,
  service: String,
}

autowire!(AuditLog {
  db: @,
  service: "service.name",
});

fn handle(container: &Container, id: &str) -> fibre_wire::Result<()> {
  let id = id.to_string();
  let scope = Scope::builder()
    .provide(move || RequestId(id.clone()))?
    .build();

  container.resolve_with_scope(
    |req: Arc<RequestId>, db: Arc<Database>| -> Result<(), String> {
      if req.0.is_empty() {
        return Err("missing request id".into());
      }
      println!("request {} served from {}", req.0, db.dsn);
      Ok(())
    },
    &scope,
  )
}

fn main() -> fibre_wire::Result<()> {
  let container = Container::new();
  container.bind_value("service.name", "billing".to_string())?;
  container.singleton(fallible(|| -> Result<Database, std::env::VarError> {
    let dsn = std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/billing".into());
    Ok(Database { dsn })
  }))?;

  handle(&container, "req-1")?;
  handle(&container, "req-2")?;

  match handle(&container, "") {
    Err(err) => println!("rejected: {err}"),
    Ok(()) => unreachable!("an empty request id is rejected"),
  }

  let mut audit = AuditLog::default();
  container.autowire(&mut audit)?;
  println!(
    "audit log for {} writes to {}",
    audit.service,
    audit.db.as_ref().map(|db| db.dsn.as_str()).unwrap_or_default()
  );

  Ok(())
}
