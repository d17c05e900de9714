// benches/resolve.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fibre_wire::{Container, Key, Scope};
use std::sync::Arc;

// --- Fixtures ---

trait Repository: Send + Sync {
  fn table(&self) -> &str;
}

struct UserRepository;
impl Repository for UserRepository {
  fn table(&self) -> &str {
    "users"
  }
}

struct Config {
  port: u16,
}

struct Service {
  repo: Arc<dyn Repository>,
  config: Arc<Config>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct Tenant(u32);

fn populated() -> Container {
  let container = Container::new();
  container.must_singleton(|| Config { port: 8080 });
  container.must_singleton_contract::<dyn Repository, _, _>(|| Arc::new(UserRepository) as Arc<dyn Repository>);
  container.must_prototype(|repo: Arc<dyn Repository>, config: Arc<Config>| Service { repo, config });
  container.must_bind_value("name", String::from("bench"));
  container
}

fn bench_singleton(c: &mut Criterion) {
  let container = populated();
  c.bench_function("get_type singleton", |b| {
    b.iter(|| black_box(container.get_type::<Config>().unwrap().port))
  });
  c.bench_function("get_type contract", |b| {
    b.iter(|| black_box(container.get_type::<dyn Repository>().unwrap().table().len()))
  });
}

fn bench_prototype(c: &mut Criterion) {
  let container = populated();
  c.bench_function("get_type prototype with two deps", |b| {
    b.iter(|| {
      let service = container.get_type::<Service>().unwrap();
      black_box(service.config.port as usize + service.repo.table().len())
    })
  });
}

fn bench_value_and_key(c: &mut Criterion) {
  let container = populated();
  container.must_singleton(|| Tenant(1));
  c.bench_function("get_value by name", |b| {
    b.iter(|| black_box(container.get_value::<String>("name").unwrap().len()))
  });
  c.bench_function("get by value key", |b| {
    b.iter(|| black_box(container.get(Key::value(Tenant(9))).unwrap()))
  });
}

fn bench_call(c: &mut Criterion) {
  let container = populated();
  let scope = Scope::builder().instance(Config { port: 9090 }).build();
  c.bench_function("call with two args", |b| {
    b.iter(|| {
      container
        .call(|config: Arc<Config>, repo: Arc<dyn Repository>| config.port as usize + repo.table().len())
        .unwrap()
    })
  });
  c.bench_function("call_with_scope", |b| {
    b.iter(|| {
      container
        .call_with_scope(|config: Arc<Config>| config.port, &scope)
        .unwrap()
    })
  });
}

fn bench_chain(c: &mut Criterion) {
  let root = populated();
  let mut leaf = root.clone();
  for _ in 0..8 {
    leaf = Container::extend(&leaf);
  }
  c.bench_function("get_type through 8 parents", |b| {
    b.iter(|| black_box(leaf.get_type::<Config>().unwrap().port))
  });
}

criterion_group!(
  benches,
  bench_singleton,
  bench_prototype,
  bench_value_and_key,
  bench_call,
  bench_chain
);
criterion_main!(benches);
