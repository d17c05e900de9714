use fibre_wire::Container;

// A function that configures dependencies and runs some logic.
// By accepting a `&Container`, it can be tested with a controlled environment.
fn process_data(container: &Container) -> fibre_wire::Result<String> {
  let data = container.get_value::<String>("data")?;
  Ok(format!("Processed: {}", data.to_uppercase()))
}

fn main() -> fibre_wire::Result<()> {
  // --- Application container ---
  let app = Container::new();
  app.bind_value("data", "production data".to_string())?;
  app.bind_value("region", "eu-west-1".to_string())?;

  // --- Test container layered on top ---
  // It sees everything the application binds, and shadows what it rebinds.
  let test = Container::extend(&app);
  test.bind_value("data", "test data".to_string())?;

  let result = process_data(&test)?;
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");
  assert_eq!(*test.get_value::<String>("region")?, "eu-west-1");

  // --- Verify Isolation ---
  // The child's bindings never leak into the parent.
  assert_eq!(process_data(&app)?, "Processed: PRODUCTION DATA");
  println!("\nVerified that the child container does not leak into its parent.");

  Ok(())
}
