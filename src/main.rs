use std::path::Path;
use std::sync::Arc;

mod catalog;
mod enrich;
mod render;
mod search;
mod ui;

#[tokio::main]
async fn main() {
  init_tracing();

  let catalog = Arc::new(catalog::Catalog::load(Path::new("data")).await);
  let (searcher, outcomes) = search::Searcher::new();

  // drop returns terminal to normal mode
  ui::UI::new(catalog, searcher)
    .listen(outcomes)
    .await;

  // forcibly exit whenever the UI finishes; the stdin reader never will
  std::process::exit(0);
}

/// Log to a file. Stdout belongs to the raw-mode terminal, so writing
/// there would shred the display.
fn init_tracing() {
  let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open("garage.log") else {
    return;
  };

  tracing_subscriber::fmt()
    .with_writer(Arc::new(file))
    .with_max_level(tracing::Level::DEBUG)
    .with_ansi(false)
    .init();
}
