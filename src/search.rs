use std::sync::Arc;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::catalog::{matching_specs, Catalog, Selection};
use crate::enrich::{fetch_photo, fetch_summary};
use crate::render::{self, ResultDocument};

/// A finished lookup, tagged with the sequence token it was started
/// under so the UI can drop anything that is no longer the latest.
#[derive(Debug)]
pub struct SearchOutcome {
  pub seq: u64,
  pub document: ResultDocument,
}

/// Runs lookups on their own tasks, reporting back over a channel the
/// UI loop selects on.
#[derive(Debug, Clone)]
pub struct Searcher {
  client: reqwest::Client,
  outcome_tx: UnboundedSender<SearchOutcome>,
}

impl Searcher {
  pub fn new() -> (Self, UnboundedReceiver<SearchOutcome>) {
    let (outcome_tx, outcome_rx) = unbounded_channel();

    (Searcher { client: reqwest::Client::new(), outcome_tx }, outcome_rx)
  }

  /// Fire off one full lookup. The task sees it through to completion
  /// while the rest of the application forgets it exists; delivery fails
  /// silently once the UI is gone.
  pub fn submit(&self, catalog: Arc<Catalog>, selection: Selection, seq: u64) {
    let client = self.client.clone();
    let tx = self.outcome_tx.clone();

    tokio::spawn(async move {
      tracing::debug!("search #{seq} started: {selection:?}");
      let document = run_search(&catalog, &client, &selection).await;
      let _ = tx.send(SearchOutcome { seq, document });
    });
  }
}

/// Matcher, then the summary, then one photo per matched record, each
/// awaited before the next begins. Total latency is the sum of the
/// round trips; none of the network steps can fail the search.
async fn run_search(
  catalog: &Catalog,
  client: &reqwest::Client,
  selection: &Selection,
) -> ResultDocument {
  let matched = matching_specs(catalog, selection);
  let wiki = fetch_summary(client, &selection.make, &selection.model).await;

  let blocks = match matched {
    None => None,
    Some(records) => {
      let mut blocks = Vec::with_capacity(records.len());

      for (position, record) in records.iter().enumerate() {
        let photo =
          fetch_photo(client, record.make(), record.model(), record.trim().unwrap_or("")).await;
        blocks.push(render::spec_block(position, record, photo));
      }

      Some(blocks)
    }
  };

  render::document(&selection.make, &selection.model, blocks, wiki)
}
