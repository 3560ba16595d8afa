use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

mod matcher;
mod record;

pub use matcher::*;
pub use record::*;

pub const YEAR_MIN: i32 = 1960;
pub const YEAR_MAX: i32 = 2025;

/// The in-memory dataset: the make to models index plus the flat spec
/// list. Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
  /// ordered as in the source document
  makes: Vec<(String, Vec<String>)>,

  /// None when the spec document failed to load; the matcher reports
  /// that distinctly from an empty match
  specs: Option<Vec<SpecRecord>>,
}

impl Catalog {
  /// Read both data documents from `dir`. Either source failing leaves
  /// the other usable: no makes to pick from, or a matcher that can only
  /// report failure. Neither is retried.
  pub async fn load(dir: &Path) -> Self {
    let makes = match read_json::<Map<String, Value>>(&dir.join("car_data.json")).await {
      Ok(index) => index_entries(index),
      Err(e) => {
        tracing::warn!("failed to load make/model index: {e:#}");
        Vec::new()
      }
    };

    let specs = match read_json::<Vec<SpecRecord>>(&dir.join("car_specs.json")).await {
      Ok(specs) => Some(specs),
      Err(e) => {
        tracing::warn!("failed to load spec list: {e:#}");
        None
      }
    };

    Catalog { makes, specs }
  }

  #[cfg(test)]
  pub fn from_parts(makes: Vec<(String, Vec<String>)>, specs: Option<Vec<SpecRecord>>) -> Self {
    Catalog { makes, specs }
  }

  pub fn makes(&self) -> impl Iterator<Item = &str> {
    self.makes.iter().map(|(make, _)| make.as_str())
  }

  /// Model list for a make; an unknown make reads as empty.
  pub fn models_for(&self, make: &str) -> &[String] {
    self
      .makes
      .iter()
      .find(|(m, _)| m == make)
      .map(|(_, models)| models.as_slice())
      .unwrap_or(&[])
  }

  pub fn specs(&self) -> Option<&[SpecRecord]> {
    self.specs.as_deref()
  }

  /// The fixed year choices, newest first. Every make and model gets the
  /// same list.
  pub fn year_options() -> impl Iterator<Item = i32> {
    (YEAR_MIN..=YEAR_MAX).rev()
  }
}

fn index_entries(index: Map<String, Value>) -> Vec<(String, Vec<String>)> {
  index
    .into_iter()
    .map(|(make, models)| {
      let models = models
        .as_array()
        .map(|list| list.iter().filter_map(|m| m.as_str().map(str::to_string)).collect())
        .unwrap_or_default();
      (make, models)
    })
    .collect()
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
  let text = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("reading {}", path.display()))?;

  serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> Catalog {
    Catalog::from_parts(
      vec![
        ("Toyota".into(), vec!["Corolla".into(), "Supra".into()]),
        ("Honda".into(), vec!["Civic".into()]),
      ],
      Some(vec![]),
    )
  }

  #[test]
  fn unknown_make_has_no_models() {
    assert!(catalog().models_for("Yugo").is_empty());
  }

  #[test]
  fn known_make_lists_models_in_order() {
    assert_eq!(catalog().models_for("Toyota").to_vec(), vec!["Corolla".to_string(), "Supra".into()]);
  }

  #[test]
  fn year_options_run_newest_to_oldest_inclusive() {
    let years: Vec<i32> = Catalog::year_options().collect();
    assert_eq!(years.first(), Some(&2025));
    assert_eq!(years.last(), Some(&1960));
    assert_eq!(years.len(), 66);
  }

  #[test]
  fn index_entries_keep_document_order() {
    let index: Map<String, Value> =
      serde_json::from_str(r#"{ "Zenos": ["E10"], "Abarth": ["595"] }"#).unwrap();

    let entries = index_entries(index);
    assert_eq!(entries[0].0, "Zenos");
    assert_eq!(entries[1].0, "Abarth");
  }

  #[test]
  fn index_entries_skip_malformed_model_lists() {
    let index: Map<String, Value> =
      serde_json::from_str(r#"{ "Koenigsegg": "not a list" }"#).unwrap();

    let entries = index_entries(index);
    assert_eq!(entries[0].0, "Koenigsegg");
    assert!(entries[0].1.is_empty());
  }
}
