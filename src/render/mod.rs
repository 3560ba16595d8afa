use serde_json::Value;

use crate::catalog::{is_falsy, SpecRecord};
use crate::enrich::WikiSummary;

/// Fields that never appear in a spec block: the internal row id, and
/// the raw year superseded by the range fields.
const EXCLUDED_FIELDS: [&str; 2] = ["Year", "id_trim"];

/// Shown both when nothing matched and when the spec list never loaded.
pub const NO_SPECS_NOTICE: &str = "No detailed specs found for this car.";

/// Everything one search displays, shaped but not yet styled. The
/// terminal layer formats this without adding data of its own.
#[derive(Debug, Clone)]
pub struct ResultDocument {
  pub heading: String,
  pub wiki: Option<WikiSummary>,
  pub body: DocumentBody,
}

#[derive(Debug, Clone)]
pub enum DocumentBody {
  /// covers matcher failure and an empty match alike
  NoSpecs,
  Specs { blocks: Vec<SpecBlock> },
}

/// One numbered display block for a matched record.
#[derive(Debug, Clone)]
pub struct SpecBlock {
  pub title: String,
  pub photo: Option<String>,
  pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
  pub label: String,
  pub value: String,
}

pub fn document(
  make: &str,
  model: &str,
  blocks: Option<Vec<SpecBlock>>,
  wiki: Option<WikiSummary>,
) -> ResultDocument {
  let body = match blocks {
    None => DocumentBody::NoSpecs,
    Some(blocks) if blocks.is_empty() => DocumentBody::NoSpecs,
    Some(blocks) => DocumentBody::Specs { blocks },
  };

  ResultDocument { heading: format!("{} - {}", make, model), wiki, body }
}

/// The photo was looked up with this record's own make, model and trim,
/// so a multi-trim match can carry a different photo per block. Fields
/// keep dataset order; excluded and empty ones are dropped.
pub fn spec_block(position: usize, record: &SpecRecord, photo: Option<String>) -> SpecBlock {
  let fields = record
    .fields()
    .filter(|(key, _)| !EXCLUDED_FIELDS.contains(key))
    .filter_map(|(key, value)| {
      Some(Field { label: humanize(key), value: display_value(value)? })
    })
    .collect();

  SpecBlock {
    title: format!("Trim {}: {}", position + 1, record.trim().unwrap_or("N/A")),
    photo,
    fields,
  }
}

fn display_value(value: &Value) -> Option<String> {
  if is_falsy(value) {
    return None;
  }

  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(_) => Some("true".into()),
    other => Some(other.to_string()),
  }
}

/// "fuel_tank_capacity" reads as "Fuel Tank Capacity"
fn humanize(key: &str) -> String {
  key
    .replace('_', " ")
    .split(' ')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
