use serde::Deserialize;
use serde_json::{Map, Value};

/// One row of vehicle attribute data. Beyond make, model and year being
/// present in some form, the shape is open: every other field passes
/// through untouched, in source document order.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct SpecRecord(Map<String, Value>);

impl SpecRecord {
  pub fn make(&self) -> &str {
    self.str_field("Make").unwrap_or("")
  }

  /// The dataset spells this key both ways. "Modle" is the data's typo,
  /// not ours to fix.
  pub fn model(&self) -> &str {
    self.str_field("Model")
      .or_else(|| self.str_field("Modle"))
      .unwrap_or("")
  }

  pub fn trim(&self) -> Option<&str> {
    self.str_field("Trim")
  }

  /// Inclusive year range for this record. Explicit `Year_from` and
  /// `Year_to` bounds win; a missing or empty bound falls back to the
  /// single `Year` field. None when no usable bound exists, and such a
  /// record never matches any year.
  pub fn year_bounds(&self) -> Option<(i32, i32)> {
    let single = self.0.get("Year");
    let from = self.0.get("Year_from").filter(|v| !is_falsy(v)).or(single);
    let to = self.0.get("Year_to").filter(|v| !is_falsy(v)).or(single);

    Some((year_value(from?)?, year_value(to?)?))
  }

  pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
    self.0.iter().map(|(key, value)| (key.as_str(), value))
  }

  fn str_field(&self, key: &str) -> Option<&str> {
    self.0.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
  }
}

/// The falsiness rule the dataset leans on: null, false, zero and the
/// empty string all read as "not there".
pub fn is_falsy(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::Number(n) => n.as_f64().map_or(false, |n| n == 0.0),
    Value::String(s) => s.is_empty(),
    _ => false,
  }
}

fn year_value(value: &Value) -> Option<i32> {
  match value {
    Value::Number(n) => n.as_i64().map(|n| n as i32),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn record(value: Value) -> SpecRecord {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn model_falls_back_to_misspelled_key() {
    let r = record(json!({ "Modle": "Civic Si" }));
    assert_eq!(r.model(), "Civic Si");

    let r = record(json!({ "Model": "", "Modle": "Civic Si" }));
    assert_eq!(r.model(), "Civic Si");

    let r = record(json!({ "Model": "Accord", "Modle": "ignored" }));
    assert_eq!(r.model(), "Accord");
  }

  #[test]
  fn year_bounds_prefer_explicit_range() {
    let r = record(json!({ "Year_from": "2010", "Year_to": "2015", "Year": "2012" }));
    assert_eq!(r.year_bounds(), Some((2010, 2015)));
  }

  #[test]
  fn single_year_stands_in_for_both_bounds() {
    let r = record(json!({ "Year": "2018" }));
    assert_eq!(r.year_bounds(), Some((2018, 2018)));
  }

  #[test]
  fn empty_bound_falls_back_to_single_year() {
    let r = record(json!({ "Year_from": "", "Year_to": "2015", "Year": "2010" }));
    assert_eq!(r.year_bounds(), Some((2010, 2015)));
  }

  #[test]
  fn numeric_and_padded_years_parse() {
    let r = record(json!({ "Year_from": 2017, "Year_to": " 2020 " }));
    assert_eq!(r.year_bounds(), Some((2017, 2020)));
  }

  #[test]
  fn no_usable_year_means_no_bounds() {
    assert_eq!(record(json!({ "Make": "Ford" })).year_bounds(), None);
    assert_eq!(record(json!({ "Year": "unknown" })).year_bounds(), None);
  }

  #[test]
  fn trim_is_absent_when_empty() {
    assert_eq!(record(json!({ "Trim": "" })).trim(), None);
    assert_eq!(record(json!({ "Trim": "Si" })).trim(), Some("Si"));
  }

  #[test]
  fn falsiness_matches_the_dataset_convention() {
    assert!(is_falsy(&json!(null)));
    assert!(is_falsy(&json!(false)));
    assert!(is_falsy(&json!(0)));
    assert!(is_falsy(&json!("")));
    assert!(!is_falsy(&json!("0 to 60")));
    assert!(!is_falsy(&json!(182)));
  }
}
