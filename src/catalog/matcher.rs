use super::{Catalog, SpecRecord};

/// The user's current make/model/year choice.
#[derive(Debug, Clone)]
pub struct Selection {
  pub make: String,
  pub model: String,
  pub year: i32,
}

/// Every record matching the selection, in dataset order.
///
/// Make compares for exact equality and model for substring containment,
/// both after trimming and lowercasing, so a "Civic" query finds the
/// "Civic Si" trims. The year must sit inside the record's inclusive
/// bounds. None means the spec list never loaded, which callers render
/// the same as an empty match.
pub fn matching_specs<'a>(
  catalog: &'a Catalog,
  selection: &Selection,
) -> Option<Vec<&'a SpecRecord>> {
  let specs = catalog.specs()?;
  let make = normalize(&selection.make);
  let model = normalize(&selection.model);

  Some(
    specs
      .iter()
      .filter(|record| {
        normalize(record.make()) == make
          && normalize(record.model()).contains(&model)
          && record
            .year_bounds()
            .map_or(false, |(from, to)| from <= selection.year && selection.year <= to)
      })
      .collect(),
  )
}

fn normalize(s: &str) -> String {
  s.trim().to_lowercase()
}
