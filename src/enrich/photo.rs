use reqwest::Client;
use serde::Deserialize;

const ENDPOINT: &str = "https://api.unsplash.com/search/photos";
const ACCESS_KEY: &str = "qA50yYxUSzvaLxQTEZuG8h50s06WYzmmFuPjdkZ0t5c";

#[derive(Debug, Deserialize)]
struct SearchResponse {
  #[serde(default)]
  results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
  urls: ImageUrls,
}

#[derive(Debug, Deserialize)]
struct ImageUrls {
  regular: String,
}

/// Best-effort photo lookup: try each query most specific first and stop
/// at the first hit. Every failure is swallowed so a missing photo never
/// holds up the rest of a search.
pub async fn fetch_photo(client: &Client, make: &str, model: &str, trim: &str) -> Option<String> {
  for query in queries(make, model, trim) {
    match lookup(client, &query).await {
      Ok(Some(url)) => return Some(url),
      Ok(None) => tracing::debug!("no photo results for {query:?}"),
      Err(e) => tracing::warn!("photo search failed for {query:?}: {e:#}"),
    }
  }

  None
}

async fn lookup(client: &Client, query: &str) -> anyhow::Result<Option<String>> {
  let response: SearchResponse = client
    .get(ENDPOINT)
    .query(&[
      ("query", query),
      ("client_id", ACCESS_KEY),
      ("orientation", "landscape"),
      ("per_page", "1"),
      ("content_filter", "high"),
    ])
    .send()
    .await?
    .error_for_status()?
    .json()
    .await?;

  Ok(first_regular_url(response))
}

fn first_regular_url(response: SearchResponse) -> Option<String> {
  response.results.into_iter().next().map(|result| result.urls.regular)
}

/// Most specific first, the trim-less variant as fallback. An empty trim
/// would repeat the same query, so exact duplicates collapse to one.
fn queries(make: &str, model: &str, trim: &str) -> Vec<String> {
  let specific = join_terms(&[make, model, trim, "car"]);
  let general = join_terms(&[make, model, "car"]);

  if specific == general {
    vec![general]
  } else {
    vec![specific, general]
  }
}

fn join_terms(terms: &[&str]) -> String {
  terms
    .iter()
    .map(|term| term.trim())
    .filter(|term| !term.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn queries_run_most_specific_first() {
    let queries = queries("Honda", "Civic", "Si");
    assert_eq!(queries, vec!["Honda Civic Si car", "Honda Civic car"]);
  }

  #[test]
  fn empty_trim_collapses_to_one_query() {
    assert_eq!(queries("Honda", "Civic", ""), vec!["Honda Civic car"]);
    assert_eq!(queries("Honda", "Civic", "  "), vec!["Honda Civic car"]);
  }

  #[test]
  fn first_result_regular_url_wins() {
    let response: SearchResponse = serde_json::from_value(json!({
      "results": [
        { "urls": { "regular": "https://images.example/one" } },
        { "urls": { "regular": "https://images.example/two" } }
      ]
    }))
    .unwrap();

    assert_eq!(first_regular_url(response).as_deref(), Some("https://images.example/one"));
  }

  #[test]
  fn empty_or_missing_results_yield_nothing() {
    let empty: SearchResponse = serde_json::from_value(json!({ "results": [] })).unwrap();
    assert_eq!(first_regular_url(empty), None);

    let missing: SearchResponse = serde_json::from_value(json!({ "total": 0 })).unwrap();
    assert_eq!(first_regular_url(missing), None);
  }
}
