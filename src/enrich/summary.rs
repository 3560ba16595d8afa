use reqwest::Client;
use serde::Deserialize;

const ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1/page/summary";

/// Encyclopedia enrichment for one search. Never required; a search is
/// complete without it.
#[derive(Debug, Clone)]
pub struct WikiSummary {
  pub description: String,
  pub image: Option<String>,
  pub link: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
  extract: Option<String>,
  thumbnail: Option<Thumbnail>,
  content_urls: Option<ContentUrls>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
  source: String,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
  desktop: DesktopUrls,
}

#[derive(Debug, Deserialize)]
struct DesktopUrls {
  page: String,
}

/// Best-effort summary lookup keyed by the underscore-joined page title.
/// Error pages decode like any other response and simply digest to None.
pub async fn fetch_summary(client: &Client, make: &str, model: &str) -> Option<WikiSummary> {
  let title = page_title(make, model);

  match lookup(client, &title).await {
    Ok(summary) => summary,
    Err(e) => {
      tracing::warn!("summary lookup failed for {title:?}: {e:#}");
      None
    }
  }
}

async fn lookup(client: &Client, title: &str) -> anyhow::Result<Option<WikiSummary>> {
  let response: SummaryResponse = client
    .get(format!("{}/{}", ENDPOINT, title))
    .send()
    .await?
    .json()
    .await?;

  Ok(digest(response))
}

/// A usable summary needs a non-empty extract and a canonical page link.
/// Anything less reads as "no summary found".
fn digest(response: SummaryResponse) -> Option<WikiSummary> {
  let description = response.extract.filter(|extract| !extract.is_empty())?;
  let link = response.content_urls?.desktop.page;

  Some(WikiSummary {
    description,
    image: response.thumbnail.map(|thumbnail| thumbnail.source),
    link,
  })
}

pub fn page_title(make: &str, model: &str) -> String {
  format!("{}_{}", make, model).replace(' ', "_")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn response(value: serde_json::Value) -> SummaryResponse {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn page_title_joins_with_underscores() {
    assert_eq!(page_title("Honda", "Civic"), "Honda_Civic");
    assert_eq!(page_title("Alfa Romeo", "156 GTA"), "Alfa_Romeo_156_GTA");
  }

  #[test]
  fn full_response_digests_to_a_summary() {
    let summary = digest(response(json!({
      "extract": "The Honda Civic is a series of cars.",
      "thumbnail": { "source": "https://upload.example/civic.jpg" },
      "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Honda_Civic" } }
    })))
    .unwrap();

    assert_eq!(summary.description, "The Honda Civic is a series of cars.");
    assert_eq!(summary.image.as_deref(), Some("https://upload.example/civic.jpg"));
    assert_eq!(summary.link, "https://en.wikipedia.org/wiki/Honda_Civic");
  }

  #[test]
  fn thumbnail_is_optional() {
    let summary = digest(response(json!({
      "extract": "Some text.",
      "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Thing" } }
    })))
    .unwrap();

    assert_eq!(summary.image, None);
  }

  #[test]
  fn missing_or_empty_extract_means_no_summary() {
    assert!(digest(response(json!({ "title": "Not found." }))).is_none());

    assert!(digest(response(json!({
      "extract": "",
      "content_urls": { "desktop": { "page": "https://en.wikipedia.org/wiki/Thing" } }
    })))
    .is_none());
  }

  #[test]
  fn extract_without_page_link_means_no_summary() {
    assert!(digest(response(json!({ "extract": "Orphaned text." }))).is_none());
  }
}
