use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

const FALLBACK_CAPTION: &str = "Untitled photo";

/// A photo returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub full_url: String,
    pub raw_url: String,
    pub alt_description: Option<String>,
}

impl ImageRecord {
    /// Description for display, or a fallback when the server sent none
    pub fn caption(&self) -> &str {
        self.alt_description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_CAPTION)
    }

    /// URL of a server-side resized JPEG at most `width_px` wide.
    ///
    /// Built from `raw_url` with the `w`, `fm` and `q` parameters. Existing
    /// parameters on the raw URL (e.g. `ixid`) are kept.
    pub fn sized_url(&self, width_px: u32) -> String {
        let Ok(mut url) = Url::parse(&self.raw_url) else {
            return self.full_url.clone();
        };

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !matches!(&**k, "w" | "fm" | "q"))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("w", &width_px.max(1).to_string())
            .append_pair("fm", "jpg")
            .append_pair("q", "80");

        url.to_string()
    }
}

/// Parameters for one search call.
///
/// Constructed through [`SearchRequest::new`], which enforces a non-empty
/// query, a positive page size and a non-empty credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: String,
    page_size: u32,
    credential: String,
}

impl SearchRequest {
    pub fn new(query: &str, page_size: u32, credential: impl Into<String>) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidRequest("query must not be empty".to_string()));
        }
        if page_size == 0 {
            return Err(Error::InvalidRequest(
                "page size must be a positive integer".to_string(),
            ));
        }
        let credential = credential.into().trim().to_string();
        if credential.is_empty() {
            return Err(Error::InvalidRequest(
                "API credential must not be empty".to_string(),
            ));
        }

        Ok(Self {
            query: query.to_string(),
            page_size,
            credential,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

// Wire format of `GET /search/photos`

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub results: Vec<PhotoResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoResult {
    pub id: String,
    pub urls: PhotoUrls,
    #[serde(default)]
    pub alt_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhotoUrls {
    pub full: String,
    pub raw: String,
}

/// Error body, e.g. `{"errors": ["OAuth error: The access token is invalid"]}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<String>,
}

impl From<PhotoResult> for ImageRecord {
    fn from(result: PhotoResult) -> Self {
        Self {
            id: result.id,
            full_url: result.urls.full,
            raw_url: result.urls.raw,
            alt_description: result.alt_description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(raw: &str, alt: Option<&str>) -> ImageRecord {
        ImageRecord {
            id: "abc".to_string(),
            full_url: "https://images.unsplash.com/photo-1?full".to_string(),
            raw_url: raw.to_string(),
            alt_description: alt.map(str::to_string),
        }
    }

    #[test]
    fn test_caption_fallback() {
        assert_eq!(record("x", Some("a grey cat")).caption(), "a grey cat");
        assert_eq!(record("x", None).caption(), FALLBACK_CAPTION);
        assert_eq!(record("x", Some("  ")).caption(), FALLBACK_CAPTION);
    }

    #[test]
    fn test_sized_url_keeps_existing_params() {
        let r = record("https://images.unsplash.com/photo-1?ixid=M3w1&ixlib=rb-4.0.3", None);
        let sized = Url::parse(&r.sized_url(640)).unwrap();
        let pairs: Vec<(String, String)> = sized
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.contains(&("ixid".to_string(), "M3w1".to_string())));
        assert!(pairs.contains(&("w".to_string(), "640".to_string())));
        assert!(pairs.contains(&("fm".to_string(), "jpg".to_string())));
    }

    #[test]
    fn test_sized_url_replaces_width() {
        let r = record("https://images.unsplash.com/photo-1?w=4000", None);
        let sized = r.sized_url(320);
        assert!(sized.contains("w=320"));
        assert!(!sized.contains("w=4000"));
    }

    #[test]
    fn test_sized_url_falls_back_to_full() {
        let r = record("not a url", None);
        assert_eq!(r.sized_url(320), r.full_url);
    }

    #[test]
    fn test_search_request_validation() {
        assert!(SearchRequest::new("cat", 8, "token").is_ok());
        assert!(matches!(
            SearchRequest::new("   ", 8, "token"),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            SearchRequest::new("cat", 0, "token"),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            SearchRequest::new("cat", 8, ""),
            Err(Error::InvalidRequest(_))
        ));
    }
}
