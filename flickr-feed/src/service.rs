use crate::models::FeedPage;

/// Public photo feed endpoint
pub const FEED_URL: &str = "https://api.flickr.com/services/feeds/photos_public.gne";

/// Name of the JSONP callback the feed wraps its payload in
const JSONP_CALLBACK: &str = "jsonFlickrFeed";

/// Error type for feed operations
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    NetworkError(String),
    JsonError(String),
    ServerError(String),
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            FeedError::JsonError(msg) => write!(f, "JSON error: {}", msg),
            FeedError::ServerError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {}

/// Configuration for the feed client
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub feed_url: String,
    /// Request timeout; 0 waits indefinitely
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_url: FEED_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Client for the public photo feed
pub struct FlickrFeedService {
    config: FeedConfig,
    client: reqwest::Client,
}

impl FlickrFeedService {
    /// Create a new feed client
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let builder = reqwest::Client::builder().user_agent("JustifiedGallery/0.1.0");

        #[cfg(not(target_arch = "wasm32"))]
        let builder = if config.timeout_secs > 0 {
            builder
                .timeout(std::time::Duration::from_secs(config.timeout_secs))
                .connect_timeout(std::time::Duration::from_secs(10))
        } else {
            builder
        };

        let client = builder
            .build()
            .map_err(|e| FeedError::NetworkError(format!("Client build failed: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Full request URL for an optional author filter
    pub fn request_url(&self, filter: Option<&str>) -> Result<reqwest::Url, FeedError> {
        let mut params = vec![("format", "json"), ("nojsoncallback", "1")];
        if let Some(id) = filter.map(str::trim).filter(|id| !id.is_empty()) {
            params.push(("id", id));
        }

        reqwest::Url::parse_with_params(&self.config.feed_url, &params)
            .map_err(|e| FeedError::NetworkError(format!("Invalid feed URL: {}", e)))
    }

    /// Fetch one page of the feed
    ///
    /// Returns `Ok(None)` when the server answered without a payload.
    pub async fn fetch_feed(&self, filter: Option<&str>) -> Result<Option<FeedPage>, FeedError> {
        let url = self.request_url(filter)?;
        log::debug!("Requesting feed: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FeedError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FeedError::ServerError(format!(
                "Server returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::NetworkError(format!("Failed to read body: {}", e)))?;

        let page = parse_feed_body(&body)?;
        if let Some(page) = &page {
            log::info!("Feed returned {} items", page.items.len());
        }
        Ok(page)
    }
}

/// Parse a feed response body
///
/// Accepts plain JSON as well as the JSONP form `jsonFlickrFeed({...})`.
/// An empty body or a literal `null` yields `Ok(None)`.
pub fn parse_feed_body(body: &str) -> Result<Option<FeedPage>, FeedError> {
    let mut payload = body.trim();

    if let Some(inner) = payload
        .strip_prefix(JSONP_CALLBACK)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
    {
        let inner = inner.trim_end().trim_end_matches(';').trim_end();
        payload = inner.strip_suffix(')').unwrap_or(inner).trim();
    }

    if payload.is_empty() || payload == "null" {
        return Ok(None);
    }

    let payload = repair_apostrophes(payload);

    serde_json::from_str::<FeedPage>(&payload)
        .map(Some)
        .map_err(|e| FeedError::JsonError(format!("Failed to parse feed: {}", e)))
}

/// Turns the feed's `\'` escapes, which are not valid JSON, into plain
/// apostrophes
///
/// Escapes are consumed in pairs, so an escaped backslash followed by an
/// apostrophe (`\\'`) is left alone.
fn repair_apostrophes(payload: &str) -> String {
    let mut repaired = String::with_capacity(payload.len());
    let mut chars = payload.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            repaired.push(c);
            continue;
        }
        match chars.next() {
            Some('\'') => repaired.push('\''),
            Some(escaped) => {
                repaired.push('\\');
                repaired.push(escaped);
            }
            None => repaired.push('\\'),
        }
    }

    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "Uploads from everyone",
        "link": "https://www.flickr.com/photos/",
        "items": [
            {
                "title": "Harbour at dawn",
                "link": "https://www.flickr.com/photos/someone/1/",
                "media": {"m": "https://live.staticflickr.com/65535/1_m.jpg"},
                "date_taken": "2019-03-02T10:15:22-08:00",
                "author": "nobody@flickr.com (\"someone\")",
                "author_id": "123@N01"
            },
            {
                "title": "It\'s a dog",
                "media": {"m": "https://live.staticflickr.com/65535/2_m.jpg"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_plain_json() {
        let page = parse_feed_body(SAMPLE).unwrap().unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].author_name(), "someone");
        assert_eq!(page.items[1].title, "It's a dog");
    }

    #[test]
    fn test_parse_jsonp_wrapper() {
        let body = format!("jsonFlickrFeed({});", SAMPLE);
        let page = parse_feed_body(&body).unwrap().unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].author_id, "123@N01");
    }

    #[test]
    fn test_parse_empty_payload() {
        assert_eq!(parse_feed_body("").unwrap(), None);
        assert_eq!(parse_feed_body("  null ").unwrap(), None);
        assert_eq!(parse_feed_body("jsonFlickrFeed()").unwrap(), None);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_feed_body("{\"items\": [");
        assert!(matches!(result, Err(FeedError::JsonError(_))));
    }

    #[test]
    fn test_request_url_with_filter() {
        let service = FlickrFeedService::new(FeedConfig::default()).unwrap();

        let url = service.request_url(None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.flickr.com/services/feeds/photos_public.gne?format=json&nojsoncallback=1"
        );

        let url = service.request_url(Some("123@N01")).unwrap();
        assert!(url.as_str().ends_with("&id=123%40N01"));

        let url = service.request_url(Some("  ")).unwrap();
        assert!(!url.as_str().contains("id="));
    }

    #[tokio::test]
    async fn test_fetch_with_invalid_url_fails_before_request() {
        let service = FlickrFeedService::new(FeedConfig {
            feed_url: "not a url".to_string(),
            timeout_secs: 0,
        })
        .unwrap();

        let result = service.fetch_feed(None).await;
        assert!(matches!(result, Err(FeedError::NetworkError(msg)) if msg.starts_with("Invalid feed URL")));
    }

    #[test]
    fn test_repair_apostrophes_respects_escaped_backslashes() {
        assert_eq!(repair_apostrophes(r#"it\'s"#), "it's");
        assert_eq!(repair_apostrophes(r#"C:\\'x"#), r#"C:\\'x"#);
        assert_eq!(repair_apostrophes(r#"C:\\\'x"#), r#"C:\\'x"#);
        assert_eq!(repair_apostrophes(r#"tab\t"#), r#"tab\t"#);
    }

    #[test]
    fn test_parse_title_with_backslash_before_apostrophe() {
        let body = r#"{"title": "dir\\'s and it\'s", "items": []}"#;
        let page = parse_feed_body(body).unwrap().unwrap();
        assert_eq!(page.title, r"dir\'s and it's");
    }
}
