//! Best-effort dish thumbnail lookup.
//!
//! DuckDuckGo's image search needs a `vqd` session token scraped from the
//! HTML search page before its JSON endpoint answers. When either step
//! fails we fall back to a generic food placeholder URL; an empty string
//! means "no image" and is never an error. Lookups are cached per query for
//! the process lifetime.

use regex::Regex;
use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct ImageSearch {
    client: Option<Client>,
    cache: Mutex<HashMap<String, String>>,
}

impl ImageSearch {
    pub fn new() -> Self {
        let client = Client::builder()
            .no_proxy()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .ok();
        ImageSearch {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Find a thumbnail for a dish name. Returns an empty string only for
    /// empty queries; otherwise at worst a placeholder URL.
    pub fn search(&self, query: &str) -> String {
        if query.is_empty() {
            return String::new();
        }

        if let Some(cached) = self.cache.lock().unwrap().get(query) {
            return cached.clone();
        }

        // Food keywords steer the search toward plated dishes.
        let search_query = format!("{query} Gericht Essen");
        let url = self
            .duckduckgo(&search_query)
            .unwrap_or_else(|| placeholder(&search_query));

        self.cache
            .lock()
            .unwrap()
            .insert(query.to_string(), url.clone());
        url
    }

    fn duckduckgo(&self, query: &str) -> Option<String> {
        let client = self.client.as_ref()?;

        let search_url =
            Url::parse_with_params("https://duckduckgo.com/", &[("q", query), ("iax", "images"), ("ia", "images")])
                .ok()?;
        let page = client.get(search_url).send().ok()?.text().ok()?;

        let vqd_re = Regex::new(r#"vqd="([^"]+)""#).unwrap();
        let vqd = vqd_re.captures(&page)?.get(1)?.as_str().to_string();
        debug!(query, "got vqd token");

        let api_url = Url::parse_with_params(
            "https://duckduckgo.com/i.js",
            &[("q", query), ("vqd", vqd.as_str())],
        )
        .ok()?;
        let body: Value = client.get(api_url).send().ok()?.json().ok()?;

        let first = body.get("results")?.as_array()?.first()?;
        let image = first.get("image")?.as_str()?;
        if image.is_empty() {
            None
        } else {
            Some(image.to_string())
        }
    }
}

impl Default for ImageSearch {
    fn default() -> Self {
        Self::new()
    }
}

// Unsplash expects the terms after "?", comma-joined with "food".
fn placeholder(query: &str) -> String {
    let terms = query.replace(' ', "%20");
    format!("https://source.unsplash.com/300x200/?{terms},food")
}
