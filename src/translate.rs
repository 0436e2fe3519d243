//! German-to-English dish name translation.
//!
//! Thin client over the public Google translate endpoint. Fails closed: any
//! problem (network, quota, unexpected payload) returns the original German
//! text, so menu rendering never depends on the translation service being
//! up. Results are cached per distinct source string for the process
//! lifetime; eviction is the outer cache layer's business, not ours.

use reqwest::Url;
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

const ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";
const TIMEOUT: Duration = Duration::from_secs(5);

pub struct Translator {
    client: Option<Client>,
    cache: Mutex<HashMap<String, String>>,
}

impl Translator {
    pub fn new() -> Self {
        let client = Client::builder()
            .no_proxy()
            .timeout(TIMEOUT)
            .build()
            .map_err(|err| warn!(%err, "translator client unavailable"))
            .ok();
        Translator {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Translate German text to English, or return it unchanged on any
    /// failure. Each distinct input hits the service at most once.
    pub fn translate(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        if let Some(cached) = self.cache.lock().unwrap().get(text) {
            return cached.clone();
        }

        let translated = match self.request(text) {
            Some(result) => result,
            None => {
                warn!(text, "translation failed, keeping German name");
                text.to_string()
            }
        };

        self.cache
            .lock()
            .unwrap()
            .insert(text.to_string(), translated.clone());
        translated
    }

    fn request(&self, text: &str) -> Option<String> {
        let client = self.client.as_ref()?;
        let url = Url::parse_with_params(
            ENDPOINT,
            &[
                ("client", "gtx"),
                ("sl", "de"),
                ("tl", "en"),
                ("dt", "t"),
                ("q", text),
            ],
        )
        .ok()?;

        let body: Value = client.get(url).send().ok()?.json().ok()?;

        // Response shape: [[["translated","original",..],..],..] - one
        // segment per sentence, concatenated here.
        let segments = body.get(0)?.as_array()?;
        let mut out = String::new();
        for segment in segments {
            if let Some(part) = segment.get(0).and_then(Value::as_str) {
                out.push_str(part);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_stays_empty_without_a_request() {
        let translator = Translator::new();
        assert_eq!(translator.translate(""), "");
    }

    #[test]
    fn cache_is_consulted_before_the_service() {
        let translator = Translator::new();
        translator
            .cache
            .lock()
            .unwrap()
            .insert("Wiener Schnitzel".to_string(), "Viennese schnitzel".to_string());
        assert_eq!(translator.translate("Wiener Schnitzel"), "Viennese schnitzel");
    }
}
