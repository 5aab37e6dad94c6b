//! Web lookup capability over the DuckDuckGo Instant Answer API.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;

use steward_core::config::WebConfig;
use steward_core::contract::{ActionRequest, ActionResult, Origin};
use steward_core::intent::IntentKind;
use steward_core::registry::{CapabilityDescriptor, CapabilityHandler, CapabilityReply};

use super::web_cache::WebCache;

const ENDPOINT: &str = "https://api.duckduckgo.com/";

pub struct WebLookupHandler {
    descriptor: CapabilityDescriptor,
    client: reqwest::Client,
    cache: WebCache,
}

impl WebLookupHandler {
    pub fn new(config: &WebConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            descriptor: CapabilityDescriptor::new(IntentKind::WebFetch, "web.lookup").web_backed(),
            client,
            cache: WebCache::new(Duration::from_secs(config.cache_ttl_secs)),
        }
    }

    async fn fetch(&self, query: &str) -> Result<ActionResult> {
        let response = self
            .client
            .get(ENDPOINT)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_redirect", "1"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let payload: serde_json::Value = response.json().await?;
        Ok(interpret(query, &payload))
    }
}

/// Confidence tracks answer quality: a full abstract, a bare heading, or
/// nothing usable at all.
fn interpret(query: &str, payload: &serde_json::Value) -> ActionResult {
    let source = payload["AbstractURL"]
        .as_str()
        .filter(|url| !url.is_empty())
        .unwrap_or("https://duckduckgo.com");
    let sources = json!({ "sources": [source], "query": query });

    if let Some(abstract_text) = payload["AbstractText"].as_str().filter(|t| !t.is_empty()) {
        return ActionResult::ok(Origin::Web, "web lookup completed")
            .with_content(abstract_text)
            .with_confidence(0.8)
            .with_data(sources);
    }
    if let Some(heading) = payload["Heading"].as_str().filter(|t| !t.is_empty()) {
        return ActionResult::ok(Origin::Web, "web lookup returned a partial answer")
            .with_content(heading)
            .with_confidence(0.4)
            .with_data(sources);
    }
    ActionResult::ok(Origin::Web, "No relevant result found.")
        .with_confidence(0.1)
        .with_data(sources)
}

#[async_trait]
impl CapabilityHandler for WebLookupHandler {
    fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    async fn execute(&self, request: &ActionRequest, dry_run: bool) -> Result<CapabilityReply> {
        if dry_run {
            return Ok(CapabilityReply::Completed(ActionResult::ok(
                Origin::Web,
                "(dry-run) web lookup planned",
            )));
        }

        let query = request
            .param("query")
            .or_else(|| request.param("url"))
            .unwrap_or(request.intent.raw.as_str())
            .to_string();
        if query.trim().is_empty() {
            return Ok(CapabilityReply::Completed(ActionResult::failed(
                Origin::Web,
                "Missing or empty web query.",
            )));
        }

        if let Some(hit) = self.cache.get(&query) {
            tracing::debug!(%query, "web cache hit");
            return Ok(CapabilityReply::Completed(hit));
        }

        let result = self.fetch(&query).await?;
        self.cache.put(&query, &result);
        Ok(CapabilityReply::Completed(result))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use steward_core::contract::Origin;

    use super::interpret;

    #[test]
    fn abstract_text_yields_a_confident_answer_with_source() {
        let payload = json!({
            "AbstractText": "The dollar trades at 5.43.",
            "AbstractURL": "https://example.org/rates",
            "Heading": "Dollar",
        });
        let result = interpret("dollar rate", &payload);
        assert_eq!(result.origin, Origin::Web);
        assert_eq!(result.confidence, Some(0.8));
        assert_eq!(result.content.as_deref(), Some("The dollar trades at 5.43."));
        assert_eq!(
            result.data.unwrap()["sources"],
            json!(["https://example.org/rates"])
        );
    }

    #[test]
    fn heading_only_is_a_partial_answer() {
        let payload = json!({ "AbstractText": "", "Heading": "Dollar" });
        let result = interpret("dollar rate", &payload);
        assert_eq!(result.confidence, Some(0.4));
        assert_eq!(result.content.as_deref(), Some("Dollar"));
    }

    #[test]
    fn empty_payload_reports_no_result_with_low_confidence() {
        let result = interpret("dollar rate", &json!({}));
        assert_eq!(result.confidence, Some(0.1));
        assert_eq!(result.content, None);
        assert!(result.message.contains("No relevant result"));
    }
}
