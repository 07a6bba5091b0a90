//! Page fetch tool.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::html::extract_text;
use super::{required_str, Tool};
use crate::config::FetchConfig;

/// Fetch a web page and return its readable text.
pub struct FetchPage {
    client: reqwest::Client,
    max_chars: usize,
}

impl FetchPage {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let mut builder =
            reqwest::Client::builder().user_agent("Mozilla/5.0 (compatible; NewsAgent/0.1)");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            max_chars: config.max_chars,
        })
    }

    /// GET `url` and return its text content.
    pub async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(anyhow::anyhow!("HTTP error: {}", status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase())
            .unwrap_or_default();

        let body = response.text().await?;

        let text = if content_type.is_empty() || content_type.contains("html") {
            extract_text(&body)
        } else {
            body
        };

        Ok(truncate_chars(text, self.max_chars))
    }
}

/// Cut `text` to at most `max_chars` characters, marking the cut.
fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!(
            "{}... [content truncated, showing first {} chars]",
            &text[..cut],
            max_chars
        ),
        None => text,
    }
}

#[async_trait]
impl Tool for FetchPage {
    fn name(&self) -> &str {
        "get_page"
    }

    fn description(&self) -> &str {
        "Fetch the content of a web page. Returns the plain text of the page with scripts, styles and the head removed."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the web page to fetch"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> anyhow::Result<String> {
        let url = required_str(&args, "url")?;
        self.fetch(url)
            .await
            .map_err(|e| anyhow::anyhow!("Error fetching {}: {}", url, e))
    }
}
