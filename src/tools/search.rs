//! Web search tool and its backends.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::html::{fragment_text, html_decode};
use super::{required_str, Tool};
use crate::config::{SafeSearch, SearchConfig};

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub body: String,
}

/// Something that can answer a text query.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Return results in backend order. Implementations may return more
    /// than `max_results`; the caller truncates.
    async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<SearchResult>>;
}

/// DuckDuckGo "lite" HTML endpoint (no API key needed).
pub struct DuckDuckGoLite {
    client: reqwest::Client,
    endpoint: String,
    region: String,
    safesearch: SafeSearch,
}

impl DuckDuckGoLite {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; NewsAgent/0.1)")
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            region: config.region.clone(),
            safesearch: config.safesearch,
        })
    }

    fn query_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}?q={}&kl={}",
            self.endpoint,
            urlencoding::encode(query),
            urlencoding::encode(&self.region)
        );
        match self.safesearch {
            SafeSearch::On => url.push_str("&kp=1"),
            SafeSearch::Moderate => {}
            SafeSearch::Off => url.push_str("&kp=-2"),
        }
        url
    }
}

#[async_trait]
impl SearchBackend for DuckDuckGoLite {
    async fn search(&self, query: &str, _max_results: usize) -> anyhow::Result<Vec<SearchResult>> {
        let response = self.client.get(self.query_url(query)).send().await?;
        let status = response.status();

        // 202 carries the anomaly page served to rate-limited clients
        if status != reqwest::StatusCode::OK {
            return Err(anyhow::anyhow!("Search backend returned HTTP {}", status));
        }

        let html = response.text().await?;
        Ok(parse_lite_results(&html))
    }
}

fn result_link_pattern() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r#"(?is)<a\s([^>]*class=['"]result-link['"][^>]*)>(.*?)</a>"#)
            .expect("result link regex")
    })
}

fn snippet_pattern() -> &'static Regex {
    static SNIPPET: OnceLock<Regex> = OnceLock::new();
    SNIPPET.get_or_init(|| {
        Regex::new(r#"(?is)<td[^>]*class=['"]result-snippet['"][^>]*>(.*?)</td>"#)
            .expect("snippet regex")
    })
}

fn href_pattern() -> &'static Regex {
    static HREF: OnceLock<Regex> = OnceLock::new();
    HREF.get_or_init(|| Regex::new(r#"(?i)href=['"]([^'"]+)['"]"#).expect("href regex"))
}

/// Extract results from a DuckDuckGo lite results page.
///
/// Each organic result is an anchor with class `result-link` followed by a
/// `result-snippet` cell. Sponsored links are skipped.
fn parse_lite_results(html: &str) -> Vec<SearchResult> {
    let links = result_link_pattern().captures_iter(html).map(|caps| {
        let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
        let href = href_pattern()
            .captures(&caps[1])
            .map(|h| html_decode(&h[1]))
            .unwrap_or_default();
        (start, href, fragment_text(&caps[2]))
    });
    let links: Vec<_> = links.collect();

    let snippets: Vec<(usize, String)> = snippet_pattern()
        .captures_iter(html)
        .map(|caps| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            (start, fragment_text(&caps[1]))
        })
        .collect();

    let mut results = Vec::new();
    for (i, (start, href, title)) in links.iter().enumerate() {
        // Snippet belongs to this link if it appears before the next link.
        let next_start = links.get(i + 1).map(|l| l.0).unwrap_or(usize::MAX);
        let body = snippets
            .iter()
            .find(|(pos, _)| pos > start && *pos < next_start)
            .map(|(_, text)| text.clone())
            .unwrap_or_default();

        let Some(url) = resolve_result_url(href) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }

        results.push(SearchResult {
            title: title.clone(),
            url,
            body,
        });
    }

    results
}

/// Turn a result href into the target URL, unwrapping DuckDuckGo redirects.
///
/// Returns `None` for ad links and unusable hrefs.
fn resolve_result_url(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let parsed = url::Url::parse(&absolute).ok()?;
    let is_ddg = parsed
        .host_str()
        .is_some_and(|h| h == "duckduckgo.com" || h.ends_with(".duckduckgo.com"));

    if !is_ddg {
        return Some(absolute);
    }
    if parsed.path().starts_with("/y.js") {
        return None;
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "uddg")
        .map(|(_, target)| target.into_owned())
}

/// Search the web for a query.
pub struct WebSearch {
    backend: Arc<dyn SearchBackend>,
    default_max_results: usize,
}

impl WebSearch {
    pub fn new(backend: Arc<dyn SearchBackend>, default_max_results: usize) -> Self {
        Self {
            backend,
            default_max_results,
        }
    }

    /// Run a query and keep at most `max_results` hits in backend order.
    pub async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(anyhow::anyhow!("Search query must not be empty"));
        }

        let mut results = self.backend.search(query, max_results).await?;
        results.truncate(max_results);
        Ok(results)
    }
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Perform a web search for the given query. Returns a JSON list of results with title, url and body."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "max_results": {
                    "type": "integer",
                    "description": format!("Maximum number of results to return (default: {})", self.default_max_results)
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value, _workspace: &Path) -> anyhow::Result<String> {
        let query = required_str(&args, "query")?;
        let max_results = args["max_results"]
            .as_u64()
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .unwrap_or(self.default_max_results);

        let results = self.search(query, max_results).await?;
        tracing::info!(query, count = results.len(), "Search complete");

        Ok(serde_json::to_string(&results)?)
    }
}
