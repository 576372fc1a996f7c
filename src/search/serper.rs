//! Serper (Google Search) 搜索服务

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::ProviderError;
use crate::search::{SearchHit, SearchProvider};

const PROVIDER: &str = "serper";

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

impl From<SerperResult> for SearchHit {
    fn from(result: SerperResult) -> Self {
        SearchHit {
            title: result.title.filter(|t| !t.trim().is_empty()),
            url: result.link.unwrap_or_default(),
            snippet: result.snippet,
        }
    }
}

/// 基于 Serper API 的搜索服务，每个实例持有独立的 HTTP 客户端
pub struct SerperSearchProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl SerperSearchProvider {
    pub fn new(config: &SearchConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl SearchProvider for SerperSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        tracing::debug!(query, limit, "Serper search");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&SerperRequest { q: query, num: limit })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let data: SerperResponse = response.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

        Ok(data.organic.into_iter().map(SearchHit::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organic_results_map_to_hits() {
        let json = r#"{
            "organic": [
                {"title": "Solar still", "link": " https://a.example/x ", "snippet": "A still"},
                {"link": "https://b.example"},
                {"title": "   ", "snippet": "no link"}
            ]
        }"#;
        let response: SerperResponse = serde_json::from_str(json).unwrap();
        let hits: Vec<SearchHit> = response.organic.into_iter().map(SearchHit::from).collect();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title.as_deref(), Some("Solar still"));
        assert_eq!(hits[0].url, " https://a.example/x ");
        assert_eq!(hits[0].snippet.as_deref(), Some("A still"));
        assert_eq!(hits[1].title, None);
        assert_eq!(hits[1].snippet, None);
        assert_eq!(hits[2].title, None);
        assert_eq!(hits[2].url, "");
    }

    #[test]
    fn test_missing_organic_is_empty() {
        let response: SerperResponse = serde_json::from_str(r#"{"searchParameters": {}}"#).unwrap();
        assert!(response.organic.is_empty());
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SerperRequest { q: "solar", num: 3 }).unwrap();
        assert_eq!(body, serde_json::json!({"q": "solar", "num": 3}));
    }
}
