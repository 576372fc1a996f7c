//! Firecrawl 页面抓取服务
//!
//! 负责 JavaScript 渲染并把页面转换为 markdown 文本。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ScrapeConfig;
use crate::error::ProviderError;
use crate::scrape::PageProvider;

const PROVIDER: &str = "firecrawl";

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
}

pub struct FirecrawlPageProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl FirecrawlPageProvider {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

impl ScrapeResponse {
    fn into_markdown(self, url: &str) -> Result<String, ProviderError> {
        if !self.success {
            return Err(ProviderError::Decode {
                provider: PROVIDER,
                reason: self
                    .error
                    .unwrap_or_else(|| "scrape reported failure".to_string()),
            });
        }

        self.data
            .and_then(|data| data.markdown)
            .ok_or_else(|| ProviderError::Empty {
                provider: PROVIDER,
                url: url.to_string(),
            })
    }
}

#[async_trait]
impl PageProvider for FirecrawlPageProvider {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/scrape", self.endpoint))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&ScrapeRequest {
                url,
                formats: ["markdown"],
            })
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

        let scraped: ScrapeResponse = response.json().await.map_err(|e| ProviderError::Decode {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

        scraped.into_markdown(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ScrapeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_successful_scrape_yields_markdown() {
        let response = parse(r##"{"success": true, "data": {"markdown": "# Title\n\nBody"}}"##);
        assert_eq!(
            response.into_markdown("https://a.com").unwrap(),
            "# Title\n\nBody"
        );
    }

    #[test]
    fn test_reported_failure_is_error() {
        let response = parse(r#"{"success": false, "error": "blocked"}"#);
        let err = response.into_markdown("https://a.com").unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_missing_markdown_is_empty_error() {
        let response = parse(r#"{"success": true, "data": {}}"#);
        assert!(matches!(
            response.into_markdown("https://a.com"),
            Err(ProviderError::Empty { .. })
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(ScrapeRequest {
            url: "https://a.com",
            formats: ["markdown"],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"url": "https://a.com", "formats": ["markdown"]})
        );
    }
}
