//! 搜索网关
//!
//! 把文本查询转换为有序的搜索结果列表。所有返回的结果都已通过 URL 校验，
//! 服务调用失败时返回空列表并记录日志，不向调用方抛出错误。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ProviderError;
use crate::utils::url::is_valid_url;

mod serper;

pub use serper::SerperSearchProvider;

/// 追加在每个查询后面，使结果偏向技术与知识产权相关页面
pub const QUERY_SUFFIX: &str = " innovation patent technology";

/// 一条搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: Option<String>,
    pub url: String,
    /// 摘要或页面的 markdown 片段
    pub snippet: Option<String>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// 底层搜索服务
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 按原样发送查询，最多请求 `limit` 条结果
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError>;
}

/// 网关的输出：结果列表与一一对应的已校验地址列表
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResults {
    pub hits: Vec<SearchHit>,
    pub urls: Vec<String>,
    /// 在 `limit` 范围内因地址无效被丢弃的原始地址，按返回顺序
    pub rejected_urls: Vec<String>,
}

impl SearchResults {
    /// 截断到 `limit` 条，去除地址空白并丢弃无效地址（不补位）
    pub fn from_hits(hits: Vec<SearchHit>, limit: usize) -> Self {
        let mut results = SearchResults::default();
        for mut hit in hits.into_iter().take(limit) {
            let url = hit.url.trim().to_string();
            if !is_valid_url(&url) {
                tracing::debug!(url = %hit.url, "Dropping search hit with invalid url");
                results.rejected_urls.push(hit.url);
                continue;
            }
            hit.url = url.clone();
            results.hits.push(hit);
            results.urls.push(url);
        }
        results
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

#[derive(Clone)]
pub struct SearchGateway {
    provider: Arc<dyn SearchProvider>,
}

impl SearchGateway {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }

    /// 搜索并返回已校验的结果，失败时返回空结果
    pub async fn search(&self, query: &str, limit: usize) -> SearchResults {
        let provider_query = format!("{}{}", query, QUERY_SUFFIX);

        match self.provider.search(&provider_query, limit).await {
            Ok(hits) => {
                let returned = hits.len();
                let results = SearchResults::from_hits(hits, limit);
                tracing::info!(
                    query,
                    returned,
                    valid = results.len(),
                    "Search complete"
                );
                results
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "Search failed, continuing with no results");
                SearchResults::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSearchProvider;

    fn hits(urls: &[&str]) -> Vec<SearchHit> {
        urls.iter().map(|u| SearchHit::new(*u)).collect()
    }

    #[test]
    fn test_from_hits_truncates_to_limit() {
        let results = SearchResults::from_hits(
            hits(&["https://a.com", "https://b.com", "https://c.com"]),
            2,
        );
        assert_eq!(results.urls, vec!["https://a.com", "https://b.com"]);
    }

    #[test]
    fn test_from_hits_drops_invalid_without_backfill() {
        let results = SearchResults::from_hits(
            hits(&["https://a.com", "javascript:alert(1)", "https://c.com"]),
            2,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results.urls, vec!["https://a.com"]);
        assert_eq!(results.rejected_urls, vec!["javascript:alert(1)"]);
    }

    #[test]
    fn test_from_hits_trims_urls_and_keeps_lists_parallel() {
        let results = SearchResults::from_hits(
            vec![
                SearchHit::new("  https://a.com/x ").with_title("A"),
                SearchHit::new("ftp://b.com").with_title("B"),
                SearchHit::new("https://c.com").with_title("C"),
            ],
            10,
        );

        assert_eq!(results.hits.len(), results.urls.len());
        for (hit, url) in results.hits.iter().zip(results.urls.iter()) {
            assert_eq!(&hit.url, url);
            assert!(is_valid_url(url));
        }
        assert_eq!(results.urls, vec!["https://a.com/x", "https://c.com"]);
    }

    #[tokio::test]
    async fn test_gateway_appends_suffix() {
        let provider = Arc::new(
            StaticSearchProvider::new()
                .with_hits("graphene filter innovation patent technology", hits(&["https://g.com"])),
        );
        let gateway = SearchGateway::new(provider.clone());

        let results = gateway.search("graphene filter", 5).await;

        assert_eq!(results.urls, vec!["https://g.com"]);
        assert_eq!(
            provider.calls(),
            vec![("graphene filter innovation patent technology".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn test_gateway_fails_soft() {
        let provider = Arc::new(StaticSearchProvider::new().failing());
        let gateway = SearchGateway::new(provider);

        let results = gateway.search("anything", 3).await;

        assert!(results.is_empty());
        assert!(results.urls.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_never_exceeds_limit() {
        let provider = Arc::new(StaticSearchProvider::new().with_hits(
            "many innovation patent technology",
            hits(&["https://1.com", "https://2.com", "https://3.com", "https://4.com"]),
        ));
        let gateway = SearchGateway::new(provider);

        for limit in 0..6 {
            let results = gateway.search("many", limit).await;
            assert!(results.len() <= limit);
            assert!(results.urls.iter().all(|u| is_valid_url(u)));
        }
    }
}
