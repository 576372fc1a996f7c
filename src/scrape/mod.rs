//! 页面抓取
//!
//! `PageFetcher` 把地址转换为 markdown 文本，任何失败都返回 `None`。
//! 地址的合法性由调用方负责校验。

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ProviderError;

mod firecrawl;

pub use firecrawl::FirecrawlPageProvider;

/// 底层抓取服务
#[async_trait]
pub trait PageProvider: Send + Sync {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ProviderError>;
}

#[derive(Clone)]
pub struct PageFetcher {
    provider: Arc<dyn PageProvider>,
}

impl PageFetcher {
    pub fn new(provider: Arc<dyn PageProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch_markdown(&self, url: &str) -> Option<String> {
        let url = url.trim();
        tracing::debug!(url, "Scraping page");

        match self.provider.scrape_markdown(url).await {
            Ok(markdown) => {
                tracing::debug!(url, chars = markdown.chars().count(), "Page scraped");
                Some(markdown)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "Scrape failed");
                None
            }
        }
    }
}
