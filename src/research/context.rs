use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Config, PipelineConfig};
use crate::llm::client::{LLMClient, LanguageModel};
use crate::research::summarizer::ContentSummarizer;
use crate::scrape::{FirecrawlPageProvider, PageFetcher, PageProvider};
use crate::search::{SearchGateway, SearchProvider, SerperSearchProvider};

/// 一次调研所需的全部协作者，由配置显式构建
#[derive(Clone)]
pub struct ResearchContext {
    /// 搜索网关
    pub search: SearchGateway,
    /// 页面抓取
    pub fetcher: PageFetcher,
    /// 语言模型调用
    pub summarizer: ContentSummarizer,
    /// 流水线参数
    pub pipeline: PipelineConfig,
}

impl ResearchContext {
    /// 根据配置创建上下文，缺少必需凭据时立即失败
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let search = SerperSearchProvider::new(&config.search)
            .context("Failed to build search client")?;
        let pages = FirecrawlPageProvider::new(&config.scrape)
            .context("Failed to build scrape client")?;
        let llm = LLMClient::new(&config.llm).context("Failed to build LLM client")?;

        Ok(Self::from_parts(
            Arc::new(search),
            Arc::new(pages),
            Arc::new(llm),
            config.pipeline.clone(),
        ))
    }

    /// 使用任意的服务实现组装上下文
    pub fn from_parts(
        search: Arc<dyn SearchProvider>,
        pages: Arc<dyn PageProvider>,
        llm: Arc<dyn LanguageModel>,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            search: SearchGateway::new(search),
            fetcher: PageFetcher::new(pages),
            summarizer: ContentSummarizer::new(llm, pipeline.analysis_content_chars),
            pipeline,
        }
    }
}
