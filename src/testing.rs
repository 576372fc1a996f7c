//! 测试用的确定性服务实现
//!
//! 三个外部边界（搜索、抓取、语言模型）各有一个可预设返回值、并记录调用的实现，
//! 用于在不访问网络的情况下运行完整的调研流水线。

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{LlmError, ProviderError};
use crate::llm::client::LanguageModel;
use crate::research::prompts;
use crate::research::types::InventionAnalysis;
use crate::scrape::PageProvider;
use crate::search::{SearchHit, SearchProvider};

/// 按完整查询文本返回预设结果的搜索服务，未预设的查询返回空列表
#[derive(Default)]
pub struct StaticSearchProvider {
    results: Arc<RwLock<HashMap<String, Vec<SearchHit>>>>,
    failing: bool,
    calls: Arc<RwLock<Vec<(String, usize)>>>,
}

impl StaticSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为查询预设结果，`query` 需包含网关追加的后缀
    pub fn with_hits(self, query: &str, hits: Vec<SearchHit>) -> Self {
        if let Ok(mut results) = self.results.write() {
            results.insert(query.to_string(), hits);
        }
        self
    }

    /// 所有调用都返回错误
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// 已收到的 (查询, 数量) 调用记录
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SearchProvider for StaticSearchProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push((query.to_string(), limit));
        }
        if self.failing {
            return Err(ProviderError::Status {
                provider: "static",
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self
            .results
            .read()
            .ok()
            .and_then(|results| results.get(query).cloned())
            .unwrap_or_default())
    }
}

/// 按地址返回预设 markdown 的抓取服务，未预设的地址返回错误
#[derive(Default)]
pub struct StaticPageProvider {
    pages: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl StaticPageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, markdown: impl Into<String>) -> Self {
        if let Ok(mut pages) = self.pages.write() {
            pages.insert(url.to_string(), markdown.into());
        }
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageProvider for StaticPageProvider {
    async fn scrape_markdown(&self, url: &str) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(url.to_string());
        }
        self.pages
            .read()
            .ok()
            .and_then(|pages| pages.get(url).cloned())
            .ok_or_else(|| ProviderError::Empty {
                provider: "static",
                url: url.to_string(),
            })
    }
}

/// 按提示词类型返回预设回复的语言模型
///
/// - 提取提示词返回 `with_extraction` 设置的文本
/// - 分析提示词按发明名称返回 `with_analysis` 设置的结果
/// - 建议提示词返回 `with_recommendation` 设置的文本
///
/// 未预设的调用返回 `LlmError::Unavailable`。
#[derive(Default)]
pub struct ScriptedLanguageModel {
    extraction: Option<String>,
    recommendation: Option<String>,
    analyses: HashMap<String, InventionAnalysis>,
    extraction_calls: Arc<RwLock<Vec<String>>>,
    analysis_calls: Arc<RwLock<Vec<String>>>,
    recommendation_calls: Arc<RwLock<Vec<String>>>,
}

impl ScriptedLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extraction(mut self, response: impl Into<String>) -> Self {
        self.extraction = Some(response.into());
        self
    }

    pub fn with_recommendation(mut self, response: impl Into<String>) -> Self {
        self.recommendation = Some(response.into());
        self
    }

    pub fn with_analysis(mut self, subject: &str, analysis: InventionAnalysis) -> Self {
        self.analyses.insert(subject.to_string(), analysis);
        self
    }

    /// 提取提示词的用户部分
    pub fn extraction_calls(&self) -> Vec<String> {
        self.extraction_calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// 分析提示词的用户部分
    pub fn analysis_calls(&self) -> Vec<String> {
        self.analysis_calls.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// 建议提示词的用户部分
    pub fn recommendation_calls(&self) -> Vec<String> {
        self.recommendation_calls
            .read()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    fn record(log: &RwLock<Vec<String>>, user_prompt: &str) {
        if let Ok(mut calls) = log.write() {
            calls.push(user_prompt.to_string());
        }
    }

    fn scripted(response: &Option<String>, what: &str) -> Result<String, LlmError> {
        response
            .clone()
            .ok_or_else(|| LlmError::Unavailable(format!("no scripted {} response", what)))
    }
}

#[async_trait]
impl LanguageModel for ScriptedLanguageModel {
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        if system_prompt == prompts::EXTRACTION_SYSTEM {
            Self::record(&self.extraction_calls, user_prompt);
            Self::scripted(&self.extraction, "extraction")
        } else if system_prompt == prompts::RECOMMENDATIONS_SYSTEM {
            Self::record(&self.recommendation_calls, user_prompt);
            Self::scripted(&self.recommendation, "recommendation")
        } else {
            Err(LlmError::Unavailable("unexpected system prompt".to_string()))
        }
    }

    async fn extract_analysis(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
    ) -> Result<InventionAnalysis, LlmError> {
        Self::record(&self.analysis_calls, user_prompt);

        let subject = user_prompt
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Company/Invention: "))
            .unwrap_or_default();

        self.analyses.get(subject).cloned().ok_or_else(|| {
            LlmError::Unavailable(format!("no scripted analysis for {}", subject))
        })
    }
}
