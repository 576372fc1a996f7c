//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;

use crate::config::LLMConfig;
use crate::error::LlmError;
use crate::research::types::InventionAnalysis;

mod providers;

use providers::ProviderClient;

/// 流水线对语言模型的全部需求：自由文本回复与结构化的发明分析
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError>;

    async fn extract_analysis(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<InventionAnalysis, LlmError>;
}

/// 基于 rig 的LLM客户端，每次调用只发起一次请求，不做重试
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(config)?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String, LlmError> {
        let agent = self.client.create_agent(system_prompt, &self.config);
        agent.prompt(user_prompt).await
    }

    async fn extract_analysis(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<InventionAnalysis, LlmError> {
        let extractor = self
            .client
            .create_extractor::<InventionAnalysis>(system_prompt, &self.config);
        extractor.extract(user_prompt).await
    }
}
