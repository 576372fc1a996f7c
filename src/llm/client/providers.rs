//! 各家模型服务的 rig 客户端，统一为单轮对话与结构化提取两种调用

use anyhow::Result;
use rig::{agent::Agent, client::CompletionClient, completion::Prompt, extractor::Extractor};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{LLMConfig, LLMProvider};
use crate::error::LlmError;

/// 在每个 provider 变体上执行同一段代码
macro_rules! each_provider {
    ($value:expr, $kind:ident, $inner:ident => $body:expr) => {
        match $value {
            $kind::OpenAI($inner) => $body,
            $kind::DeepSeek($inner) => $body,
            $kind::OpenRouter($inner) => $body,
            $kind::Anthropic($inner) => $body,
            $kind::Ollama($inner) => $body,
        }
    };
}

/// 通用的 agent 构建链，OpenAI 走 completions 接口，单独处理
macro_rules! chat_agent {
    ($builder:expr, $system_prompt:expr, $config:expr) => {
        $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .temperature($config.temperature)
            .build()
    };
}

macro_rules! analysis_extractor {
    ($builder:expr, $system_prompt:expr, $config:expr) => {
        $builder
            .preamble($system_prompt)
            .max_tokens($config.max_tokens.into())
            .build()
    };
}

pub trait Extractable: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static {}

impl<T> Extractable for T where T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static {}

#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    DeepSeek(rig::providers::deepseek::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Ollama(rig::providers::ollama::Client),
}

impl ProviderClient {
    pub fn new(config: &LLMConfig) -> Result<Self> {
        let key = config.api_key.as_str();
        let client = match config.provider {
            LLMProvider::OpenAI => ProviderClient::OpenAI(
                rig::providers::openai::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::DeepSeek => ProviderClient::DeepSeek(
                rig::providers::deepseek::Client::builder(key)
                    .base_url(&config.api_base_url)
                    .build(),
            ),
            LLMProvider::OpenRouter => ProviderClient::OpenRouter(
                rig::providers::openrouter::Client::builder(key).build(),
            ),
            LLMProvider::Anthropic => ProviderClient::Anthropic(
                rig::providers::anthropic::ClientBuilder::new(key).build()?,
            ),
            // 本地服务不需要密钥
            LLMProvider::Ollama => {
                ProviderClient::Ollama(rig::providers::ollama::Client::builder().build())
            }
        };
        Ok(client)
    }

    /// 单轮对话 agent，不挂载工具
    pub fn create_agent(&self, system_prompt: &str, config: &LLMConfig) -> ProviderAgent {
        let model = config.model.as_str();
        match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(chat_agent!(
                client.completion_model(model).completions_api().into_agent_builder(),
                system_prompt,
                config
            )),
            ProviderClient::DeepSeek(client) => {
                ProviderAgent::DeepSeek(chat_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::OpenRouter(client) => {
                ProviderAgent::OpenRouter(chat_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::Anthropic(client) => {
                ProviderAgent::Anthropic(chat_agent!(client.agent(model), system_prompt, config))
            }
            ProviderClient::Ollama(client) => {
                ProviderAgent::Ollama(chat_agent!(client.agent(model), system_prompt, config))
            }
        }
    }

    /// 按 `T` 的 JSON Schema 输出结构化结果的 extractor
    pub fn create_extractor<T: Extractable>(
        &self,
        system_prompt: &str,
        config: &LLMConfig,
    ) -> ProviderExtractor<T> {
        let model = config.model.as_str();
        match self {
            ProviderClient::OpenAI(client) => ProviderExtractor::OpenAI(analysis_extractor!(
                client.extractor_completions_api::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::DeepSeek(client) => ProviderExtractor::DeepSeek(analysis_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
            ProviderClient::OpenRouter(client) => ProviderExtractor::OpenRouter(
                analysis_extractor!(client.extractor::<T>(model), system_prompt, config),
            ),
            ProviderClient::Anthropic(client) => ProviderExtractor::Anthropic(
                analysis_extractor!(client.extractor::<T>(model), system_prompt, config),
            ),
            ProviderClient::Ollama(client) => ProviderExtractor::Ollama(analysis_extractor!(
                client.extractor::<T>(model),
                system_prompt,
                config
            )),
        }
    }
}

pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    pub async fn prompt(&self, user_prompt: &str) -> Result<String, LlmError> {
        Ok(each_provider!(self, ProviderAgent, agent => agent.prompt(user_prompt).await?))
    }
}

pub enum ProviderExtractor<T: Extractable> {
    OpenAI(Extractor<rig::providers::openai::CompletionModel, T>),
    DeepSeek(Extractor<rig::providers::deepseek::CompletionModel, T>),
    OpenRouter(Extractor<rig::providers::openrouter::CompletionModel, T>),
    Anthropic(Extractor<rig::providers::anthropic::completion::CompletionModel, T>),
    Ollama(Extractor<rig::providers::ollama::CompletionModel<reqwest::Client>, T>),
}

impl<T: Extractable> ProviderExtractor<T> {
    pub async fn extract(&self, user_prompt: &str) -> Result<T, LlmError> {
        Ok(each_provider!(self, ProviderExtractor, extractor => extractor.extract(user_prompt).await?))
    }
}
