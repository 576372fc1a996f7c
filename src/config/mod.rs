use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// 启动时读取的环境变量名
pub struct EnvKeys;

impl EnvKeys {
    pub const SERPER_API_KEY: &'static str = "SERPER_API_KEY";
    pub const FIRECRAWL_API_KEY: &'static str = "FIRECRAWL_API_KEY";
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const LLM_API_KEY: &'static str = "PATENT_SCOUT_LLM_API_KEY";
}

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// 应用程序配置，进程启动时构建一次并传入各个组件
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// 抓取服务配置
    pub scrape: ScrapeConfig,

    /// 流水线参数
    pub pipeline: PipelineConfig,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    pub provider: LLMProvider,

    #[serde(skip_serializing)]
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    pub model: String,

    pub max_tokens: u32,

    pub temperature: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(skip_serializing)]
    pub api_key: String,

    pub endpoint: String,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ScrapeConfig {
    #[serde(skip_serializing)]
    pub api_key: String,

    /// API基地址，请求发往 `{endpoint}/scrape`
    pub endpoint: String,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 流水线各阶段的数量与截断参数
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// 提取阶段搜索的文章数
    pub extract_search_limit: usize,

    /// 每篇文章送入提取提示词的字符数
    pub extract_excerpt_chars: usize,

    /// 调研阶段最多处理的候选数
    pub research_candidate_limit: usize,

    /// 没有提取到候选时，直接搜索原始查询的结果数
    pub fallback_search_limit: usize,

    /// 官网搜索的结果数
    pub official_site_search_limit: usize,

    /// 官网内容送入分析提示词的字符数
    pub analysis_content_chars: usize,

    /// 候选调研的最大并发数，1 表示逐个顺序执行
    pub max_parallels: usize,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 用环境变量中的凭据覆盖配置，`lookup` 通常是 `std::env::var(..).ok()`
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(EnvKeys::SERPER_API_KEY) {
            self.search.api_key = key;
        }
        if let Some(key) = non_empty(EnvKeys::FIRECRAWL_API_KEY) {
            self.scrape.api_key = key;
        }
        if let Some(key) =
            non_empty(EnvKeys::LLM_API_KEY).or_else(|| non_empty(EnvKeys::OPENAI_API_KEY))
        {
            self.llm.api_key = key;
        }
    }

    /// 校验必需的凭据与参数，在处理任何查询之前调用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrape.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: EnvKeys::FIRECRAWL_API_KEY,
            });
        }
        if self.search.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: EnvKeys::SERPER_API_KEY,
            });
        }
        if self.llm.provider != LLMProvider::Ollama && self.llm.api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: EnvKeys::OPENAI_API_KEY,
            });
        }
        if self.pipeline.max_parallels == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.max_parallels",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: String::new(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model: String::from("gpt-4o-mini"),
            max_tokens: 4096,
            temperature: 0.1,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::from("https://google.serper.dev/search"),
            timeout_seconds: 30,
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::from("https://api.firecrawl.dev/v1"),
            timeout_seconds: 120,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            extract_search_limit: 3,
            extract_excerpt_chars: 1500,
            research_candidate_limit: 4,
            fallback_search_limit: 4,
            official_site_search_limit: 1,
            analysis_content_chars: 2500,
            max_parallels: 1,
        }
    }
}

// Include tests
#[cfg(test)]
mod tests;
