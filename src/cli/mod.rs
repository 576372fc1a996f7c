use crate::config::{Config, LLMProvider};
use crate::shell::{OutputFormat, SessionOptions};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// 默认配置文件名，位于当前工作目录
pub const DEFAULT_CONFIG_FILE: &str = "patent-scout.toml";

/// Patent Scout - 基于搜索、抓取与大模型的发明与知识产权调研助手
#[derive(Parser, Debug)]
#[command(name = "patent-scout")]
#[command(
    about = "Query-driven invention and IP research assistant. Finds inventions related to a topic, researches their official sites and produces an IP strategy recommendation."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 启动时加载的环境变量文件
    #[arg(long, default_value = "local.env")]
    pub env_file: PathBuf,

    /// 只运行这一个查询后退出
    #[arg(short, long)]
    pub query: Option<String>,

    /// 以 JSON 输出最终状态
    #[arg(long)]
    pub json: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// LLM Provider (openai, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 模型名称
    #[arg(short, long)]
    pub model: Option<String>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 调研阶段同时处理的候选数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 搜索与抓取请求的超时秒数
    #[arg(long)]
    pub timeout_seconds: Option<u64>,
}

/// 加载环境变量文件，文件不存在时返回 `false`，内容无法解析时报错
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).context(format!("Failed to load env file: {:?}", path)),
    }
}

impl Args {
    /// 本次会话的运行方式
    pub fn session(&self) -> SessionOptions {
        SessionOptions {
            query: self.query.clone(),
            format: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        }
    }

    /// 将CLI参数转换为配置，优先级：命令行 > 环境变量 > 配置文件 > 默认值
    pub fn into_config(self) -> Result<Config> {
        self.into_config_with(|key| std::env::var(key).ok())
    }

    /// 与 `into_config` 相同，但环境变量由 `lookup` 提供
    pub fn into_config_with<F>(self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(DEFAULT_CONFIG_FILE);

                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        config.apply_env_overrides(lookup);

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .context("Invalid --llm-provider")?;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }

        if let Some(max_parallels) = self.max_parallels {
            config.pipeline.max_parallels = max_parallels;
        }
        if let Some(timeout_seconds) = self.timeout_seconds {
            config.search.timeout_seconds = timeout_seconds;
            config.scrape.timeout_seconds = timeout_seconds;
        }

        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
