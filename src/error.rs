//! 错误类型
//!
//! 外部服务（搜索、抓取、模型）的错误在各自的网关处被吸收为空结果或哨兵记录，
//! 只有启动阶段的配置错误会向上传播并终止进程。

use thiserror::Error;

/// 搜索与抓取服务的调用错误
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 网络请求失败（连接、超时等）
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 服务返回了非2xx状态码
    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// 响应体无法解析
    #[error("malformed {provider} response: {reason}")]
    Decode {
        provider: &'static str,
        reason: String,
    },

    /// 服务声明成功但没有给出内容
    #[error("{provider} returned no content for {url}")]
    Empty { provider: &'static str, url: String },
}

/// 语言模型调用错误
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("prompt failed: {0}")]
    Prompt(#[from] rig::completion::PromptError),

    #[error("structured extraction failed: {0}")]
    Extraction(#[from] rig::extractor::ExtractionError),

    /// 模型服务不可用或返回了无法使用的内容
    #[error("model unavailable: {0}")]
    Unavailable(String),
}

/// 启动配置错误，唯一会导致进程退出的错误类别
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required credential: {name} must be set")]
    MissingCredential { name: &'static str },

    #[error("unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
