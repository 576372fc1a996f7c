//! 内容分析器：封装三种语言模型调用

use std::sync::Arc;

use crate::error::LlmError;
use crate::llm::client::LanguageModel;
use crate::research::prompts;
use crate::research::types::{AnalysisOutcome, InventionRecord};

#[derive(Clone)]
pub struct ContentSummarizer {
    llm: Arc<dyn LanguageModel>,
    /// 送入分析提示词的内容上限（字符）
    content_chars: usize,
}

impl ContentSummarizer {
    pub fn new(llm: Arc<dyn LanguageModel>, content_chars: usize) -> Self {
        Self { llm, content_chars }
    }

    /// 把官网内容整理为结构化分析，任何失败都返回 `AnalysisOutcome::Failed`
    pub async fn summarize(&self, subject: &str, content: &str) -> AnalysisOutcome {
        let content = prompts::truncate_chars(content, self.content_chars);
        let user_prompt = prompts::analysis_user(subject, content);

        match self
            .llm
            .extract_analysis(prompts::ANALYSIS_SYSTEM, &user_prompt)
            .await
        {
            Ok(analysis) => AnalysisOutcome::Analyzed(analysis),
            Err(e) => {
                tracing::warn!(subject, error = %e, "Invention analysis failed");
                AnalysisOutcome::Failed
            }
        }
    }

    /// 从文章内容中提取候选发明名称
    pub async fn extract_candidates(
        &self,
        query: &str,
        content: &str,
    ) -> Result<Vec<String>, LlmError> {
        let user_prompt = prompts::extraction_user(query, content);
        let response = self
            .llm
            .prompt(prompts::EXTRACTION_SYSTEM, &user_prompt)
            .await?;
        Ok(parse_candidate_names(&response))
    }

    /// 基于全部发明记录生成策略建议，返回模型的原始文本
    pub async fn recommend(
        &self,
        query: &str,
        inventions: &[InventionRecord],
    ) -> Result<String, LlmError> {
        let user_prompt = prompts::recommendations_user(query, &serialize_inventions(inventions));
        self.llm
            .prompt(prompts::RECOMMENDATIONS_SYSTEM, &user_prompt)
            .await
    }
}

/// 每行一个名称，去除空白并跳过空行，保持原有顺序
pub fn parse_candidate_names(response: &str) -> Vec<String> {
    response
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 每条记录序列化为 JSON 后以 ", " 拼接
pub fn serialize_inventions(inventions: &[InventionRecord]) -> String {
    inventions
        .iter()
        .filter_map(|invention| serde_json::to_string(invention).ok())
        .collect::<Vec<_>>()
        .join(", ")
}
