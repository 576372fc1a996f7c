use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 技术成熟度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum MaturityLevel {
    Concept,
    Prototype,
    Production,
    #[default]
    Unknown,
}

impl Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            MaturityLevel::Concept => "Concept",
            MaturityLevel::Prototype => "Prototype",
            MaturityLevel::Production => "Production",
            MaturityLevel::Unknown => "Unknown",
        };
        write!(f, "{}", str)
    }
}

/// 模型对单个发明官网内容的结构化分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct InventionAnalysis {
    /// 主要技术领域，例如 biotechnology、robotics
    pub technical_domain: String,
    /// 新颖性/创造性要点
    #[serde(default)]
    pub novelty_features: Vec<String>,
    pub maturity_level: MaturityLevel,
    /// 一句话描述发明解决的问题
    #[serde(default)]
    pub description: String,
    /// 编程语言、硬件平台、材料或协议
    #[serde(default)]
    pub implementation_details: Vec<String>,
    /// 是否提及专利或知识产权保护，无法判断时为空
    #[serde(default)]
    pub patent_activity: Option<bool>,
    #[serde(default)]
    pub potential_applications: Vec<String>,
    /// 例如 "EU patent granted"、"PCT filed"
    #[serde(default)]
    pub ip_protection_notes: Option<String>,
}

impl InventionAnalysis {
    pub const FAILED_DESCRIPTION: &'static str = "Failed";
    pub const UNKNOWN_DOMAIN: &'static str = "Unknown";

    /// 分析失败时使用的哨兵记录，字段值固定不变
    pub fn sentinel() -> Self {
        Self {
            technical_domain: Self::UNKNOWN_DOMAIN.to_string(),
            novelty_features: vec![],
            maturity_level: MaturityLevel::Unknown,
            description: Self::FAILED_DESCRIPTION.to_string(),
            implementation_details: vec![],
            patent_activity: None,
            potential_applications: vec![],
            ip_protection_notes: None,
        }
    }

    #[cfg(test)]
    pub fn is_sentinel(&self) -> bool {
        self.description == Self::FAILED_DESCRIPTION && self.maturity_level == MaturityLevel::Unknown
    }
}

/// 内容分析的结果：成功的分析或明确的失败标记
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Analyzed(InventionAnalysis),
    Failed,
}

impl AnalysisOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed)
    }

    /// 转换为可写入记录的分析结果，失败时返回哨兵记录
    pub fn into_analysis(self) -> InventionAnalysis {
        match self {
            AnalysisOutcome::Analyzed(analysis) => analysis,
            AnalysisOutcome::Failed => InventionAnalysis::sentinel(),
        }
    }
}

/// 单个候选发明的调研记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventionRecord {
    pub name: String,
    /// 已校验的官网地址
    pub website: String,
    pub description: String,
    pub technical_domain: Option<String>,
    pub novelty_features: Vec<String>,
    pub maturity_level: Option<MaturityLevel>,
    pub implementation_details: Vec<String>,
    pub patent_activity: Option<bool>,
    pub potential_applications: Vec<String>,
    /// 当前流程不填充，保留在记录结构中
    pub known_competitors: Vec<String>,
    pub ip_protection_notes: Option<String>,
}

impl InventionRecord {
    /// 基于搜索结果创建的初始记录，分析字段保持默认值
    pub fn from_hit(
        name: impl Into<String>,
        website: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            website: website.into(),
            description: description.into(),
            technical_domain: None,
            novelty_features: vec![],
            maturity_level: None,
            implementation_details: vec![],
            patent_activity: None,
            potential_applications: vec![],
            known_competitors: vec![],
            ip_protection_notes: None,
        }
    }

    /// 用分析结果覆盖所有可补充字段
    pub fn enrich(&mut self, analysis: InventionAnalysis) {
        self.technical_domain = Some(analysis.technical_domain);
        self.novelty_features = analysis.novelty_features;
        self.maturity_level = Some(analysis.maturity_level);
        self.description = analysis.description;
        self.implementation_details = analysis.implementation_details;
        self.patent_activity = analysis.patent_activity;
        self.potential_applications = analysis.potential_applications;
        self.ip_protection_notes = analysis.ip_protection_notes;
    }

    pub fn is_enriched(&self) -> bool {
        self.technical_domain.is_some()
    }
}

/// 候选发明被排除的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateRejection {
    /// 官网搜索没有返回任何结果
    NoSearchHit,
    /// 返回的官网地址无法通过校验
    InvalidWebsite { url: String },
}

impl Display for CandidateRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateRejection::NoSearchHit => write!(f, "no official site found"),
            CandidateRejection::InvalidWebsite { url } => write!(f, "invalid website url: {}", url),
        }
    }
}

/// 单次调研在流水线中逐步累积的状态
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResearchState {
    pub query: String,
    /// 第一阶段从文章中提取出的候选发明名称
    pub extracted_inventions: Vec<String>,
    /// 第二阶段调研完成的发明记录
    pub inventions: Vec<InventionRecord>,
    /// 第三阶段的策略建议
    pub analysis: Option<String>,
}

impl ResearchState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}
