use futures::StreamExt;
use std::fmt::Display;
use std::time::{Duration, Instant};

use crate::research::context::ResearchContext;
use crate::research::prompts::truncate_chars;
use crate::research::types::{CandidateRejection, InventionRecord, ResearchState};

/// 提取阶段追加在查询后面的检索短语
pub const ARTICLE_QUERY_SUFFIX: &str = " + innovation + patent + technology";
/// 调研阶段查找官网时追加的短语
pub const OFFICIAL_SITE_SUFFIX: &str = " official site";
/// 搜索结果没有标题时使用的候选名称
pub const UNKNOWN_CANDIDATE: &str = "Unknown";

/// 流水线阶段，严格线性推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extract,
    Research,
    Analyze,
    Done,
}

impl Stage {
    pub fn next(self) -> Stage {
        match self {
            Stage::Extract => Stage::Research,
            Stage::Research => Stage::Analyze,
            Stage::Analyze | Stage::Done => Stage::Done,
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Stage::Extract => "extract",
            Stage::Research => "research",
            Stage::Analyze => "analyze",
            Stage::Done => "done",
        };
        write!(f, "{}", str)
    }
}

/// 各阶段耗时
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    phases: Vec<(Stage, Duration)>,
}

impl StageTimings {
    pub fn record(&mut self, stage: Stage, duration: Duration) {
        self.phases.push((stage, duration));
    }

    #[cfg(test)]
    pub fn get(&self, stage: Stage) -> Option<Duration> {
        self.phases
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
    }

    pub fn total(&self) -> Duration {
        self.phases.iter().map(|(_, d)| *d).sum()
    }

    #[cfg(test)]
    pub fn stages(&self) -> Vec<Stage> {
        self.phases.iter().map(|(s, _)| *s).collect()
    }

    /// 格式化的执行时间报告
    pub fn report(&self) -> String {
        let mut report = format!("total: {:.2}s", self.total().as_secs_f64());
        for (stage, duration) in &self.phases {
            report.push_str(&format!(", {}: {:.3}s", stage, duration.as_secs_f64()));
        }
        report
    }
}

/// 三阶段调研编排器：Extract → Research → Analyze
///
/// 编排器本身不保存任何跨查询的状态，每次 `run` 都从新的 `ResearchState` 开始，
/// 外部服务的失败在每一步就地降级，不会中断整条流水线。
#[derive(Clone)]
pub struct ResearchOrchestrator {
    context: ResearchContext,
}

impl ResearchOrchestrator {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }

    /// 执行完整流水线并返回最终状态
    pub async fn run(&self, query: &str) -> ResearchState {
        self.run_with_timings(query).await.0
    }

    pub async fn run_with_timings(&self, query: &str) -> (ResearchState, StageTimings) {
        let mut state = ResearchState::new(query);
        let mut timings = StageTimings::default();
        let mut stage = Stage::Extract;

        while stage != Stage::Done {
            let started = Instant::now();
            match stage {
                Stage::Extract => self.extract_step(&mut state).await,
                Stage::Research => self.research_step(&mut state).await,
                Stage::Analyze => self.analyze_step(&mut state).await,
                Stage::Done => {}
            }
            timings.record(stage, started.elapsed());
            stage = stage.next();
        }

        tracing::debug!(query, timings = %timings.report(), "Research pipeline finished");
        (state, timings)
    }

    /// 搜索相关文章，汇总内容后让模型列出候选发明
    async fn extract_step(&self, state: &mut ResearchState) {
        let pipeline = &self.context.pipeline;
        tracing::info!(query = %state.query, "Searching for articles");

        let article_query = format!("{}{}", state.query, ARTICLE_QUERY_SUFFIX);
        let articles = self
            .context
            .search
            .search(&article_query, pipeline.extract_search_limit)
            .await;

        let mut all_content = String::new();
        for url in &articles.urls {
            if let Some(markdown) = self.context.fetcher.fetch_markdown(url).await {
                all_content.push_str(truncate_chars(&markdown, pipeline.extract_excerpt_chars));
                all_content.push_str("\n\n");
            }
        }

        match self
            .context
            .summarizer
            .extract_candidates(&state.query, &all_content)
            .await
        {
            Ok(names) => {
                tracing::info!(count = names.len(), names = %names.join(", "), "Extracted inventions");
                state.extracted_inventions = names;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invention extraction failed, continuing without candidates");
                state.extracted_inventions = vec![];
            }
        }
    }

    /// 为每个候选查找官网、抓取并分析，结果按候选顺序追加
    async fn research_step(&self, state: &mut ResearchState) {
        let candidates = self.candidate_names(state).await;
        tracing::info!(candidates = %candidates.join(", "), "Researching inventions");

        let outcomes: Vec<(String, Result<InventionRecord, CandidateRejection>)> =
            futures::stream::iter(candidates)
                .map(|name| async move {
                    let outcome = self.research_candidate(&name).await;
                    (name, outcome)
                })
                .buffered(self.context.pipeline.max_parallels.max(1))
                .collect()
                .await;

        for (name, outcome) in outcomes {
            match outcome {
                Ok(record) => state.inventions.push(record),
                Err(reason) => {
                    tracing::info!(candidate = %name, reason = %reason, "Candidate rejected");
                }
            }
        }

        let enriched = state.inventions.iter().filter(|r| r.is_enriched()).count();
        tracing::info!(
            researched = state.inventions.len(),
            enriched,
            "Research stage finished"
        );
    }

    /// 候选列表：优先使用提取结果，否则直接搜索原始查询并使用结果标题
    async fn candidate_names(&self, state: &ResearchState) -> Vec<String> {
        let pipeline = &self.context.pipeline;

        if state.extracted_inventions.is_empty() {
            tracing::info!("No extracted inventions, falling back to direct search");
            let results = self
                .context
                .search
                .search(&state.query, pipeline.fallback_search_limit)
                .await;
            return results
                .hits
                .into_iter()
                .map(|hit| hit.title.unwrap_or_else(|| UNKNOWN_CANDIDATE.to_string()))
                .collect();
        }

        state
            .extracted_inventions
            .iter()
            .take(pipeline.research_candidate_limit)
            .cloned()
            .collect()
    }

    async fn research_candidate(&self, name: &str) -> Result<InventionRecord, CandidateRejection> {
        let site_query = format!("{}{}", name, OFFICIAL_SITE_SUFFIX);
        let results = self
            .context
            .search
            .search(&site_query, self.context.pipeline.official_site_search_limit)
            .await;

        // 网关只返回地址有效的结果，被丢弃的地址用于给出排除原因
        let Some(hit) = results.hits.into_iter().next() else {
            return Err(match results.rejected_urls.into_iter().next() {
                Some(url) => CandidateRejection::InvalidWebsite { url },
                None => CandidateRejection::NoSearchHit,
            });
        };

        let mut record =
            InventionRecord::from_hit(name, hit.url.as_str(), hit.snippet.unwrap_or_default());

        tracing::debug!(candidate = name, url = %record.website, "Found official site");

        if let Some(content) = self.context.fetcher.fetch_markdown(&record.website).await {
            let outcome = self.context.summarizer.summarize(name, &content).await;
            if outcome.is_failed() {
                tracing::info!(candidate = name, "Keeping candidate with failed analysis");
            }
            record.enrich(outcome.into_analysis());
        }

        Ok(record)
    }

    /// 汇总所有发明记录，生成最终的策略建议
    async fn analyze_step(&self, state: &mut ResearchState) {
        tracing::info!(inventions = state.inventions.len(), "Generating strategic recommendation");

        match self
            .context
            .summarizer
            .recommend(&state.query, &state.inventions)
            .await
        {
            Ok(recommendation) => state.analysis = Some(recommendation),
            Err(e) => {
                tracing::warn!(error = %e, "Recommendation failed, leaving analysis empty");
            }
        }
    }
}
