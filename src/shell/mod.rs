//! 交互式命令行：逐行读取查询，运行调研流水线并打印结果

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::research::orchestrator::ResearchOrchestrator;
use crate::research::types::{InventionAnalysis, ResearchState};

/// 结束会话的命令
pub const EXIT_COMMANDS: [&str; 2] = ["quit", "exit"];

const MAX_NOVELTY_FEATURES: usize = 5;
const MAX_IMPLEMENTATION_DETAILS: usize = 5;
const MAX_APPLICATIONS: usize = 4;

/// 结果输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// 一次会话的运行方式
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// 指定时只运行这一个查询，不进入交互模式
    pub query: Option<String>,
    pub format: OutputFormat,
}

pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    EXIT_COMMANDS.contains(&input.as_str())
}

pub fn render(state: &ResearchState, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_report(state)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(state)?),
    }
}

fn or_none<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string())
}

fn yes_no(value: Option<bool>) -> String {
    match value {
        Some(true) => "Yes".to_string(),
        Some(false) => "No".to_string(),
        None => "None".to_string(),
    }
}

fn head(items: &[String], limit: usize) -> String {
    items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 文本格式的调研报告
pub fn render_report(state: &ResearchState) -> String {
    let mut out = String::new();
    out.push_str(&format!("📊 Results for: {}\n", state.query));
    out.push_str(&"=".repeat(60));
    out.push('\n');

    if state.inventions.is_empty() {
        out.push_str("\nNo inventions could be researched for this query.\n");
    }

    for (i, invention) in state.inventions.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", i + 1, invention.name));
        out.push_str(&format!("   🌐 Website: {}\n", invention.website));
        out.push_str(&format!(
            "   🏷️ Domain: {}\n",
            or_none(invention.technical_domain.as_deref())
        ));
        out.push_str(&format!(
            "   📈 Maturity: {}\n",
            or_none(invention.maturity_level)
        ));
        out.push_str(&format!(
            "   📜 Patent Activity: {}\n",
            yes_no(invention.patent_activity)
        ));

        if !invention.novelty_features.is_empty() {
            out.push_str(&format!(
                "   🔍 Novel Features: {}\n",
                head(&invention.novelty_features, MAX_NOVELTY_FEATURES)
            ));
        }
        if !invention.implementation_details.is_empty() {
            out.push_str(&format!(
                "   ⚙️ Implementation: {}\n",
                head(&invention.implementation_details, MAX_IMPLEMENTATION_DETAILS)
            ));
        }
        if !invention.potential_applications.is_empty() {
            out.push_str(&format!(
                "   🌍 Applications: {}\n",
                head(&invention.potential_applications, MAX_APPLICATIONS)
            ));
        }
        if !invention.description.is_empty()
            && invention.description != InventionAnalysis::FAILED_DESCRIPTION
        {
            out.push_str(&format!("   📝 Summary: {}\n", invention.description));
        }
        if let Some(notes) = &invention.ip_protection_notes {
            out.push_str(&format!("   🛡️ IP Notes: {}\n", notes));
        }
    }

    if let Some(analysis) = &state.analysis {
        out.push_str("\n💼 Recommendations:\n");
        out.push_str(&"-".repeat(40));
        out.push('\n');
        out.push_str(analysis);
        out.push('\n');
    }

    out
}

/// 读取-执行-打印循环，读到 `quit`/`exit` 或输入结束时返回
pub async fn run_shell<R, W>(
    orchestrator: &ResearchOrchestrator,
    input: R,
    output: &mut W,
    format: OutputFormat,
) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "🔬 Invention & IP Research Assistant")?;
    let mut lines = input.lines();

    loop {
        write!(output, "\n💡 Innovation Query: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let query = line?;
        let query = query.trim();

        if is_exit_command(query) {
            break;
        }
        if query.is_empty() {
            continue;
        }

        let state = orchestrator.run(query).await;
        writeln!(output, "\n{}", render(&state, format)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::research::context::ResearchContext;
    use crate::research::types::{InventionRecord, MaturityLevel};
    use crate::testing::{ScriptedLanguageModel, StaticPageProvider, StaticSearchProvider};
    use std::io::Cursor;
    use std::sync::Arc;

    fn enriched_record() -> InventionRecord {
        let mut record = InventionRecord::from_hit("SolarSponge", "https://solarsponge.io", "raw");
        record.enrich(InventionAnalysis {
            technical_domain: "Water treatment".to_string(),
            novelty_features: (1..=7).map(|i| format!("f{}", i)).collect(),
            maturity_level: MaturityLevel::Prototype,
            description: "Desalinates water with sunlight.".to_string(),
            implementation_details: vec!["Graphene".to_string()],
            patent_activity: Some(true),
            potential_applications: (1..=6).map(|i| format!("a{}", i)).collect(),
            ip_protection_notes: Some("PCT filed".to_string()),
        });
        record
    }

    #[test]
    fn test_exit_commands() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("  EXIT \n"));
        assert!(!is_exit_command("quit now"));
        assert!(!is_exit_command(""));
    }

    #[test]
    fn test_report_for_enriched_record() {
        let state = ResearchState {
            query: "solar desalination".to_string(),
            extracted_inventions: vec!["SolarSponge".to_string()],
            inventions: vec![enriched_record()],
            analysis: Some("Patent it.".to_string()),
        };

        let report = render_report(&state);

        assert!(report.starts_with("📊 Results for: solar desalination\n"));
        assert!(report.contains("1. SolarSponge\n"));
        assert!(report.contains("🌐 Website: https://solarsponge.io\n"));
        assert!(report.contains("🏷️ Domain: Water treatment\n"));
        assert!(report.contains("📈 Maturity: Prototype\n"));
        assert!(report.contains("📜 Patent Activity: Yes\n"));
        assert!(report.contains("🔍 Novel Features: f1, f2, f3, f4, f5\n"));
        assert!(report.contains("🌍 Applications: a1, a2, a3, a4\n"));
        assert!(report.contains("📝 Summary: Desalinates water with sunlight.\n"));
        assert!(report.contains("🛡️ IP Notes: PCT filed\n"));
        assert!(report.ends_with("Patent it.\n"));
    }

    #[test]
    fn test_report_hides_failed_summary_and_shows_none() {
        let mut failed = InventionRecord::from_hit("Mystery", "https://mystery.dev", "raw");
        failed.enrich(InventionAnalysis::sentinel());
        let unenriched = InventionRecord::from_hit("Bare", "https://bare.dev", "");
        let state = ResearchState {
            query: "q".to_string(),
            inventions: vec![failed, unenriched],
            ..Default::default()
        };

        let report = render_report(&state);

        assert!(!report.contains("Summary: Failed"));
        assert!(report.contains("🏷️ Domain: Unknown\n"));
        assert!(report.contains("2. Bare\n"));
        assert!(report.contains("🏷️ Domain: None\n"));
        assert!(report.contains("📜 Patent Activity: None\n"));
        assert!(!report.contains("Recommendations"));
    }

    #[test]
    fn test_report_for_empty_state() {
        let report = render_report(&ResearchState::new("q"));
        assert!(report.contains("No inventions could be researched"));
    }

    #[test]
    fn test_json_render_round_trips() {
        let state = ResearchState {
            query: "q".to_string(),
            inventions: vec![enriched_record()],
            ..Default::default()
        };

        let json = render(&state, OutputFormat::Json).unwrap();
        let parsed: ResearchState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, state);
    }

    #[tokio::test]
    async fn test_shell_runs_queries_until_exit() {
        let llm = Arc::new(ScriptedLanguageModel::new().with_recommendation("Go."));
        let orchestrator = ResearchOrchestrator::new(ResearchContext::from_parts(
            Arc::new(StaticSearchProvider::new()),
            Arc::new(StaticPageProvider::new()),
            llm.clone(),
            PipelineConfig::default(),
        ));
        let input = Cursor::new("first\n\n   \nsecond\nquit\nnever\n");
        let mut output = Vec::new();

        run_shell(&orchestrator, input, &mut output, OutputFormat::Text)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("📊 Results for: first"));
        assert!(text.contains("📊 Results for: second"));
        assert!(!text.contains("never"));
        assert_eq!(llm.recommendation_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_shell_stops_at_end_of_input() {
        let orchestrator = ResearchOrchestrator::new(ResearchContext::from_parts(
            Arc::new(StaticSearchProvider::new()),
            Arc::new(StaticPageProvider::new()),
            Arc::new(ScriptedLanguageModel::new()),
            PipelineConfig::default(),
        ));
        let mut output = Vec::new();

        run_shell(&orchestrator, Cursor::new(""), &mut output, OutputFormat::Text)
            .await
            .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("🔬 Invention & IP Research Assistant"));
    }
}
