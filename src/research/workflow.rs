use anyhow::Result;
use std::io::Write;

use crate::config::Config;
use crate::research::context::ResearchContext;
use crate::research::orchestrator::ResearchOrchestrator;
use crate::shell::{self, SessionOptions};

/// 启动调研会话：指定了查询时只运行一次，否则进入交互模式
pub async fn launch(config: &Config, session: &SessionOptions) -> Result<()> {
    let context = ResearchContext::new(config)?;
    let orchestrator = ResearchOrchestrator::new(context);

    tracing::info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        max_parallels = config.pipeline.max_parallels,
        "Research assistant ready"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &session.query {
        Some(query) => {
            let state = orchestrator.run(query.trim()).await;
            writeln!(out, "{}", shell::render(&state, session.format)?)?;
        }
        None => {
            let stdin = std::io::stdin();
            shell::run_shell(&orchestrator, stdin.lock(), &mut out, session.format).await?;
        }
    }

    Ok(())
}
