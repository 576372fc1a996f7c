use anyhow::Result;
use clap::Parser;
use patent_scout::{cli, launch};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "warn,patent_scout=info";
const VERBOSE_LOG_FILTER: &str = "warn,patent_scout=debug";

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    // 环境变量文件不存在时忽略，内容无法解析时退出
    cli::load_env_file(&args.env_file)?;

    let session = args.session();
    let config = args.into_config()?;

    let default_filter = if config.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    launch(&config, &session).await
}
