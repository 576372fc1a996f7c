pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod research;
pub mod scrape;
pub mod search;
pub mod shell;
pub mod testing;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use research::orchestrator::ResearchOrchestrator;
pub use research::types::ResearchState;
pub use research::workflow::launch;
