// 调研流水线
// Extract：搜索与查询相关的文章，抓取正文后由模型列出候选发明名称
// Research：为每个候选查找官网 -> 校验地址 -> 抓取 -> 结构化分析，得到发明记录
// Analyze：汇总所有发明记录，由模型给出简短的策略建议

pub mod context;
pub mod orchestrator;
pub mod prompts;
pub mod summarizer;
pub mod types;
pub mod workflow;
