//! 三个阶段使用的提示词

/// 提取阶段：从文章内容中列出具体的发明名称
pub const EXTRACTION_SYSTEM: &str = "You are a patent research assistant. From the supplied articles, \
identify specific inventions, technologies, tools or technical services. Only report concrete, \
nameable products, prototypes or technical solutions that an inventor or patent attorney could cite \
in a patent application; leave out general trends and broad concepts.";

pub fn extraction_user(query: &str, content: &str) -> String {
    format!(
        r#"Query: {query}
Article Content: {content}

List the specific inventions, technologies or technical solutions in this content that are relevant to "{query}".

Rules:
- Only concrete, nameable inventions or solutions, no broad ideas or fields
- Prefer innovations of interest to inventors or patent attorneys
- Both commercialised and prototype-stage technologies qualify
- At most the 5 most relevant entries
- Output only the names or short identifiers, one per line, without descriptions

Example format:
Photonic Biosensor Chip
Multi-Modal Drone Navigation System
Graphene-Based Water Filter
Smart Wound Dressing
Autonomous Soil Analysis Probe"#
    )
}

/// 分析阶段：把官网内容整理为结构化的发明分析
pub const ANALYSIS_SYSTEM: &str = "You analyze inventions and emerging technologies for inventors, \
patent applicants and patent attorneys. Concentrate on technical features, novelty, application \
areas and implementation details that could support a patent application. Ignore marketing language \
and describe what makes the technology original.";

pub fn analysis_user(subject: &str, content: &str) -> String {
    format!(
        r#"Company/Invention: {subject}
Website Content: {content}

From the perspective of an inventor or patent attorney, provide:
- technical_domain: the main technical field (e.g. biotechnology, robotics, machine learning, medical devices)
- novelty_features: short list of novel or inventive aspects claimed or implied by the content
- maturity_level: exactly one of "Concept", "Prototype", "Production" or "Unknown"
- description: one sentence on what the invention does or which problem it solves
- implementation_details: programming languages, hardware platforms, materials or protocols mentioned
- patent_activity: true if patents, patent applications or IP protection are mentioned, false if not, null if unclear
- potential_applications: industries or use cases where the invention may apply
- ip_protection_notes: any concrete IP status (e.g. "PCT filed", "EU patent granted"), or null

Focus on technical differentiators, originality and potential patent relevance. Do not repeat generic product copy."#
    )
}

/// 建议阶段：面向专利分析师的简短策略建议
pub const RECOMMENDATIONS_SYSTEM: &str = "You are a senior patent analyst giving concise, strategic \
recommendations to inventors and patent attorneys. Answer in at most 4 sentences in total, focusing on \
technical uniqueness, patentability potential and application relevance.";

pub fn recommendations_user(query: &str, inventions: &str) -> String {
    format!(
        r#"Innovation Query: {query}
Inventions/Technologies Analyzed: {inventions}

Give a brief recommendation (4 sentences at most) covering:
- which invention or technology looks most promising and why
- its potential for patent protection or uniqueness
- the most relevant application area or industry

Be concise and direct."#
    )
}

/// 按字符数截取前缀，不会截断多字节字符
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
