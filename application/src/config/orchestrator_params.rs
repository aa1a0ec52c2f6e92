//! Orchestrator parameters: prompt building and generation retries.

use mindgate_domain::TemplateSet;

/// Tag a model sometimes hallucinates when it imitates another agent
pub const CROSS_AGENT_TAG: &str = "(FROM OTHER BOT)";

/// Prompt orchestration parameters.
#[derive(Debug, Clone)]
pub struct OrchestratorParams {
    /// Substituted for `$NAME`.
    pub agent_name: String,
    /// Retries for empty or hallucinated conversational output.
    pub max_generation_retries: u32,
    /// Examples kept in `$EXAMPLES`.
    pub max_examples: usize,
    /// Command docs kept in `$COMMAND_DOCS`; `0` keeps them all.
    pub max_command_docs: usize,
    pub templates: TemplateSet,
    pub cross_agent_tag: String,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            agent_name: "andy".to_string(),
            max_generation_retries: 3,
            max_examples: 2,
            max_command_docs: 0,
            templates: TemplateSet::default(),
            cross_agent_tag: CROSS_AGENT_TAG.to_string(),
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = name.into();
        self
    }

    pub fn with_max_generation_retries(mut self, max: u32) -> Self {
        self.max_generation_retries = max.max(1);
        self
    }

    pub fn with_max_examples(mut self, max: usize) -> Self {
        self.max_examples = max;
        self
    }

    pub fn with_max_command_docs(mut self, max: usize) -> Self {
        self.max_command_docs = max;
        self
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }
}
