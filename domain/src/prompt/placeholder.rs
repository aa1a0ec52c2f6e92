//! Placeholder vocabulary for prompt templates

/// A `$TOKEN` substituted into a template at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    /// Agent name
    Name,
    /// Current status summary
    Stats,
    /// Carried items
    Inventory,
    /// Action currently running
    Action,
    /// Command documentation
    CommandDocs,
    /// Retrieved examples
    Examples,
    /// Long-term memory summary
    Memory,
    /// Turns to fold into memory
    ToSummarize,
    /// Recent conversation, as text
    Convo,
    /// Self-assigned goal
    SelfPrompt,
    /// Outcomes of prior goals
    LastGoals,
    /// Available blueprints
    Blueprints,
}

impl Placeholder {
    pub const ALL: [Placeholder; 12] = [
        Placeholder::Name,
        Placeholder::Stats,
        Placeholder::Inventory,
        Placeholder::Action,
        Placeholder::CommandDocs,
        Placeholder::Examples,
        Placeholder::Memory,
        Placeholder::ToSummarize,
        Placeholder::Convo,
        Placeholder::SelfPrompt,
        Placeholder::LastGoals,
        Placeholder::Blueprints,
    ];

    /// Token as written in templates, including the `$`.
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Name => "$NAME",
            Placeholder::Stats => "$STATS",
            Placeholder::Inventory => "$INVENTORY",
            Placeholder::Action => "$ACTION",
            Placeholder::CommandDocs => "$COMMAND_DOCS",
            Placeholder::Examples => "$EXAMPLES",
            Placeholder::Memory => "$MEMORY",
            Placeholder::ToSummarize => "$TO_SUMMARIZE",
            Placeholder::Convo => "$CONVO",
            Placeholder::SelfPrompt => "$SELF_PROMPT",
            Placeholder::LastGoals => "$LAST_GOALS",
            Placeholder::Blueprints => "$BLUEPRINTS",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Placeholder::ALL.iter().find(|p| p.token() == token).copied()
    }
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}
