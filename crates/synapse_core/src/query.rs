//! Composite query codec.
//!
//! The wire format is a plain line-oriented string carrying the target brain,
//! an optional persona, an optional mode, and the literal question:
//!
//! ```text
//! TargetBrain: docs_brain
//! PersonaID: senior_engineer
//! ModeID: summarize
//! Query: how do I wire the batch call?
//! ```
//!
//! Any subset of fields is accepted when decoding; `Query:` captures
//! everything after it, newlines included. Decoding is pure and total.

/// Decoded structured request. Personas and modes arrive either as registry
/// ids (`PersonaID:`/`ModeID:`) or as inline prompt blocks supplied directly
/// on `Persona:`/`Mode:` lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositeQuery {
    pub target_brain: Option<String>,
    pub persona_id: Option<String>,
    pub persona_block: Option<String>,
    pub mode_id: Option<String>,
    pub mode_block: Option<String>,
    pub question: String,
}

impl CompositeQuery {
    /// Parse the composite format. Never fails: if no `Query:` marker is
    /// present the unmodified input is treated as the question and the id
    /// fields stay unset.
    pub fn decode(raw: &str) -> Self {
        let Some((head, body)) = find_query_marker(raw) else {
            return CompositeQuery {
                question: raw.trim().to_string(),
                ..Default::default()
            };
        };

        let mut query = CompositeQuery {
            question: body.trim().to_string(),
            ..Default::default()
        };

        // Header fields are only honored before the Query: marker, so a
        // question that happens to contain "ModeID:" on a line is left alone.
        for line in head.lines() {
            if let Some(v) = line.strip_prefix("TargetBrain:") {
                query.target_brain = non_empty(v);
            } else if let Some(v) = line.strip_prefix("PersonaID:") {
                query.persona_id = non_empty(v);
            } else if let Some(v) = line.strip_prefix("Persona:") {
                query.persona_block = non_empty(v);
            } else if let Some(v) = line.strip_prefix("ModeID:") {
                query.mode_id = non_empty(v);
            } else if let Some(v) = line.strip_prefix("Mode:") {
                query.mode_block = non_empty(v);
            }
        }

        query
    }
}

/// Split the input at the first line-anchored `Query:` marker.
/// Returns `(text before the marker, everything after it)`.
fn find_query_marker(raw: &str) -> Option<(&str, &str)> {
    if let Some(rest) = raw.strip_prefix("Query:") {
        return Some(("", rest));
    }
    raw.find("\nQuery:")
        .map(|idx| (&raw[..idx], &raw[idx + "\nQuery:".len()..]))
}

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

/// A persona or mode reference: either a registry id or an inline prompt
/// block supplied directly by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptBlockRef {
    Id(String),
    Inline(String),
}

/// Caller-side builder for the composite wire format.
#[derive(Debug, Clone, Default)]
pub struct QuerySpec {
    pub brain: String,
    pub persona: Option<PromptBlockRef>,
    pub mode: Option<PromptBlockRef>,
    pub question: String,
}

impl QuerySpec {
    pub fn new(brain: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            brain: brain.into(),
            question: question.into(),
            persona: None,
            mode: None,
        }
    }

    pub fn with_persona(mut self, persona: PromptBlockRef) -> Self {
        self.persona = Some(persona);
        self
    }

    pub fn with_mode(mut self, mode: PromptBlockRef) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Join present fields with blank-line separators, in the fixed order
    /// TargetBrain, Persona, Mode, Query.
    pub fn encode(&self) -> String {
        let mut parts = vec![format!("TargetBrain: {}", self.brain)];
        match &self.persona {
            Some(PromptBlockRef::Id(id)) => parts.push(format!("PersonaID: {}", id)),
            Some(PromptBlockRef::Inline(block)) => parts.push(format!("Persona: {}", block)),
            None => {}
        }
        match &self.mode {
            Some(PromptBlockRef::Id(id)) => parts.push(format!("ModeID: {}", id)),
            Some(PromptBlockRef::Inline(block)) => parts.push(format!("Mode: {}", block)),
            None => {}
        }
        parts.push(format!("Query: {}", self.question));
        parts.join("\n\n")
    }
}
