use crate::constants::MAX_LINES_LIMIT;
use std::fmt;

/// what kind of text the model is asked to write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Commit,
    Mr,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Commit => write!(f, "commit"),
            Mode::Mr => write!(f, "mr"),
        }
    }
}

/// stylistic directives for a single generation request
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GenerationConfig {
    pub mode: Mode,
    /// narrative paragraphs instead of scannable bullets
    pub longform: bool,
    pub explain_design: bool,
    /// note-to-self output for WIP branches, excludes `changelog`
    pub internal: bool,
    /// user-facing changes only, excludes `internal`
    pub changelog: bool,
    /// upper bound on bullet points, 1..=MAX_LINES_LIMIT
    pub max_lines: Option<u8>,
    /// provenance marker, has no effect on the prompt
    pub is_preset: bool,
}

/// named configurations that need no questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default,
    Quick,
    Detailed,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Quick => "quick",
            Preset::Detailed => "detailed",
        }
    }

    pub fn config(self) -> GenerationConfig {
        let (longform, explain_design, max_lines) = match self {
            Preset::Default => (false, true, 15),
            Preset::Quick => (false, false, 5),
            Preset::Detailed => (true, true, MAX_LINES_LIMIT),
        };
        GenerationConfig {
            mode: Mode::Commit,
            longform,
            explain_design,
            internal: false,
            changelog: false,
            max_lines: Some(max_lines),
            is_preset: true,
        }
    }
}

impl GenerationConfig {
    /// the fixed configuration used for merge request descriptions
    pub fn merge_request() -> Self {
        Self {
            mode: Mode::Mr,
            longform: false,
            explain_design: true,
            internal: false,
            changelog: false,
            max_lines: None,
            is_preset: false,
        }
    }

    /// enforce the invariants every resolved configuration must satisfy
    ///
    /// `internal` wins over `changelog` (the question flow never asks for a
    /// changelog once internal mode is chosen), zero means no limit and
    /// anything above the limit is capped
    pub fn normalized(mut self) -> Self {
        if self.internal && self.changelog {
            self.changelog = false;
        }
        self.max_lines = clamp_max_lines(self.max_lines);
        self
    }

    /// whether any directive beyond the bare minimal commit message is active
    pub fn has_persona_modifiers(&self) -> bool {
        self.explain_design || self.changelog || self.internal
    }
}

pub fn clamp_max_lines(max_lines: Option<u8>) -> Option<u8> {
    max_lines
        .filter(|&n| n > 0)
        .map(|n| n.min(MAX_LINES_LIMIT))
}

impl fmt::Display for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mode == Mode::Mr {
            return write!(f, "mr description");
        }

        let mut parts = vec![if self.longform { "longform" } else { "scannable" }.to_string()];
        if self.explain_design {
            parts.push("design rationale".to_string());
        }
        if self.internal {
            parts.push("internal".to_string());
        }
        if self.changelog {
            parts.push("changelog".to_string());
        }
        match self.max_lines {
            Some(n) => parts.push(format!("max {n} lines")),
            None => parts.push("no line limit".to_string()),
        }

        let origin = if self.is_preset { "preset" } else { "custom" };
        write!(f, "commit: {} ({origin})", parts.join(", "))
    }
}
