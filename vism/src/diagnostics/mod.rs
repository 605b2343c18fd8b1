//! Compile-time error reporting: the E001–E011 catalogue and its renderer.

mod errors;

pub(crate) use errors::{e001, e002, e003, e004, e005, e006, e007, e008, e009, e010, e011};

use core::fmt;

/// Error code of a diagnostic.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Code {
    E001,
    E002,
    E003,
    E004,
    E005,
    E006,
    E007,
    E008,
    E009,
    E010,
    E011,
}

/// One underlined source line of a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLabel {
    /// The line, as written in the source.
    pub content: String,
    /// 1-based line number.
    pub number: usize,
    /// Start column of the underline (0-based, in characters).
    pub spos: usize,
    /// End column of the underline (exclusive).
    pub epos: usize,
    /// Message printed after the underline.
    pub message: String,
}

impl SourceLabel {
    pub(crate) fn new(
        (content, number, spos, epos): (String, usize, usize, usize),
        message: impl Into<String>,
    ) -> Self {
        Self {
            content,
            number,
            spos,
            epos,
            message: message.into(),
        }
    }
}

/// A compile-time error, carrying everything needed to render the stable
/// `file:line:col` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Catalogue code.
    pub code: Code,
    /// One-line synopsis.
    pub summary: String,
    /// Source path the error points into.
    pub path: String,
    /// The offending line, underlined with carets.
    pub primary: SourceLabel,
    /// Additional context lines, underlined with dashes.
    pub info: Vec<SourceLabel>,
    /// Optional `help:` message.
    pub hint: Option<String>,
    /// Optional `help:` candidates, shown after the hint.
    pub candidates: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn new(
        code: Code,
        summary: impl Into<String>,
        path: impl Into<String>,
        primary: SourceLabel,
    ) -> Self {
        Self {
            code,
            summary: summary.into(),
            path: path.into(),
            primary,
            info: Vec::new(),
            hint: None,
            candidates: Vec::new(),
        }
    }

    fn with_info(mut self, info: Vec<SourceLabel>) -> Self {
        self.info = info;
        self
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = candidates;
        self
    }

    fn ruler_size(&self) -> usize {
        let max_line = self
            .info
            .iter()
            .map(|label| label.number)
            .chain([self.primary.number])
            .max()
            .unwrap_or(1);

        max_line.to_string().len() + 1
    }

    /// Info and primary labels interleaved by line number; on ties, info
    /// lines come first.
    fn labels(&self) -> Vec<(&SourceLabel, char)> {
        let mut labels: Vec<(&SourceLabel, char)> = self
            .info
            .iter()
            .map(|label| (label, '-'))
            .chain([(&self.primary, '^')])
            .collect();
        labels.sort_by_key(|(label, _)| label.number);
        labels
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ruler = self.ruler_size();
        let pad = " ".repeat(ruler);

        writeln!(f, "[{}]: {}", self.code, self.summary)?;
        writeln!(
            f,
            "{}--> {}:{}:{}",
            " ".repeat(ruler - 1),
            self.path,
            self.primary.number,
            self.primary.spos + 1
        )?;
        writeln!(f, "{pad}|")?;

        for (label, underline) in self.labels() {
            writeln!(f, "{} | {}", label.number, label.content)?;
            writeln!(
                f,
                "{pad}| {}{} {}",
                " ".repeat(label.spos),
                underline
                    .to_string()
                    .repeat(label.epos.saturating_sub(label.spos).max(1)),
                label.message
            )?;
        }

        writeln!(f, "{pad}|")?;

        if let Some(hint) = &self.hint {
            writeln!(f, "{pad}= help: {hint}")?;
            for candidate in &self.candidates {
                writeln!(f, "{pad}= help: {candidate}")?;
            }
        }

        Ok(())
    }
}
