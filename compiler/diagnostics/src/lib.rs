//! The diagnostics system.

use span::{Span, Spanning};
use std::{collections::BTreeSet, ops::Deref, path::PathBuf};
use utility::Str;

pub use reporter::Reporter;

pub mod error;
mod format;
pub mod reporter;

/// A complex diagnostic message, optionally with source locations.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
#[must_use]
pub struct Diag(UntaggedDiag);

impl Diag {
    fn new(severity: Severity) -> Self {
        Self(Box::new(UnboxedUntaggedDiag::new(severity)))
    }

    /// Create a diagnostic for a user error.
    pub fn error() -> Self {
        Self::new(Severity::Error)
    }

    /// Create a diagnostic for a warning.
    pub fn warning() -> Self {
        Self::new(Severity::Warning)
    }

    /// Add a text message describing the issue.
    ///
    /// # Strict Guidelines
    ///
    /// * The message should not contain any line breaks
    /// * The message should not start with an upper case letter
    /// * The message should not end in a punctuation mark (like a period)
    /// * Surround source code snippets with (directional) single quotation marks,
    ///   i.e. `‘` (U+2018) to the left and `’` (U+2019) to the right
    /// * The message should be able to stand on its own without the additional
    ///   information provided by labels and subdiagnostics
    pub fn message(mut self, message: impl Into<Str>) -> Self {
        self.0.message = Some(message.into());
        self
    }

    fn span(mut self, spanning: impl Spanning, label: Option<Str>, role: Role) -> Self {
        self.0.highlights.insert(Highlight {
            span: spanning.span(),
            label: label.map(Into::into),
            role,
        });
        self
    }

    /// Reference a code snippet as one of the focal points of the diagnostic.
    pub fn primary_span(self, spanning: impl Spanning) -> Self {
        self.span(spanning, None, Role::Primary)
    }

    /// Reference and label a code snippet as one of the focal points of the diagnostic.
    pub fn labeled_primary_span(self, spanning: impl Spanning, label: impl Into<Str>) -> Self {
        self.span(spanning, Some(label.into()), Role::Primary)
    }

    /// Reference a code snippet as auxiliary information for the diagnostic.
    pub fn secondary_span(self, spanning: impl Spanning) -> Self {
        self.span(spanning, None, Role::Secondary)
    }

    fn subdiagnostic(mut self, severity: Subseverity, message: Str) -> Self {
        self.0.subdiagnostics.push(Subdiag { severity, message });
        self
    }

    /// Add further clarifying information.
    pub fn note(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Note, message.into())
    }

    /// Add steps or tips to solve the diagnosed issue.
    pub fn help(self, message: impl Into<Str>) -> Self {
        self.subdiagnostic(Subseverity::Help, message.into())
    }

    /// Attach the path of the affected file.
    ///
    /// Used for diagnostics that do not reference any source location.
    pub fn path(mut self, path: PathBuf) -> Self {
        self.0.path = Some(path);
        self
    }

    /// Report the diagnostic and obtain a witness for it.
    pub fn report(self, reporter: &Reporter) -> reporter::ErasedReportedError {
        debug_assert!(self.0.severity.is_fatal());
        reporter.report(self.0);
        reporter::ErasedReportedError::new_unchecked()
    }

    /// Emit a diagnostic that does not halt anything (e.g. a warning).
    pub fn emit(self, reporter: &Reporter) {
        reporter.report(self.0);
    }
}

impl Deref for Diag {
    type Target = UnboxedUntaggedDiag;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub type UntaggedDiag = Box<UnboxedUntaggedDiag>;

// Highlights come first so that buffered reporters order diagnostics close
// to source order: diagnostics for locations higher up in the file come
// before those for locations further down.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct UnboxedUntaggedDiag {
    pub highlights: BTreeSet<Highlight>,
    pub path: Option<PathBuf>,
    pub subdiagnostics: Vec<Subdiag>,
    pub message: Option<Str>,
    pub severity: Severity,
}

impl UnboxedUntaggedDiag {
    fn new(severity: Severity) -> Self {
        Self {
            highlights: BTreeSet::new(),
            path: None,
            subdiagnostics: Vec::new(),
            message: None,
            severity,
        }
    }

    pub fn format(&self, map: Option<&span::SourceMap>) -> String {
        format::format(self, map)
    }
}

/// Part of a [complex diagnostic](Diag) providing extra text messages.
#[derive(PartialEq, Eq, Clone, PartialOrd, Ord)]
pub struct Subdiag {
    pub severity: Subseverity,
    pub message: Str,
}

/// Level of severity of a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum Severity {
    /// A user error.
    Error,
    Warning,
}

impl Severity {
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Subsidiary severity of a [subdiagnostic](Subdiag).
#[derive(Clone, Copy, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub enum Subseverity {
    /// An auxiliary note.
    Note,
    /// A message containing steps to solve an issue.
    Help,
}

impl Subseverity {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Help => "help",
        }
    }
}

/// A highlighted code snippet.
#[derive(PartialEq, Eq, Debug, Clone, PartialOrd, Ord)]
pub struct Highlight {
    pub span: Span,
    pub role: Role,
    pub label: Option<Str>,
}

/// The role of a highlighted code snippet — focal point or auxiliary note.
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord)]
pub enum Role {
    /// A focal point of the diagnostic.
    Primary,
    /// An auxiliary note of the diagnostic.
    Secondary,
}
