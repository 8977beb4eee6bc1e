//! Compile-time error reporting and diagnostics.
//!
//! Every phase records problems as [`Diagnostic`]s against the element that
//! caused them and keeps going, so one round surfaces every defect at once.
//!
//! # Design
//!
//! - `Diagnostic`: single diagnostic with a site, optional namespace snippet, labels and notes
//! - `ErrorKind`: categorizes diagnostics by the check that found them
//! - `Severity`: error or warning
//! - `DiagnosticFormatter`: renders diagnostics with the offending namespace underlined
//! - `Sink`: the host's `error(element, message)` / `warn(element, message)` channel
//!
//! # Examples
//!
//! ```
//! # use typist::error::*;
//! # use typist::foundation::Element;
//! let site = Element::method("Cases", "run");
//! let error = Diagnostic::error(
//!     ErrorKind::UnresolvedBinding,
//!     site,
//!     "\"b\" does not exist in \"a b\"".to_string(),
//! );
//! assert_eq!(error.severity, Severity::Error);
//! ```

use std::fmt;
use std::ops::Range;

use tracing::{error, warn};

use crate::foundation::Element;

/// Compilation diagnostic attached to a program element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of this diagnostic
    pub kind: ErrorKind,
    /// Severity level
    pub severity: Severity,
    /// Element the diagnostic is reported against
    pub site: Element,
    /// Namespace text and the offending byte range inside it, when known
    pub snippet: Option<Snippet>,
    /// Primary message
    pub message: String,
    /// Related elements
    pub labels: Vec<Label>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// The namespace a diagnostic points into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub text: String,
    pub span: Range<usize>,
}

/// Category of diagnostic.
///
/// # Invariant
///
/// The discriminant values must match the ERROR_KIND_NAMES array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorKind {
    /// Malformed namespace syntax
    Lex = 0,
    /// Incompatible redeclaration of a tree position
    MergeConflict = 1,
    /// Binding path absent from the tree
    UnresolvedBinding = 2,
    /// More than one binding of a role on one node
    DuplicateBinding = 3,
    /// Binding element is not public and constant
    Modifier = 4,
    /// Element cannot fulfil any binding role, or not on this node
    InvalidBinding = 5,
    /// Argument without a type to parse it with
    MissingType = 6,
    /// Leaf command nothing executes
    Unexecuted = 7,
    /// Internal compiler error (bug in compiler)
    Internal = 8,
}

/// Human-readable names for error kinds.
///
/// Index matches ErrorKind discriminant.
const ERROR_KIND_NAMES: &[&str] = &[
    "lex error",               // 0: Lex
    "merge conflict",          // 1: MergeConflict
    "unresolved binding",      // 2: UnresolvedBinding
    "duplicate binding",       // 3: DuplicateBinding
    "invalid modifiers",       // 4: Modifier
    "invalid binding",         // 5: InvalidBinding
    "missing argument type",   // 6: MissingType
    "unexecuted command",      // 7: Unexecuted
    "internal compiler error", // 8: Internal
];

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but generation can proceed
    Warning,
    /// Generation is suppressed for the round
    Error,
}

/// Secondary element referenced by a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub site: Element,
    pub message: String,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(kind: ErrorKind, site: Element, message: String) -> Self {
        Self::with_severity(kind, Severity::Error, site, message)
    }

    /// Creates a new warning diagnostic.
    pub fn warning(kind: ErrorKind, site: Element, message: String) -> Self {
        Self::with_severity(kind, Severity::Warning, site, message)
    }

    fn with_severity(kind: ErrorKind, severity: Severity, site: Element, message: String) -> Self {
        Self {
            kind,
            severity,
            site,
            snippet: None,
            message,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Points the diagnostic at a byte range of the namespace it came from.
    pub fn with_snippet(mut self, text: impl Into<String>, span: Range<usize>) -> Self {
        self.snippet = Some(Snippet {
            text: text.into(),
            span,
        });
        self
    }

    /// Adds a related element (e.g. "also bound here").
    pub fn with_label(mut self, site: Element, message: String) -> Self {
        self.labels.push(Label { site, message });
        self
    }

    /// Adds a note or hint.
    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Forwards this diagnostic to a host sink.
    pub fn report(&self, sink: &mut dyn Sink) {
        match self.severity {
            Severity::Error => sink.error(&self.site, &self.message),
            Severity::Warning => sink.warn(&self.site, &self.message),
        }
    }
}

impl ErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn name(self) -> &'static str {
        ERROR_KIND_NAMES[self as usize]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}: {}",
            self.severity,
            self.kind.name(),
            self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

/// True if any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// The host's diagnostic channel.
pub trait Sink {
    fn error(&mut self, site: &Element, message: &str);
    fn warn(&mut self, site: &Element, message: &str);
}

/// Sink that emits diagnostics as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn error(&mut self, site: &Element, message: &str) {
        error!(site = %site, "{message}");
    }

    fn warn(&mut self, site: &Element, message: &str) {
        warn!(site = %site, "{message}");
    }
}

/// Formats diagnostics with namespace context.
///
/// Produces:
/// - Severity, kind and message
/// - The element the diagnostic is reported against
/// - The namespace with `^^^` under the offending range, when known
/// - Labels and notes
///
/// # Examples
///
/// ```
/// # use typist::error::*;
/// # use typist::foundation::Element;
/// let error = Diagnostic::error(
///     ErrorKind::Lex,
///     Element::ty("Cases"),
///     "\"<b\" contains an unmatched \"<\"".to_string(),
/// )
/// .with_snippet("a <b", 2..4);
///
/// let formatted = DiagnosticFormatter::new().format(&error);
/// assert!(formatted.contains("  --> Cases"));
/// assert!(formatted.contains("   |   ^^"));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DiagnosticFormatter;

impl DiagnosticFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Formats a diagnostic as a multi-line string.
    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut output = format!("{diagnostic}\n");
        output.push_str(&format!("  --> {}\n", diagnostic.site));

        if let Some(snippet) = &diagnostic.snippet {
            let start = snippet.span.start.min(snippet.text.len());
            let end = snippet.span.end.clamp(start, snippet.text.len());
            let width = snippet.text[start..end].chars().count().max(1);
            output.push_str("   |\n");
            output.push_str(&format!("   | {}\n", snippet.text));
            output.push_str(&format!(
                "   | {}{}\n",
                " ".repeat(snippet.text[..start].chars().count()),
                "^".repeat(width)
            ));
        }

        for label in &diagnostic.labels {
            output.push_str(&format!("   = note: {}\n", label.message));
            output.push_str(&format!("     at {}\n", label.site));
        }

        for note in &diagnostic.notes {
            output.push_str(&format!("   = help: {}\n", note));
        }

        output
    }

    /// Formats multiple diagnostics separated by blank lines.
    pub fn format_all(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Element {
        Element::method("Cases", "run")
    }

    #[derive(Default)]
    struct Recorder {
        errors: Vec<String>,
        warnings: Vec<String>,
    }

    impl Sink for Recorder {
        fn error(&mut self, site: &Element, message: &str) {
            self.errors.push(format!("{site}: {message}"));
        }

        fn warn(&mut self, site: &Element, message: &str) {
            self.warnings.push(format!("{site}: {message}"));
        }
    }

    #[test]
    fn test_error_creation() {
        let err = Diagnostic::error(ErrorKind::MergeConflict, site(), "conflict".to_string());

        assert_eq!(err.kind, ErrorKind::MergeConflict);
        assert_eq!(err.severity, Severity::Error);
        assert!(err.snippet.is_none());
        assert!(err.labels.is_empty());
        assert!(err.notes.is_empty());
    }

    #[test]
    fn test_error_chaining() {
        let err = Diagnostic::error(ErrorKind::DuplicateBinding, site(), "dup".to_string())
            .with_label(Element::method("Cases", "other"), "also bound here".to_string())
            .with_note("remove one of the bindings".to_string());

        assert_eq!(err.labels.len(), 1);
        assert_eq!(err.notes, vec!["remove one of the bindings".to_string()]);
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::Lex.name(), "lex error");
        assert_eq!(ErrorKind::Modifier.name(), "invalid modifiers");
        assert_eq!(ErrorKind::Internal.name(), "internal compiler error");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_display() {
        let err = Diagnostic::error(
            ErrorKind::Modifier,
            site(),
            "method should be public final".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "error: invalid modifiers: method should be public final"
        );
    }

    #[test]
    fn test_report_routes_by_severity() {
        let mut recorder = Recorder::default();

        Diagnostic::error(ErrorKind::Lex, site(), "bad".to_string()).report(&mut recorder);
        Diagnostic::warning(ErrorKind::Unexecuted, site(), "meh".to_string())
            .report(&mut recorder);

        assert_eq!(recorder.errors, vec!["Cases::run: bad".to_string()]);
        assert_eq!(recorder.warnings, vec!["Cases::run: meh".to_string()]);
    }

    #[test]
    fn test_has_errors() {
        let warning = Diagnostic::warning(ErrorKind::Unexecuted, site(), "w".to_string());
        assert!(!has_errors(&[warning.clone()]));

        let error = Diagnostic::error(ErrorKind::Lex, site(), "e".to_string());
        assert!(has_errors(&[warning, error]));
    }

    #[test]
    fn test_formatter_underlines_snippet() {
        let error = Diagnostic::error(ErrorKind::Lex, site(), "unmatched".to_string())
            .with_snippet("a <b c", 2..4)
            .with_note("close the argument with \">\"".to_string());

        let formatted = DiagnosticFormatter::new().format(&error);

        assert!(formatted.starts_with("error: lex error: unmatched\n"));
        assert!(formatted.contains("  --> Cases::run\n"));
        assert!(formatted.contains("   | a <b c\n"));
        assert!(formatted.contains("   |   ^^\n"));
        assert!(formatted.contains("   = help: close the argument with \">\""));
    }

    #[test]
    fn test_formatter_underlines_characters() {
        let error = Diagnostic::error(ErrorKind::Lex, site(), "unmatched".to_string())
            .with_snippet("été <çà", 6..11);

        let formatted = DiagnosticFormatter::new().format(&error);

        assert!(formatted.contains("   | été <çà\n"));
        assert!(formatted.contains("   |     ^^^\n"));
    }

    #[test]
    fn test_formatter_multiple() {
        let errors = vec![
            Diagnostic::error(ErrorKind::Lex, site(), "first".to_string()),
            Diagnostic::warning(ErrorKind::Unexecuted, site(), "second".to_string()),
        ];

        let formatted = DiagnosticFormatter::new().format_all(&errors);

        assert!(formatted.contains("error: lex error: first"));
        assert!(formatted.contains("warning: unexecuted command: second"));
    }
}
