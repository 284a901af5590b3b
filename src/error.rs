//! Structured diagnostics (`spec.md` §4.11, §7).
//!
//! `ErrorCode` is data the *external* reporter formats and prints, not a
//! propagation-only error: most of this crate's operations push a
//! [`Diagnostic`] into the ambient [`ErrorVector`] and still return a
//! best-effort `Ok`, matching §4.8's "reported but not fatal" rule.
//! Programming-contract violations by the embedding parser (calling a
//! builder out of order, a pool-exhaustion condition) instead propagate
//! as `anyhow::Error`, the same split the teacher draws between parse
//! data errors and plumbing errors throughout `til/`.

use thiserror::Error;

/// Severity of a single diagnostic (`spec.md` §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Whether a run carrying this diagnostic should exit non-zero.
    pub const fn fails_run(self) -> bool {
        matches!(self, Severity::Error | Severity::Fatal)
    }
}

/// One formatted-argument-output (FAO) argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagArg {
    Str(String),
    Int(i64),
}

impl From<&str> for DiagArg {
    fn from(s: &str) -> Self {
        DiagArg::Str(s.to_owned())
    }
}

impl From<String> for DiagArg {
    fn from(s: String) -> Self {
        DiagArg::Str(s)
    }
}

impl From<i64> for DiagArg {
    fn from(v: i64) -> Self {
        DiagArg::Int(v)
    }
}

/// Structured error codes, mnemonics and facility carried over verbatim
/// from `examples/original_source/src/opensdl_message.h` (facility 186,
/// `"SDL"`). The discriminant is the code the external message catalogue
/// keys off of; `#[error(...)]` gives a human-readable fallback when no
/// catalogue is wired up (e.g. in tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorCode {
    #[error("undefined symbol")]
    UndefSym,
    #[error("undefined constant")]
    UndefCon,
    #[error("undefined user type")]
    UndefUser,
    #[error("undefined ORIGIN member")]
    UndefOrg,
    #[error("conflicting attributes")]
    DupConAtt,
    #[error("invalid action in current state")]
    InvActSta,
    #[error("invalid alignment value")]
    InvAlign,
    #[error("invalid bitfield member")]
    InvBitfld,
    #[error("byte size is not an integral number of bytes")]
    BytSiz,
    #[error("zero-length dimension")]
    ZeroLen,
    #[error("duplicate language on IFLANGUAGE list")]
    DupLang,
    #[error("target missing at matching END_IFLANGUAGE")]
    MatchEnd,
    #[error("symbol already defined")]
    SymAlrDef,
    #[error("member is not on its natural alignment boundary")]
    Unaligned,
    #[error("zero or negative length fill")]
    ZeroFill,
    #[error("member has a negative ORIGIN-relative offset")]
    NegOrigin,
    #[error("identifier truncated")]
    TrunIdent,
    #[error("possible circular definition")]
    CircDef,
    #[error("fixup applied for dimension discriminant")]
    DimFixup,
    #[error("allocation failure")]
    AbortAlloc,
    #[error("plugin ABI version mismatch")]
    RevCheck,
}

impl ErrorCode {
    /// The severity this code is always raised at. A handful of codes
    /// (documented per use site) can be raised at more than one severity
    /// depending on context; those are constructed with
    /// [`Diagnostic::new`] directly instead of [`Diagnostic::from_code`].
    pub const fn default_severity(self) -> Severity {
        use ErrorCode::*;
        match self {
            AbortAlloc | RevCheck => Severity::Fatal,
            UndefSym | UndefCon | UndefUser | UndefOrg | DupConAtt | InvActSta | InvAlign
            | InvBitfld | BytSiz | ZeroLen | DupLang | MatchEnd | SymAlrDef => Severity::Error,
            Unaligned | ZeroFill | NegOrigin | TrunIdent => Severity::Warning,
            CircDef | DimFixup => Severity::Info,
        }
    }
}

/// One entry in the [`ErrorVector`]: a code, its severity, and its FAO
/// arguments, interpolated downstream by the external reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub args: Vec<DiagArg>,
}

impl Diagnostic {
    pub fn from_code(code: ErrorCode, args: impl IntoIterator<Item = DiagArg>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            args: args.into_iter().collect(),
        }
    }

    pub fn new(code: ErrorCode, severity: Severity, args: impl IntoIterator<Item = DiagArg>) -> Self {
        Self {
            code,
            severity,
            args: args.into_iter().collect(),
        }
    }
}

/// The accumulating diagnostic ring of `spec.md` §4.11: appended to, never
/// replaced, drained by the external renderer at translation end.
#[derive(Debug, Clone, Default)]
pub struct ErrorVector {
    entries: Vec<Diagnostic>,
}

impl ErrorVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        if diag.severity == Severity::Warning {
            tracing::warn!(code = ?diag.code, args = ?diag.args, "diagnostic raised");
        } else if diag.severity.fails_run() {
            tracing::error!(code = ?diag.code, args = ?diag.args, "diagnostic raised");
        }
        self.entries.push(diag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The worst (highest-priority) severity seen so far, if any.
    pub fn worst_severity(&self) -> Option<Severity> {
        self.entries.iter().map(|d| d.severity).max()
    }

    /// Whether any entry carries [`Severity::Fatal`].
    pub fn has_fatal(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Fatal)
    }

    /// Whether the run, taken as a whole, should exit non-zero.
    pub fn run_failed(&self) -> bool {
        self.entries.iter().any(|d| d.severity.fails_run())
    }
}
