//! The `IFLANGUAGE`/`IFSYMBOL`/`ELSE` nesting stack (`spec.md` §4.5).
//! Modeled as a `Vec<Scope>` where each entry snapshots enough of the
//! parent's state to restore it on pop, rather than recomputing the
//! fold from scratch on every query — the running mask/flag are kept
//! incrementally, mirroring the conditional-nesting bookkeeping the
//! teacher's own parser threading does for its (unrelated) nested
//! section scopes in `til/section.rs`.

use anyhow::{ensure, Context, Result};

use crate::error::ErrorCode;

/// A bit index into the translator's target-language set (`spec.md` §4.5:
/// "a per-target enable bitmap"). Resolution from a target name string to
/// a `TargetId` is the caller's job (translator-level); at most 32
/// distinct targets are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    IfLanguage,
    IfSymbol,
}

#[derive(Debug, Clone)]
struct Scope {
    kind: ScopeKind,
    saved_mask: u32,
    saved_symbol_enabled: bool,
    /// For `IfLanguage`: the bitmask of targets named in the `IF` clause.
    body_mask: u32,
    /// For `IfSymbol`: the boolean condition being tested.
    symbol_value: bool,
    in_else: bool,
}

/// The conditional-nesting stack. One instance lives on the `Translator`.
#[derive(Debug, Clone)]
pub struct ConditionalStack {
    scopes: Vec<Scope>,
    current_mask: u32,
    current_symbol_enabled: bool,
}

impl Default for ConditionalStack {
    fn default() -> Self {
        Self {
            scopes: Vec::new(),
            current_mask: u32::MAX,
            current_symbol_enabled: true,
        }
    }
}

impl ConditionalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bitwise-AND-down-the-stack enable state for each target.
    pub fn enabled_mask(&self) -> u32 {
        self.current_mask
    }

    /// `spec.md` §4.5: false when any `IFSYMBOL` in the stack is false.
    /// When false, data-producing actions are suppressed but
    /// bracket-tracking actions (open/close of conditionals and
    /// aggregates) still run, so the stack stays balanced.
    pub fn processing_enabled(&self) -> bool {
        self.current_symbol_enabled
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    fn mask_of(targets: &[TargetId]) -> Result<u32, ErrorCode> {
        let mut seen = 0u32;
        let mut mask = 0u32;
        for t in targets {
            let bit = 1u32.checked_shl(t.0).unwrap_or(0);
            if seen & bit != 0 {
                return Err(ErrorCode::DupLang);
            }
            seen |= bit;
            mask |= bit;
        }
        Ok(mask)
    }

    /// Push an `IFLANGUAGE` scope. Returns `Err(DupLang)` if `targets`
    /// repeats a name (a source-data mistake, not a contract violation).
    pub fn push_if_language(&mut self, targets: &[TargetId]) -> Result<(), ErrorCode> {
        let body_mask = Self::mask_of(targets)?;
        self.scopes.push(Scope {
            kind: ScopeKind::IfLanguage,
            saved_mask: self.current_mask,
            saved_symbol_enabled: self.current_symbol_enabled,
            body_mask,
            symbol_value: true,
            in_else: false,
        });
        self.current_mask &= body_mask;
        Ok(())
    }

    pub fn push_if_symbol(&mut self, value: bool) {
        self.scopes.push(Scope {
            kind: ScopeKind::IfSymbol,
            saved_mask: self.current_mask,
            saved_symbol_enabled: self.current_symbol_enabled,
            body_mask: 0,
            symbol_value: value,
            in_else: false,
        });
        self.current_symbol_enabled &= value;
    }

    /// Flip the innermost open scope into its `ELSE` arm. Calling this
    /// with no open scope, or twice on the same scope, is a parser
    /// contract violation.
    pub fn enter_else(&mut self) -> Result<()> {
        let top = self.scopes.last_mut().context("ELSE with no open conditional")?;
        ensure!(!top.in_else, "duplicate ELSE on the same conditional");
        top.in_else = true;
        match top.kind {
            ScopeKind::IfLanguage => self.current_mask = top.saved_mask & !top.body_mask,
            ScopeKind::IfSymbol => {
                self.current_symbol_enabled = top.saved_symbol_enabled && !top.symbol_value
            }
        }
        Ok(())
    }

    /// Pop the innermost scope. `end_targets`, if given, is the target
    /// list named at an `END_IFLANGUAGE`; a mismatch against the
    /// opening list is reported as `MatchEnd` but does not block the
    /// pop — bracket tracking stays balanced regardless.
    pub fn pop(&mut self, end_targets: Option<&[TargetId]>) -> Result<Option<ErrorCode>> {
        let top = self.scopes.pop().context("END with no open conditional")?;
        let mismatch = match (top.kind, end_targets) {
            (ScopeKind::IfLanguage, Some(ends)) => {
                let end_mask = Self::mask_of(ends).unwrap_or(u32::MAX);
                (end_mask != top.body_mask).then_some(ErrorCode::MatchEnd)
            }
            _ => None,
        };
        self.current_mask = top.saved_mask;
        self.current_symbol_enabled = top.saved_symbol_enabled;
        Ok(mismatch)
    }
}
