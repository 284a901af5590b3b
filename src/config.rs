//! The ambient, caller-supplied settings threaded through the Oracle and
//! Layout Engine (`SPEC_FULL.md` "Configuration"), the in-process
//! equivalent of the subset of CLI flags (`spec.md` §6.3) that affect
//! semantic behavior. Grounded on `til::section::TILSectionHeader`,
//! which the teacher threads through every `Type::new`/`*Raw::read` call
//! instead of keeping as global state.

/// Target machine word size, i.e. `--b32`/`--b64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordSize {
    Bits32,
    Bits64,
}

impl WordSize {
    pub const fn bits(self) -> u32 {
        match self {
            WordSize::Bits32 => 32,
            WordSize::Bits64 => 64,
        }
    }

    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }
}

/// Default member alignment policy for aggregates that don't override it
/// with `ALIGN`/`NOALIGN`/`BASEALIGN` (`spec.md` §4.4, §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentRule {
    /// `--align=0`, equivalent to an aggregate-wide `NOALIGN`.
    None,
    /// `--align=<1|2|4|8>`: align every member up to this byte boundary.
    Explicit(u32),
}

#[derive(Debug, Clone, Copy)]
pub struct TranslatorConfig {
    pub word_size: WordSize,
    /// `--member`: diagnose members that land off their natural boundary.
    pub check_member_alignment: bool,
    pub default_alignment: AlignmentRule,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            word_size: WordSize::Bits64,
            check_member_alignment: false,
            default_alignment: AlignmentRule::Explicit(8),
        }
    }
}
