//! Flat, append-only buffer of pending declaration attributes (`spec.md`
//! §4.4), plus the fixed 16-slot dimension table. Grounded on
//! `opensdl_utility.c`'s `sdl_add_option`/`sdl_dimension` accumulate-then-
//! drain pattern: every option action appends one entry here; the
//! Completion Dispatcher drains the whole buffer when the pending
//! declaration closes. `Vec::push` already amortizes the original's
//! `INCR`-at-a-time grow step, so there's no separate growth policy to
//! model here.

use crate::error::ErrorCode;
use crate::model::{ConstantValue, Dimension};

/// Every recognized option tag (`spec.md` §4.4 table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionTag {
    Align,
    NoAlign,
    BaseAlign,
    Common,
    Global,
    Typedef,
    Dimension,
    Fill,
    Default,
    Increment,
    Length,
    Radix,
    ReturnsType,
    ReturnsNamed,
    SubType,
    Alias,
    Based,
    Counter,
    Linkage,
    Marker,
    Named,
    Origin,
    Prefix,
    Tag,
    TypeName,
    Signed,
    Value,
    Reference,
    In,
    Out,
    Optional,
    List,
    Variable,
    Mask,
}

/// An option's payload, or the absence of one (bare markers like
/// `FILL`/`VALUE`/`LIST` carry no value).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Int(i64),
    Str(String),
    Const(ConstantValue),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub tag: OptionTag,
    pub value: OptionValue,
}

/// `BASEALIGN(p)`: `p` must be `0..=124` (`spec.md` §4.4).
pub fn validate_base_align(p: i64) -> Result<u32, ErrorCode> {
    if (0..=124).contains(&p) {
        Ok(p as u32)
    } else {
        Err(ErrorCode::InvAlign)
    }
}

/// `dimension(lo, hi)` (`spec.md` §6.1, §8): `lo > hi` is a `ZeroLen`
/// error at the point of construction, not deferred to layout time.
pub fn validate_dimension(dim: Dimension) -> Result<Dimension, ErrorCode> {
    if dim.count().is_some() {
        Ok(dim)
    } else {
        Err(ErrorCode::ZeroLen)
    }
}

const DIMENSION_SLOTS: usize = 16;

/// The fixed-capacity, slot-reuse dimension table (`SDL_K_MAX_DIMENSIONS`
/// in the original). Allocating returns the first free slot index;
/// binding consumes (frees) it.
#[derive(Debug, Clone, Default)]
pub struct DimensionTable {
    slots: [Option<Dimension>; DIMENSION_SLOTS],
}

impl DimensionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// First free slot, or `None` if all 16 are in use.
    pub fn alloc(&mut self, dim: Dimension) -> Option<usize> {
        let slot = self.slots.iter().position(Option::is_none)?;
        self.slots[slot] = Some(dim);
        Some(slot)
    }

    /// Bind (and free) a slot, returning its dimension.
    pub fn bind(&mut self, slot: usize) -> Option<Dimension> {
        self.slots.get_mut(slot)?.take()
    }

    pub fn get(&self, slot: usize) -> Option<Dimension> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

/// The pending-declaration option buffer. One instance lives on the
/// `Translator`, drained whenever the current declaration's completion
/// runs.
#[derive(Debug, Clone, Default)]
pub struct OptionBuffer {
    entries: Vec<OptionEntry>,
    dimensions: DimensionTable,
}

impl OptionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: OptionTag, value: OptionValue) {
        self.entries.push(OptionEntry { tag, value });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionEntry> {
        self.entries.iter()
    }

    /// Consume and clear the buffer, returning everything accumulated
    /// since the last drain.
    pub fn drain(&mut self) -> Vec<OptionEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn alloc_dimension(&mut self, dim: Dimension) -> Option<usize> {
        self.dimensions.alloc(dim)
    }

    pub fn bind_dimension(&mut self, slot: usize) -> Option<Dimension> {
        self.dimensions.bind(slot)
    }
}
