//! Given a type id and the configured word size, returns byte size and
//! natural alignment (`spec.md` §4.3). Grounded on
//! `til/size_calculator.rs`'s `TILTypeSizeSolver`, generalized from one
//! recursive `Type` match into a registry-aware lookup across the four
//! user-type kinds plus the static base-type table.

use crate::config::{TranslatorConfig, WordSize};
use crate::ids::{BaseType, TypeId};
use crate::model::Member;
use crate::registry::TypeRegistry;

/// VAX floating-point byte widths (F/D/G/H) and IEEE single/double
/// (S/T) — the "six float forms" of `spec.md` §3. Complex variants are
/// two components back to back.
fn float_bytes(bt: BaseType) -> u64 {
    match bt {
        BaseType::FFloat => 4,
        BaseType::FFloatComplex => 8,
        BaseType::DFloat => 8,
        BaseType::DFloatComplex => 16,
        BaseType::GFloat => 8,
        BaseType::GFloatComplex => 16,
        BaseType::HFloat => 16,
        BaseType::HFloatComplex => 32,
        BaseType::SFloat => 4,
        BaseType::SFloatComplex => 8,
        BaseType::TFloat => 8,
        BaseType::TFloatComplex => 16,
        _ => unreachable!("float_bytes called on a non-float base type"),
    }
}

/// Byte size of a base type (`spec.md` §4.3). `CHAR_VARY`/`DECIMAL`
/// report their *element*/digit-pair size here; their total storage
/// cost (`length + 2`, `precision/2 + 1`) is computed by the layout
/// engine's `real_size`, not here.
pub fn base_type_size(bt: BaseType, word_size: WordSize) -> u64 {
    use BaseType::*;
    match bt {
        Byte => 1,
        Word => 2,
        Long => 4,
        Quad => 8,
        Octa => 16,
        FFloat | FFloatComplex | DFloat | DFloatComplex | GFloat | GFloatComplex | HFloat
        | HFloatComplex | SFloat | SFloatComplex | TFloat | TFloatComplex => float_bytes(bt),
        Char | CharVary => 1,
        CharStar => word_size.bytes() as u64,
        Decimal => 1,
        Bitfield | BitfieldLong => 4,
        BitfieldByte => 1,
        BitfieldWord => 2,
        BitfieldQuad => 8,
        Addr | AddrHw | Entry => word_size.bytes() as u64,
        AddrL => 4,
        AddrQ => 8,
        Any | Void | Struct | Union => 0,
        Bool => 1,
        Enum => 4,
    }
}

/// `sizeof(id, word_size_bits)` (`spec.md` §4.3).
pub fn sizeof(registry: &TypeRegistry, config: &TranslatorConfig, id: TypeId) -> u64 {
    if let Some(bt) = id.base() {
        return base_type_size(bt, config.word_size);
    }
    if let Some(declare) = registry.declare(id) {
        return declare.size;
    }
    if let Some(item) = registry.item(id) {
        return item.size;
    }
    if let Some(agg) = registry.aggregate(id) {
        return agg.size;
    }
    if registry.enumerate(id).is_some() {
        return 4;
    }
    0
}

/// A type reference as the legacy action API spells it: non-negative
/// for the type's default signedness, negative to request the explicit
/// signed variant of the same base id (`spec.md` §4.3: "the
/// implementation encodes signedness by negating the ID for signed
/// variants; callers must normalize the sign before consulting size
/// tables").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedTypeRef(pub i64);

impl SignedTypeRef {
    pub fn is_unsigned(self) -> bool {
        self.0 >= 0
    }

    pub fn normalize(self) -> TypeId {
        TypeId(self.0.unsigned_abs() as u32)
    }
}

/// `is_address(id)`: true for the base `ADDR` family, or for a `DECLARE`
/// that resolves (through at most one indirection) to one.
pub fn is_address(registry: &TypeRegistry, id: TypeId) -> bool {
    if let Some(bt) = id.base() {
        return bt.is_address();
    }
    if let Some(declare) = registry.declare(id) {
        if let Some(bt) = declare.target.base() {
            return bt.is_address();
        }
    }
    false
}

pub fn is_bitfield(member: &Member) -> bool {
    member.kind.is_bitfield()
}

pub fn is_comment(member: &Member) -> bool {
    member.kind.is_comment()
}

pub fn is_item(member: &Member) -> bool {
    member.kind.is_item()
}
