//! The numeric identifier space shared by every definable type.
//!
//! IDs are partitioned by kind and assigned by strictly-increasing
//! per-kind counters (`spec.md` §3, §4.2); once assigned they never move.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Lower/upper bound (inclusive) of each kind's id range.
pub const BASE_TYPE_MIN: u32 = 1;
pub const BASE_TYPE_MAX: u32 = 63;
pub const DECLARE_MIN: u32 = 64;
pub const DECLARE_MAX: u32 = 255;
pub const ITEM_MIN: u32 = 256;
pub const ITEM_MAX: u32 = 511;
pub const AGGREGATE_MIN: u32 = 512;
pub const AGGREGATE_MAX: u32 = 1023;
pub const ENUM_MIN: u32 = 1024;

/// The dynamic-length kinds a [`crate::registry::TypeRegistry`] tracks.
///
/// `Const` isn't a *type* kind (constants never get their own type id),
/// but sharing the enum keeps name resolution and the block pool keyed
/// the same way throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Declare,
    Item,
    Aggregate,
    Enum,
}

impl Kind {
    pub const fn range(self) -> (u32, Option<u32>) {
        match self {
            Kind::Declare => (DECLARE_MIN, Some(DECLARE_MAX)),
            Kind::Item => (ITEM_MIN, Some(ITEM_MAX)),
            Kind::Aggregate => (AGGREGATE_MIN, Some(AGGREGATE_MAX)),
            Kind::Enum => (ENUM_MIN, None),
        }
    }

    /// Which kind owns `id`, if any; `None` for base types and the `NONE` sentinel.
    pub fn of_id(id: TypeId) -> Option<Kind> {
        let id = id.0;
        match id {
            DECLARE_MIN..=DECLARE_MAX => Some(Kind::Declare),
            ITEM_MIN..=ITEM_MAX => Some(Kind::Item),
            AGGREGATE_MIN..=AGGREGATE_MAX => Some(Kind::Aggregate),
            _ if id >= ENUM_MIN => Some(Kind::Enum),
            _ => None,
        }
    }
}

/// A resolved, stable type identifier. Never a borrowed reference into
/// another record — cross-references are by id, resolved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: TypeId = TypeId(0);

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub const fn is_base(self) -> bool {
        self.0 >= BASE_TYPE_MIN && self.0 <= BASE_TYPE_MAX
    }

    pub fn base(self) -> Option<BaseType> {
        BaseType::try_from(self.0).ok()
    }
}

impl From<BaseType> for TypeId {
    fn from(b: BaseType) -> Self {
        TypeId(b as u32)
    }
}

/// The built-in base types, `1..=63` (`spec.md` §3). Unassigned values in
/// the range are reserved; see `DESIGN.md` Open Question 3 for why the
/// discriminants below don't match the (incomplete) original C table
/// one-for-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum BaseType {
    Byte = 1,
    Word = 2,
    Long = 3,
    Quad = 4,
    Octa = 5,
    FFloat = 6,
    FFloatComplex = 7,
    DFloat = 8,
    DFloatComplex = 9,
    GFloat = 10,
    GFloatComplex = 11,
    HFloat = 12,
    HFloatComplex = 13,
    SFloat = 14,
    SFloatComplex = 15,
    TFloat = 16,
    TFloatComplex = 17,
    Char = 18,
    CharVary = 19,
    CharStar = 20,
    Decimal = 21,
    Bitfield = 22,
    BitfieldByte = 23,
    BitfieldWord = 24,
    BitfieldLong = 25,
    BitfieldQuad = 26,
    Addr = 27,
    AddrL = 28,
    AddrQ = 29,
    AddrHw = 30,
    Any = 31,
    Void = 32,
    Struct = 33,
    Union = 34,
    Bool = 35,
    Enum = 36,
    Entry = 37,
}

impl BaseType {
    /// True for the base integer types this crate treats as signed by
    /// negating the id (`spec.md` §4.3 `is_unsigned`). Float, address,
    /// and structural types are neither signed nor unsigned.
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            BaseType::Byte | BaseType::Word | BaseType::Long | BaseType::Quad | BaseType::Octa
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(
            self,
            BaseType::FFloat
                | BaseType::FFloatComplex
                | BaseType::DFloat
                | BaseType::DFloatComplex
                | BaseType::GFloat
                | BaseType::GFloatComplex
                | BaseType::HFloat
                | BaseType::HFloatComplex
                | BaseType::SFloat
                | BaseType::SFloatComplex
                | BaseType::TFloat
                | BaseType::TFloatComplex
        )
    }

    pub const fn is_address(self) -> bool {
        matches!(
            self,
            BaseType::Addr | BaseType::AddrL | BaseType::AddrQ | BaseType::AddrHw
        )
    }

    pub const fn is_bitfield(self) -> bool {
        matches!(
            self,
            BaseType::Bitfield
                | BaseType::BitfieldByte
                | BaseType::BitfieldWord
                | BaseType::BitfieldLong
                | BaseType::BitfieldQuad
        )
    }
}
