//! The aggregate offset/size engine (`spec.md` §4.8) — the hardest-tested
//! part of this crate. Grounded on `til/size_calculator.rs`'s
//! `TILTypeSizeSolver`, generalized from a single recursive `Type` walk
//! into one that also resolves `ORIGIN`, descends into still-open
//! subaggregates, and tracks a separate bit cursor for bitfield runs.

use crate::config::TranslatorConfig;
use crate::error::ErrorCode;
use crate::ids::{BaseType, TypeId};
use crate::model::{Aggregate, AggregateAlignment, AggregateKind, Dimension, Member, MemberKind};
use crate::oracle;
use crate::registry::TypeRegistry;

fn base_type_of(registry: &TypeRegistry, type_id: TypeId) -> Option<BaseType> {
    if let Some(bt) = type_id.base() {
        return Some(bt);
    }
    registry.declare(type_id).and_then(|d| d.target.base())
}

fn dimension_count(dim: Option<Dimension>) -> u64 {
    dim.and_then(Dimension::count).unwrap_or(1)
}

/// `real_size` (`spec.md` §4.8): the total byte cost of one element run
/// of a typed datum, dimension included. DECIMAL does not multiply the
/// Oracle's unit size by precision the way every other base type
/// multiplies it by dimension count — see `DESIGN.md` Open Question 5.
/// Shared between aggregate members ([`ItemMember`]) and standalone
/// [`crate::model::Item`]s, which carry the same three sizing-relevant
/// fields without sharing a common struct.
pub fn real_size(
    type_id: TypeId,
    dimension: Option<Dimension>,
    decimal_precision: Option<(u32, i32)>,
    registry: &TypeRegistry,
    config: &TranslatorConfig,
) -> u64 {
    let unit = oracle::sizeof(registry, config, type_id);
    let count = dimension_count(dimension);
    match base_type_of(registry, type_id) {
        Some(BaseType::CharVary) => unit * count + 2,
        Some(BaseType::Decimal) => {
            let precision = decimal_precision.map(|(p, _)| p as u64).unwrap_or(1);
            ((precision + 1) / 2 + 1) * count
        }
        _ => unit * count.max(1),
    }
}

/// The `[start, end)` byte extent a member occupies, ORIGIN-relative
/// (same frame as `member.byte_offset`). A bitfield's extent is its
/// whole storage unit; a still-open subaggregate (`size == 0`) has no
/// settled extent and is the caller's cue to descend further instead.
fn member_extent(m: &Member, registry: &TypeRegistry, config: &TranslatorConfig) -> (i64, i64) {
    match &m.kind {
        MemberKind::Item(item) => {
            let size = real_size(
                item.type_id,
                item.dimension,
                item.decimal_precision,
                registry,
                config,
            ) as i64;
            (m.byte_offset, m.byte_offset + size)
        }
        MemberKind::Bitfield(bf) => {
            let unit = oracle::sizeof(registry, config, bf.base_type) as i64;
            (m.byte_offset, m.byte_offset + unit)
        }
        MemberKind::Subaggregate(sub) => (m.byte_offset, m.byte_offset + sub.size as i64),
        MemberKind::Comment(_) => (m.byte_offset, m.byte_offset),
    }
}

/// The last real (non-comment) member, descending into a trailing
/// subaggregate still under construction (`spec.md` §4.8: "walks into
/// embedded subaggregates whose size is not yet closed"). The second
/// element is the cumulative offset of every `Subaggregate` wrapper
/// crossed on the way down, since a nested member's own `byte_offset`
/// is relative to *its* subaggregate, not the outermost one.
fn last_settled_member<'a>(agg: &'a Aggregate) -> Option<(&'a Member, i64)> {
    let last = agg.last_real_member()?;
    if let MemberKind::Subaggregate(sub) = &last.kind {
        if sub.size == 0 {
            if let Some((inner, inner_base)) = last_settled_member(sub) {
                return Some((inner, last.byte_offset + inner_base));
            }
        }
    }
    Some((last, 0))
}

/// `ORIGIN`: the named sibling member whose offset becomes this
/// aggregate's reference zero (`spec.md` §4.8). `Err(UndefOrg)` if the
/// name doesn't resolve to any current member — non-fatal; the caller
/// falls back to an un-shifted (zero) origin and keeps going.
pub fn resolve_origin<'a>(agg: &'a Aggregate) -> Result<Option<&'a Member>, ErrorCode> {
    let Some(name) = agg.origin_name.as_deref() else {
        return Ok(None);
    };
    agg.members
        .iter()
        .find(|m| m.kind.name() == Some(name))
        .map(Some)
        .ok_or(ErrorCode::UndefOrg)
}

/// The byte/bit offset the *next* member should be placed at, relative
/// to `ORIGIN` (or the aggregate's own start if there is none).
/// `spec.md` §4.8 "Offset resolution (byte)" and "(bit)".
pub fn next_position(
    agg: &Aggregate,
    registry: &TypeRegistry,
    config: &TranslatorConfig,
) -> Result<(i64, u32), ErrorCode> {
    let origin_offset = resolve_origin(agg)?.map(|m| m.byte_offset).unwrap_or(0);

    let Some((last, base)) = last_settled_member(agg) else {
        return Ok((0i64.saturating_sub(origin_offset), 0));
    };

    let (byte, bit) = match &last.kind {
        MemberKind::Bitfield(bf) => {
            let unit_bits = oracle::sizeof(registry, config, bf.base_type) * 8;
            let next_bit = (bf.bit_offset + bf.bit_length) as u64;
            if next_bit >= unit_bits {
                let unit_bytes = oracle::sizeof(registry, config, bf.base_type) as i64;
                (last.byte_offset + unit_bytes + base, 0)
            } else {
                (last.byte_offset + base, next_bit as u32)
            }
        }
        _ => {
            let (_, end) = member_extent(last, registry, config);
            (end + base, 0)
        }
    };

    Ok((byte - origin_offset, bit))
}

/// Round `offset` up to the next multiple of `align` (`BaseAlign(p)`
/// aligns the *start* of the pending member; `spec.md` §4.8).
pub fn align_up(offset: i64, align: u32) -> i64 {
    if align <= 1 {
        return offset;
    }
    let align = align as i64;
    let rem = offset.rem_euclid(align);
    if rem == 0 {
        offset
    } else {
        offset + (align - rem)
    }
}

/// An item-level alignment check option result (`spec.md` §4.8:
/// "`UNALIGNED` for any member not on its natural boundary").
pub fn is_naturally_aligned(offset: i64, natural_align: u32) -> bool {
    natural_align <= 1 || offset.rem_euclid(natural_align as i64) == 0
}

/// The byte boundary the *next* member's start should be rounded up to,
/// before `next_position`'s raw offset is used (`spec.md` §4.8 "Fill and
/// alignment"): `BaseAlign(p)` on the member wins outright; otherwise the
/// aggregate's own alignment policy governs, with `Natural` falling back
/// to `config`'s default `--align` rule capped at the member's own
/// natural size (a `BYTE` next to a `QUAD` never gets padded past what
/// the `BYTE` itself would require).
pub fn resolve_member_alignment(
    agg: &Aggregate,
    member_base_align: Option<u32>,
    natural_size: u64,
    config: &TranslatorConfig,
) -> u32 {
    if let Some(p) = member_base_align {
        return 1u32 << p;
    }
    match agg.alignment.byte_alignment() {
        Some(fixed) => fixed,
        None => match config.default_alignment {
            crate::config::AlignmentRule::None => 1,
            crate::config::AlignmentRule::Explicit(cap) => natural_size.min(cap as u64) as u32,
        },
    }
}

fn member_size(m: &Member, registry: &TypeRegistry, config: &TranslatorConfig) -> u64 {
    let (start, end) = member_extent(m, registry, config);
    (end - start).max(0) as u64
}

/// Total aggregate size: struct-sum (span from lowest to highest
/// extent, to account for `ORIGIN`-induced negative offsets) or
/// union-max (largest individual member size), then tail-padded to the
/// declared alignment if `Fill` is set (`spec.md` §4.8 "Completion").
pub fn close_aggregate(agg: &mut Aggregate, registry: &TypeRegistry, config: &TranslatorConfig) {
    let real_members: Vec<&Member> = agg.members.iter().filter(|m| !m.kind.is_comment()).collect();

    let size = if real_members.is_empty() {
        0
    } else {
        match agg.kind {
            AggregateKind::Struct => {
                let mut min_start = i64::MAX;
                let mut max_end = i64::MIN;
                for m in &real_members {
                    let (start, end) = member_extent(m, registry, config);
                    min_start = min_start.min(start);
                    max_end = max_end.max(end);
                }
                (max_end - min_start).max(0) as u64
            }
            AggregateKind::Union => real_members
                .iter()
                .map(|m| member_size(m, registry, config))
                .max()
                .unwrap_or(0),
        }
    };

    let size = if agg.fill {
        let align = agg.alignment.byte_alignment().unwrap_or(1);
        align_up(size as i64, align) as u64
    } else {
        size
    };

    agg.size = size;
    agg.mem_size = size;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BitfieldMember, CommonAttrs, ItemMember};

    fn item_member(name: &str, type_id: TypeId, dimension: Option<Dimension>) -> MemberKind {
        MemberKind::Item(ItemMember {
            name: name.into(),
            common: CommonAttrs::default(),
            type_id,
            dimension,
            base_alignment: None,
            decimal_precision: None,
        })
    }

    #[test]
    fn struct_sums_sequential_members() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.members.push(Member {
            byte_offset: 0,
            kind: item_member("a", BaseType::Long.into(), None),
        });
        let (next, bit) = next_position(&agg, &reg, &cfg).unwrap();
        assert_eq!(next, 4);
        assert_eq!(bit, 0);
        agg.members.push(Member {
            byte_offset: next,
            kind: item_member("b", BaseType::Quad.into(), None),
        });
        close_aggregate(&mut agg, &reg, &cfg);
        assert_eq!(agg.size, 12);
    }

    #[test]
    fn union_reports_max_member_size() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("u", AggregateKind::Union);
        agg.members.push(Member {
            byte_offset: 0,
            kind: item_member("a", BaseType::Byte.into(), None),
        });
        agg.members.push(Member {
            byte_offset: 0,
            kind: item_member("b", BaseType::Quad.into(), None),
        });
        close_aggregate(&mut agg, &reg, &cfg);
        assert_eq!(agg.size, 8);
    }

    #[test]
    fn dimensioned_member_multiplies_by_count() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let item = ItemMember {
            name: "a".into(),
            common: CommonAttrs::default(),
            type_id: BaseType::Long.into(),
            dimension: Some(Dimension { low: 0, high: 3 }),
            base_alignment: None,
            decimal_precision: None,
        };
        assert_eq!(
            real_size(item.type_id, item.dimension, item.decimal_precision, &reg, &cfg),
            16
        );
    }

    #[test]
    fn char_vary_real_size_adds_two_byte_header() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let item = ItemMember {
            name: "s".into(),
            common: CommonAttrs::default(),
            type_id: BaseType::CharVary.into(),
            dimension: Some(Dimension { low: 0, high: 9 }),
            base_alignment: None,
            decimal_precision: None,
        };
        assert_eq!(
            real_size(item.type_id, item.dimension, item.decimal_precision, &reg, &cfg),
            10 + 2
        );
    }

    #[test]
    fn decimal_real_size_uses_rounded_precision_not_dimension_unit() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let item = ItemMember {
            name: "d".into(),
            common: CommonAttrs::default(),
            type_id: BaseType::Decimal.into(),
            dimension: None,
            base_alignment: None,
            decimal_precision: Some((7, 2)),
        };
        // (7+1)/2 + 1 = 5
        assert_eq!(
            real_size(item.type_id, item.dimension, item.decimal_precision, &reg, &cfg),
            5
        );
    }

    #[test]
    fn origin_shifts_earlier_members_negative() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.members.push(Member {
            byte_offset: 0,
            kind: item_member("a", BaseType::Long.into(), None),
        });
        agg.members.push(Member {
            byte_offset: 4,
            kind: item_member("origin_point", BaseType::Long.into(), None),
        });
        agg.origin_name = Some("origin_point".into());
        let (next, _) = next_position(&agg, &reg, &cfg).unwrap();
        // next member would sit at absolute 8, origin at 4 -> relative 4
        assert_eq!(next, 4);
    }

    #[test]
    fn unresolved_origin_is_undeforg() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.origin_name = Some("nope".into());
        assert_eq!(resolve_origin(&agg), Err(ErrorCode::UndefOrg));
        assert_eq!(next_position(&agg, &reg, &cfg), Err(ErrorCode::UndefOrg));
    }

    #[test]
    fn bitfield_run_advances_bit_cursor_until_crossing_storage_unit() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.members.push(Member {
            byte_offset: 0,
            kind: MemberKind::Bitfield(BitfieldMember {
                name: "flag".into(),
                common: CommonAttrs::default(),
                base_type: BaseType::BitfieldByte.into(),
                bit_offset: 0,
                bit_length: 4,
                is_unsigned: true,
            }),
        });
        let (byte, bit) = next_position(&agg, &reg, &cfg).unwrap();
        assert_eq!(byte, 0);
        assert_eq!(bit, 4);

        agg.members.push(Member {
            byte_offset: 0,
            kind: MemberKind::Bitfield(BitfieldMember {
                name: "rest".into(),
                common: CommonAttrs::default(),
                base_type: BaseType::BitfieldByte.into(),
                bit_offset: 4,
                bit_length: 4,
                is_unsigned: true,
            }),
        });
        // 4 + 4 == 8 bits == the whole byte: crosses into a new storage unit
        let (byte2, bit2) = next_position(&agg, &reg, &cfg).unwrap();
        assert_eq!(byte2, 1);
        assert_eq!(bit2, 0);
    }

    #[test]
    fn descends_into_open_subaggregate_for_last_member() {
        let reg = TypeRegistry::new();
        let cfg = TranslatorConfig::default();
        let mut inner = Aggregate::new("inner", AggregateKind::Struct);
        inner.members.push(Member {
            byte_offset: 4,
            kind: item_member("x", BaseType::Long.into(), None),
        });
        // inner.size left at 0: still open

        let mut outer = Aggregate::new("outer", AggregateKind::Struct);
        outer.members.push(Member {
            byte_offset: 0,
            kind: MemberKind::Subaggregate(Box::new(inner)),
        });
        let (next, _) = next_position(&outer, &reg, &cfg).unwrap();
        assert_eq!(next, 8);
    }

    #[test]
    fn natural_alignment_pads_next_member_to_its_own_size() {
        let cfg = TranslatorConfig::default();
        let agg = Aggregate::new("s", AggregateKind::Struct);
        // a BYTE at offset 0 (real_size 1) leaves the raw cursor at 1;
        // a following LONG (natural size 4) must round that up to 4.
        assert_eq!(resolve_member_alignment(&agg, None, 4, &cfg), 4);
        assert_eq!(align_up(1, resolve_member_alignment(&agg, None, 4, &cfg)), 4);
    }

    #[test]
    fn noalign_aggregate_packs_members_byte_tight() {
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.alignment = AggregateAlignment::NoAlign;
        assert_eq!(resolve_member_alignment(&agg, None, 4, &cfg), 1);
        assert_eq!(align_up(1, resolve_member_alignment(&agg, None, 4, &cfg)), 1);
    }

    #[test]
    fn base_align_option_overrides_aggregate_policy() {
        let cfg = TranslatorConfig::default();
        let mut agg = Aggregate::new("s", AggregateKind::Struct);
        agg.alignment = AggregateAlignment::NoAlign;
        assert_eq!(resolve_member_alignment(&agg, Some(3), 4, &cfg), 8);
    }

    #[test]
    fn align_up_rounds_to_next_boundary() {
        assert_eq!(align_up(5, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 8), 16);
        assert_eq!(align_up(5, 1), 5);
    }
}
