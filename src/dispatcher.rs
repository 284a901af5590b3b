//! One `*_compl` completion per declaration kind (`spec.md` §4.9):
//! drains the Option Buffer, validates required attributes, resolves
//! name references via the Type Registry, asks the Oracle for sizes,
//! and produces the finished record. Grounded on `opensdl_actions.c`'s
//! per-kind completion routines, generalized from C switch-on-tag loops
//! over an option array into matches over [`OptionTag`].
//!
//! `aggregate_member` (adding one member to the aggregate currently
//! being built) isn't a completion action and lives on [`crate::translator::Translator`]
//! instead, since it needs the in-progress nesting stack the dispatcher
//! doesn't otherwise track.

use crate::config::TranslatorConfig;
use crate::error::ErrorCode;
use crate::ids::{Kind, TypeId};
use crate::layout;
use crate::model::{
    Aggregate, CommonAttrs, Constant, ConstantValue, Declare, Entry, Enumerate, Item,
    PassingDiscipline, Radix, StorageClass,
};
use crate::oracle;
use crate::options::{OptionEntry, OptionTag, OptionValue};
use crate::registry::TypeRegistry;

fn find_int(options: &[OptionEntry], tag: OptionTag) -> Option<i64> {
    options.iter().find(|e| e.tag == tag).and_then(|e| match &e.value {
        OptionValue::Int(n) => Some(*n),
        _ => None,
    })
}

fn find_str(options: &[OptionEntry], tag: OptionTag) -> Option<String> {
    options.iter().find(|e| e.tag == tag).and_then(|e| match &e.value {
        OptionValue::Str(s) => Some(s.clone()),
        _ => None,
    })
}

fn has_flag(options: &[OptionEntry], tag: OptionTag) -> bool {
    options.iter().any(|e| e.tag == tag)
}

fn storage_class(options: &[OptionEntry]) -> StorageClass {
    StorageClass {
        common: has_flag(options, OptionTag::Common),
        global: has_flag(options, OptionTag::Global),
        typedef: has_flag(options, OptionTag::Typedef),
    }
}

/// `DECLARE`. `CHAR n` overrides the target's natural size (invariant
/// 6) — the override length rides on the same `Length` tag the option
/// table already uses for parameter-length attributes, since a `DECLARE`
/// never otherwise needs one.
///
/// Re-declaring a name that already resolves to a DECLARE is a
/// `SymAlrDef` (`spec.md` §8: registering twice under the same name is
/// an error, not a silent replace); the first binding is kept and its
/// id returned alongside the diagnostic.
pub fn declare_compl(
    registry: &mut TypeRegistry,
    config: &TranslatorConfig,
    name: String,
    common: CommonAttrs,
    target: TypeId,
    options: &[OptionEntry],
) -> (TypeId, Option<ErrorCode>) {
    if let Some(existing) = registry.lookup_by_name(Kind::Declare, &name) {
        return (existing, Some(ErrorCode::SymAlrDef));
    }
    let char_len_override = find_int(options, OptionTag::Length).map(|n| n.max(0) as u64);
    let size = char_len_override.unwrap_or_else(|| oracle::sizeof(registry, config, target));
    let id = registry.register_declare(Declare {
        name,
        common,
        target,
        char_len_override,
        size,
    });
    (id, None)
}

/// `ITEM`. Duplicate-name handling mirrors [`declare_compl`].
pub fn item_compl(
    registry: &mut TypeRegistry,
    config: &TranslatorConfig,
    name: String,
    common: CommonAttrs,
    type_id: TypeId,
    dimension: Option<crate::model::Dimension>,
    decimal_precision: Option<(u32, i32)>,
    options: &[OptionEntry],
) -> (TypeId, Option<ErrorCode>) {
    if let Some(existing) = registry.lookup_by_name(Kind::Item, &name) {
        return (existing, Some(ErrorCode::SymAlrDef));
    }
    let size = layout::real_size(type_id, dimension, decimal_precision, registry, config);
    let item = Item {
        name,
        common,
        type_id,
        storage: storage_class(options),
        base_alignment: find_int(options, OptionTag::BaseAlign).map(|p| p as u32),
        dimension,
        decimal_precision,
        size,
        mem_size: size,
    };
    (registry.register_item(item), None)
}

/// `CONSTANT`, including series expansion (`spec.md` §4.9, §8 S7): when
/// `Increment` is present and more than one name was given, each name
/// gets its own record with the running value stepped by the
/// increment, in list order.
pub fn constant_compl(
    names: &[String],
    common: CommonAttrs,
    type_name_hint: Option<String>,
    radix: Radix,
    base_value: ConstantValue,
    options: &[OptionEntry],
) -> Vec<Constant> {
    let increment = find_int(options, OptionTag::Increment);
    match (increment, &base_value) {
        (Some(step), ConstantValue::Int(start)) if names.len() > 1 => names
            .iter()
            .enumerate()
            .map(|(i, name)| Constant {
                name: name.clone(),
                common: common.clone(),
                type_name_hint: type_name_hint.clone(),
                radix,
                value: ConstantValue::Int(start + step * i as i64),
            })
            .collect(),
        _ => names
            .iter()
            .map(|name| Constant {
                name: name.clone(),
                common: common.clone(),
                type_name_hint: type_name_hint.clone(),
                radix,
                value: base_value.clone(),
            })
            .collect(),
    }
}

/// `ENUM`. Duplicate-name handling mirrors [`declare_compl`].
pub fn enum_compl(
    registry: &mut TypeRegistry,
    name: String,
    common: CommonAttrs,
    members: Vec<crate::model::EnumMember>,
) -> (TypeId, Option<ErrorCode>) {
    if let Some(existing) = registry.lookup_by_name(Kind::Enum, &name) {
        return (existing, Some(ErrorCode::SymAlrDef));
    }
    let id = registry.register_enum(Enumerate {
        id: TypeId::NONE,
        name,
        common,
        members,
    });
    (id, None)
}

/// `AGGREGATE`/`SUBAGGREGATE` close: applies the accumulated option
/// attributes, runs the layout engine, and registers the result. Returns
/// the assigned id and any non-fatal diagnostics produced along the way
/// (`spec.md` §7: `INVBITFLD`/`UNDEFORG`/`DUPCONATT`/`BYTSIZ` are
/// reported but not fatal — the engine still produces a best-effort
/// record).
///
/// Re-closing a name that already resolves to an AGGREGATE is a
/// `SymAlrDef`; the first binding is kept and returned in place of the
/// freshly-closed one.
pub fn aggregate_compl(
    registry: &mut TypeRegistry,
    config: &TranslatorConfig,
    mut agg: Aggregate,
    options: &[OptionEntry],
) -> (TypeId, Aggregate, Vec<ErrorCode>) {
    let mut diagnostics = Vec::new();

    if let Some(existing) = registry.lookup_by_name(Kind::Aggregate, &agg.name) {
        diagnostics.push(ErrorCode::SymAlrDef);
        let kept = registry.aggregate(existing).cloned().unwrap_or(agg);
        return (existing, kept, diagnostics);
    }

    agg.fill = has_flag(options, OptionTag::Fill);
    let noalign = has_flag(options, OptionTag::NoAlign);
    let base_align = find_int(options, OptionTag::BaseAlign);
    if noalign && base_align.is_some() {
        diagnostics.push(ErrorCode::DupConAtt);
    }
    if noalign {
        agg.alignment = crate::model::AggregateAlignment::NoAlign;
    } else if let Some(p) = base_align {
        if let Ok(p) = crate::options::validate_base_align(p) {
            agg.alignment = crate::model::AggregateAlignment::Explicit(p);
        }
    }
    if let Some(name) = find_str(options, OptionTag::Based) {
        agg.based_ptr_name = Some(name);
    }
    if let Some(name) = find_str(options, OptionTag::Origin) {
        agg.origin_name = Some(name);
    }
    agg.storage = storage_class(options);

    // ORIGIN is only known once the whole member list exists (it rides
    // the AGGREGATE/SUBAGGREGATE option buffer, drained at completion),
    // so the shift to the named member's frame happens here in one pass
    // rather than per-member as each one is placed.
    match layout::resolve_origin(&agg) {
        Ok(Some(origin_member)) => {
            let origin_offset = origin_member.byte_offset;
            if origin_offset != 0 {
                for m in &mut agg.members {
                    m.byte_offset -= origin_offset;
                }
            }
        }
        Ok(None) => {}
        Err(e) => diagnostics.push(e),
    }
    for m in &agg.members {
        if !m.kind.is_comment() && m.byte_offset < 0 {
            diagnostics.push(ErrorCode::NegOrigin);
        }
    }

    layout::close_aggregate(&mut agg, registry, config);

    if let Ok((_, trailing_bit)) = layout::next_position(&agg, registry, config) {
        if trailing_bit != 0 {
            diagnostics.push(ErrorCode::BytSiz);
        }
    }

    let id = registry.register_aggregate(agg.clone());
    agg.id = id;
    (id, agg, diagnostics)
}

/// `ENTRY`.
pub fn entry_compl(
    name: String,
    common: CommonAttrs,
    return_type: Option<TypeId>,
    parameters: Vec<crate::model::Parameter>,
    options: &[OptionEntry],
) -> Entry {
    Entry {
        name,
        common,
        alias: find_str(options, OptionTag::Alias),
        linkage: find_str(options, OptionTag::Linkage),
        return_type,
        variable: has_flag(options, OptionTag::Variable),
        parameters,
    }
}

/// Default passing discipline when no explicit marker option is present
/// (`spec.md` §4.4 table: `Value`/`Reference`/`In`/`Out`/`Optional`/`List`).
pub fn passing_discipline(options: &[OptionEntry]) -> PassingDiscipline {
    if has_flag(options, OptionTag::Reference) {
        PassingDiscipline::ByReference
    } else if has_flag(options, OptionTag::Value) {
        PassingDiscipline::ByValue
    } else {
        PassingDiscipline::ByDescriptor
    }
}
