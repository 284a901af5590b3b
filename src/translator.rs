//! The facade the parser drives through the §6.1 action vocabulary:
//! Builders, Lifecycle, Control. Owns every piece of per-translation
//! state (`spec.md` §9 re-architecture note: "wrap in an owned translator
//! object passed by reference through every builder") — Type Registry,
//! Option Buffer, Conditional Scope, State Machine, Local Variable
//! Table, Error Vector, Emission Gateway — and the in-progress aggregate
//! nesting stack, since that stack needs the Layout Engine on every
//! member add and is too stateful to live in the otherwise free-function
//! [`crate::dispatcher`].
//!
//! Grounded on the teacher's top-level `lib.rs`, which wires its
//! sub-parsers (`til/`, `nodeinfo/`, ...) together behind one struct
//! rather than free functions reaching into global state.

use crate::config::TranslatorConfig;
use crate::conditional::{ConditionalStack, TargetId};
use crate::dispatcher;
use crate::emission::{AggregateMemberEvent, EmissionGateway, Event};
use crate::error::{Diagnostic, ErrorCode, ErrorVector};
use crate::ids::TypeId;
use crate::layout;
use crate::locals::LocalTable;
use crate::model::{
    Aggregate, AggregateKind, BitfieldMember, CommonAttrs, ConstantValue, Dimension, Entry,
    EnumMember, Item, ItemMember, Member, MemberKind, Module, ParamMarkers, Parameter, Radix,
};
use crate::options::{OptionBuffer, OptionEntry, OptionTag, OptionValue};
use crate::registry::TypeRegistry;
use crate::state::{Action, StateMachine};

/// Fields accumulated by the `entry_param`/`entry(...)` builders between
/// `state_transition(Entry)` and `entry_compl`.
#[derive(Debug, Default)]
struct PendingEntry {
    name: String,
    common: CommonAttrs,
    return_type: Option<TypeId>,
    parameters: Vec<Parameter>,
}

/// Fields accumulated by `enum_member` builders between `state_transition`
/// into an ENUM and `enum_compl`. ENUM has no dedicated `ParseState`
/// (it's handled as a flat builder sequence gated only by Module), so
/// there's no push/pop to model beyond this pending buffer.
#[derive(Debug, Default)]
struct PendingEnum {
    name: String,
    common: CommonAttrs,
    members: Vec<EnumMember>,
}

#[derive(Debug)]
struct PendingConstant {
    names: Vec<String>,
    type_name_hint: Option<String>,
    radix: Radix,
    value: ConstantValue,
}

/// Owns every piece of state for one translation (`spec.md` §5: "exactly
/// one process-wide context for the duration of one input translation").
pub struct Translator {
    config: TranslatorConfig,
    registry: TypeRegistry,
    options: OptionBuffer,
    conditional: ConditionalStack,
    state: StateMachine,
    locals: LocalTable,
    errors: ErrorVector,
    gateway: EmissionGateway,
    module: Option<Module>,
    /// Open aggregates/subaggregates, outermost first. The innermost
    /// (`last_mut`) is where `aggregate_member` appends.
    aggregate_stack: Vec<Aggregate>,
    pending_precision: Option<(u32, i32)>,
    pending_enum: Option<PendingEnum>,
    pending_entry: Option<PendingEntry>,
    pending_constant: Option<PendingConstant>,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self {
            config,
            registry: TypeRegistry::new(),
            options: OptionBuffer::new(),
            conditional: ConditionalStack::new(),
            state: StateMachine::new(),
            locals: LocalTable::new(),
            errors: ErrorVector::new(),
            gateway: EmissionGateway::new(),
            module: None,
            aggregate_stack: Vec::new(),
            pending_precision: None,
            pending_enum: None,
            pending_entry: None,
            pending_constant: None,
        }
    }

    pub fn register_emitter(&mut self, emitter: Box<dyn crate::emission::Emitter>) {
        self.gateway.register(emitter);
    }

    pub fn errors(&self) -> &ErrorVector {
        &self.errors
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    fn push_error(&mut self, code: ErrorCode) {
        self.errors.push(Diagnostic::from_code(code, []));
    }

    fn gated(&self) -> bool {
        self.conditional.processing_enabled()
    }

    // ---- Lifecycle -------------------------------------------------

    pub fn module(&mut self, name: impl Into<String>, ident: Option<String>) -> anyhow::Result<()> {
        anyhow::ensure!(self.module.is_none(), "module already open");
        let name = name.into();
        self.state.transition(Action::Module).map_err(|e| {
            self.push_error(e);
            anyhow::anyhow!("invalid action in current state")
        })?;
        if self.gated() {
            self.gateway.dispatch(
                Event::Module {
                    name: &name,
                    ident: ident.as_deref(),
                },
                self.conditional.enabled_mask(),
            );
        }
        self.module = Some(Module { name, ident });
        Ok(())
    }

    pub fn module_end(&mut self) -> anyhow::Result<()> {
        let module = self.module.take().ok_or_else(|| anyhow::anyhow!("no open module"))?;
        if !self.aggregate_stack.is_empty() {
            self.push_error(ErrorCode::InvActSta);
        }
        self.state.transition(Action::End).ok();
        let mask = self.conditional.enabled_mask();
        if self.gated() {
            self.gateway.dispatch(Event::ModuleEnd { name: &module.name }, mask);
        }
        self.gateway.dispatch(Event::Close, mask);
        Ok(())
    }

    pub fn state_transition(&mut self, action: Action) -> Result<(), ErrorCode> {
        let result = self.state.transition(action);
        if let Err(code) = result {
            self.push_error(code);
        }
        result
    }

    // ---- Builders: locals, options, dimension, precision -----------

    pub fn set_local(&mut self, name: &str, value: i64) {
        if self.gated() {
            self.locals.set(name, value);
        }
    }

    pub fn get_local(&mut self, name: &str) -> Result<i64, ErrorCode> {
        let result = self.locals.get(name);
        if let Err(code) = result {
            self.push_error(code);
        }
        result
    }

    pub fn add_option(&mut self, tag: OptionTag, value: OptionValue) {
        self.options.push(tag, value);
    }

    pub fn precision(&mut self, p: u32, s: i32) {
        self.pending_precision = Some((p, s));
    }

    /// `dimension(lo, hi) -> slot` (`spec.md` §6.1). `ZeroLen` is raised
    /// immediately; the slot is still allocated with the invalid bounds
    /// so later `bind_dimension` calls don't panic on a missing slot.
    pub fn dimension(&mut self, lo: i64, hi: i64) -> Option<usize> {
        let dim = Dimension { low: lo, high: hi };
        if crate::options::validate_dimension(dim).is_err() {
            self.push_error(ErrorCode::ZeroLen);
        }
        self.options.alloc_dimension(dim)
    }

    fn take_dimension(&mut self, slot: Option<usize>) -> Option<Dimension> {
        slot.and_then(|s| self.options.bind_dimension(s))
    }

    // ---- Builders: DECLARE ------------------------------------------

    pub fn declare(&mut self, name: impl Into<String>, common: CommonAttrs, target: TypeId) -> TypeId {
        let options = self.options.drain();
        let (id, dup) = dispatcher::declare_compl(&mut self.registry, &self.config, name.into(), common, target, &options);
        if let Some(code) = dup {
            self.push_error(code);
        }
        id
    }

    // ---- Builders: ITEM ----------------------------------------------

    pub fn item(
        &mut self,
        name: impl Into<String>,
        common: CommonAttrs,
        type_id: TypeId,
        dimension_slot: Option<usize>,
    ) -> TypeId {
        let dimension = self.take_dimension(dimension_slot);
        let decimal_precision = self.pending_precision.take();
        let options = self.options.drain();
        let (id, dup) = dispatcher::item_compl(
            &mut self.registry,
            &self.config,
            name.into(),
            common,
            type_id,
            dimension,
            decimal_precision,
            &options,
        );
        if let Some(code) = dup {
            self.push_error(code);
        }
        if self.gated() {
            if let Some(rec) = self.registry.item(id) {
                self.gateway.dispatch(Event::Item(rec), self.conditional.enabled_mask());
            }
        }
        id
    }

    // ---- Builders: AGGREGATE / SUBAGGREGATE / members ----------------

    /// Opens a top-level `AGGREGATE` or a nested `SUBAGGREGATE`, pushing
    /// it onto the nesting stack. Not itself a named §6.1 action — the
    /// grammar reaches it through `state_transition(Aggregate|Subagg)`
    /// plus whatever header fields the parser collected; exposing it
    /// separately keeps the stack-push next to the field collection.
    pub fn begin_aggregate(&mut self, name: impl Into<String>, kind: AggregateKind, common: CommonAttrs) {
        let mut agg = Aggregate::new(name, kind);
        agg.common = common;
        self.aggregate_stack.push(agg);
    }

    /// `aggregate_member(name, type, subtype)` for a plain item member.
    pub fn aggregate_member_item(
        &mut self,
        name: impl Into<String>,
        common: CommonAttrs,
        type_id: TypeId,
        dimension_slot: Option<usize>,
    ) -> anyhow::Result<()> {
        if !self.gated() {
            return Ok(());
        }
        let dimension = self.take_dimension(dimension_slot);
        let decimal_precision = self.pending_precision.take();
        let base_alignment = find_int(self.options.iter(), OptionTag::BaseAlign).map(|p| p as u32);
        self.options.drain();

        let agg = self
            .aggregate_stack
            .last_mut()
            .ok_or_else(|| anyhow::anyhow!("aggregate_member with no open aggregate"))?;
        let (byte_raw, bit) = layout::next_position(agg, &self.registry, &self.config)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        let natural_size = crate::oracle::sizeof(&self.registry, &self.config, type_id).max(1);
        let byte = if bit == 0 {
            let align = layout::resolve_member_alignment(agg, base_alignment, natural_size, &self.config);
            layout::align_up(byte_raw, align)
        } else {
            byte_raw
        };
        if self.config.check_member_alignment && bit == 0 && !layout::is_naturally_aligned(byte, natural_size as u32) {
            self.errors.push(Diagnostic::from_code(ErrorCode::Unaligned, []));
        }
        agg.members.push(Member {
            byte_offset: byte,
            kind: MemberKind::Item(ItemMember {
                name: name.into(),
                common,
                type_id,
                dimension,
                base_alignment,
                decimal_precision,
            }),
        });
        Ok(())
    }

    /// A `BITFIELD` aggregate member.
    pub fn aggregate_member_bitfield(
        &mut self,
        name: impl Into<String>,
        common: CommonAttrs,
        base_type: TypeId,
        bit_length: u32,
        is_unsigned: bool,
    ) -> anyhow::Result<()> {
        if !self.gated() {
            return Ok(());
        }
        if !matches!(
            base_type.base(),
            Some(
                crate::ids::BaseType::Bitfield
                    | crate::ids::BaseType::BitfieldByte
                    | crate::ids::BaseType::BitfieldWord
                    | crate::ids::BaseType::BitfieldLong
                    | crate::ids::BaseType::BitfieldQuad
            )
        ) {
            self.errors.push(Diagnostic::from_code(ErrorCode::InvBitfld, []));
        }
        let agg = self
            .aggregate_stack
            .last_mut()
            .ok_or_else(|| anyhow::anyhow!("aggregate_member with no open aggregate"))?;
        let (byte, bit) = layout::next_position(agg, &self.registry, &self.config)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        agg.members.push(Member {
            byte_offset: byte,
            kind: MemberKind::Bitfield(BitfieldMember {
                name: name.into(),
                common,
                base_type,
                bit_offset: bit,
                bit_length,
                is_unsigned,
            }),
        });
        Ok(())
    }

    /// A free-floating comment inside an aggregate body.
    pub fn aggregate_member_comment(&mut self, text: impl Into<String>) -> anyhow::Result<()> {
        if !self.gated() {
            return Ok(());
        }
        let agg = self
            .aggregate_stack
            .last_mut()
            .ok_or_else(|| anyhow::anyhow!("aggregate_member with no open aggregate"))?;
        let offset = agg.last_real_member().map(|m| m.byte_offset).unwrap_or(0);
        agg.members.push(Member {
            byte_offset: offset,
            kind: MemberKind::Comment(text.into()),
        });
        Ok(())
    }

    /// Closes the innermost open `SUBAGGREGATE`, attaching it as a
    /// member of its parent. Leaves the top-level `AGGREGATE` itself to
    /// `aggregate_compl`.
    pub fn end_subaggregate(&mut self) -> anyhow::Result<()> {
        anyhow::ensure!(self.aggregate_stack.len() >= 2, "end_subaggregate with no open subaggregate");
        let mut sub = self.aggregate_stack.pop().unwrap();
        layout::close_aggregate(&mut sub, &self.registry, &self.config);
        let parent = self.aggregate_stack.last_mut().unwrap();
        let offset = {
            let (byte, _) = layout::next_position(parent, &self.registry, &self.config)
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            byte
        };
        parent.members.push(Member {
            byte_offset: offset,
            kind: MemberKind::Subaggregate(Box::new(sub)),
        });
        Ok(())
    }

    /// `aggregate_compl(loc)`: closes the top-level aggregate, runs the
    /// Layout Engine, registers it, and emits its opening/member/closing
    /// event sequence (`spec.md` §6.2 event ordering contract).
    pub fn aggregate_compl(&mut self) -> anyhow::Result<TypeId> {
        anyhow::ensure!(self.aggregate_stack.len() == 1, "aggregate_compl with mismatched nesting");
        let agg = self.aggregate_stack.pop().unwrap();
        let options = self.options.drain();
        let (id, agg, diagnostics) = dispatcher::aggregate_compl(&mut self.registry, &self.config, agg, &options);
        for code in diagnostics {
            self.push_error(code);
        }
        if self.gated() {
            self.emit_aggregate_tree(&agg, 0);
        }
        Ok(id)
    }

    fn emit_aggregate_tree(&mut self, agg: &Aggregate, depth: u32) {
        let mask = self.conditional.enabled_mask();
        self.gateway.dispatch(
            Event::Aggregate {
                member: AggregateMemberEvent::Boundary,
                aggregate: agg,
                ending: false,
                depth,
            },
            mask,
        );
        for m in &agg.members {
            match &m.kind {
                MemberKind::Item(item) => {
                    self.gateway.dispatch(
                        Event::Aggregate {
                            member: AggregateMemberEvent::Item(item),
                            aggregate: agg,
                            ending: false,
                            depth,
                        },
                        mask,
                    );
                }
                MemberKind::Bitfield(bf) => {
                    self.gateway.dispatch(
                        Event::Aggregate {
                            member: AggregateMemberEvent::Bitfield(bf),
                            aggregate: agg,
                            ending: false,
                            depth,
                        },
                        mask,
                    );
                }
                MemberKind::Comment(text) => {
                    self.gateway.dispatch(
                        Event::Aggregate {
                            member: AggregateMemberEvent::Comment(text),
                            aggregate: agg,
                            ending: false,
                            depth,
                        },
                        mask,
                    );
                }
                MemberKind::Subaggregate(sub) => self.emit_aggregate_tree(sub, depth + 1),
            }
        }
        self.gateway.dispatch(
            Event::Aggregate {
                member: AggregateMemberEvent::Boundary,
                aggregate: agg,
                ending: true,
                depth,
            },
            mask,
        );
    }

    // ---- Builders: CONSTANT -------------------------------------------

    pub fn constant_set(&mut self, names: Vec<String>, type_name_hint: Option<String>, radix: Radix, value: ConstantValue) {
        self.pending_constant = Some(PendingConstant {
            names,
            type_name_hint,
            radix,
            value,
        });
    }

    /// `*_compl(loc)` for `CONSTANT`: expands series and emits one event
    /// per resulting record.
    pub fn constant_compl(&mut self) -> Vec<crate::model::Constant> {
        let Some(pending) = self.pending_constant.take() else {
            return Vec::new();
        };
        let options = self.options.drain();
        let constants = dispatcher::constant_compl(
            &pending.names,
            CommonAttrs::default(),
            pending.type_name_hint,
            pending.radix,
            pending.value,
            &options,
        );
        if self.gated() {
            let mask = self.conditional.enabled_mask();
            for c in &constants {
                self.gateway.dispatch(Event::Constant(c), mask);
            }
        }
        constants
    }

    // ---- Builders: ENUM -------------------------------------------------

    pub fn begin_enum(&mut self, name: impl Into<String>, common: CommonAttrs) {
        self.pending_enum = Some(PendingEnum {
            name: name.into(),
            common,
            members: Vec::new(),
        });
    }

    pub fn enum_member(&mut self, name: impl Into<String>, value: i64, comment: Option<String>) {
        if let Some(pending) = &mut self.pending_enum {
            pending.members.push(EnumMember {
                name: name.into(),
                value,
                comment,
            });
        }
    }

    pub fn enum_compl(&mut self) -> anyhow::Result<TypeId> {
        let pending = self.pending_enum.take().ok_or_else(|| anyhow::anyhow!("enum_compl with no open enum"))?;
        let (id, dup) = dispatcher::enum_compl(&mut self.registry, pending.name, pending.common, pending.members);
        if let Some(code) = dup {
            self.push_error(code);
        }
        if self.gated() {
            if let Some(rec) = self.registry.enumerate(id) {
                self.gateway.dispatch(Event::Enumerate(rec), self.conditional.enabled_mask());
            }
        }
        Ok(id)
    }

    // ---- Builders: ENTRY -------------------------------------------------

    pub fn begin_entry(&mut self, name: impl Into<String>, common: CommonAttrs) {
        self.pending_entry = Some(PendingEntry {
            name: name.into(),
            common,
            return_type: None,
            parameters: Vec::new(),
        });
    }

    pub fn entry_returns(&mut self, return_type: TypeId) {
        if let Some(pending) = &mut self.pending_entry {
            pending.return_type = Some(return_type);
        }
    }

    pub fn entry_param(
        &mut self,
        name: impl Into<String>,
        type_id: TypeId,
        markers: ParamMarkers,
        dimension_slot: Option<usize>,
        default: Option<ConstantValue>,
    ) {
        let dimension = self.take_dimension(dimension_slot);
        let passing = dispatcher::passing_discipline(&self.options.drain());
        if let Some(pending) = &mut self.pending_entry {
            pending.parameters.push(Parameter {
                name: name.into(),
                type_id,
                passing,
                markers,
                default,
                dimension,
            });
        }
    }

    pub fn entry_compl(&mut self) -> anyhow::Result<Entry> {
        let pending = self.pending_entry.take().ok_or_else(|| anyhow::anyhow!("entry_compl with no open entry"))?;
        let options = self.options.drain();
        let entry = dispatcher::entry_compl(pending.name, pending.common, pending.return_type, pending.parameters, &options);
        if self.gated() {
            self.gateway.dispatch(Event::Entry(&entry), self.conditional.enabled_mask());
        }
        Ok(entry)
    }

    // ---- Control: conditional scope, literal passthrough --------------

    pub fn if_language(&mut self, names: &[&str], resolve: impl Fn(&str) -> Option<TargetId>) {
        let targets: Vec<TargetId> = names.iter().filter_map(|n| resolve(n)).collect();
        if let Err(e) = self.conditional.push_if_language(&targets) {
            self.push_error(e);
        }
    }

    pub fn if_symbol(&mut self, value: bool) {
        self.conditional.push_if_symbol(value);
    }

    pub fn else_branch(&mut self) -> anyhow::Result<()> {
        self.conditional.enter_else()
    }

    pub fn end_conditional(&mut self, end_targets: Option<&[TargetId]>) -> anyhow::Result<()> {
        if let Some(mismatch) = self.conditional.pop(end_targets)? {
            self.push_error(mismatch);
        }
        Ok(())
    }

    pub fn literal(&mut self, line: &str) {
        if self.gated() {
            self.gateway.dispatch(Event::Literal { line }, self.conditional.enabled_mask());
        }
    }

    pub fn enable_emitter(&mut self, name: &str, enabled: bool) {
        self.gateway.set_enabled(name, enabled);
    }

    pub fn gateway(&mut self) -> &mut EmissionGateway {
        &mut self.gateway
    }
}

fn find_int<'a>(options: impl Iterator<Item = &'a OptionEntry>, tag: OptionTag) -> Option<i64> {
    options.into_iter().find(|e| e.tag == tag).and_then(|e| match &e.value {
        OptionValue::Int(n) => Some(*n),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::BaseType;

    struct CountingEmitter {
        name: String,
        items: usize,
    }

    impl crate::emission::Emitter for CountingEmitter {
        fn name(&self) -> &str {
            &self.name
        }

        fn on_item(&mut self, _rec: &Item) -> crate::emission::EmitResult {
            self.items += 1;
            crate::emission::EmitResult::Ok
        }
    }

    #[test]
    fn s1_flat_struct_aligns_long_to_its_natural_boundary() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.module("M", None).unwrap();
        t.begin_aggregate("S", AggregateKind::Struct, CommonAttrs::default());
        t.aggregate_member_item("a", CommonAttrs::default(), BaseType::Byte.into(), None).unwrap();
        t.aggregate_member_item("b", CommonAttrs::default(), BaseType::Long.into(), None).unwrap();
        let id = t.aggregate_compl().unwrap();
        let agg = t.registry().aggregate(id).unwrap();
        assert_eq!(agg.members[0].byte_offset, 0);
        assert_eq!(agg.members[1].byte_offset, 4);
        assert_eq!(agg.size, 8);
    }

    #[test]
    fn s2_noalign_struct_packs_members_tight() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.module("M", None).unwrap();
        t.begin_aggregate("S", AggregateKind::Struct, CommonAttrs::default());
        t.aggregate_stack.last_mut().unwrap().alignment = crate::model::AggregateAlignment::NoAlign;
        t.aggregate_member_item("a", CommonAttrs::default(), BaseType::Byte.into(), None).unwrap();
        t.aggregate_member_item("b", CommonAttrs::default(), BaseType::Long.into(), None).unwrap();
        let id = t.aggregate_compl().unwrap();
        let agg = t.registry().aggregate(id).unwrap();
        assert_eq!(agg.members[0].byte_offset, 0);
        assert_eq!(agg.members[1].byte_offset, 1);
        assert_eq!(agg.size, 5);
    }

    #[test]
    fn s3_union_shares_starting_offset() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.module("M", None).unwrap();
        t.begin_aggregate("U", AggregateKind::Union, CommonAttrs::default());
        t.aggregate_member_item("w", CommonAttrs::default(), BaseType::Word.into(), None).unwrap();
        t.aggregate_member_item("l", CommonAttrs::default(), BaseType::Long.into(), None).unwrap();
        let id = t.aggregate_compl().unwrap();
        let agg = t.registry().aggregate(id).unwrap();
        assert_eq!(agg.members[0].byte_offset, 0);
        assert_eq!(agg.members[1].byte_offset, 0);
        assert_eq!(agg.size, 4);
    }

    #[test]
    fn s7_constant_series_steps_values() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.module("M", None).unwrap();
        t.add_option(OptionTag::Increment, OptionValue::Int(5));
        t.constant_set(
            vec!["x".into(), "y".into(), "z".into()],
            None,
            Radix::Decimal,
            ConstantValue::Int(10),
        );
        let constants = t.constant_compl();
        let values: Vec<i64> = constants
            .iter()
            .map(|c| match c.value {
                ConstantValue::Int(v) => v,
                _ => panic!("expected int"),
            })
            .collect();
        assert_eq!(values, vec![10, 15, 20]);
    }

    #[test]
    fn s8_iflanguage_gates_events_to_named_emitters_only() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.register_emitter(Box::new(CountingEmitter { name: "CC".into(), items: 0 }));
        t.module("M", None).unwrap();
        t.if_language(&["CC"], |n| if n == "CC" { Some(TargetId(0)) } else { None });
        t.item("foo", CommonAttrs::default(), BaseType::Long.into(), None);
        t.end_conditional(Some(&[TargetId(0)])).unwrap();
        t.module_end().unwrap();
        // gateway delivered exactly one item event to CC; nothing further
        // to assert against since no other emitter is registered, but the
        // conditional stack must have rebalanced to its pre-open state.
        assert_eq!(t.registry().item_count(), 1);
    }

    #[test]
    fn ifsymbol_false_suppresses_item_registration_effects_but_not_state() {
        let mut t = Translator::new(TranslatorConfig::default());
        t.module("M", None).unwrap();
        t.if_symbol(false);
        t.begin_aggregate("S", AggregateKind::Struct, CommonAttrs::default());
        // member add is suppressed while gated off
        t.aggregate_member_item("a", CommonAttrs::default(), BaseType::Byte.into(), None).unwrap();
        assert!(t.aggregate_stack.last().unwrap().members.is_empty());
    }
}
