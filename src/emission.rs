//! Language-agnostic event stream and emitter registration (`spec.md`
//! §4.10, §6.2, §6.4). Grounded on `opensdl_plugin.h`'s transfer-vector
//! ABI: the event vocabulary here is the Rust-native mirror of that TV's
//! callback slots, and [`EmitterHandle::enabled`] mirrors the per-
//! conditional-scope enable flag the TV's caller threads through
//! `context->languages`.

use crate::conditional::TargetId;
use crate::model::{Aggregate, Constant, Entry, Enumerate, Item};

/// Leading/trailing placement of a free-floating comment line
/// (`spec.md` §6.2 `comment(text, {line, start, middle, end})`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPosition {
    Line,
    Start,
    Middle,
    End,
}

/// Which kind of record an `aggregate` event's `member` payload carries
/// (`spec.md` §6.2: "member events are themselves `aggregate` calls with
/// item kind").
#[derive(Debug, Clone)]
pub enum AggregateMemberEvent<'a> {
    Item(&'a crate::model::ItemMember),
    Bitfield(&'a crate::model::BitfieldMember),
    Comment(&'a str),
    /// The aggregate/subaggregate's own opening or closing boundary
    /// (`member` is absent — `ending` distinguishes open from close).
    Boundary,
}

/// The full, stable event vocabulary an emitter is driven by
/// (`spec.md` §6.2). Payloads borrow from the owning translation; per
/// §4.8/§6.2, an emitter may not retain references across the call that
/// hands it an event.
#[derive(Debug, Clone)]
pub enum Event<'a> {
    Stars,
    CreatedBy { timestamp: i64 },
    FileInfo { timestamp: i64, path: &'a str },
    Comment { text: &'a str, position: CommentPosition },
    Module { name: &'a str, ident: Option<&'a str> },
    ModuleEnd { name: &'a str },
    Constant(&'a Constant),
    Item(&'a Item),
    Enumerate(&'a Enumerate),
    /// `depth` is 0 at top level, incrementing by 1 per subaggregate
    /// nesting level (`spec.md` §6.2 event ordering contract).
    Aggregate {
        member: AggregateMemberEvent<'a>,
        aggregate: &'a Aggregate,
        ending: bool,
        depth: u32,
    },
    Entry(&'a Entry),
    Literal { line: &'a str },
    Close,
}

/// Outcome of handing one event to one emitter. `Unimplemented` is not a
/// failure — it means the emitter has no callback for this event kind
/// (an unset TV slot) and the gateway proceeds to the next emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitResult {
    Ok,
    Unimplemented,
    Fail,
}

/// One language target's callback surface. Mirrors the TV: every method
/// defaults to "unimplemented" the way an unset TV slot does, so a
/// target only needs to override the events it actually emits.
pub trait Emitter {
    fn name(&self) -> &str;

    fn file_extension(&self) -> &str {
        ""
    }

    fn on_stars(&mut self) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_created_by(&mut self, _timestamp: i64) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_file_info(&mut self, _timestamp: i64, _path: &str) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_comment(&mut self, _text: &str, _position: CommentPosition) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_module(&mut self, _name: &str, _ident: Option<&str>) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_module_end(&mut self, _name: &str) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_constant(&mut self, _rec: &Constant) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_item(&mut self, _rec: &Item) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_enumerate(&mut self, _rec: &Enumerate) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_aggregate(
        &mut self,
        _member: &AggregateMemberEvent<'_>,
        _aggregate: &Aggregate,
        _ending: bool,
        _depth: u32,
    ) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_entry(&mut self, _rec: &Entry) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_literal(&mut self, _line: &str) -> EmitResult {
        EmitResult::Unimplemented
    }

    fn on_close(&mut self) -> EmitResult {
        EmitResult::Unimplemented
    }
}

fn dispatch_one(emitter: &mut dyn Emitter, event: &Event<'_>) -> EmitResult {
    match event {
        Event::Stars => emitter.on_stars(),
        Event::CreatedBy { timestamp } => emitter.on_created_by(*timestamp),
        Event::FileInfo { timestamp, path } => emitter.on_file_info(*timestamp, path),
        Event::Comment { text, position } => emitter.on_comment(text, *position),
        Event::Module { name, ident } => emitter.on_module(name, ident.as_deref()),
        Event::ModuleEnd { name } => emitter.on_module_end(name),
        Event::Constant(rec) => emitter.on_constant(rec),
        Event::Item(rec) => emitter.on_item(rec),
        Event::Enumerate(rec) => emitter.on_enumerate(rec),
        Event::Aggregate {
            member,
            aggregate,
            ending,
            depth,
        } => emitter.on_aggregate(member, aggregate, *ending, *depth),
        Event::Entry(rec) => emitter.on_entry(rec),
        Event::Literal { line } => emitter.on_literal(line),
        Event::Close => emitter.on_close(),
    }
}

/// One registered emitter plus its per-conditional-scope enable flag
/// (`spec.md` §4.10: "identifying name and a per-conditional-scope
/// enable flag") and the bit it occupies in an `IFLANGUAGE` target mask
/// (`spec.md` §4.5) — assigned by registration order, the same way
/// `ConditionalStack`'s own tests index targets positionally.
pub struct EmitterHandle {
    pub emitter: Box<dyn Emitter>,
    pub enabled: bool,
    pub target: TargetId,
}

/// Presents the fixed event vocabulary to every registered, enabled
/// emitter in registration order, short-circuiting the whole gateway on
/// the first hard failure (`spec.md` §4.10).
#[derive(Default)]
pub struct EmissionGateway {
    emitters: Vec<EmitterHandle>,
    closed: bool,
}

impl EmissionGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `emitter`, assigning it the next free target bit
    /// (registration order 0, 1, 2, ... up to 32 distinct targets, the
    /// same bit width `ConditionalStack` masks against). Returns the
    /// assigned [`TargetId`] so the caller can map a language name to it.
    pub fn register(&mut self, emitter: Box<dyn Emitter>) -> TargetId {
        let target = TargetId(self.emitters.len() as u32);
        self.emitters.push(EmitterHandle {
            emitter,
            enabled: true,
            target,
        });
        target
    }

    /// Mask/unmask an emitter by name (driven by `--lang=`, `spec.md`
    /// §6.3). Independent of the `IFLANGUAGE` target mask passed to
    /// [`Self::dispatch`]: both must allow an emitter through.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        for handle in &mut self.emitters {
            if handle.emitter.name() == name {
                handle.enabled = enabled;
            }
        }
    }

    /// The [`TargetId`] bit a registered emitter occupies, by name.
    pub fn target_of(&self, name: &str) -> Option<TargetId> {
        self.emitters.iter().find(|h| h.emitter.name() == name).map(|h| h.target)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Dispatch `event` to every enabled emitter whose target bit is set
    /// in `target_mask` (the current `IFLANGUAGE` scope's
    /// `ConditionalStack::enabled_mask()`, `spec.md` §4.5/§4.10), in
    /// registration order. Stops at the first `Fail` and records no
    /// further dispatch for *this* event — `spec.md` §4.10: "does not
    /// attempt subsequent emitters for that event." Does not itself tear
    /// down the gateway; callers decide whether a failed event aborts
    /// the translation.
    pub fn dispatch(&mut self, event: Event<'_>, target_mask: u32) -> EmitResult {
        if self.closed {
            return EmitResult::Fail;
        }
        for handle in &mut self.emitters {
            if !handle.enabled {
                continue;
            }
            let bit = 1u32.checked_shl(handle.target.0).unwrap_or(0);
            if bit & target_mask == 0 {
                continue;
            }
            match dispatch_one(handle.emitter.as_mut(), &event) {
                EmitResult::Fail => {
                    tracing::error!(emitter = handle.emitter.name(), "emitter failed event");
                    return EmitResult::Fail;
                }
                _ => continue,
            }
        }
        if matches!(event, Event::Close) {
            self.closed = true;
        }
        EmitResult::Ok
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}

/// The on-load transfer-vector negotiation a dynamic-library emitter
/// plugin performs (`spec.md` §6.2, §6.4). `onLoad` is called exactly
/// twice: once to obtain capabilities/extension, once to hand over the
/// resolved output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvTypeTag {
    /// Type assertion slot.
    T,
    /// Routine (function pointer) slot.
    R,
    /// Value slot.
    V,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TvVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl TvVersion {
    /// An emitter built against an older minor/patch is still compatible;
    /// a major mismatch is not (`spec.md` §6.2 "version-mismatch code").
    pub fn compatible_with(self, core: TvVersion) -> bool {
        self.major == core.major
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvLoadResult {
    Accepted,
    VersionMismatch,
}

/// Negotiate one plugin's transfer vector against the core's version.
pub fn negotiate_tv(plugin: TvVersion, core: TvVersion) -> TvLoadResult {
    if plugin.compatible_with(core) {
        TvLoadResult::Accepted
    } else {
        TvLoadResult::VersionMismatch
    }
}
