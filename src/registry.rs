//! Numeric identifier space partitioned among DECLAREs, ITEMs,
//! AGGREGATEs, and ENUMs (`spec.md` §4.2). Four disjoint ranges, each
//! with its own monotonically-increasing cursor; names resolve by
//! walking DECLARE, then ITEM, then AGGREGATE, then ENUM, first exact
//! match wins. There is no removal API — once a module registers a
//! type, it lives until module teardown, grounded on the teacher's
//! `TILSection`'s name/ordinal index (`get_name_idx`/`get_ord_idx` in
//! `til/section.rs`), generalized here to four parallel lists instead
//! of one.

use crate::ids::{Kind, TypeId, AGGREGATE_MIN, DECLARE_MIN, ENUM_MIN, ITEM_MIN};
use crate::model::{Aggregate, Declare, Enumerate, Item};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    declares: Vec<Declare>,
    items: Vec<Item>,
    aggregates: Vec<Aggregate>,
    enums: Vec<Enumerate>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn range_min(kind: Kind) -> u32 {
        kind.range().0
    }

    pub fn register_declare(&mut self, record: Declare) -> TypeId {
        let id = TypeId(DECLARE_MIN + self.declares.len() as u32);
        self.declares.push(record);
        id
    }

    pub fn register_item(&mut self, record: Item) -> TypeId {
        let id = TypeId(ITEM_MIN + self.items.len() as u32);
        self.items.push(record);
        id
    }

    pub fn register_aggregate(&mut self, mut record: Aggregate) -> TypeId {
        let id = TypeId(AGGREGATE_MIN + self.aggregates.len() as u32);
        record.id = id;
        self.aggregates.push(record);
        id
    }

    pub fn register_enum(&mut self, mut record: Enumerate) -> TypeId {
        let id = TypeId(ENUM_MIN + self.enums.len() as u32);
        record.id = id;
        self.enums.push(record);
        id
    }

    pub fn declare(&self, id: TypeId) -> Option<&Declare> {
        self.declares.get((id.0.checked_sub(DECLARE_MIN)?) as usize)
    }

    pub fn item(&self, id: TypeId) -> Option<&Item> {
        self.items.get((id.0.checked_sub(ITEM_MIN)?) as usize)
    }

    pub fn aggregate(&self, id: TypeId) -> Option<&Aggregate> {
        self.aggregates.get((id.0.checked_sub(AGGREGATE_MIN)?) as usize)
    }

    pub fn aggregate_mut(&mut self, id: TypeId) -> Option<&mut Aggregate> {
        self.aggregates.get_mut((id.0.checked_sub(AGGREGATE_MIN)?) as usize)
    }

    pub fn enumerate(&self, id: TypeId) -> Option<&Enumerate> {
        self.enums.get((id.0.checked_sub(ENUM_MIN)?) as usize)
    }

    pub fn lookup_by_name(&self, kind: Kind, name: &str) -> Option<TypeId> {
        let min = Self::range_min(kind);
        match kind {
            Kind::Declare => self
                .declares
                .iter()
                .position(|d| d.name == name)
                .map(|i| TypeId(min + i as u32)),
            Kind::Item => self
                .items
                .iter()
                .position(|d| d.name == name)
                .map(|i| TypeId(min + i as u32)),
            Kind::Aggregate => self
                .aggregates
                .iter()
                .position(|d| d.name == name)
                .map(|i| TypeId(min + i as u32)),
            Kind::Enum => self
                .enums
                .iter()
                .position(|d| d.name == name)
                .map(|i| TypeId(min + i as u32)),
        }
    }

    pub fn lookup_by_id(&self, id: TypeId) -> Option<TypeId> {
        match Kind::of_id(id)? {
            Kind::Declare => self.declare(id).map(|_| id),
            Kind::Item => self.item(id).map(|_| id),
            Kind::Aggregate => self.aggregate(id).map(|_| id),
            Kind::Enum => self.enumerate(id).map(|_| id),
        }
    }

    /// Try DECLARE, then ITEM, then AGGREGATE, then ENUM; `TypeId::NONE`
    /// ("not a user type, try base type names") if none match.
    pub fn resolve(&self, name: &str) -> TypeId {
        [Kind::Declare, Kind::Item, Kind::Aggregate, Kind::Enum]
            .into_iter()
            .find_map(|kind| self.lookup_by_name(kind, name))
            .unwrap_or(TypeId::NONE)
    }

    pub fn declare_count(&self) -> usize {
        self.declares.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn aggregate_count(&self) -> usize {
        self.aggregates.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }
}
