//! World: entity records plus one index per component kind

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::Entity;
use super::component::{Component, ComponentData, ComponentKind};

/// Per-entity component table, one slot per kind
#[derive(Debug, Clone)]
struct Slots([Option<Component>; ComponentKind::COUNT]);

impl Slots {
    fn empty() -> Self {
        Self(std::array::from_fn(|_| None))
    }

    fn kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        ComponentKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.0[kind.slot()].is_some())
    }
}

/// Entity-component store
///
/// Operations on unknown entities are silent no-ops: systems routinely hold
/// IDs that an earlier system removed in the same frame.
///
/// The per-kind indices are ordered sets, so adding or removing a component
/// costs O(log n) rather than O(1). In exchange every query comes back in
/// creation order without a sort.
#[derive(Debug, Clone)]
pub struct World {
    next_id: u32,
    entities: HashMap<Entity, Slots>,
    /// Entities holding each kind. A kind is absent until first registered and
    /// dropped again once its last holder goes away.
    index: BTreeMap<ComponentKind, BTreeSet<Entity>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entities: HashMap::new(),
            index: BTreeMap::new(),
        }
    }

    /// Allocate a fresh entity with no components
    pub fn spawn(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        self.entities.insert(entity, Slots::empty());
        entity
    }

    /// Remove an entity and every component it holds
    pub fn despawn(&mut self, entity: Entity) {
        let Some(slots) = self.entities.remove(&entity) else {
            return;
        };
        for kind in slots.kinds() {
            self.unindex(kind, entity);
        }
    }

    /// Attach a component, replacing any previous one of the same kind
    pub fn insert(&mut self, entity: Entity, component: impl Into<Component>) {
        let Some(slots) = self.entities.get_mut(&entity) else {
            return;
        };
        let component = component.into();
        let kind = component.kind();
        slots.0[kind.slot()] = Some(component);
        self.index.entry(kind).or_default().insert(entity);
    }

    /// Detach the component of `kind`, returning it if it was present
    pub fn remove_kind(&mut self, entity: Entity, kind: ComponentKind) -> Option<Component> {
        let removed = self.entities.get_mut(&entity)?.0[kind.slot()].take()?;
        self.unindex(kind, entity);
        Some(removed)
    }

    /// Typed variant of [`World::remove_kind`]
    pub fn remove<C: ComponentData>(&mut self, entity: Entity) -> Option<C> {
        self.remove_kind(entity, C::KIND).and_then(C::from_owned)
    }

    pub fn get_kind(&self, entity: Entity, kind: ComponentKind) -> Option<&Component> {
        self.entities.get(&entity)?.0[kind.slot()].as_ref()
    }

    pub fn get<C: ComponentData>(&self, entity: Entity) -> Option<&C> {
        self.get_kind(entity, C::KIND).and_then(C::from_component)
    }

    pub fn get_mut<C: ComponentData>(&mut self, entity: Entity) -> Option<&mut C> {
        self.entities.get_mut(&entity)?.0[C::KIND.slot()]
            .as_mut()
            .and_then(C::from_component_mut)
    }

    pub fn has(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.get_kind(entity, kind).is_some()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities holding every kind in `kinds`, ordered by ID
    ///
    /// Empty when `kinds` is empty or any kind has no holders. The result is a
    /// snapshot; mutating the world while iterating it is safe.
    pub fn query(&self, kinds: &[ComponentKind]) -> Vec<Entity> {
        let mut sets = Vec::with_capacity(kinds.len());
        for kind in kinds {
            match self.index.get(kind) {
                Some(set) => sets.push(set),
                None => return Vec::new(),
            }
        }
        sets.sort_by_key(|set| set.len());
        let Some((smallest, rest)) = sets.split_first() else {
            return Vec::new();
        };
        smallest
            .iter()
            .copied()
            .filter(|entity| rest.iter().all(|set| set.contains(entity)))
            .collect()
    }

    /// First entity (lowest ID) holding every kind in `kinds`
    pub fn first(&self, kinds: &[ComponentKind]) -> Option<Entity> {
        self.query(kinds).into_iter().next()
    }

    /// Number of entities holding `kind`
    pub fn count(&self, kind: ComponentKind) -> usize {
        self.index.get(&kind).map_or(0, BTreeSet::len)
    }

    fn unindex(&mut self, kind: ComponentKind, entity: Entity) {
        if let Some(set) = self.index.get_mut(&kind) {
            set.remove(&entity);
            if set.is_empty() {
                self.index.remove(&kind);
            }
        }
    }
}
