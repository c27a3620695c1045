use std::collections::BTreeMap;

use orrery_serde::{BitReader, BitWrite, Serde, UnsignedVariableInteger};

use crate::{
    system::parameterization::Parameterization,
    world::{
        component::{
            component::Component,
            component_kinds::{ComponentKind, ComponentKinds},
            error::ComponentError,
        },
        entity::Entity,
        error::EntityError,
    },
};

struct ComponentSlot {
    enabled: bool,
    component: Box<dyn Component>,
}

/// The entity/component store.
///
/// Entities are kept in handle order (a `BTreeMap`, so iteration is
/// deterministic and equals spawn order); each entity owns an ordered
/// sequence of component slots. Slot order is irrelevant for update
/// semantics but stable across copy and serialize round trips, because
/// component indices are referenced by messages.
pub struct World {
    entities: BTreeMap<Entity, Vec<ComponentSlot>>,
    next_entity_id: u64,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_entity_id: 0,
        }
    }

    // Entities

    pub fn spawn_entity(&mut self) -> Entity {
        let entity = Entity::from_u64(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(entity, Vec::new());
        entity
    }

    /// Remove an entity, releasing every component it owns.
    pub fn despawn_entity(&mut self, entity: &Entity) -> Result<(), EntityError> {
        self.entities
            .remove(entity)
            .map(|_| ())
            .ok_or(EntityError::EntityDoesNotExist {
                entity: entity.to_u64(),
            })
    }

    pub fn has_entity(&self, entity: &Entity) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All live entities, in handle (spawn) order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.keys().copied()
    }

    // Components

    /// Attach a component to an entity. New components start enabled and
    /// are appended after the entity's existing components.
    pub fn insert_component(
        &mut self,
        entity: &Entity,
        component: Box<dyn Component>,
    ) -> Result<(), EntityError> {
        let slots = self
            .entities
            .get_mut(entity)
            .ok_or(EntityError::EntityDoesNotExist {
                entity: entity.to_u64(),
            })?;
        slots.push(ComponentSlot {
            enabled: true,
            component,
        });
        Ok(())
    }

    /// Detach and return the first component of the given kind, or None
    /// if the entity has none. Requesting an absent kind is not an
    /// error.
    pub fn remove_component(
        &mut self,
        entity: &Entity,
        kind: &ComponentKind,
    ) -> Option<Box<dyn Component>> {
        let slots = self.entities.get_mut(entity)?;
        let index = slots
            .iter()
            .position(|slot| slot.component.kind() == *kind)?;
        Some(slots.remove(index).component)
    }

    /// The first component of concrete type `C` on the entity, or None.
    pub fn component<C: Component + 'static>(&self, entity: &Entity) -> Option<&C> {
        let kind = ComponentKind::of::<C>();
        let slots = self.entities.get(entity)?;
        slots
            .iter()
            .find(|slot| slot.component.kind() == kind)
            .and_then(|slot| slot.component.downcast_ref::<C>())
    }

    /// Mutable form of [`component`](World::component).
    pub fn component_mut<C: Component + 'static>(&mut self, entity: &Entity) -> Option<&mut C> {
        let kind = ComponentKind::of::<C>();
        let slots = self.entities.get_mut(entity)?;
        slots
            .iter_mut()
            .find(|slot| slot.component.kind() == kind)
            .and_then(|slot| slot.component.downcast_mut::<C>())
    }

    pub fn has_component(&self, entity: &Entity, kind: &ComponentKind) -> bool {
        self.entities
            .get(entity)
            .map(|slots| slots.iter().any(|slot| slot.component.kind() == *kind))
            .unwrap_or(false)
    }

    /// Toggle the first component of the given kind. Disabled components
    /// keep their state but are skipped by update passes.
    pub fn set_component_enabled(
        &mut self,
        entity: &Entity,
        kind: &ComponentKind,
        enabled: bool,
    ) -> Result<(), EntityError> {
        let slots = self
            .entities
            .get_mut(entity)
            .ok_or(EntityError::EntityDoesNotExist {
                entity: entity.to_u64(),
            })?;
        let slot = slots
            .iter_mut()
            .find(|slot| slot.component.kind() == *kind)
            .ok_or(EntityError::ComponentNotPresent {
                entity: entity.to_u64(),
            })?;
        slot.enabled = enabled;
        Ok(())
    }

    pub fn is_component_enabled(&self, entity: &Entity, kind: &ComponentKind) -> Option<bool> {
        let slots = self.entities.get(entity)?;
        slots
            .iter()
            .find(|slot| slot.component.kind() == *kind)
            .map(|slot| slot.enabled)
    }

    // Update passes

    /// Drive every enabled component of every entity once.
    pub fn update(&mut self, parameterization: &mut dyn Parameterization) {
        for (entity, slots) in self.entities.iter_mut() {
            for slot in slots.iter_mut() {
                if slot.enabled {
                    slot.component.update(*entity, parameterization);
                }
            }
        }
    }

    /// Drive every enabled component of one kind once — the primitive a
    /// component system pass is built on. Iteration is entity handle
    /// order, then slot insertion order.
    pub fn update_kind(
        &mut self,
        kind: &ComponentKind,
        parameterization: &mut dyn Parameterization,
    ) {
        for (entity, slots) in self.entities.iter_mut() {
            for slot in slots.iter_mut() {
                if slot.enabled && slot.component.kind() == *kind {
                    slot.component.update(*entity, parameterization);
                }
            }
        }
    }

    // Copying

    /// Value-complete deep copy of the whole store. The copy shares no
    /// mutable storage with the original; two copies of the same source
    /// are update-for-update behaviorally identical.
    pub fn duplicate(&self) -> World {
        let mut entities = BTreeMap::new();
        for (entity, slots) in &self.entities {
            let copied = slots
                .iter()
                .map(|slot| ComponentSlot {
                    enabled: slot.enabled,
                    component: slot.component.duplicate(),
                })
                .collect();
            entities.insert(*entity, copied);
        }
        World {
            entities,
            next_entity_id: self.next_entity_id,
        }
    }

    // Packetization

    /// Append the complete store to the stream through the registry.
    /// Two worlds in the same state produce identical bytes.
    pub fn write(
        &self,
        kinds: &ComponentKinds,
        writer: &mut dyn BitWrite,
    ) -> Result<(), ComponentError> {
        self.next_entity_id.ser(writer);
        UnsignedVariableInteger::<7>::new(self.entities.len() as u64).ser(writer);
        for (entity, slots) in &self.entities {
            entity.ser(writer);
            UnsignedVariableInteger::<7>::new(slots.len() as u64).ser(writer);
            for slot in slots {
                slot.enabled.ser(writer);
                kinds.try_write(writer, slot.component.as_ref())?;
            }
        }
        Ok(())
    }

    /// Consume a complete store from the stream through the registry.
    pub fn read(kinds: &ComponentKinds, reader: &mut BitReader) -> Result<World, ComponentError> {
        let next_entity_id = u64::de(reader)?;
        let entity_count: usize = UnsignedVariableInteger::<7>::de(reader)?.to();

        let mut entities = BTreeMap::new();
        for _ in 0..entity_count {
            let entity = Entity::de(reader)?;
            let slot_count: usize = UnsignedVariableInteger::<7>::de(reader)?.to();
            let mut slots = Vec::with_capacity(slot_count);
            for _ in 0..slot_count {
                let enabled = bool::de(reader)?;
                let component = kinds.read(reader)?;
                slots.push(ComponentSlot { enabled, component });
            }
            entities.insert(entity, slots);
        }

        Ok(World {
            entities,
            next_entity_id,
        })
    }

    /// The store's packetized image, used for state comparison and
    /// snapshot hashing.
    pub fn state_bytes(&self, kinds: &ComponentKinds) -> Result<Vec<u8>, ComponentError> {
        let mut writer = orrery_serde::BitWriter::new();
        self.write(kinds, &mut writer)?;
        Ok(writer.to_bytes())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
