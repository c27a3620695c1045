use std::any::Any;

use orrery_serde::{BitReader, BitWrite, SerdeErr};

use crate::{
    system::parameterization::Parameterization,
    world::{
        component::{component_kinds::ComponentKind, error::ComponentError},
        entity::Entity,
    },
};

/// A typed unit of per-entity state and behavior.
///
/// Every concrete component supports in-place update against a per-phase
/// parameterization, a value-complete deep copy (into a fresh instance
/// via [`duplicate`](Component::duplicate), or into an existing instance
/// via [`mirror`](Component::mirror) for object-pool reuse), and a
/// symmetric packetize/depacketize pair: depacketizing a packetized
/// component reproduces a value observationally identical to the
/// original.
pub trait Component: Send + Sync {
    /// The registry key of this component's concrete type.
    fn kind(&self) -> ComponentKind;

    /// Display name, used in logs and error messages.
    fn name(&self) -> String;

    /// Advance this component by one phase pass. `entity` is the owning
    /// handle, passed in by the store rather than stored in the
    /// component.
    fn update(&mut self, entity: Entity, parameterization: &mut dyn Parameterization);

    /// Value-complete deep copy into a fresh instance. The copy must not
    /// alias any mutable storage with the source.
    fn duplicate(&self) -> Box<dyn Component>;

    /// Value-complete copy of `other` into this existing instance — the
    /// allocation-free path for pooled components in the simulation hot
    /// loop. Fails if `other` is of a different concrete kind.
    fn mirror(&mut self, other: &dyn Component) -> Result<(), ComponentError>;

    /// Append this component's fields to the stream. The type
    /// discriminator is written by the registry, not here.
    fn write(&self, writer: &mut dyn BitWrite);

    /// Number of bits `write` will produce.
    fn bit_length(&self) -> u32;

    fn to_any(&self) -> &dyn Any;

    fn to_any_mut(&mut self) -> &mut dyn Any;

    /// The builder the registry uses to depacketize instances of this
    /// type when only the discriminator is known.
    fn create_builder() -> Box<dyn ComponentBuilder>
    where
        Self: Sized;
}

/// Factory registered per component type; resolves a wire discriminator
/// back into a concrete instance.
pub trait ComponentBuilder: Send + Sync {
    /// Display name of the built component type.
    fn name(&self) -> String;

    /// Consume one component's fields from the stream.
    fn read(&self, reader: &mut BitReader) -> Result<Box<dyn Component>, SerdeErr>;
}

impl<'c> dyn Component + 'c {
    /// Typed view of this component, or None if it is of another
    /// concrete type.
    pub fn downcast_ref<C: Component + 'static>(&self) -> Option<&C> {
        self.to_any().downcast_ref::<C>()
    }

    /// Typed mutable view of this component, or None if it is of
    /// another concrete type.
    pub fn downcast_mut<C: Component + 'static>(&mut self) -> Option<&mut C> {
        self.to_any_mut().downcast_mut::<C>()
    }
}
