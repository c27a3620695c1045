use std::{any::TypeId, collections::HashMap};

use orrery_serde::{BitReader, BitWrite, Serde};

use crate::world::component::{
    component::{Component, ComponentBuilder},
    error::ComponentError,
};

type NetId = u16;

/// The key used to reference a component type at runtime.
#[derive(Eq, Hash, Copy, Clone, PartialEq, Debug)]
pub struct ComponentKind(TypeId);

impl ComponentKind {
    pub fn of<C: 'static>() -> Self {
        Self(TypeId::of::<C>())
    }
}

/// The process-wide component registry: maps each registered type to a
/// small stable wire discriminator and a factory, so components can be
/// depacketized polymorphically when the static type is only known as
/// `dyn Component`.
///
/// Registration order defines the discriminators, so the registration
/// list is the wire schema and must be identical across all session
/// participants.
pub struct ComponentKinds {
    kind_map: HashMap<ComponentKind, NetId>,
    net_id_map: HashMap<NetId, (ComponentKind, Box<dyn ComponentBuilder>)>,
    current_net_id: NetId,
}

impl ComponentKinds {
    pub fn new() -> Self {
        Self {
            kind_map: HashMap::new(),
            net_id_map: HashMap::new(),
            current_net_id: 0,
        }
    }

    /// Register a component type.
    ///
    /// # Panics
    /// Panics if the type is already registered — a startup schema bug.
    /// Use `try_add_component` for the non-panicking form.
    pub fn add_component<C: Component + 'static>(&mut self) {
        self.try_add_component::<C>()
            .unwrap_or_else(|error| panic!("{}", error));
    }

    /// Register a component type, erroring on re-registration of the
    /// same type.
    pub fn try_add_component<C: Component + 'static>(&mut self) -> Result<(), ComponentError> {
        let kind = ComponentKind::of::<C>();
        let builder = C::create_builder();

        if self.kind_map.contains_key(&kind) {
            return Err(ComponentError::DuplicateRegistration {
                component_name: builder.name(),
            });
        }

        let net_id = self.current_net_id;
        self.kind_map.insert(kind, net_id);
        self.net_id_map.insert(net_id, (kind, builder));
        self.current_net_id = self.current_net_id.wrapping_add(1);
        Ok(())
    }

    pub fn is_registered(&self, kind: &ComponentKind) -> bool {
        self.kind_map.contains_key(kind)
    }

    /// Display name for a registered kind, if known.
    pub fn kind_to_name(&self, kind: &ComponentKind) -> Option<String> {
        let net_id = self.kind_map.get(kind)?;
        self.net_id_map
            .get(net_id)
            .map(|(_, builder)| builder.name())
    }

    /// Append the component's type discriminator and fields to the
    /// stream.
    ///
    /// # Panics
    /// Panics if the component's type was never registered — a startup
    /// schema bug. Use `try_write` for the non-panicking form.
    pub fn write(&self, writer: &mut dyn BitWrite, component: &dyn Component) {
        self.try_write(writer, component)
            .unwrap_or_else(|error| panic!("{}", error));
    }

    /// Append the component's type discriminator and fields to the
    /// stream, erroring if the type was never registered.
    pub fn try_write(
        &self,
        writer: &mut dyn BitWrite,
        component: &dyn Component,
    ) -> Result<(), ComponentError> {
        let net_id =
            self.kind_map
                .get(&component.kind())
                .ok_or_else(|| ComponentError::KindNotRegistered {
                    component_name: component.name(),
                })?;
        net_id.ser(writer);
        component.write(writer);
        Ok(())
    }

    /// Number of bits `write` will produce for this component.
    pub fn bit_length(&self, component: &dyn Component) -> u32 {
        0u16.bit_length() + component.bit_length()
    }

    /// Consume one type discriminator plus component fields from the
    /// stream, resolving the concrete type through the registry.
    ///
    /// An unknown discriminator is a decoding error — corruption or a
    /// schema mismatch between participants — and never yields a
    /// defaulted value.
    pub fn read(&self, reader: &mut BitReader) -> Result<Box<dyn Component>, ComponentError> {
        let net_id = NetId::de(reader)?;
        let (_, builder) = self
            .net_id_map
            .get(&net_id)
            .ok_or(ComponentError::NetIdNotFound { net_id })?;
        Ok(builder.read(reader)?)
    }
}

impl Default for ComponentKinds {
    fn default() -> Self {
        Self::new()
    }
}
