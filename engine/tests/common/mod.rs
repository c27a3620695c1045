//! Shared fixtures: a minimal protocol with three component kinds, the
//! per-phase contexts their systems run under, and the closed command
//! set the tests drive the simulation with.

#![allow(dead_code)]

use std::{
    any::Any,
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use orrery_engine::{
    glam::Vec2, sphere_aabb_sweep, BitReader, BitWrite, Component, ComponentBuilder,
    ComponentError, ComponentKind, CommandHeader, CommandPayload, Entity, Parameterization,
    Protocol, Serde, SerdeErr, World,
};

/// Positions gathered by the movement pass for the contact pass to read:
/// entity id -> (previous center, current center).
pub type PositionLedger = Arc<Mutex<BTreeMap<u64, (Vec2, Vec2)>>>;

pub fn new_position_ledger() -> PositionLedger {
    Arc::new(Mutex::new(BTreeMap::new()))
}

// Movement phase context

pub struct MovementContext {
    pub dt: f32,
    pub positions: PositionLedger,
}

impl Parameterization for MovementContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn duplicate(&self) -> Box<dyn Parameterization> {
        Box::new(MovementContext {
            dt: self.dt,
            positions: Arc::new(Mutex::new(self.positions.lock().unwrap().clone())),
        })
    }
}

// Contact phase context

pub struct ContactContext {
    pub positions: PositionLedger,
}

impl Parameterization for ContactContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn duplicate(&self) -> Box<dyn Parameterization> {
        Box::new(ContactContext {
            positions: Arc::new(Mutex::new(self.positions.lock().unwrap().clone())),
        })
    }
}

// Locomotor: integrates velocity into position, consuming queued
// impulses first. Commands land in `pending_impulses`, the per-entity
// pending-input list.

#[derive(Debug, Clone, PartialEq)]
pub struct Locomotor {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub pending_impulses: Vec<(f32, f32)>,
}

impl Locomotor {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            pending_impulses: Vec::new(),
        }
    }
}

impl Component for Locomotor {
    fn kind(&self) -> ComponentKind {
        ComponentKind::of::<Locomotor>()
    }

    fn name(&self) -> String {
        "Locomotor".to_string()
    }

    fn update(&mut self, entity: Entity, parameterization: &mut dyn Parameterization) {
        let Some(context) = parameterization.downcast_mut::<MovementContext>() else {
            return;
        };
        for (ddx, ddy) in self.pending_impulses.drain(..) {
            self.dx += ddx;
            self.dy += ddy;
        }
        let previous = Vec2::new(self.x, self.y);
        self.x += self.dx * context.dt;
        self.y += self.dy * context.dt;
        context
            .positions
            .lock()
            .unwrap()
            .insert(entity.to_u64(), (previous, Vec2::new(self.x, self.y)));
    }

    fn duplicate(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn mirror(&mut self, other: &dyn Component) -> Result<(), ComponentError> {
        let Some(source) = other.downcast_ref::<Locomotor>() else {
            return Err(ComponentError::MirrorKindMismatch {
                target_name: self.name(),
                source_name: other.name(),
            });
        };
        self.clone_from(source);
        Ok(())
    }

    fn write(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.dx.ser(writer);
        self.dy.ser(writer);
        self.pending_impulses.ser(writer);
    }

    fn bit_length(&self) -> u32 {
        self.x.bit_length()
            + self.y.bit_length()
            + self.dx.bit_length()
            + self.dy.bit_length()
            + self.pending_impulses.bit_length()
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn create_builder() -> Box<dyn ComponentBuilder> {
        Box::new(LocomotorBuilder)
    }
}

struct LocomotorBuilder;

impl ComponentBuilder for LocomotorBuilder {
    fn name(&self) -> String {
        "Locomotor".to_string()
    }

    fn read(&self, reader: &mut BitReader) -> Result<Box<dyn Component>, SerdeErr> {
        Ok(Box::new(Locomotor {
            x: f32::de(reader)?,
            y: f32::de(reader)?,
            dx: f32::de(reader)?,
            dy: f32::de(reader)?,
            pending_impulses: Vec::<(f32, f32)>::de(reader)?,
        }))
    }
}

// ContactSensor: a static box that counts movers sweeping through it.

#[derive(Debug, Clone, PartialEq)]
pub struct ContactSensor {
    pub x: f32,
    pub y: f32,
    pub half_x: f32,
    pub half_y: f32,
    pub radius: f32,
    pub hits: u32,
}

impl ContactSensor {
    pub fn new(x: f32, y: f32, half_x: f32, half_y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            half_x,
            half_y,
            radius,
            hits: 0,
        }
    }
}

impl Component for ContactSensor {
    fn kind(&self) -> ComponentKind {
        ComponentKind::of::<ContactSensor>()
    }

    fn name(&self) -> String {
        "ContactSensor".to_string()
    }

    fn update(&mut self, entity: Entity, parameterization: &mut dyn Parameterization) {
        let Some(context) = parameterization.downcast_mut::<ContactContext>() else {
            return;
        };
        let center = Vec2::new(self.x, self.y);
        let half = Vec2::new(self.half_x, self.half_y);
        for (&id, &(previous, current)) in context.positions.lock().unwrap().iter() {
            if id == entity.to_u64() {
                continue;
            }
            if sphere_aabb_sweep(self.radius, half, previous, current, center, center) {
                self.hits += 1;
            }
        }
    }

    fn duplicate(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn mirror(&mut self, other: &dyn Component) -> Result<(), ComponentError> {
        let Some(source) = other.downcast_ref::<ContactSensor>() else {
            return Err(ComponentError::MirrorKindMismatch {
                target_name: self.name(),
                source_name: other.name(),
            });
        };
        self.clone_from(source);
        Ok(())
    }

    fn write(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.half_x.ser(writer);
        self.half_y.ser(writer);
        self.radius.ser(writer);
        self.hits.ser(writer);
    }

    fn bit_length(&self) -> u32 {
        self.x.bit_length()
            + self.y.bit_length()
            + self.half_x.bit_length()
            + self.half_y.bit_length()
            + self.radius.bit_length()
            + self.hits.bit_length()
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn create_builder() -> Box<dyn ComponentBuilder> {
        Box::new(ContactSensorBuilder)
    }
}

struct ContactSensorBuilder;

impl ComponentBuilder for ContactSensorBuilder {
    fn name(&self) -> String {
        "ContactSensor".to_string()
    }

    fn read(&self, reader: &mut BitReader) -> Result<Box<dyn Component>, SerdeErr> {
        Ok(Box::new(ContactSensor {
            x: f32::de(reader)?,
            y: f32::de(reader)?,
            half_x: f32::de(reader)?,
            half_y: f32::de(reader)?,
            radius: f32::de(reader)?,
            hits: u32::de(reader)?,
        }))
    }
}

// Designation: a plain label, exercising string payloads.

#[derive(Debug, Clone, PartialEq)]
pub struct Designation {
    pub label: String,
}

impl Designation {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl Component for Designation {
    fn kind(&self) -> ComponentKind {
        ComponentKind::of::<Designation>()
    }

    fn name(&self) -> String {
        "Designation".to_string()
    }

    fn update(&mut self, _entity: Entity, _parameterization: &mut dyn Parameterization) {}

    fn duplicate(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }

    fn mirror(&mut self, other: &dyn Component) -> Result<(), ComponentError> {
        let Some(source) = other.downcast_ref::<Designation>() else {
            return Err(ComponentError::MirrorKindMismatch {
                target_name: self.name(),
                source_name: other.name(),
            });
        };
        self.clone_from(source);
        Ok(())
    }

    fn write(&self, writer: &mut dyn BitWrite) {
        self.label.ser(writer);
    }

    fn bit_length(&self) -> u32 {
        self.label.bit_length()
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn create_builder() -> Box<dyn ComponentBuilder> {
        Box::new(DesignationBuilder)
    }
}

struct DesignationBuilder;

impl ComponentBuilder for DesignationBuilder {
    fn name(&self) -> String {
        "Designation".to_string()
    }

    fn read(&self, reader: &mut BitReader) -> Result<Box<dyn Component>, SerdeErr> {
        Ok(Box::new(Designation {
            label: String::de(reader)?,
        }))
    }
}

// The test session's closed command set.

#[derive(Debug, Clone, PartialEq)]
pub enum HelmCommand {
    /// Queue an impulse onto the target's pending-input list.
    Impulse { entity: u64, ddx: f32, ddy: f32 },
    /// Remove an entity outright. Reserved for trusted input.
    Despawn { entity: u64 },
}

impl Serde for HelmCommand {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            HelmCommand::Impulse { entity, ddx, ddy } => {
                0u8.ser(writer);
                entity.ser(writer);
                ddx.ser(writer);
                ddy.ser(writer);
            }
            HelmCommand::Despawn { entity } => {
                1u8.ser(writer);
                entity.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(HelmCommand::Impulse {
                entity: u64::de(reader)?,
                ddx: f32::de(reader)?,
                ddy: f32::de(reader)?,
            }),
            1 => Ok(HelmCommand::Despawn {
                entity: u64::de(reader)?,
            }),
            value => Err(SerdeErr::InvalidDiscriminant {
                value: u16::from(value),
                type_name: "HelmCommand",
            }),
        }
    }

    fn bit_length(&self) -> u32 {
        match self {
            HelmCommand::Impulse { entity, ddx, ddy } => {
                8 + entity.bit_length() + ddx.bit_length() + ddy.bit_length()
            }
            HelmCommand::Despawn { entity } => 8 + entity.bit_length(),
        }
    }
}

impl CommandPayload for HelmCommand {
    fn requires_authority(&self) -> bool {
        matches!(self, HelmCommand::Despawn { .. })
    }

    fn apply(&self, _header: &CommandHeader, _frame: u64, world: &mut World) {
        match self {
            HelmCommand::Impulse { entity, ddx, ddy } => {
                if let Some(locomotor) =
                    world.component_mut::<Locomotor>(&Entity::from_u64(*entity))
                {
                    locomotor.pending_impulses.push((*ddx, *ddy));
                }
            }
            HelmCommand::Despawn { entity } => {
                let _ = world.despawn_entity(&Entity::from_u64(*entity));
            }
        }
    }
}

/// The schema every test session registers: identical on all
/// participants.
pub fn build_protocol() -> Protocol {
    Protocol::builder()
        .add_component::<Locomotor>()
        .add_component::<ContactSensor>()
        .add_component::<Designation>()
        .build()
}
