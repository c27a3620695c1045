//! # Orrery Engine
//! A deterministic, network-replayable entity-component simulation core:
//! an entity/component runtime driven by ordered update phases, a binary
//! packetization substrate used both for wire transfer and for
//! command/component equality, a frame-stamped command queue for
//! lockstep multiplayer input, and swept collision geometry.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use glam;
pub use orrery_serde::{
    BitReader, BitWrite, BitWriter, Serde, SerdeErr, SignedVariableInteger,
    UnsignedVariableInteger,
};

mod command;
mod geometry;
mod protocol;
mod simulation;
mod system;
mod types;
mod world;

pub use command::{
    command::{CommandHeader, CommandPayload, FrameCommand},
    error::CommandError,
    queue::{CommandQueue, LateCommandPolicy, QueueOutcome},
    staging::CommandStaging,
};
pub use geometry::sweep::sphere_aabb_sweep;
pub use protocol::{Protocol, ProtocolError};
pub use simulation::{
    MissingCommandPolicy, Simulation, SimulationConfig, TickOutcome, TickReport,
};
pub use system::{
    component_system::ComponentSystem, composite_system::CompositeSystem,
    parameterization::Parameterization,
};
pub use types::{Frame, PlayerNumber};
pub use world::{
    component::{
        component::{Component, ComponentBuilder},
        component_kinds::{ComponentKind, ComponentKinds},
        error::ComponentError,
    },
    entity::Entity,
    error::EntityError,
    world::World,
};
