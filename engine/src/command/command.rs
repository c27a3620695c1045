use std::fmt::Debug;

use orrery_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use crate::{
    types::{Frame, PlayerNumber},
    world::world::World,
};

/// The game's closed set of command variants: a tagged payload carried
/// under the common command header.
///
/// Equality is structural per-variant comparison; the `Serde` image is
/// the variant tag followed by the variant's fields, and must be
/// injective so that two payloads are equal iff their packetized bytes
/// are equal.
pub trait CommandPayload: Serde + Clone + PartialEq + Debug + Send + Sync {
    /// Whether this payload may only be applied from a trusted source.
    /// Unverified commands carrying such a payload are rejected without
    /// touching world state.
    fn requires_authority(&self) -> bool {
        false
    }

    /// Fold this command's effect into simulation state — push input
    /// onto an entity's pending-input list, or mutate world state
    /// directly for trusted commands.
    fn apply(&self, header: &CommandHeader, frame: Frame, world: &mut World);
}

/// The common command header: issuing player plus the endpoint-local
/// trust flag.
///
/// The trust flag is NOT part of the wire image or of command equality:
/// a command depacketized from the wire starts unverified, and promotion
/// upgrades trust without changing the command's identity.
#[derive(Debug, Clone)]
pub struct CommandHeader {
    player_number: PlayerNumber,
    authoritative: bool,
}

impl CommandHeader {
    pub fn new(player_number: PlayerNumber, authoritative: bool) -> Self {
        Self {
            player_number,
            authoritative,
        }
    }

    pub fn player_number(&self) -> PlayerNumber {
        self.player_number
    }

    /// True if this command was validated by an authoritative source;
    /// false for untrusted peer input awaiting revalidation.
    pub fn is_authoritative(&self) -> bool {
        self.authoritative
    }
}

/// A command bound to the simulation frame at which it must apply — the
/// unit injected into the deterministic simulation. Every participant
/// applies the same set of frame commands, in the same frame-bucketed
/// order, to reach the same state.
#[derive(Debug, Clone)]
pub struct FrameCommand<P: CommandPayload> {
    header: CommandHeader,
    frame: Frame,
    payload: P,
}

impl<P: CommandPayload> FrameCommand<P> {
    /// Construct from local player input. Local commands start
    /// unverified; the authoritative peer echoes them back confirmed.
    pub fn new(player_number: PlayerNumber, frame: Frame, payload: P) -> Self {
        Self {
            header: CommandHeader::new(player_number, false),
            frame,
            payload,
        }
    }

    /// Construct a command already validated by a trusted source.
    pub fn new_authoritative(player_number: PlayerNumber, frame: Frame, payload: P) -> Self {
        Self {
            header: CommandHeader::new(player_number, true),
            frame,
            payload,
        }
    }

    pub fn header(&self) -> &CommandHeader {
        &self.header
    }

    pub fn player_number(&self) -> PlayerNumber {
        self.header.player_number
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn is_authoritative(&self) -> bool {
        self.header.authoritative
    }

    /// Deliberately upgrade the trust flag — e.g. on receipt from the
    /// authoritative peer of a command matching an already-applied
    /// speculative one. Changes trust only; identity, equality and the
    /// wire image are unaffected.
    pub fn promote(&mut self) {
        self.header.authoritative = true;
    }

    pub fn requires_authority(&self) -> bool {
        self.payload.requires_authority()
    }

    /// Fold this command into world state.
    pub fn apply(&self, world: &mut World) {
        self.payload.apply(&self.header, self.frame, world);
    }

    /// The packetized image of this command. Two commands are duplicates
    /// iff their images are identical.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }
}

// Wire image: player number, target frame, payload (tag + fields). The
// trust flag never leaves the endpoint, so a depacketized command starts
// unverified.
impl<P: CommandPayload> Serde for FrameCommand<P> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.header.player_number.ser(writer);
        self.frame.ser(writer);
        self.payload.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let player_number = PlayerNumber::de(reader)?;
        let frame = Frame::de(reader)?;
        let payload = P::de(reader)?;
        Ok(Self {
            header: CommandHeader::new(player_number, false),
            frame,
            payload,
        })
    }

    fn bit_length(&self) -> u32 {
        self.header.player_number.bit_length() + self.frame.bit_length() + self.payload.bit_length()
    }
}

// Structural equality over player, frame and payload; the trust flag is
// endpoint-local metadata and takes no part.
impl<P: CommandPayload> PartialEq for FrameCommand<P> {
    fn eq(&self, other: &Self) -> bool {
        self.header.player_number == other.header.player_number
            && self.frame == other.frame
            && self.payload == other.payload
    }
}
