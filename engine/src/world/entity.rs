use orrery_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// An entity handle: an identity owning an ordered set of components.
///
/// Handles are allocated monotonically by the world, so iterating
/// entities in handle order equals spawn order on every machine.
/// Components never hold an owning reference back to their entity; the
/// handle is passed into each update call instead.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Entity(u64);

impl Entity {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl Serde for Entity {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}
