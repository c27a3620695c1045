//! # Orrery Serde
//! Bit-level serialization substrate shared by every wire image and state
//! image in the orrery simulation engine. Values are appended to and
//! consumed from a bitstream in a fixed field order; two values are
//! packet-equal iff their written byte images are equal.

mod bit_reader;
mod bit_writer;
mod error;
mod impls;
mod integer;
mod serde;

pub use bit_reader::BitReader;
pub use bit_writer::{BitWrite, BitWriter};
pub use error::SerdeErr;
pub use integer::{SignedVariableInteger, UnsignedVariableInteger};
pub use serde::Serde;
