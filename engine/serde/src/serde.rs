use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr};

/// A value that can be written to and read back from a bitstream.
///
/// The contract is symmetric and ordered: `de` must consume exactly the
/// bits `ser` produced, in the same field order, and reproduce a value
/// equal to the original by the type's own equality.
pub trait Serde: Sized {
    /// Append this value to the stream.
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Consume the next value of this type from the stream.
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Number of bits `ser` will write for this value.
    fn bit_length(&self) -> u32;
}
