use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

pub type UnsignedVariableInteger<const BITS: u8> = VariableInteger<false, BITS>;
pub type SignedVariableInteger<const BITS: u8> = VariableInteger<true, BITS>;

/// A variable-length integer encoded in continuation groups of `BITS`
/// bits each: a proceed bit, then the next `BITS` low-order magnitude
/// bits, repeated until the remaining magnitude fits.
// The outer generic type wraps an inner type that is not generic, to
// reduce code bloat through monomorphization.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct VariableInteger<const SIGNED: bool, const BITS: u8> {
    inner: VariableIntegerInner,
}

impl<const SIGNED: bool, const BITS: u8> VariableInteger<SIGNED, BITS> {
    pub fn new<T: Into<i128>>(value: T) -> Self {
        Self {
            inner: VariableIntegerInner::new(SIGNED, BITS, value.into()),
        }
    }

    pub fn get(&self) -> i128 {
        self.inner.get()
    }

    pub fn set<T: Into<i128>>(&mut self, value: T) {
        self.inner.set(value.into());
    }

    /// Convert to a narrower integer type.
    ///
    /// # Panics
    /// Panics if the held value is out of range for `T`; the caller
    /// controls both the encoding width and the target type, so a
    /// mismatch is a programming error rather than a wire condition.
    pub fn to<T: TryFrom<i128>>(&self) -> T {
        let Ok(value) = T::try_from(self.inner.get()) else {
            panic!("VariableInteger value is out of range to convert to this type");
        };
        value
    }
}

impl<const SIGNED: bool, const BITS: u8> Serde for VariableInteger<SIGNED, BITS> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = VariableIntegerInner::de(reader, SIGNED, BITS)?;
        Ok(Self { inner })
    }

    fn bit_length(&self) -> u32 {
        self.inner.bit_length()
    }
}

impl<const SIGNED: bool, const BITS: u8, T: Into<i128>> From<T> for VariableInteger<SIGNED, BITS> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct VariableIntegerInner {
    inner_value: i128,
    signed: bool,
    bits: u8,
}

impl VariableIntegerInner {
    fn new(signed: bool, bits: u8, value: i128) -> Self {
        if bits == 0 {
            panic!("can't create an integer with 0 bits...");
        }
        if bits > 127 {
            panic!("can't create an integer with more than 127 bits...");
        }
        if !signed && value < 0 {
            panic!("can't encode a negative number with an Unsigned Integer!");
        }

        Self {
            inner_value: value,
            signed,
            bits,
        }
    }

    fn new_unchecked(signed: bool, bits: u8, value: i128) -> Self {
        Self {
            inner_value: value,
            signed,
            bits,
        }
    }

    fn get(&self) -> i128 {
        self.inner_value
    }

    fn set(&mut self, value: i128) {
        self.inner_value = value;
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        let mut value: u128;
        let negative = self.inner_value < 0;

        if self.signed {
            writer.write_bit(negative);
            if negative {
                value = -self.inner_value as u128;
            } else {
                value = self.inner_value as u128;
            }
        } else {
            value = self.inner_value as u128;
        }

        loop {
            let proceed = value >= 2_u128.pow(self.bits as u32);
            writer.write_bit(proceed);
            for _ in 0..self.bits {
                writer.write_bit(value & 1 != 0);
                value >>= 1;
            }
            if !proceed {
                return;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, bits: u8) -> Result<Self, SerdeErr> {
        let mut negative = false;
        if signed {
            negative = reader.read_bit()?;
        }

        let mut total_bits: usize = 0;
        let mut output: u128 = 0;

        loop {
            let proceed = reader.read_bit()?;

            for _ in 0..bits {
                total_bits += 1;
                output <<= 1;
                if reader.read_bit()? {
                    output |= 1;
                }
            }

            if !proceed {
                output <<= 128 - total_bits;
                output = output.reverse_bits();
                let value: i128 = output as i128;
                if negative {
                    return Ok(Self::new_unchecked(signed, bits, -value));
                } else {
                    return Ok(Self::new_unchecked(signed, bits, value));
                }
            }
        }
    }

    fn bit_length(&self) -> u32 {
        let mut output: u32 = 0;

        if self.signed {
            output += 1; // sign bit
        }

        let mut value = self.inner_value.unsigned_abs();
        loop {
            let proceed = value >= 2_u128.pow(self.bits as u32);
            output += 1; // proceed bit
            output += self.bits as u32;
            value >>= self.bits;
            if !proceed {
                break;
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        bit_reader::BitReader,
        bit_writer::BitWriter,
        integer::{SignedVariableInteger, UnsignedVariableInteger},
        serde::Serde,
    };

    #[test]
    fn in_and_out() {
        let in_u16: u16 = 123;
        let middle = UnsignedVariableInteger::<4>::new(in_u16);
        let out_u16: u16 = middle.to();

        assert_eq!(in_u16, out_u16);
    }

    #[test]
    fn read_write_unsigned() {
        // Write
        let mut writer = BitWriter::new();

        let in_1 = UnsignedVariableInteger::<3>::new(23);
        let in_2 = UnsignedVariableInteger::<5>::new(153);
        let in_3 = UnsignedVariableInteger::<2>::new(3);

        in_1.ser(&mut writer);
        in_2.ser(&mut writer);
        in_3.ser(&mut writer);

        let buffer = writer.to_bytes();

        // Read
        let mut reader = BitReader::new(&buffer);

        let out_1 = Serde::de(&mut reader).unwrap();
        let out_2 = Serde::de(&mut reader).unwrap();
        let out_3 = Serde::de(&mut reader).unwrap();

        assert_eq!(in_1, out_1);
        assert_eq!(in_2, out_2);
        assert_eq!(in_3, out_3);
    }

    #[test]
    fn read_write_signed() {
        // Write
        let mut writer = BitWriter::new();

        let in_1 = SignedVariableInteger::<5>::new(-668);
        let in_2 = SignedVariableInteger::<6>::new(53735);
        let in_3 = SignedVariableInteger::<2>::new(-3);

        in_1.ser(&mut writer);
        in_2.ser(&mut writer);
        in_3.ser(&mut writer);

        let buffer = writer.to_bytes();

        // Read
        let mut reader = BitReader::new(&buffer);

        let out_1 = Serde::de(&mut reader).unwrap();
        let out_2 = Serde::de(&mut reader).unwrap();
        let out_3 = Serde::de(&mut reader).unwrap();

        assert_eq!(in_1, out_1);
        assert_eq!(in_2, out_2);
        assert_eq!(in_3, out_3);
    }

    #[test]
    fn zero_round_trips() {
        let mut writer = BitWriter::new();
        let input = UnsignedVariableInteger::<7>::new(0);
        input.ser(&mut writer);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        let output: UnsignedVariableInteger<7> = Serde::de(&mut reader).unwrap();

        assert_eq!(input, output);
    }

    #[test]
    fn bit_length_matches_written_bits() {
        for value in [0u64, 1, 127, 128, 5_000_000] {
            let integer = UnsignedVariableInteger::<7>::new(value);
            let mut writer = BitWriter::new();
            integer.ser(&mut writer);
            assert_eq!(integer.bit_length(), writer.bits_written());
        }
    }
}
