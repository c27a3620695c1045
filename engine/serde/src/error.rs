use thiserror::Error;

/// Errors surfaced while decoding a bitstream.
///
/// A decode failure is fatal to the single packet being read: the caller
/// must drop the offending buffer rather than apply partial state. No
/// failure path ever yields a defaulted value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran off the end of the buffer
    #[error("bit buffer exhausted while reading")]
    BufferExhausted,

    /// A tag read from the wire does not correspond to any known variant
    #[error("invalid discriminant {value} while reading {type_name}")]
    InvalidDiscriminant {
        value: u16,
        type_name: &'static str,
    },

    /// String bytes were not valid UTF-8
    #[error("string payload was not valid UTF-8")]
    InvalidUtf8,
}
