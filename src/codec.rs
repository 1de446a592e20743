//! Conversions between field values and column text.
//!
//! Every mapped field's type implements [`FieldCodec`]. Built-in
//! implementations cover `String` (text), the primitive integers and floats.
//! Any other type opts in by implementing [`TextCodec`], which is picked up
//! through a blanket implementation and owns its own error semantics.
//!
//! Decoding receives the field's slice with surrounding space padding already
//! trimmed. Encoding must produce a chunk exactly as wide as the field; values
//! that do not fit are rejected rather than truncated.

use core::{
    num::{ParseFloatError, ParseIntError},
    str::{self, Utf8Error},
};
use std::error::Error as StdError;

use thiserror::Error;

/// Conversion strategy applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Text taken verbatim, left-justified when encoded.
    Text,
    /// Base-10 signed or unsigned integer, right-justified when encoded.
    Integer,
    /// Decimal floating point, right-justified when encoded.
    Float,
    /// A user-defined [`TextCodec`], left-justified when encoded.
    Custom,
}

impl Codec {
    /// Whether encoded text is aligned to the field's last column.
    pub fn is_right_justified(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    /// Pad encoded text with spaces to exactly `width` bytes, on the side
    /// appropriate to this codec.
    pub fn pad(self, text: &[u8], width: usize) -> Result<Vec<u8>, CodecError> {
        if text.len() > width {
            Err(CodecError::Overflow {
                len: text.len(),
                width,
            })?
        }

        let offset = if self.is_right_justified() {
            width - text.len()
        } else {
            0
        };

        let mut chunk = vec![b' '; width];
        chunk[offset..offset + text.len()].copy_from_slice(text);
        Ok(chunk)
    }
}

/// An error converting a single field.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Text is not valid UTF-8.
    #[error("invalid UTF-8 text ({0})")]
    Utf8(#[from] Utf8Error),
    /// Text is not a base-10 integer in range of the field's type.
    #[error("invalid integer ({0})")]
    Integer(#[from] ParseIntError),
    /// Text is not a decimal number.
    #[error("invalid float ({0})")]
    Float(#[from] ParseFloatError),
    /// Encoded text is wider than the field.
    #[error("{len} bytes do not fit in {width} columns")]
    Overflow { len: usize, width: usize },
    /// An error raised by a [`TextCodec`], passed through unchanged.
    #[error(transparent)]
    Custom(Box<dyn StdError + Send + Sync>),
}

/// Convert a field value to and from its columns.
pub trait FieldCodec {
    /// The strategy this type is converted with.
    const CODEC: Codec;

    /// Replace the value with one decoded from trimmed column text.
    fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError>;

    /// Encode the value into a chunk of exactly `width` bytes.
    fn encode_field(&self, width: usize) -> Result<Vec<u8>, CodecError>;
}

/// A user-defined conversion between a value and text.
///
/// Implementing this trait makes a type usable as a mapped field. The engine
/// trims padding before decoding and left-justifies the encoded text.
///
/// ```
/// struct Upper(String);
///
/// impl TextCodec for Upper {
///     type Error = std::str::Utf8Error;
///
///     fn decode_text(&mut self, text: &[u8]) -> Result<(), Self::Error> {
///         self.0 = std::str::from_utf8(text)?.to_uppercase();
///         Ok(())
///     }
///
///     fn encode_text(&self) -> Result<Vec<u8>, Self::Error> {
///         Ok(self.0.to_lowercase().into_bytes())
///     }
/// }
/// ```
pub trait TextCodec {
    /// Error reported when text cannot be converted.
    type Error: StdError + Send + Sync + 'static;

    /// Replace the value with one decoded from trimmed text.
    fn decode_text(&mut self, text: &[u8]) -> Result<(), Self::Error>;

    /// Produce the value's text.
    fn encode_text(&self) -> Result<Vec<u8>, Self::Error>;
}

impl<T: TextCodec> FieldCodec for T {
    const CODEC: Codec = Codec::Custom;

    fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError> {
        self.decode_text(text)
            .map_err(|err| CodecError::Custom(Box::new(err)))
    }

    fn encode_field(&self, width: usize) -> Result<Vec<u8>, CodecError> {
        let text = self
            .encode_text()
            .map_err(|err| CodecError::Custom(Box::new(err)))?;

        Self::CODEC.pad(&text, width)
    }
}

impl FieldCodec for String {
    const CODEC: Codec = Codec::Text;

    fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError> {
        let text = str::from_utf8(text)?;
        self.clear();
        self.push_str(text);
        Ok(())
    }

    fn encode_field(&self, width: usize) -> Result<Vec<u8>, CodecError> {
        Self::CODEC.pad(self.as_bytes(), width)
    }
}

macro_rules! numeric_codec {
    ($codec:ident, $zero:literal, $($t:ty),*) => {$(
        impl FieldCodec for $t {
            const CODEC: Codec = Codec::$codec;

            fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError> {
                *self = if text.is_empty() {
                    $zero
                } else {
                    str::from_utf8(text)?.parse::<$t>()?
                };
                Ok(())
            }

            fn encode_field(&self, width: usize) -> Result<Vec<u8>, CodecError> {
                Self::CODEC.pad(self.to_string().as_bytes(), width)
            }
        }
    )*};
}

numeric_codec!(Integer, 0, i8, i16, i32, i64, i128, isize);
numeric_codec!(Integer, 0, u8, u16, u32, u64, u128, usize);
numeric_codec!(Float, 0.0, f32, f64);

/// Blank columns decode to `None`, and `None` encodes as blank columns.
impl<T: FieldCodec + Default> FieldCodec for Option<T> {
    const CODEC: Codec = T::CODEC;

    fn decode_field(&mut self, text: &[u8]) -> Result<(), CodecError> {
        if text.is_empty() {
            *self = None;
            return Ok(());
        }

        self.get_or_insert_with(T::default).decode_field(text)
    }

    fn encode_field(&self, width: usize) -> Result<Vec<u8>, CodecError> {
        match self {
            Some(value) => value.encode_field(width),
            None => Ok(vec![b' '; width]),
        }
    }
}
