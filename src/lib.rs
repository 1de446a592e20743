//! Map fixed-column-width text records to and from Rust structs.
//!
//! Each field of a record type declares the columns it occupies, and lines of
//! text are sliced, trimmed and converted by those declarations alone, with
//! no delimiters. This suits flat files exchanged with mainframe and EDI
//! systems.
//!
//! Most users should derive [`Record`](macro@Record) and call [`decode`] and
//! [`encode`]:
//!
//! ```
//! #[derive(Debug, Default, Record)]
//! struct Person {
//!     #[fixed(1, 5)]
//!     id: u32,
//!     #[fixed(6, 15)]
//!     first_name: String,
//!     #[fixed(16, 25)]
//!     last_name: String,
//!     #[fixed(26, 30)]
//!     grade: f64,
//! }
//!
//! let mut people: Vec<Person> = Vec::new();
//! fixedwidth::decode(b"1    Ian       Lopshire  99.50\n", &mut people)?;
//!
//! let line = fixedwidth::encode(&people)?;
//! assert_eq!(line, b"    1Ian       Lopshire   99.5\n");
//! ```
//!
//! Field types convert through [`FieldCodec`]. Text, integers, floats and
//! `Option`s of these are built in; other types implement [`TextCodec`].
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable the derive macro (default).

pub mod codec;
pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod range;

pub use codec::{Codec, CodecError, FieldCodec, TextCodec};
pub use decode::{Destination, Target, decode};
pub use descriptor::{Descriptor, DescriptorBuilder, DescriptorCache, FieldDescriptor, Record};
pub use encode::{Source, encode};
pub use error::{Error, InvalidTag};
pub use range::{Range, TagError};
