//! Record descriptors: the precomputed field layout of a record type.
//!
//! A [`Descriptor`] lists, in declaration order, each mapped field's name,
//! column [`Range`] and [`Codec`], together with type-erased accessors used to
//! decode into and encode from that field. Descriptors are built once per type
//! from [`Record::describe`] and shared read-only afterwards.

use core::any::{Any, TypeId, type_name};
use std::{
    collections::HashMap,
    sync::{LazyLock, OnceLock, PoisonError, RwLock},
};

use tracing::debug;

use crate::{
    codec::{Codec, CodecError, FieldCodec},
    error::InvalidTag,
    range::Range,
};

/// Derive [`Record`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Add the `fixed` attribute to each mapped field, giving its first and last
/// column (counting from one, inclusive). The range may be written as a
/// string or as two integers. Fields without the attribute are ignored.
///
/// ```
/// #[derive(Debug, Default, Record)]
/// struct Person {
///     #[fixed(1, 5)]
///     id: u32,
///     #[fixed("6,15")]
///     first_name: String,
///     #[fixed("16, 25")]
///     last_name: String,
///     #[fixed(26, 30)]
///     grade: Option<f64>,
///     // Not mapped.
///     notes: Vec<String>,
/// }
/// ```
///
/// Column ranges are validated when the descriptor is first built, reporting
/// an [`InvalidTag`](crate::InvalidTag) error. For non-generic structs the
/// descriptor is cached in a static.
#[cfg(feature = "derive")]
pub use fixedwidth_derive::Record;

/// A record type mapped to fixed-width lines.
///
/// See the [`Record`](macro@Record) derive macro for an automatic
/// implementation of this trait.
pub trait Record: Sized + 'static {
    /// Register each mapped field, in declaration order.
    fn describe(fields: &mut DescriptorBuilder<Self>);

    /// Retrieve this type's descriptor, building it on first use.
    ///
    /// The default implementation caches descriptors in a process-wide
    /// registry keyed by type.
    fn descriptor() -> Result<&'static Descriptor<Self>, InvalidTag> {
        registered()
    }
}

type DecodeFn<R> = Box<dyn Fn(&mut R, &[u8]) -> Result<(), CodecError> + Send + Sync>;
type EncodeFn<R> = Box<dyn Fn(&R, usize) -> Result<Vec<u8>, CodecError> + Send + Sync>;

/// One mapped field of a record.
pub struct FieldDescriptor<R> {
    name: &'static str,
    range: Range,
    codec: Codec,
    decode: DecodeFn<R>,
    encode: EncodeFn<R>,
}

impl<R> FieldDescriptor<R> {
    /// The field's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The columns occupied by the field.
    pub fn range(&self) -> Range {
        self.range
    }

    /// The strategy used to convert the field.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Decode trimmed column text into this field of a record.
    pub(crate) fn decode(&self, record: &mut R, text: &[u8]) -> Result<(), CodecError> {
        (self.decode)(record, text)
    }

    /// Encode this field of a record into a chunk as wide as its range.
    pub(crate) fn encode(&self, record: &R) -> Result<Vec<u8>, CodecError> {
        (self.encode)(record, self.range.width())
    }
}

impl<R> core::fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("range", &self.range)
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

/// The ordered field layout of a record type.
///
/// Immutable once built, and safe to share between threads.
pub struct Descriptor<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> core::fmt::Debug for Descriptor<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

impl<R: Record> Descriptor<R> {
    /// Build a fresh descriptor for `R`, bypassing any cache.
    ///
    /// Fails on the first malformed column range; no partial descriptor is
    /// produced.
    pub fn build() -> Result<Self, InvalidTag> {
        let mut builder = DescriptorBuilder {
            fields: Vec::new(),
            error: None,
        };

        R::describe(&mut builder);

        if let Some(err) = builder.error {
            Err(err)?
        }

        debug!(
            record = type_name::<R>(),
            fields = builder.fields.len(),
            "Built record descriptor"
        );

        Ok(Self {
            fields: builder.fields,
        })
    }
}

impl<R> Descriptor<R> {
    /// Mapped fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor<R>] {
        &self.fields
    }

    /// Width of a full line: the last column of any field.
    pub fn width(&self) -> usize {
        self.fields
            .iter()
            .map(|f| f.range.end())
            .max()
            .unwrap_or(0)
    }
}

/// Collects field registrations while a descriptor is built.
///
/// Errors are recorded rather than returned, so registrations can be made
/// unconditionally; the first one is reported when the build completes.
pub struct DescriptorBuilder<R> {
    fields: Vec<FieldDescriptor<R>>,
    error: Option<InvalidTag>,
}

impl<R: 'static> DescriptorBuilder<R> {
    /// Map a field of type `T` to the columns declared by `tag`, written as
    /// `<start>,<end>`.
    ///
    /// The accessors must return the same field.
    pub fn field<T: FieldCodec + 'static>(
        &mut self,
        name: &'static str,
        tag: &'static str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> &mut Self {
        if self.error.is_some() {
            return self;
        }

        match Range::parse(tag) {
            Ok(range) => self.fields.push(FieldDescriptor {
                name,
                range,
                codec: T::CODEC,
                decode: Box::new(move |r: &mut R, text: &[u8]| get_mut(r).decode_field(text)),
                encode: Box::new(move |r: &R, width: usize| get(r).encode_field(width)),
            }),
            Err(reason) => {
                self.error = Some(InvalidTag {
                    field: name,
                    tag,
                    reason,
                })
            }
        }

        self
    }
}

/// A lazily built, per-type descriptor slot, suitable for a `static`.
///
/// The descriptor (or the error building it) is computed at most once; reads
/// after that do not lock.
pub struct DescriptorCache<R>(OnceLock<Result<Descriptor<R>, InvalidTag>>);

impl<R> DescriptorCache<R> {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }
}

impl<R: Record> DescriptorCache<R> {
    pub fn get(&'static self) -> Result<&'static Descriptor<R>, InvalidTag> {
        self.0.get_or_init(Descriptor::build).as_ref().map_err(Clone::clone)
    }
}

impl<R> Default for DescriptorCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

// Values are leaked `DescriptorCache<R>`s, keyed by `TypeId::of::<R>()`.
type Registry = HashMap<TypeId, &'static (dyn Any + Send + Sync)>;

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(Default::default);

/// Look up the descriptor for `R` in the process-wide registry, building it on
/// first use.
///
/// The registry only hands out a leaked per-type [`DescriptorCache`]; the
/// build itself runs after the registry lock is released, so `describe` may
/// look up other descriptors.
fn registered<R: Record>() -> Result<&'static Descriptor<R>, InvalidTag> {
    let id = TypeId::of::<R>();

    let cached = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&id)
        .copied();

    let slot = match cached {
        Some(slot) => slot,
        None => *REGISTRY
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(id)
            .or_insert_with(|| {
                let slot: &'static (dyn Any + Send + Sync) =
                    Box::leak(Box::new(DescriptorCache::<R>::new()));
                slot
            }),
    };

    match slot.downcast_ref::<DescriptorCache<R>>() {
        Some(cache) => cache.get(),
        // Entries are keyed by the type they hold.
        None => unreachable!(),
    }
}
