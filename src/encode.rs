//! Line encoder.

use core::any::type_name;

use tracing::trace;

use crate::{
    codec::CodecError,
    descriptor::{Descriptor, Record},
    error::Error,
};

/// A value records can be encoded from.
///
/// Implemented for every [`Record`], and for slices and vectors of records.
pub trait Source {
    type Record: Record;

    /// The records to encode, in output order.
    fn records(&self) -> &[Self::Record];
}

impl<R: Record> Source for R {
    type Record = R;

    fn records(&self) -> &[R] {
        core::slice::from_ref(self)
    }
}

impl<R: Record> Source for [R] {
    type Record = R;

    fn records(&self) -> &[R] {
        self
    }
}

impl<R: Record> Source for Vec<R> {
    type Record = R;

    fn records(&self) -> &[R] {
        self
    }
}

/// Encode records as fixed-width lines.
///
/// Each record becomes one line, as wide as the last column of any field and
/// terminated by `\n`. Each field is written at its declared columns; columns
/// not covered by any field are spaces.
///
/// Encoding stops at the first field whose value does not fit its columns, and
/// no output is returned.
pub fn encode<S: Source + ?Sized>(source: &S) -> Result<Vec<u8>, Error> {
    let descriptor = S::Record::descriptor()?;
    let records = source.records();
    let width = descriptor.width();

    let mut o = Vec::with_capacity(records.len() * (width + 1));

    for (i, record) in records.iter().enumerate() {
        encode_line(descriptor, record, i, width, &mut o)?;
    }

    trace!(
        record = type_name::<S::Record>(),
        count = records.len(),
        "Encoded records"
    );

    Ok(o)
}

/// Append one record's line, including its terminator.
fn encode_line<R>(
    descriptor: &Descriptor<R>,
    record: &R,
    index: usize,
    width: usize,
    o: &mut Vec<u8>,
) -> Result<(), Error> {
    let start = o.len();
    o.resize(start + width, b' ');

    for field in descriptor.fields() {
        let err = |source: CodecError| Error::Encode {
            record: index,
            field: field.name(),
            source,
        };

        let chunk = field.encode(record).map_err(err)?;
        let span = field.range().span();

        // Hand-written codecs may return a chunk of the wrong width.
        let chunk = if chunk.len() == span.len() {
            chunk
        } else {
            field.codec().pad(&chunk, span.len()).map_err(err)?
        };

        o[start + span.start..start + span.end].copy_from_slice(&chunk);
    }

    o.push(b'\n');

    Ok(())
}
