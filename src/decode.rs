//! Line decoder.

use core::any::type_name;

use tracing::trace;

use crate::{
    descriptor::{Descriptor, Record},
    error::Error,
};

/// Where decoded records are written.
pub enum Target<'a, R> {
    /// A single record, updated in place from the first data line.
    One(&'a mut R),
    /// A collection, extended with one record per data line.
    Many {
        records: &'a mut Vec<R>,
        /// Produces the blank record each line is decoded into.
        new: fn() -> R,
    },
}

/// A value records can be decoded into.
///
/// Implemented for every [`Record`] (single target) and for `Vec<R>` of a
/// record with a [`Default`] (collection target).
pub trait Destination {
    type Record: Record;

    /// Resolve the shape of this destination.
    fn target(&mut self) -> Target<'_, Self::Record>;
}

impl<R: Record> Destination for R {
    type Record = R;

    fn target(&mut self) -> Target<'_, R> {
        Target::One(self)
    }
}

impl<R: Record + Default> Destination for Vec<R> {
    type Record = R;

    fn target(&mut self) -> Target<'_, R> {
        Target::Many {
            records: self,
            new: R::default,
        }
    }
}

/// Decode fixed-width lines from a slice into a destination.
///
/// Lines are separated by `\n`, and a trailing `\r` on any line is ignored.
/// Empty lines are skipped.
///
/// A single record is decoded from the first line, and further lines are
/// ignored; input without any line is an [`Error::NoData`], unless the record
/// maps no fields. A collection is extended with one record per line, in input
/// order.
///
/// Decoding stops at the first field that fails to convert. Fields of a
/// single record converted before that point keep their new values; for a
/// collection, records from earlier lines remain appended.
pub fn decode(r: &[u8], o: &mut impl Destination) -> Result<(), Error> {
    decode_target(r, o.target())
}

fn decode_target<R: Record>(r: &[u8], target: Target<'_, R>) -> Result<(), Error> {
    let descriptor = R::descriptor()?;
    let mut lines = lines(r);

    match target {
        Target::One(record) => {
            let Some((number, line)) = lines.next() else {
                // A record without mapped fields needs no data.
                if descriptor.fields().is_empty() {
                    return Ok(());
                }

                Err(Error::NoData)?
            };

            decode_line(descriptor, record, number, line)?;

            trace!(record = type_name::<R>(), line = number, "Decoded record");
        }
        Target::Many { records, new } => {
            let before = records.len();

            for (number, line) in lines {
                let mut record = new();
                decode_line(descriptor, &mut record, number, line)?;
                records.push(record);
            }

            trace!(
                record = type_name::<R>(),
                count = records.len() - before,
                "Decoded records"
            );
        }
    }

    Ok(())
}

/// Decode each field of a record from one line.
fn decode_line<R>(
    descriptor: &Descriptor<R>,
    record: &mut R,
    number: usize,
    line: &[u8],
) -> Result<(), Error> {
    for field in descriptor.fields() {
        let text = trim(field.range().slice(line));

        field
            .decode(record, text)
            .map_err(|source| Error::Decode {
                line: number,
                field: field.name(),
                source,
            })?;
    }

    Ok(())
}

/// Split input into non-empty lines, numbered from one.
fn lines(r: &[u8]) -> impl Iterator<Item = (usize, &[u8])> {
    r.split(|b| *b == b'\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix(b"\r").unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty())
}

/// Remove space padding from both ends of a slice.
fn trim(mut s: &[u8]) -> &[u8] {
    while let [b' ', rest @ ..] = s {
        s = rest;
    }

    while let [rest @ .., b' '] = s {
        s = rest;
    }

    s
}
