//! Binary step records
//!
//! Each element is written as a fixed 14-byte big-endian record:
//!
//! ```text
//! i32 latitude
//! i32 longitude
//! i16 elevation_quantized
//! i32 cost
//! ```
//!
//! There is no header, version or checksum. Decoding always yields a detached
//! plain element: no origin, no message, no traffic state. Framing (how many
//! records, which route) is left to the caller; [`RecordReader`] just reads
//! back-to-back records until the end of the stream.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::core::element::PathElement;
use crate::core::error::Result;
use crate::core::position::Positioned;

/// Size of one encoded element
pub const RECORD_SIZE: usize = 14;

impl PathElement {
    /// Write this element's 14-byte record
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32::<BigEndian>(self.latitude())?;
        writer.write_i32::<BigEndian>(self.longitude())?;
        writer.write_i16::<BigEndian>(self.elevation_quantized())?;
        writer.write_i32::<BigEndian>(self.cost())?;
        Ok(())
    }

    /// Read one record. A short read fails with `UnexpectedEof`.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<PathElement> {
        let latitude = reader.read_i32::<BigEndian>()?;
        let longitude = reader.read_i32::<BigEndian>()?;
        let elevation_quantized = reader.read_i16::<BigEndian>()?;
        let cost = reader.read_i32::<BigEndian>()?;
        log::trace!("Decoded record {}_{} cost {}", longitude, latitude, cost);
        Ok(PathElement::detached(
            longitude,
            latitude,
            elevation_quantized,
            cost,
        ))
    }
}

/// Write elements back to back, returning the number written
pub fn write_route<'a, W, I>(writer: &mut W, elements: I) -> Result<usize>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = &'a PathElement>,
{
    let mut count = 0;
    for element in elements {
        element.write_to(writer)?;
        count += 1;
    }
    Ok(count)
}

/// Iterator over back-to-back records.
///
/// Ends cleanly when the stream ends on a record boundary; a partial trailing
/// record yields one `UnexpectedEof` error and then ends.
pub struct RecordReader<R> {
    inner: R,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, done: false }
    }

    /// Fill `buf` completely, or report how many bytes were read before EOF
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<PathElement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buf = [0u8; RECORD_SIZE];
        match self.fill(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) if n < RECORD_SIZE => {
                self.done = true;
                Some(Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("truncated step record: {n} of {RECORD_SIZE} bytes"),
                )
                .into()))
            }
            Ok(_) => Some(PathElement::read_from(&mut buf.as_slice())),
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}
