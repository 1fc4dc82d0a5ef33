//! Typed field extraction from fixed-layout header regions.
//!
//! DTED headers are fixed-width ASCII laid out at byte offsets defined by the
//! format. [`FieldReader`] walks such a region field by field, decoding each
//! (offset, length) slot into a typed value. Required fields that are blank
//! or malformed fail with [`DtedError::MalformedHeader`] naming the field;
//! optional fields decode blank/`NA` slots to `None`.

use crate::error::{DtedError, Result};
use crate::latlon::LatLon;

/// A month-precision date from a DTED `YYMM` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    pub year: u16,
    /// 1-12.
    pub month: u8,
}

/// Sequential reader over a fixed-layout header region.
///
/// Field lengths are format constants; the reader only tracks the running
/// offset so that each decode names the field it failed on.
pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    /// The reader assumes `buf` covers the whole fixed-size region; record
    /// parsers check the region length before constructing one.
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset within the region.
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Skip a reserved span.
    pub(crate) fn skip(&mut self, len: usize) {
        self.pos += len;
    }

    /// Raw bytes of the next field.
    pub(crate) fn bytes(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    /// Fixed-width ASCII text, trimmed of padding.
    pub(crate) fn text(&mut self, len: usize) -> String {
        String::from_utf8_lossy(self.bytes(len)).trim().to_string()
    }

    /// A single-character code field.
    pub(crate) fn code(&mut self, len: usize) -> String {
        String::from_utf8_lossy(self.bytes(len)).to_string()
    }

    /// Required fixed-width decimal integer.
    pub(crate) fn int(&mut self, len: usize, field: &'static str) -> Result<u32> {
        let text = self.text(len);
        text.parse().map_err(|_| DtedError::MalformedHeader {
            field,
            reason: format!("expected a number, found '{text}'"),
        })
    }

    /// Optional fixed-width decimal integer: blank or `NA` decodes to `None`.
    pub(crate) fn opt_int(&mut self, len: usize) -> Option<u32> {
        let text = self.text(len);
        if text.is_empty() || text.contains("NA") {
            return None;
        }
        text.parse().ok()
    }

    /// Required fixed-point decimal number.
    pub(crate) fn float(&mut self, len: usize, field: &'static str) -> Result<f64> {
        let text = self.text(len);
        text.parse().map_err(|_| DtedError::MalformedHeader {
            field,
            reason: format!("expected a number, found '{text}'"),
        })
    }

    /// Angular interval stored in tenths of arc-seconds, decoded to seconds.
    pub(crate) fn interval_seconds(&mut self, len: usize, field: &'static str) -> Result<f64> {
        Ok(self.int(len, field)? as f64 / 10.0)
    }

    /// A latitude/longitude pair of DTED angle fields, latitude first.
    pub(crate) fn latlon(
        &mut self,
        lat_len: usize,
        lon_len: usize,
        field: &'static str,
    ) -> Result<LatLon> {
        let latitude_str = self.code(lat_len);
        let longitude_str = self.code(lon_len);
        LatLon::from_dted(&latitude_str, &longitude_str, field)
    }

    /// A nullable `YYMM` date; month `00` means no date recorded.
    ///
    /// Two-digit years pivot at 69, matching the usual `%y` convention.
    pub(crate) fn year_month(
        &mut self,
        field: &'static str,
    ) -> Result<Option<YearMonth>> {
        let text = self.text(4);
        if text.is_empty() || text.ends_with("00") {
            return Ok(None);
        }
        let malformed = |reason: String| DtedError::MalformedHeader { field, reason };
        if text.len() != 4 {
            return Err(malformed(format!("expected YYMM, found '{text}'")));
        }
        let yy: u16 = text[..2]
            .parse()
            .map_err(|_| malformed(format!("non-numeric year in '{text}'")))?;
        let month: u8 = text[2..]
            .parse()
            .map_err(|_| malformed(format!("non-numeric month in '{text}'")))?;
        if !(1..=12).contains(&month) {
            return Err(malformed(format!("month out of range in '{text}'")));
        }
        let year = if yy < 69 { 2000 + yy } else { 1900 + yy };
        Ok(Some(YearMonth { year, month }))
    }

    /// Required sentinel at the start of a region.
    pub(crate) fn sentinel(&mut self, expected: &[u8], field: &'static str) -> Result<()> {
        let found = self.bytes(expected.len());
        if found != expected {
            return Err(DtedError::MalformedHeader {
                field,
                reason: format!(
                    "expected sentinel {:?}, found {:?}",
                    String::from_utf8_lossy(expected),
                    String::from_utf8_lossy(found),
                ),
            });
        }
        Ok(())
    }
}
