//! Accuracy Description (ACC) record.

use crate::error::{DtedError, Result};
use crate::records::dsi::{DSI_OFFSET, DSI_SIZE};
use crate::records::fields::FieldReader;

/// Fixed size of the ACC region, immediately following the DSI.
pub const ACC_SIZE: usize = 2700;

/// Byte offset of the ACC region within a DTED file.
pub const ACC_OFFSET: usize = DSI_OFFSET + DSI_SIZE;

const SENTINEL: &[u8] = b"ACC";

/// Parsed Accuracy Description record.
///
/// Every figure is optional; a blank or `NA` field means the accuracy was
/// not evaluated, which is valid data rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccuracyDescription {
    /// Absolute horizontal accuracy in meters, if evaluated.
    pub absolute_horizontal: Option<u32>,
    /// Absolute vertical accuracy in meters, if evaluated.
    pub absolute_vertical: Option<u32>,
    /// Point-to-point horizontal accuracy in meters, if evaluated.
    pub relative_horizontal: Option<u32>,
    /// Point-to-point vertical accuracy in meters, if evaluated.
    pub relative_vertical: Option<u32>,
}

impl AccuracyDescription {
    /// Parse the Accuracy Description record from its fixed region.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::TruncatedFile`] if fewer than 2700 bytes are
    /// provided, or [`DtedError::MalformedHeader`] if the sentinel is wrong.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < ACC_SIZE {
            return Err(DtedError::TruncatedFile {
                expected: ACC_SIZE,
                actual: data.len(),
            });
        }

        let mut reader = FieldReader::new(&data[..ACC_SIZE]);
        reader.sentinel(SENTINEL, "acc_sentinel")?;

        Ok(Self {
            absolute_horizontal: reader.opt_int(4),
            absolute_vertical: reader.opt_int(4),
            relative_horizontal: reader.opt_int(4),
            relative_vertical: reader.opt_int(4),
        })
    }
}
