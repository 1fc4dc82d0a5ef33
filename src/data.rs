//! Elevation data records and the signed-magnitude sample codec.
//!
//! The grid body of a DTED file is one [`DataRecord`] per longitude line:
//! a sentinel byte, a 3-byte block count, the longitude index, the latitude
//! count, `latitude count` 2-byte signed-magnitude elevation samples, and a
//! 4-byte checksum over everything preceding it.

use crate::error::{DtedError, Result};

/// Recognition sentinel that opens every data record.
pub const DATA_SENTINEL: u8 = 0xAA;

/// Decoded elevation value meaning "no data at this sample" (e.g. open water).
///
/// This is a data value, not an error: lookups return it as-is and the tile
/// raises a single non-fatal signal when it is first seen.
pub const VOID_VALUE: i16 = -32767;

/// Per-record bytes that are not elevation samples: 8 header + 4 checksum.
pub(crate) const RECORD_OVERHEAD: usize = 12;

/// Decode a 2-byte signed-magnitude field into a signed elevation in meters.
///
/// The most significant bit is the sign flag; the low 15 bits are the
/// magnitude. This is not two's complement: `0x8001` decodes to -1.
#[inline]
pub fn decode_signed_magnitude(raw: u16) -> i16 {
    if raw & 0x8000 != 0 {
        -((raw & 0x7fff) as i16)
    } else {
        raw as i16
    }
}

/// Encode a signed elevation into its 2-byte signed-magnitude form.
///
/// Inverse of [`decode_signed_magnitude`] over `[-32767, 32767]`; the
/// two's-complement minimum -32768 has no signed-magnitude representation.
#[inline]
pub fn encode_signed_magnitude(value: i16) -> u16 {
    debug_assert!(value > i16::MIN);
    if value < 0 {
        0x8000 | (-value) as u16
    } else {
        value as u16
    }
}

/// One parsed longitude line of the elevation grid.
///
/// Constructed transiently per access and discarded once its samples are
/// copied out; it holds no reference back to the tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataRecord {
    /// Sequential block count within the file. Informational: multi-block
    /// products are not distinguished by the available fixtures.
    pub block_count: u32,
    /// Longitude index of this line within the grid.
    pub longitude_index: u16,
    /// Number of latitude samples in this line.
    pub latitude_count: u16,
    /// Decoded elevation samples in meters, south to north.
    pub elevations: Vec<i16>,
    /// Checksum trailer as stored in the file.
    pub checksum: u32,
}

impl DataRecord {
    /// Total record length in bytes for a line of `latitude_count` samples.
    pub fn length_for(latitude_count: usize) -> usize {
        RECORD_OVERHEAD + 2 * latitude_count
    }

    /// Parse a single data record.
    ///
    /// `record` must be exactly the record's bytes; `expected_samples` is the
    /// latitude-point count from the validated headers. The checksum is the
    /// unsigned sum of every byte before the trailer, modulo 2^32; skipping
    /// verification is an explicit opt-in for throughput, never the default.
    ///
    /// # Errors
    ///
    /// [`DtedError::InvalidRecord`] for a bad sentinel or latitude count,
    /// [`DtedError::Checksum`] when verification is on and fails.
    pub fn parse(record: &[u8], expected_samples: usize, verify_checksum: bool) -> Result<Self> {
        let expected_len = Self::length_for(expected_samples);
        if record.len() != expected_len {
            return Err(DtedError::TruncatedFile {
                expected: expected_len,
                actual: record.len(),
            });
        }

        let longitude_index = u16::from_be_bytes([record[4], record[5]]);

        if record[0] != DATA_SENTINEL {
            return Err(DtedError::InvalidRecord {
                longitude_index: longitude_index as usize,
                reason: format!(
                    "expected sentinel {DATA_SENTINEL:#04x}, found {:#04x}",
                    record[0]
                ),
            });
        }

        let checksum_offset = record.len() - 4;
        let checksum = u32::from_be_bytes([
            record[checksum_offset],
            record[checksum_offset + 1],
            record[checksum_offset + 2],
            record[checksum_offset + 3],
        ]);
        if verify_checksum {
            let computed = record[..checksum_offset]
                .iter()
                .fold(0u32, |sum, &b| sum.wrapping_add(b as u32));
            if computed != checksum {
                return Err(DtedError::Checksum {
                    longitude_index: longitude_index as usize,
                    expected: checksum,
                    computed,
                });
            }
        }

        let block_count = u32::from_be_bytes([0, record[1], record[2], record[3]]);
        let latitude_count = u16::from_be_bytes([record[6], record[7]]);
        if latitude_count as usize != expected_samples {
            return Err(DtedError::InvalidRecord {
                longitude_index: longitude_index as usize,
                reason: format!(
                    "latitude count {latitude_count} does not match header count {expected_samples}"
                ),
            });
        }

        let elevations = record[8..checksum_offset]
            .chunks_exact(2)
            .map(|pair| decode_signed_magnitude(u16::from_be_bytes([pair[0], pair[1]])))
            .collect();

        Ok(Self {
            block_count,
            longitude_index,
            latitude_count,
            elevations,
            checksum,
        })
    }

    /// Whether any sample in this line is the void sentinel.
    pub fn has_void_data(&self) -> bool {
        self.elevations.contains(&VOID_VALUE)
    }
}
