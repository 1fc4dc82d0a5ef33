//! User Header Label (UHL) record.

use crate::error::{DtedError, Result};
use crate::latlon::LatLon;
use crate::records::fields::FieldReader;

/// Fixed size of the UHL region at the start of every DTED file.
pub const UHL_SIZE: usize = 80;

const SENTINEL: &[u8] = b"UHL1";

/// Parsed User Header Label: the first 80 bytes of a DTED file.
#[derive(Debug, Clone, PartialEq)]
pub struct UserHeaderLabel {
    /// Origin of the file (south-west corner).
    pub origin: LatLon,
    /// Longitude data interval in arc-seconds.
    pub longitude_interval: f64,
    /// Latitude data interval in arc-seconds.
    pub latitude_interval: f64,
    /// Absolute vertical accuracy in meters, if specified.
    pub vertical_accuracy: Option<u32>,
    /// Security code of the data ("U" for unclassified).
    pub security_code: String,
    /// Unique reference number.
    pub reference: String,
    /// Grid shape as (longitude-line count, latitude-point count).
    pub shape: (usize, usize),
    /// Whether multiple accuracy records are present.
    pub multiple_accuracy: bool,
}

impl UserHeaderLabel {
    /// Parse the User Header Label from the start of a DTED file.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::TruncatedFile`] if fewer than 80 bytes are
    /// provided, or [`DtedError::MalformedHeader`] if the sentinel or a
    /// required field does not decode.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < UHL_SIZE {
            return Err(DtedError::TruncatedFile {
                expected: UHL_SIZE,
                actual: data.len(),
            });
        }

        let mut reader = FieldReader::new(&data[..UHL_SIZE]);
        reader.sentinel(SENTINEL, "uhl_sentinel")?;

        // Longitude is stored before latitude in the UHL.
        let longitude_str = reader.code(8);
        let latitude_str = reader.code(8);
        let origin = LatLon::from_dted(&latitude_str, &longitude_str, "uhl_origin")?;

        let longitude_interval = reader.interval_seconds(4, "uhl_longitude_interval")?;
        let latitude_interval = reader.interval_seconds(4, "uhl_latitude_interval")?;
        if longitude_interval <= 0.0 || latitude_interval <= 0.0 {
            return Err(DtedError::MalformedHeader {
                field: "uhl_latitude_interval",
                reason: "data intervals must be strictly positive".to_string(),
            });
        }

        let vertical_accuracy = reader.opt_int(4);
        let security_code = reader.text(3);
        let reference = reader.text(12);
        let shape = (
            reader.int(4, "uhl_longitude_count")? as usize,
            reader.int(4, "uhl_latitude_count")? as usize,
        );
        let multiple_accuracy = reader.bytes(1) != b"0";

        Ok(Self {
            origin,
            longitude_interval,
            latitude_interval,
            vertical_accuracy,
            security_code,
            reference,
            shape,
            multiple_accuracy,
        })
    }
}
