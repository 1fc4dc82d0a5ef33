//! Data Set Identification (DSI) record.

use crate::error::{DtedError, Result};
use crate::latlon::LatLon;
use crate::records::fields::{FieldReader, YearMonth};
use crate::records::uhl::UHL_SIZE;

/// Fixed size of the DSI region, immediately following the UHL.
pub const DSI_SIZE: usize = 648;

/// Byte offset of the DSI region within a DTED file.
pub const DSI_OFFSET: usize = UHL_SIZE;

const SENTINEL: &[u8] = b"DSI";

/// Parsed Data Set Identification record.
///
/// Carries the production metadata of the cell plus a second copy of the
/// geometry (origin, corners, intervals, shape) that is cross-validated
/// against the [`UserHeaderLabel`](crate::UserHeaderLabel).
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetIdentification {
    /// Security code of the data ("U" for unclassified).
    pub security_code: String,
    /// Security control and release markings.
    pub release_markings: String,
    /// Security handling description.
    pub handling_description: String,
    /// Product level designator, e.g. "DTED1" or "DTED2".
    pub product_level: String,
    /// Unique reference number.
    pub reference: String,
    /// Data edition number, 1-99.
    pub edition: u32,
    /// Match/merge version, a single character A-Z.
    pub merge_version: String,
    /// Date of last maintenance, month precision.
    pub maintenance_date: Option<YearMonth>,
    /// Date of last merge, month precision.
    pub merge_date: Option<YearMonth>,
    /// Maintenance description code.
    pub maintenance_code: String,
    /// Producer code.
    pub producer_code: String,
    /// Product specification designator.
    pub product_specification: String,
    /// Date of the product specification, month precision.
    pub specification_date: Option<YearMonth>,
    /// Vertical datum used to define elevation.
    pub vertical_datum: String,
    /// Horizontal datum, e.g. "WGS84".
    pub horizontal_datum: String,
    /// Digitizing or collection system.
    pub collection_system: String,
    /// Compilation date, month precision.
    pub compilation_date: Option<YearMonth>,

    /// Origin of the cell.
    pub origin: LatLon,
    /// South-west corner of the data.
    pub south_west_corner: LatLon,
    /// North-west corner of the data.
    pub north_west_corner: LatLon,
    /// North-east corner of the data.
    pub north_east_corner: LatLon,
    /// South-east corner of the data.
    pub south_east_corner: LatLon,
    /// Clockwise orientation angle with respect to true north (0 for DTED).
    pub orientation: f64,
    /// Longitude data interval in arc-seconds.
    pub longitude_interval: f64,
    /// Latitude data interval in arc-seconds.
    pub latitude_interval: f64,
    /// Grid shape as (longitude-line count, latitude-point count).
    pub shape: (usize, usize),
    /// Fraction of the cell covered by data, 0.0 to 1.0. The file stores a
    /// percentage figure and encodes full coverage as 0.
    pub coverage: f64,
}

impl DataSetIdentification {
    /// Parse the Data Set Identification record from its fixed region.
    ///
    /// # Errors
    ///
    /// Returns [`DtedError::TruncatedFile`] if fewer than 648 bytes are
    /// provided, or [`DtedError::MalformedHeader`] if the sentinel or a
    /// required field does not decode.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < DSI_SIZE {
            return Err(DtedError::TruncatedFile {
                expected: DSI_SIZE,
                actual: data.len(),
            });
        }

        let mut reader = FieldReader::new(&data[..DSI_SIZE]);
        reader.sentinel(SENTINEL, "dsi_sentinel")?;

        let security_code = reader.code(1);
        let release_markings = reader.text(2);
        let handling_description = reader.text(27);
        reader.skip(26); // reserved
        let product_level = reader.text(5);
        let reference = reader.text(15);
        reader.skip(8); // reserved
        let edition = reader.int(2, "dsi_edition")?;
        let merge_version = reader.code(1);
        let maintenance_date = reader.year_month("dsi_maintenance_date")?;
        let merge_date = reader.year_month("dsi_merge_date")?;
        let maintenance_code = reader.text(4);
        let producer_code = reader.text(8);
        reader.skip(16); // reserved
        let product_specification = reader.text(11);
        let specification_date = reader.year_month("dsi_specification_date")?;
        let vertical_datum = reader.text(3);
        let horizontal_datum = reader.text(5);
        let collection_system = reader.text(10);
        let compilation_date = reader.year_month("dsi_compilation_date")?;
        reader.skip(22); // reserved

        // Geometry block: origin carries tenths of arc-seconds, the four
        // corners are whole seconds.
        let origin = reader.latlon(9, 10, "dsi_origin")?;
        let south_west_corner = reader.latlon(7, 8, "dsi_south_west_corner")?;
        let north_west_corner = reader.latlon(7, 8, "dsi_north_west_corner")?;
        let north_east_corner = reader.latlon(7, 8, "dsi_north_east_corner")?;
        let south_east_corner = reader.latlon(7, 8, "dsi_south_east_corner")?;
        let orientation = reader.float(9, "dsi_orientation")?;
        let longitude_interval = reader.interval_seconds(4, "dsi_longitude_interval")?;
        let latitude_interval = reader.interval_seconds(4, "dsi_latitude_interval")?;
        // Shape is stored latitude count first; normalize to (lon, lat).
        let latitude_count = reader.int(4, "dsi_latitude_count")? as usize;
        let longitude_count = reader.int(4, "dsi_longitude_count")? as usize;
        let shape = (longitude_count, latitude_count);
        let coverage = match reader.float(2, "dsi_coverage")? {
            c if c == 0.0 => 1.0,
            c => c / 100.0,
        };

        if longitude_interval <= 0.0 || latitude_interval <= 0.0 {
            return Err(DtedError::MalformedHeader {
                field: "dsi_latitude_interval",
                reason: "data intervals must be strictly positive".to_string(),
            });
        }

        Ok(Self {
            security_code,
            release_markings,
            handling_description,
            product_level,
            reference,
            edition,
            merge_version,
            maintenance_date,
            merge_date,
            maintenance_code,
            producer_code,
            product_specification,
            specification_date,
            vertical_datum,
            horizontal_datum,
            collection_system,
            compilation_date,
            origin,
            south_west_corner,
            north_west_corner,
            north_east_corner,
            south_east_corner,
            orientation,
            longitude_interval,
            latitude_interval,
            shape,
            coverage,
        })
    }
}
