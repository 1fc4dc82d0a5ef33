//! Synthetic DTED file encoder for tests and round-trip checks.
//!
//! [`TileSpec`] describes a cell (origin, intervals, shape, sample values)
//! and can emit each header region or a complete file in the fixed-width
//! layout the parsers expect.

use crate::data::{encode_signed_magnitude, DATA_SENTINEL};
use crate::records::{ACC_SIZE, DSI_SIZE, UHL_SIZE};

/// Description of a synthetic DTED cell.
#[derive(Clone)]
pub(crate) struct TileSpec {
    /// Whole-degree south-west corner.
    pub origin_lat_deg: i32,
    pub origin_lon_deg: i32,
    /// Data intervals in tenths of arc-seconds.
    pub longitude_interval_ds: u32,
    pub latitude_interval_ds: u32,
    pub longitude_lines: usize,
    pub latitude_points: usize,
    pub product_level: &'static str,
    pub vertical_accuracy: Option<u32>,
    /// Sample generator: (longitude line, latitude sample) to elevation.
    pub elevation: fn(usize, usize) -> i16,
}

fn default_elevation(lon_index: usize, lat_index: usize) -> i16 {
    ((lon_index * 7 + lat_index * 3) % 4000) as i16
}

impl TileSpec {
    /// A level-2 cell: 1 arc-second spacing, 3601 x 3601.
    pub fn dted2(origin_lat_deg: i32, origin_lon_deg: i32) -> Self {
        Self {
            origin_lat_deg,
            origin_lon_deg,
            longitude_interval_ds: 10,
            latitude_interval_ds: 10,
            longitude_lines: 3601,
            latitude_points: 3601,
            product_level: "DTED2",
            vertical_accuracy: Some(4),
            elevation: default_elevation,
        }
    }

    /// A level-1 cell: 3 arc-second spacing, 1201 x 1201.
    pub fn dted1(origin_lat_deg: i32, origin_lon_deg: i32) -> Self {
        Self {
            longitude_interval_ds: 30,
            latitude_interval_ds: 30,
            longitude_lines: 1201,
            latitude_points: 1201,
            product_level: "DTED1",
            ..Self::dted2(origin_lat_deg, origin_lon_deg)
        }
    }

    /// Shrink the grid, keeping the intervals; corners move with the shape.
    pub fn with_shape(mut self, longitude_lines: usize, latitude_points: usize) -> Self {
        self.longitude_lines = longitude_lines;
        self.latitude_points = latitude_points;
        self
    }

    /// Replace the sample generator.
    pub fn with_elevation(mut self, elevation: fn(usize, usize) -> i16) -> Self {
        self.elevation = elevation;
        self
    }

    fn origin_lat_ds(&self) -> i64 {
        self.origin_lat_deg as i64 * 36000
    }

    fn origin_lon_ds(&self) -> i64 {
        self.origin_lon_deg as i64 * 36000
    }

    fn lat_extent_ds(&self) -> i64 {
        (self.latitude_points as i64 - 1) * self.latitude_interval_ds as i64
    }

    fn lon_extent_ds(&self) -> i64 {
        (self.longitude_lines as i64 - 1) * self.longitude_interval_ds as i64
    }

    /// Encode the 80-byte User Header Label.
    pub fn encode_uhl(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(UHL_SIZE);
        buf.extend_from_slice(b"UHL1");
        buf.extend_from_slice(angle(self.origin_lon_ds(), 3, false, false).as_bytes());
        buf.extend_from_slice(angle(self.origin_lat_ds(), 3, true, false).as_bytes());
        buf.extend_from_slice(format!("{:04}", self.longitude_interval_ds).as_bytes());
        buf.extend_from_slice(format!("{:04}", self.latitude_interval_ds).as_bytes());
        match self.vertical_accuracy {
            Some(v) => buf.extend_from_slice(format!("{v:04}").as_bytes()),
            None => buf.extend_from_slice(b"NA  "),
        }
        buf.extend_from_slice(b"U  ");
        buf.extend_from_slice(b"TESTTILE    "); // 12-byte reference
        buf.extend_from_slice(format!("{:04}", self.longitude_lines).as_bytes());
        buf.extend_from_slice(format!("{:04}", self.latitude_points).as_bytes());
        buf.push(b'0'); // multiple accuracy off
        buf.resize(UHL_SIZE, b' ');
        buf
    }

    /// Encode the 648-byte Data Set Identification record.
    pub fn encode_dsi(&self) -> Vec<u8> {
        let origin_lat = self.origin_lat_ds();
        let origin_lon = self.origin_lon_ds();
        let north_lat = origin_lat + self.lat_extent_ds();
        let east_lon = origin_lon + self.lon_extent_ds();

        let mut buf = Vec::with_capacity(DSI_SIZE);
        buf.extend_from_slice(b"DSI");
        buf.extend_from_slice(b"U"); // security code
        buf.extend_from_slice(b"  "); // release markings
        buf.resize(buf.len() + 27, b' '); // handling description
        buf.resize(buf.len() + 26, b' '); // reserved
        buf.extend_from_slice(format!("{:<5}", self.product_level).as_bytes());
        buf.extend_from_slice(b"TESTTILE       "); // 15-byte reference
        buf.resize(buf.len() + 8, b' '); // reserved
        buf.extend_from_slice(b"01"); // edition
        buf.extend_from_slice(b"A"); // merge version
        buf.extend_from_slice(b"0000"); // maintenance date (null)
        buf.extend_from_slice(b"0000"); // merge date (null)
        buf.extend_from_slice(b"0000"); // maintenance code
        buf.extend_from_slice(b"USCNIMA "); // producer code
        buf.resize(buf.len() + 16, b' '); // reserved
        buf.extend_from_slice(b"PRF89020B  "); // product specification
        buf.extend_from_slice(b"0000"); // specification date (null)
        buf.extend_from_slice(b"E96"); // vertical datum
        buf.extend_from_slice(b"WGS84"); // horizontal datum
        buf.extend_from_slice(b"SRTM      "); // collection system
        buf.extend_from_slice(b"0002"); // compilation date: 2000-02
        buf.resize(buf.len() + 22, b' '); // reserved

        buf.extend_from_slice(angle(origin_lat, 2, true, true).as_bytes());
        buf.extend_from_slice(angle(origin_lon, 3, false, true).as_bytes());
        for (lat, lon) in [
            (origin_lat, origin_lon), // SW
            (north_lat, origin_lon),  // NW
            (north_lat, east_lon),    // NE
            (origin_lat, east_lon),   // SE
        ] {
            buf.extend_from_slice(angle(lat, 2, true, false).as_bytes());
            buf.extend_from_slice(angle(lon, 3, false, false).as_bytes());
        }
        buf.extend_from_slice(b"0000000.0"); // orientation
        buf.extend_from_slice(format!("{:04}", self.longitude_interval_ds).as_bytes());
        buf.extend_from_slice(format!("{:04}", self.latitude_interval_ds).as_bytes());
        // Shape is stored latitude count first.
        buf.extend_from_slice(format!("{:04}", self.latitude_points).as_bytes());
        buf.extend_from_slice(format!("{:04}", self.longitude_lines).as_bytes());
        buf.extend_from_slice(b"00"); // coverage: full
        buf.resize(DSI_SIZE, b' ');
        buf
    }

    /// Encode the 2700-byte Accuracy Description record.
    pub fn encode_acc(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(ACC_SIZE);
        buf.extend_from_slice(b"ACC");
        buf.extend_from_slice(b"0008");
        buf.extend_from_slice(b"0004");
        buf.extend_from_slice(b"0006");
        buf.extend_from_slice(b"0003");
        buf.resize(ACC_SIZE, b' ');
        buf
    }

    /// Encode a complete DTED file: headers plus every data record.
    pub fn encode_file(&self) -> Vec<u8> {
        let mut buf = self.encode_uhl();
        buf.extend_from_slice(&self.encode_dsi());
        buf.extend_from_slice(&self.encode_acc());
        let mut samples = vec![0i16; self.latitude_points];
        for lon_index in 0..self.longitude_lines {
            for (lat_index, sample) in samples.iter_mut().enumerate() {
                *sample = (self.elevation)(lon_index, lat_index);
            }
            buf.extend_from_slice(&encode_record(lon_index as u16, &samples));
        }
        buf
    }
}

/// Encode one data record with a valid checksum.
pub(crate) fn encode_record(longitude_index: u16, samples: &[i16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(12 + 2 * samples.len());
    buf.push(DATA_SENTINEL);
    buf.extend_from_slice(&(longitude_index as u32).to_be_bytes()[1..]); // block count
    buf.extend_from_slice(&longitude_index.to_be_bytes());
    buf.extend_from_slice(&(samples.len() as u16).to_be_bytes());
    for &sample in samples {
        buf.extend_from_slice(&encode_signed_magnitude(sample).to_be_bytes());
    }
    let checksum = buf
        .iter()
        .fold(0u32, |sum, &b| sum.wrapping_add(b as u32));
    buf.extend_from_slice(&checksum.to_be_bytes());
    buf
}

/// Format an angle given in tenths of arc-seconds as a DTED string:
/// `[D]DDMMSS[.S]` plus hemisphere letter.
fn angle(tenths: i64, degree_width: usize, is_latitude: bool, decimal: bool) -> String {
    let hemisphere = match (is_latitude, tenths >= 0) {
        (true, true) => 'N',
        (true, false) => 'S',
        (false, true) => 'E',
        (false, false) => 'W',
    };
    let tenths = tenths.abs();
    let degrees = tenths / 36000;
    let minutes = tenths % 36000 / 600;
    let seconds = tenths % 600 / 10;
    let tenth = tenths % 10;
    if decimal {
        format!("{degrees:0degree_width$}{minutes:02}{seconds:02}.{tenth}{hemisphere}")
    } else {
        debug_assert_eq!(tenth, 0, "whole-second field cannot carry tenths");
        format!("{degrees:0degree_width$}{minutes:02}{seconds:02}{hemisphere}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_formats() {
        assert_eq!(angle(41 * 36000, 3, true, false), "0410000N");
        assert_eq!(angle(-71 * 36000, 3, false, false), "0710000W");
        assert_eq!(angle(41 * 36000, 2, true, true), "410000.0N");
        assert_eq!(angle(-71 * 36000 - 5, 3, false, true), "0710000.5W");
        assert_eq!(angle(-(54 * 36000 + 45 * 600), 2, true, false), "544500S");
    }

    #[test]
    fn test_region_sizes() {
        let spec = TileSpec::dted2(41, -71);
        assert_eq!(spec.encode_uhl().len(), UHL_SIZE);
        assert_eq!(spec.encode_dsi().len(), DSI_SIZE);
        assert_eq!(spec.encode_acc().len(), ACC_SIZE);

        let small = spec.with_shape(4, 3);
        assert_eq!(
            small.encode_file().len(),
            UHL_SIZE + ACC_SIZE + DSI_SIZE + 4 * (12 + 2 * 3)
        );
    }
}
