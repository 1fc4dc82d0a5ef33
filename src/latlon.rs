//! Geographic coordinate value types.
//!
//! [`LatLon`] is a plain latitude/longitude point in decimal degrees;
//! [`BoundingBox`] is the closed rectangle spanned by a tile's corners.
//! Both are immutable value types with no backing state.

use crate::error::{DtedError, Result};

/// A geographic point in decimal degrees (WGS84).
///
/// Positive latitude is north, positive longitude is east.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in decimal degrees, -90 to 90.
    pub latitude: f64,
    /// Longitude in decimal degrees, -180 to 180.
    pub longitude: f64,
}

impl LatLon {
    /// Create a new coordinate.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Parse a coordinate pair from DTED header strings.
    ///
    /// The strings are in the format `[D]DDMMSS[.S]H` where `D` is degrees,
    /// `M` minutes, `S` seconds (optionally with tenths), and `H` the
    /// hemisphere letter (`N`/`S`/`E`/`W`).
    pub(crate) fn from_dted(
        latitude_str: &str,
        longitude_str: &str,
        field: &'static str,
    ) -> Result<Self> {
        let latitude = parse_dted_angle(latitude_str, field)?;
        let longitude = parse_dted_angle(longitude_str, field)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for LatLon {
    /// Formats as `(41.5000N, 70.2500W)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lat_hemisphere = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let lon_hemisphere = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "({:.4}{}, {:.4}{})",
            self.latitude.abs(),
            lat_hemisphere,
            self.longitude.abs(),
            lon_hemisphere,
        )
    }
}

/// The closed rectangle covered by a tile.
///
/// Coordinates are in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum latitude (southern boundary).
    pub min_lat: f64,
    /// Minimum longitude (western boundary).
    pub min_lon: f64,
    /// Maximum latitude (northern boundary).
    pub max_lat: f64,
    /// Maximum longitude (eastern boundary).
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Whether the point lies within the closed rectangle.
    ///
    /// Points exactly on an edge are contained.
    pub fn contains(&self, point: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }
}

/// Parse a DTED angle string (`[D]DDMMSS[.S]` plus hemisphere letter) into
/// signed decimal degrees.
pub(crate) fn parse_dted_angle(coordinate: &str, field: &'static str) -> Result<f64> {
    let malformed = |reason: String| DtedError::MalformedHeader { field, reason };

    let coordinate = coordinate.trim();
    let (body, hemisphere) = match coordinate.char_indices().last() {
        Some((i, h @ ('N' | 'S' | 'E' | 'W'))) => (&coordinate[..i], h),
        _ => {
            return Err(malformed(format!(
                "missing hemisphere letter in coordinate '{coordinate}'"
            )))
        }
    };
    let sign = if matches!(hemisphere, 'S' | 'W') {
        -1.0
    } else {
        1.0
    };

    // Seconds may carry a decimal tenth: [D]DDMMSS or [D]DDMMSS.S
    let seconds_len = if body.as_bytes().get(body.len().wrapping_sub(2)) == Some(&b'.') {
        4
    } else {
        2
    };
    if body.len() < seconds_len + 3 {
        return Err(malformed(format!("coordinate '{coordinate}' is too short")));
    }
    let seconds_index = body.len() - seconds_len;
    let minutes_index = seconds_index - 2;

    let degrees: u32 = body[..minutes_index]
        .parse()
        .map_err(|_| malformed(format!("non-numeric degrees in '{coordinate}'")))?;
    let minutes: u32 = body[minutes_index..seconds_index]
        .parse()
        .map_err(|_| malformed(format!("non-numeric minutes in '{coordinate}'")))?;
    let seconds: f64 = body[seconds_index..]
        .parse()
        .map_err(|_| malformed(format!("non-numeric seconds in '{coordinate}'")))?;

    Ok(sign * (degrees as f64 + (minutes as f64 + seconds / 60.0) / 60.0))
}
