//! Coordinate-to-offset arithmetic for random access into a DTED file.
//!
//! [`TileIndex`] is pure math over header-derived constants: it maps a
//! geographic coordinate to (longitude line, latitude sample) grid indices
//! and to the absolute byte offset of the data record holding the line, so
//! single-point lookups never scan the file.

use crate::data::DataRecord;
use crate::error::{DtedError, Result};
use crate::latlon::{BoundingBox, LatLon};
use crate::records::{cross_validate, DataSetIdentification, UserHeaderLabel, DATA_OFFSET};

/// Grid geometry derived from the validated UHL and DSI records.
///
/// All intervals come from the headers; nothing here assumes a particular
/// product level or a 1-arc-second spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct TileIndex {
    origin: LatLon,
    /// Longitude spacing in decimal degrees.
    longitude_interval: f64,
    /// Latitude spacing in decimal degrees.
    latitude_interval: f64,
    longitude_lines: usize,
    latitude_points: usize,
}

impl TileIndex {
    /// Build an index from the two geometry-bearing header records.
    ///
    /// Cross-validates the records first; a disagreement on shape, interval,
    /// or origin fails with [`DtedError::MalformedHeader`] instead of
    /// silently trusting one source.
    pub fn from_records(
        uhl: &UserHeaderLabel,
        dsi: &DataSetIdentification,
    ) -> Result<Self> {
        cross_validate(uhl, dsi)?;

        let (longitude_lines, latitude_points) = dsi.shape;
        if longitude_lines < 2 || latitude_points < 2 {
            return Err(DtedError::MalformedHeader {
                field: "shape",
                reason: format!("grid shape {:?} is degenerate", dsi.shape),
            });
        }

        Ok(Self {
            origin: dsi.origin,
            longitude_interval: dsi.longitude_interval / 3600.0,
            latitude_interval: dsi.latitude_interval / 3600.0,
            longitude_lines,
            latitude_points,
        })
    }

    /// Origin (south-west corner) of the grid.
    pub fn origin(&self) -> LatLon {
        self.origin
    }

    /// Grid shape as (longitude-line count, latitude-point count).
    pub fn shape(&self) -> (usize, usize) {
        (self.longitude_lines, self.latitude_points)
    }

    /// Number of latitude samples per longitude line.
    pub fn latitude_points(&self) -> usize {
        self.latitude_points
    }

    /// Number of longitude lines.
    pub fn longitude_lines(&self) -> usize {
        self.longitude_lines
    }

    /// Length in bytes of one data record.
    pub fn record_length(&self) -> usize {
        DataRecord::length_for(self.latitude_points)
    }

    /// Total file length implied by the headers.
    pub fn expected_file_length(&self) -> usize {
        DATA_OFFSET + self.longitude_lines * self.record_length()
    }

    /// Absolute byte offset of the data record for a longitude line.
    ///
    /// Records are fixed-length, so the offset is the header-region end plus
    /// `longitude_index` whole records; no preceding record is read.
    pub fn byte_offset_of(&self, longitude_index: usize) -> usize {
        DATA_OFFSET + longitude_index * self.record_length()
    }

    /// Map a coordinate to (longitude line, latitude sample) grid indices.
    ///
    /// Indices are the floor of the coordinate's offset from the origin
    /// divided by the header interval on each axis.
    ///
    /// # Errors
    ///
    /// [`DtedError::OutOfBounds`] if the coordinate lies outside the closed
    /// tile rectangle. The bound is checked on the raw interval ratio, before
    /// flooring, so a point any distance past the last grid line is rejected
    /// rather than floored back onto it.
    pub fn grid_indices(&self, point: LatLon) -> Result<(usize, usize)> {
        let lon_ratio = axis_ratio(
            point.longitude - self.origin.longitude,
            self.longitude_interval,
        );
        let lat_ratio = axis_ratio(point.latitude - self.origin.latitude, self.latitude_interval);

        let out_of_bounds = || DtedError::OutOfBounds {
            lat: point.latitude,
            lon: point.longitude,
        };
        if lon_ratio < 0.0 || lon_ratio > (self.longitude_lines - 1) as f64 {
            return Err(out_of_bounds());
        }
        if lat_ratio < 0.0 || lat_ratio > (self.latitude_points - 1) as f64 {
            return Err(out_of_bounds());
        }
        Ok((lon_ratio.floor() as usize, lat_ratio.floor() as usize))
    }

    /// Whether a coordinate lies within the closed tile rectangle.
    ///
    /// Points exactly on an edge are contained, consistently with
    /// [`grid_indices`](Self::grid_indices) accepting them.
    pub fn contains(&self, point: LatLon) -> bool {
        self.bounds().contains(point)
    }

    /// The rectangle spanned by the four corner samples.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.origin.latitude,
            self.origin.longitude,
            self.origin.latitude + (self.latitude_points - 1) as f64 * self.latitude_interval,
            self.origin.longitude + (self.longitude_lines - 1) as f64 * self.longitude_interval,
        )
    }
}

/// `delta / interval`, with near-integer ratios snapped to the whole number.
///
/// A coordinate exactly on a grid line can divide to one ulp below the whole
/// number; snapping keeps the exact-edge case indexable on every platform.
/// The caller bounds the ratio and floors it afterwards.
fn axis_ratio(delta: f64, interval: f64) -> f64 {
    let ratio = delta / interval;
    let nearest = ratio.round();
    if (ratio - nearest).abs() < 1e-9 {
        nearest
    } else {
        ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DataSetIdentification, UserHeaderLabel};
    use crate::testutil::TileSpec;

    fn index_for(spec: &TileSpec) -> TileIndex {
        let uhl = UserHeaderLabel::from_bytes(&spec.encode_uhl()).unwrap();
        let dsi = DataSetIdentification::from_bytes(&spec.encode_dsi()).unwrap();
        TileIndex::from_records(&uhl, &dsi).unwrap()
    }

    #[test]
    fn test_byte_offset_matches_sequential_sum() {
        let index = index_for(&TileSpec::dted2(41, -71).with_shape(12, 9));

        let mut running = DATA_OFFSET;
        for lon_index in 0..index.longitude_lines() {
            assert_eq!(index.byte_offset_of(lon_index), running);
            running += index.record_length();
        }
        assert_eq!(index.expected_file_length(), running);
    }

    #[test]
    fn test_record_length_from_header_count() {
        let index = index_for(&TileSpec::dted2(41, -71));
        assert_eq!(index.record_length(), 12 + 2 * 3601);
    }

    #[test]
    fn test_grid_indices_use_header_interval() {
        // 3-arc-second spacing: a coarse product must not be indexed with a
        // hard-coded 1-arc-second assumption.
        let index = index_for(&TileSpec::dted1(41, -71));
        assert_eq!(index.shape(), (1201, 1201));

        let (lon_index, lat_index) = index
            .grid_indices(LatLon::new(41.5, -70.5))
            .unwrap();
        assert_eq!(lon_index, 600);
        assert_eq!(lat_index, 600);

        let (lon_index, lat_index) = index
            .grid_indices(LatLon::new(41.0, -71.0))
            .unwrap();
        assert_eq!((lon_index, lat_index), (0, 0));
    }

    #[test]
    fn test_grid_indices_out_of_bounds() {
        let index = index_for(&TileSpec::dted2(41, -71));

        assert!(matches!(
            index.grid_indices(LatLon::new(39.0, -70.5)),
            Err(DtedError::OutOfBounds { .. })
        ));
        assert!(matches!(
            index.grid_indices(LatLon::new(41.5, -72.5)),
            Err(DtedError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_points_just_past_north_east_edge_rejected() {
        // A fraction of an interval beyond the last grid line must not floor
        // back onto it; such points are outside the tile.
        let index = index_for(&TileSpec::dted2(41, -71).with_shape(13, 10));
        let bounds = index.bounds();
        let half_interval = 0.5 / 3600.0;

        assert!(matches!(
            index.grid_indices(LatLon::new(bounds.max_lat + half_interval, -71.0)),
            Err(DtedError::OutOfBounds { .. })
        ));
        assert!(matches!(
            index.grid_indices(LatLon::new(41.0, bounds.max_lon + half_interval)),
            Err(DtedError::OutOfBounds { .. })
        ));

        // The edge itself stays in.
        assert!(index
            .grid_indices(LatLon::new(bounds.max_lat, bounds.max_lon))
            .is_ok());
    }

    #[test]
    fn test_contains_boundary_consistency() {
        let index = index_for(&TileSpec::dted2(41, -71));

        let inside = [
            LatLon::new(41.5, -70.5),
            LatLon::new(41.0, -71.0), // SW corner
            LatLon::new(42.0, -70.0), // NE corner
            LatLon::new(41.5, -70.25),
        ];
        for point in inside {
            assert!(index.contains(point), "{point} should be contained");
            assert!(index.grid_indices(point).is_ok(), "{point} should index");
        }

        let outside = [
            LatLon::new(39.0, -70.5),
            LatLon::new(42.001, -70.5),
            LatLon::new(41.5, -69.999),
        ];
        for point in outside {
            assert!(!index.contains(point), "{point} should not be contained");
            assert!(index.grid_indices(point).is_err());
        }
    }

    #[test]
    fn test_bounds_rectangle() {
        let index = index_for(&TileSpec::dted2(41, -71));
        assert_eq!(index.bounds(), BoundingBox::new(41.0, -71.0, 42.0, -70.0));
    }
}
