//! The three fixed-layout metadata records preceding the elevation data.
//!
//! A DTED file opens with a User Header Label (80 bytes), a Data Set
//! Identification record (648 bytes), and an Accuracy Description record
//! (2700 bytes). Each parser reads its own fixed region independently;
//! [`cross_validate`] then checks that the geometry the UHL and DSI both
//! carry actually agrees before any of it is trusted for index math.

mod acc;
mod dsi;
pub(crate) mod fields;
mod uhl;

pub use acc::{AccuracyDescription, ACC_OFFSET, ACC_SIZE};
pub use dsi::{DataSetIdentification, DSI_OFFSET, DSI_SIZE};
pub use fields::YearMonth;
pub use uhl::{UserHeaderLabel, UHL_SIZE};

use crate::error::{DtedError, Result};

/// Byte offset of the first data record: the three header regions combined.
pub const DATA_OFFSET: usize = UHL_SIZE + DSI_SIZE + ACC_SIZE;

/// Tolerance for comparing coordinates parsed from different header fields.
///
/// The UHL origin is whole arc-seconds while the DSI origin carries tenths,
/// so equality is only meaningful to within one tenth of an arc-second.
const ORIGIN_TOLERANCE: f64 = 0.1 / 3600.0;

/// Check that the UHL and DSI agree on grid geometry.
///
/// Shape, data intervals, and origin are stored in both records; a mismatch
/// means one of them cannot be trusted, so neither is.
pub(crate) fn cross_validate(
    uhl: &UserHeaderLabel,
    dsi: &DataSetIdentification,
) -> Result<()> {
    if uhl.shape != dsi.shape {
        return Err(DtedError::MalformedHeader {
            field: "shape",
            reason: format!(
                "UHL shape {:?} does not match DSI shape {:?}",
                uhl.shape, dsi.shape
            ),
        });
    }
    if uhl.longitude_interval != dsi.longitude_interval
        || uhl.latitude_interval != dsi.latitude_interval
    {
        return Err(DtedError::MalformedHeader {
            field: "data_interval",
            reason: format!(
                "UHL intervals ({}\", {}\") do not match DSI intervals ({}\", {}\")",
                uhl.longitude_interval,
                uhl.latitude_interval,
                dsi.longitude_interval,
                dsi.latitude_interval,
            ),
        });
    }
    let origin_delta = (uhl.origin.latitude - dsi.south_west_corner.latitude)
        .abs()
        .max((uhl.origin.longitude - dsi.south_west_corner.longitude).abs());
    if origin_delta > ORIGIN_TOLERANCE {
        return Err(DtedError::MalformedHeader {
            field: "origin",
            reason: format!(
                "UHL origin {} does not match DSI south-west corner {}",
                uhl.origin, dsi.south_west_corner
            ),
        });
    }
    Ok(())
}
