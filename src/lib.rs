//! # DTED - Terrain Elevation Library
//!
//! Memory-efficient library for parsing Digital Terrain Elevation Data
//! (DTED) files and querying terrain elevation.
//!
//! ## Features
//!
//! - **Two access modes**: parse the whole grid eagerly, or memory-map the
//!   file and decode one longitude line per lookup
//! - **Random access**: byte offsets are computed from the validated
//!   headers, so a single-point lookup never scans the file
//! - **Verified parsing**: per-record checksums and UHL/DSI cross-validation
//!   on by default, with explicit per-call opt-outs
//! - **Tile collections**: [`TileSet`] serves a directory of files through
//!   an LRU cache
//!
//! ## Quick Start
//!
//! ```ignore
//! use dted::{LatLon, Tile};
//!
//! // Metadata is always parsed; elevation data stays on disk.
//! let tile = Tile::open("/data/n41_w071_1arc_v3.dt2")?;
//! println!("cell origin: {}", tile.dsi().origin);
//!
//! let elevation = tile.get_elevation(LatLon::new(41.36, -70.55))?;
//! println!("Elevation: {}m", elevation);
//! ```
//!
//! ## DTED Data Format
//!
//! A DTED file is three fixed-layout metadata records followed by one data
//! record per longitude line:
//!
//! - **UHL** (80 bytes): origin, data intervals, grid shape
//! - **DSI** (648 bytes): production metadata plus a redundant copy of the
//!   geometry, cross-validated against the UHL
//! - **ACC** (2700 bytes): optional accuracy figures
//! - **Data records**: sentinel, block count, longitude index, latitude
//!   count, 2-byte signed-magnitude samples, 4-byte checksum
//!
//! Elevations are meters; the reserved value [`VOID_VALUE`] marks samples
//! with no data (common over open water). Void data is signalled once per
//! tile as a warning, never as an error.

pub mod data;
pub mod error;
pub mod index;
pub mod latlon;
pub mod records;
pub mod tile;
pub mod tileset;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types at crate root for convenience
pub use data::{decode_signed_magnitude, encode_signed_magnitude, DataRecord, VOID_VALUE};
pub use error::{DtedError, Result};
pub use index::TileIndex;
pub use latlon::{BoundingBox, LatLon};
pub use records::{AccuracyDescription, DataSetIdentification, UserHeaderLabel};
pub use tile::{ElevationGrid, LoadOptions, Tile};
pub use tileset::{CacheStats, TileSet};
