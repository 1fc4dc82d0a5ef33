//! DTED tile parsing and elevation extraction.
//!
//! This module provides the [`Tile`] struct for reading DTED `.dt1`/`.dt2`
//! files and looking up terrain elevation at specific coordinates, either
//! from a fully parsed in-memory grid or straight from a memory-mapped file.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use memmap2::Mmap;

use crate::data::{DataRecord, VOID_VALUE};
use crate::error::{DtedError, Result};
use crate::index::TileIndex;
use crate::latlon::{BoundingBox, LatLon};
use crate::records::{
    AccuracyDescription, DataSetIdentification, UserHeaderLabel, ACC_OFFSET, ACC_SIZE, DSI_OFFSET,
    UHL_SIZE,
};

/// Per-call parsing options.
///
/// Both switches default to on; disabling checksum verification is an
/// explicit trade of safety for throughput, and suppressing the void signal
/// silences the once-per-tile warning without changing any returned value.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Verify the 4-byte checksum of every parsed data record.
    pub verify_checksums: bool,
    /// Emit a warning the first time a void sample is seen in this tile.
    pub signal_void: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verify_checksums: true,
            signal_void: true,
        }
    }
}

/// A fully materialized elevation grid, indexed `[longitude line][latitude sample]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationGrid {
    samples: Vec<i16>,
    longitude_lines: usize,
    latitude_points: usize,
}

impl ElevationGrid {
    /// Grid shape as (longitude-line count, latitude-point count).
    pub fn shape(&self) -> (usize, usize) {
        (self.longitude_lines, self.latitude_points)
    }

    /// Elevation at a (longitude line, latitude sample) index pair.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the grid shape.
    pub fn get(&self, longitude_index: usize, latitude_index: usize) -> i16 {
        assert!(longitude_index < self.longitude_lines && latitude_index < self.latitude_points);
        self.samples[longitude_index * self.latitude_points + latitude_index]
    }

    /// All samples in row-major (longitude line first) order.
    pub fn as_slice(&self) -> &[i16] {
        &self.samples
    }

    /// Largest non-void elevation in the grid, if any sample carries data.
    pub fn max_elevation(&self) -> Option<i16> {
        self.samples
            .iter()
            .copied()
            .filter(|&sample| sample != VOID_VALUE)
            .max()
    }
}

/// Backing storage of a tile, fixed at construction.
#[derive(Debug)]
enum Backing {
    /// Every data record parsed into memory; the file is closed.
    Grid(ElevationGrid),
    /// Metadata only; data records decode on demand from the mapping.
    Mapped(Mmap),
}

/// An open DTED tile.
///
/// The three metadata records are always parsed eagerly at construction and
/// cross-validated; elevation data is either parsed up front ([`Tile::load`])
/// or decoded one longitude line at a time from a read-only memory map
/// ([`Tile::open`]). Both modes answer [`get_elevation`](Self::get_elevation)
/// with identical values.
///
/// Lazy lookups are positioned reads against the map, so a `Tile` can serve
/// them from multiple threads at once.
///
/// # Example
///
/// ```ignore
/// use dted::{LatLon, Tile};
///
/// let tile = Tile::open("n41_w071_1arc_v3.dt2")?;
/// let elevation = tile.get_elevation(LatLon::new(41.36, -70.55))?;
/// println!("Elevation: {}m", elevation);
/// ```
#[derive(Debug)]
pub struct Tile {
    path: PathBuf,
    uhl: UserHeaderLabel,
    dsi: DataSetIdentification,
    acc: AccuracyDescription,
    index: TileIndex,
    backing: Backing,
    /// Set once, the first time a void sample is observed.
    void_seen: AtomicBool,
}

impl Tile {
    /// Open a tile lazily: parse and validate the metadata records, keep the
    /// file memory-mapped, and defer all data-record parsing to lookups.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or mapped, if any header region is
    /// malformed or inconsistent, or if the file is shorter than the headers
    /// imply. Construction never yields a partially valid tile.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;

        // SAFETY: the file is opened read-only and the mapping is never
        // exposed mutably. Truncation by another process while mapped is
        // outside the library's control, as with any mmap consumer.
        let mmap = unsafe { Mmap::map(&file)? };

        Self::from_mapping(path.as_ref().to_path_buf(), mmap)
    }

    /// Open a tile eagerly: parse the metadata and every data record into an
    /// in-memory grid, then close the file. Uses default [`LoadOptions`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, LoadOptions::default())
    }

    /// Open a tile eagerly with explicit per-load options.
    ///
    /// # Errors
    ///
    /// In addition to the failures of [`Tile::open`], fails with
    /// [`DtedError::Checksum`] or [`DtedError::InvalidRecord`] if any data
    /// record is corrupt (checksum failures only when verification is on).
    pub fn load_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let mut tile = Self::open(path)?;

        let mapped = match &tile.backing {
            Backing::Mapped(mmap) => mmap,
            Backing::Grid(_) => unreachable!("open always maps"),
        };

        let (longitude_lines, latitude_points) = tile.index.shape();
        let record_length = tile.index.record_length();
        let mut samples = Vec::with_capacity(longitude_lines * latitude_points);
        let mut void_found = false;
        for longitude_index in 0..longitude_lines {
            let offset = tile.index.byte_offset_of(longitude_index);
            let record = DataRecord::parse(
                &mapped[offset..offset + record_length],
                latitude_points,
                options.verify_checksums,
            )?;
            void_found |= record.has_void_data();
            samples.extend_from_slice(&record.elevations);
        }

        if void_found {
            tile.signal_void(options.signal_void);
        }
        tile.backing = Backing::Grid(ElevationGrid {
            samples,
            longitude_lines,
            latitude_points,
        });
        Ok(tile)
    }

    fn from_mapping(path: PathBuf, mmap: Mmap) -> Result<Self> {
        if mmap.len() < ACC_OFFSET + ACC_SIZE {
            return Err(DtedError::TruncatedFile {
                expected: ACC_OFFSET + ACC_SIZE,
                actual: mmap.len(),
            });
        }

        let uhl = UserHeaderLabel::from_bytes(&mmap[..UHL_SIZE])?;
        let dsi = DataSetIdentification::from_bytes(&mmap[DSI_OFFSET..ACC_OFFSET])?;
        let acc = AccuracyDescription::from_bytes(&mmap[ACC_OFFSET..ACC_OFFSET + ACC_SIZE])?;
        let index = TileIndex::from_records(&uhl, &dsi)?;

        let expected = index.expected_file_length();
        if mmap.len() < expected {
            return Err(DtedError::TruncatedFile {
                expected,
                actual: mmap.len(),
            });
        }

        tracing::debug!(
            path = %path.display(),
            shape = ?index.shape(),
            origin = %index.origin(),
            "opened DTED tile"
        );

        Ok(Self {
            path,
            uhl,
            dsi,
            acc,
            index,
            backing: Backing::Mapped(mmap),
            void_seen: AtomicBool::new(false),
        })
    }

    /// Elevation in meters at the grid point covering `point`, using default
    /// [`LoadOptions`].
    ///
    /// Returns [`VOID_VALUE`] where the file records no data.
    pub fn get_elevation(&self, point: LatLon) -> Result<i16> {
        self.get_elevation_with(point, LoadOptions::default())
    }

    /// Elevation lookup with explicit per-call options.
    ///
    /// In eager mode this indexes the in-memory grid; in lazy mode it seeks
    /// to the one data record covering `point` and decodes only that line.
    ///
    /// # Errors
    ///
    /// [`DtedError::OutOfBounds`] if the coordinate lies outside the tile;
    /// in lazy mode, also any data-record parse failure. A failed lookup
    /// leaves the tile usable.
    pub fn get_elevation_with(&self, point: LatLon, options: LoadOptions) -> Result<i16> {
        let (longitude_index, latitude_index) = self.index.grid_indices(point)?;

        let elevation = match &self.backing {
            Backing::Grid(grid) => grid.get(longitude_index, latitude_index),
            Backing::Mapped(mmap) => {
                let offset = self.index.byte_offset_of(longitude_index);
                let record = DataRecord::parse(
                    &mmap[offset..offset + self.index.record_length()],
                    self.index.latitude_points(),
                    options.verify_checksums,
                )?;
                record.elevations[latitude_index]
            }
        };

        if elevation == VOID_VALUE {
            self.signal_void(options.signal_void);
        }
        Ok(elevation)
    }

    /// Whether the coordinate is covered by this tile.
    ///
    /// Pure arithmetic on header fields; never touches elevation data.
    pub fn contains(&self, point: LatLon) -> bool {
        self.index.contains(point)
    }

    /// The closed rectangle covered by the tile.
    pub fn bounds(&self) -> BoundingBox {
        self.index.bounds()
    }

    /// The parsed User Header Label.
    pub fn uhl(&self) -> &UserHeaderLabel {
        &self.uhl
    }

    /// The parsed Data Set Identification record.
    pub fn dsi(&self) -> &DataSetIdentification {
        &self.dsi
    }

    /// The parsed Accuracy Description record.
    pub fn acc(&self) -> &AccuracyDescription {
        &self.acc
    }

    /// The coordinate-to-offset index derived from the headers.
    pub fn index(&self) -> &TileIndex {
        &self.index
    }

    /// The file this tile was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory grid, if the tile was opened eagerly.
    pub fn grid(&self) -> Option<&ElevationGrid> {
        match &self.backing {
            Backing::Grid(grid) => Some(grid),
            Backing::Mapped(_) => None,
        }
    }

    /// Whether a void sample has been observed in this tile so far.
    ///
    /// After an eager load this covers the whole grid; in lazy mode it
    /// reflects only the records decoded by lookups to date.
    pub fn has_void_data(&self) -> bool {
        self.void_seen.load(Ordering::Relaxed)
    }

    /// Record a void observation, warning at most once per tile.
    fn signal_void(&self, signal: bool) {
        let already_seen = self.void_seen.swap(true, Ordering::Relaxed);
        if signal && !already_seen {
            tracing::warn!(
                path = %self.path.display(),
                void_value = VOID_VALUE,
                "void samples present; this is common over open water, \
                 not a parse failure"
            );
        }
    }
}
