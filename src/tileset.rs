//! A collection of DTED tiles served from a directory.
//!
//! [`TileSet`] scans a directory tree for `.dt1`/`.dt2` files, indexes each
//! file by the whole-degree south-west corner read from its User Header
//! Label, and answers elevation queries through an LRU cache of lazily
//! opened tiles. Only the 80-byte UHL of each file is read at scan time.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;

use crate::data::VOID_VALUE;
use crate::error::Result;
use crate::latlon::LatLon;
use crate::records::{UserHeaderLabel, UHL_SIZE};
use crate::tile::Tile;

/// Statistics about tile cache usage.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of tiles currently held open in the cache.
    pub entry_count: u64,
    /// Number of lookups served from an already-open tile.
    pub hit_count: u64,
    /// Number of lookups that had to open a tile.
    pub miss_count: u64,
}

impl CacheStats {
    /// Cache hit rate from 0.0 to 1.0; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// A directory of DTED files with cached, on-demand tile access.
///
/// # Example
///
/// ```ignore
/// use dted::{LatLon, TileSet};
///
/// let tiles = TileSet::open("/data/dted", 16)?;
/// match tiles.get_elevation(LatLon::new(41.36, -70.55))? {
///     Some(elevation) => println!("Elevation: {}m", elevation),
///     None => println!("no data here"),
/// }
/// ```
pub struct TileSet {
    /// Files indexed by the whole-degree south-west corner of their cell.
    files: HashMap<(i32, i32), PathBuf>,
    /// LRU cache of lazily opened tiles, sharing the file index keys.
    cache: Cache<(i32, i32), Arc<Tile>>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl TileSet {
    /// Scan `root` recursively for `.dt1`/`.dt2` files and build the index.
    ///
    /// Each candidate file contributes only its 80-byte UHL at this stage;
    /// files whose UHL does not parse are skipped with a warning rather than
    /// failing the whole scan. `cache_size` bounds how many tiles stay open.
    pub fn open<P: AsRef<Path>>(root: P, cache_size: u64) -> Result<Self> {
        let mut files = HashMap::new();
        scan_directory(root.as_ref(), &mut files)?;

        tracing::debug!(
            root = %root.as_ref().display(),
            tiles = files.len(),
            "indexed DTED directory"
        );

        Ok(Self {
            files,
            cache: Cache::builder().max_capacity(cache_size).build(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        })
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the scan found no DTED files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Elevation in meters at `point`, or `None` when no tile covers the
    /// point or the covering sample is void.
    ///
    /// # Errors
    ///
    /// Propagates tile parse failures (malformed headers, checksum errors);
    /// a missing tile is not an error.
    pub fn get_elevation(&self, point: LatLon) -> Result<Option<i16>> {
        let tile = match self.get_tile(point)? {
            Some(tile) => tile,
            None => return Ok(None),
        };
        let elevation = tile.get_elevation(point)?;
        Ok(if elevation == VOID_VALUE {
            None
        } else {
            Some(elevation)
        })
    }

    /// The tile covering `point`, opened lazily through the cache, or `None`
    /// if no indexed file covers it.
    ///
    /// A point exactly on a cell edge keys to the cell north/east of the one
    /// whose closed bounds contain it, so the south/west neighbours are tried
    /// as well before giving up.
    pub fn get_tile(&self, point: LatLon) -> Result<Option<Arc<Tile>>> {
        for key in candidate_cells(point) {
            let path = match self.files.get(&key) {
                Some(path) => path,
                None => continue,
            };

            let tile = match self.cache.get(&key) {
                Some(tile) => {
                    self.hit_count.fetch_add(1, Ordering::Relaxed);
                    tile
                }
                None => {
                    self.miss_count.fetch_add(1, Ordering::Relaxed);
                    let tile = Arc::new(Tile::open(path)?);
                    self.cache.insert(key, tile.clone());
                    tile
                }
            };
            if tile.contains(point) {
                return Ok(Some(tile));
            }
        }
        Ok(None)
    }

    /// Whether any indexed tile covers `point`.
    pub fn contains(&self, point: LatLon) -> bool {
        matches!(self.get_tile(point), Ok(Some(_)))
    }

    /// Current cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            entry_count: self.cache.entry_count(),
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
        }
    }

    /// Drop every cached tile; the file index is unaffected.
    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }
}

/// Cache/index key: the whole-degree cell containing the point.
///
/// DTED cells span one degree on each axis, so the floor of the coordinate
/// identifies the covering file.
fn cell_key(point: LatLon) -> (i32, i32) {
    (
        point.latitude.floor() as i32,
        point.longitude.floor() as i32,
    )
}

/// Cells whose closed bounds may cover the point: the keyed cell, plus the
/// south/west neighbours when the point lies exactly on a whole-degree edge.
fn candidate_cells(point: LatLon) -> Vec<(i32, i32)> {
    let (lat, lon) = cell_key(point);
    let lat_on_edge = point.latitude == point.latitude.floor();
    let lon_on_edge = point.longitude == point.longitude.floor();

    let mut cells = vec![(lat, lon)];
    if lat_on_edge {
        cells.push((lat - 1, lon));
    }
    if lon_on_edge {
        cells.push((lat, lon - 1));
    }
    if lat_on_edge && lon_on_edge {
        cells.push((lat - 1, lon - 1));
    }
    cells
}

fn is_dted_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("dt1") || ext.eq_ignore_ascii_case("dt2")
    )
}

/// Recursive directory walk collecting DTED files by south-west corner.
fn scan_directory(dir: &Path, files: &mut HashMap<(i32, i32), PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_directory(&path, files)?;
        } else if is_dted_file(&path) {
            match peek_origin(&path) {
                Ok(origin) => {
                    let key = cell_key(origin);
                    files.insert(key, path);
                }
                Err(error) => {
                    tracing::warn!(
                        path = %path.display(),
                        %error,
                        "skipping unreadable DTED file"
                    );
                }
            }
        }
    }
    Ok(())
}

/// Read just the UHL of a file and return its origin.
fn peek_origin(path: &Path) -> Result<LatLon> {
    let mut header = [0u8; UHL_SIZE];
    File::open(path)?.read_exact(&mut header)?;
    Ok(UserHeaderLabel::from_bytes(&header)?.origin)
}
