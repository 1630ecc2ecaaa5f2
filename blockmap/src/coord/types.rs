//! Coordinate types shared by the mapper, the renderer and the tile cache.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of blocks along one edge of a chunk.
pub const BLOCKS_PER_CHUNK: u32 = 16;

/// Number of blocks along one edge of a region file.
pub const BLOCKS_PER_REGION: u32 = 256;

/// Errors from parsing coordinate values given on the command line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoordError {
    #[error("Unknown dimension '{0}' (expected one of: overworld, nether, end)")]
    UnknownDimension(String),
}

/// Identifier of a tile on the infinite tile grid.
///
/// The grid has no bounds. Positive `y` is "up" on the map, which becomes
/// negative Z in the world (see [`super::tile_area`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    pub x: i64,
    pub y: i64,
}

impl TileId {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Vertical world layer a render targets.
///
/// The discriminant is the value passed to the rendering tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    Nether = -1,
    #[default]
    Overworld = 0,
    End = 1,
}

impl Dimension {
    /// Numeric identifier understood by uNmINeD's `--dimension` flag.
    pub fn id(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Nether => write!(f, "nether"),
            Dimension::Overworld => write!(f, "overworld"),
            Dimension::End => write!(f, "end"),
        }
    }
}

impl FromStr for Dimension {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nether" | "-1" => Ok(Dimension::Nether),
            "overworld" | "0" => Ok(Dimension::Overworld),
            "end" | "1" => Ok(Dimension::End),
            other => Err(CoordError::UnknownDimension(other.to_string())),
        }
    }
}

/// World distance unit accepted by the rendering tool's area syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "b")]
    Block,
    #[serde(rename = "c")]
    Chunk,
    #[serde(rename = "r")]
    Region,
}

impl DistanceUnit {
    /// One-letter tag used as the area prefix, e.g. the `c` in `c(0,0,1,1)`.
    pub fn tag(self) -> &'static str {
        match self {
            DistanceUnit::Block => "b",
            DistanceUnit::Chunk => "c",
            DistanceUnit::Region => "r",
        }
    }

    /// Number of blocks covered by one unit along an axis.
    pub fn blocks(self) -> u32 {
        match self {
            DistanceUnit::Block => 1,
            DistanceUnit::Chunk => BLOCKS_PER_CHUNK,
            DistanceUnit::Region => BLOCKS_PER_REGION,
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Footprint of a single tile (at lod -1) in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSize {
    pub x: f64,
    pub y: f64,
    pub unit: DistanceUnit,
}

impl TileSize {
    pub fn new(x: f64, y: f64, unit: DistanceUnit) -> Self {
        Self { x, y, unit }
    }

    /// Tile footprint converted to blocks, as `(x, y)`.
    pub fn blocks(&self) -> (f64, f64) {
        let per_unit = f64::from(self.unit.blocks());
        (self.x * per_unit, self.y * per_unit)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::new(16.0, 16.0, DistanceUnit::Chunk)
    }
}

/// Rectangle in world space, in the units of its [`DistanceUnit`].
///
/// Formats as the tool's area argument: `<unit>(x,y,dx,dy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldArea {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub unit: DistanceUnit,
}

impl fmt::Display for WorldArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({},{},{},{})",
            self.unit,
            Number(self.x),
            Number(self.y),
            Number(self.dx),
            Number(self.dy)
        )
    }
}

/// Prints whole numbers without a fraction and folds `-0` into `0`.
struct Number(f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        write!(f, "{}", value)
    }
}
