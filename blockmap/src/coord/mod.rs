//! Coordinate conversion module
//!
//! Maps tile grid identifiers onto world-space rectangles expressed in the
//! unit system of the uNmINeD renderer.

mod types;

pub use types::{
    CoordError, Dimension, DistanceUnit, TileId, TileSize, WorldArea, BLOCKS_PER_CHUNK,
    BLOCKS_PER_REGION,
};

/// Level of detail requested by the HTTP endpoint (most zoomed in).
pub const DEFAULT_LOD: i32 = -1;

/// Converts a tile id and level of detail into the world area it covers.
///
/// The tile grid's Y axis is flipped relative to the world, so positive tile
/// rows map to negative world coordinates. The footprint grows linearly with
/// `-lod`; no rounding or bounds checks are applied.
#[inline]
pub fn tile_area(tile_size: &TileSize, id: TileId, lod: i32) -> WorldArea {
    let lod = f64::from(lod);
    WorldArea {
        x: tile_size.x * id.x as f64,
        y: tile_size.y * -(id.y as f64),
        dx: tile_size.x * -lod,
        dy: tile_size.y * -lod,
        unit: tile_size.unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn blocks(size: f64) -> TileSize {
        TileSize::new(size, size, DistanceUnit::Block)
    }

    #[test]
    fn test_area_table() {
        let cases = [
            (blocks(256.0), TileId::new(2, -3), 1, (512.0, 768.0, -256.0, -256.0)),
            (blocks(256.0), TileId::new(0, 0), -1, (0.0, 0.0, 256.0, 256.0)),
            (
                TileSize::new(16.0, 16.0, DistanceUnit::Chunk),
                TileId::new(-1, 4),
                -2,
                (-16.0, -64.0, 32.0, 32.0),
            ),
            (
                TileSize::new(1.0, 2.0, DistanceUnit::Region),
                TileId::new(3, 1),
                0,
                (3.0, -2.0, 0.0, 0.0),
            ),
        ];

        for (size, id, lod, (x, y, dx, dy)) in cases {
            let area = tile_area(&size, id, lod);
            assert_eq!(area.x, x, "x for {} lod {}", id, lod);
            assert_eq!(area.y, y, "y for {} lod {}", id, lod);
            assert_eq!(area.dx, dx, "dx for {} lod {}", id, lod);
            assert_eq!(area.dy, dy, "dy for {} lod {}", id, lod);
            assert_eq!(area.unit, size.unit);
        }
    }

    #[test]
    fn test_area_string() {
        let area = tile_area(&blocks(256.0), TileId::new(2, -3), 1);
        assert_eq!(area.to_string(), "b(512,768,-256,-256)");
    }

    #[test]
    fn test_area_string_origin_at_default_lod() {
        let size = TileSize::default();
        let area = tile_area(&size, TileId::new(0, 0), DEFAULT_LOD);
        assert_eq!(area.to_string(), "c(0,0,16,16)");
    }

    #[test]
    fn test_fractional_tile_size_passes_through() {
        let size = TileSize::new(0.5, 0.5, DistanceUnit::Region);
        let area = tile_area(&size, TileId::new(3, 3), DEFAULT_LOD);
        assert_eq!(area.to_string(), "r(1.5,-1.5,0.5,0.5)");
    }

    proptest! {
        #[test]
        fn prop_area_matches_formula(
            x in -100_000i64..100_000,
            y in -100_000i64..100_000,
            lod in -8i32..8,
            sx in 1u32..512,
            sy in 1u32..512,
        ) {
            let size = TileSize::new(f64::from(sx), f64::from(sy), DistanceUnit::Block);
            let area = tile_area(&size, TileId::new(x, y), lod);

            prop_assert_eq!(area.x, f64::from(sx) * x as f64);
            prop_assert_eq!(area.y, -(f64::from(sy) * y as f64));
            prop_assert_eq!(area.dx, -(f64::from(sx) * f64::from(lod)));
            prop_assert_eq!(area.dy, -(f64::from(sy) * f64::from(lod)));
        }
    }
}
