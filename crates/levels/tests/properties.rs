//! Property-based tests for the decoding pipeline.
//!
//! Generates tile grids and solid lists, then checks the structural
//! invariants the runtime depends on.

use crobot_levels::{
    build_collision_flags, encode_csv, parse_csv, AreaDecoder, LevelDefinition, LevelKey,
    TiledDecoder, COLLISION_SOLID,
};
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A grid of `(width, height, tiles)` with `tiles.len() == width * height`
fn arb_grid() -> impl Strategy<Value = (i32, i32, Vec<i32>)> {
    (0..12i32, 0..12i32).prop_flat_map(|(w, h)| {
        proptest::collection::vec(0..200i32, (w * h) as usize)
            .prop_map(move |tiles| (w, h, tiles))
    })
}

fn tiled_document(width: i32, height: i32, tiles: &[i32], solid: &[i32]) -> String {
    format!(
        r#"{{"width": {}, "height": {}, "layers": [{{"encoding": "csv", "data": "{}"}}], "solidGids": {:?}}}"#,
        width,
        height,
        encode_csv(tiles),
        solid
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// CSV round trip reproduces the grid exactly.
    #[test]
    fn csv_round_trip(tiles in proptest::collection::vec(any::<i32>(), 0..64)) {
        prop_assert_eq!(parse_csv(&encode_csv(&tiles)).unwrap(), tiles);
    }

    /// A well-formed raster document decodes to its tiles in source order.
    #[test]
    fn tiled_preserves_order((w, h, tiles) in arb_grid()) {
        let doc = tiled_document(w, h, &tiles, &[]);
        let decoded = TiledDecoder::decode(doc.as_bytes()).unwrap();

        prop_assert_eq!(decoded.tiles.len(), (w * h) as usize);
        prop_assert_eq!(decoded.tiles, tiles);
    }

    /// Mask length and solid bits follow the tiles and solid list.
    #[test]
    fn collision_mask_shape(
        tiles in proptest::collection::vec(-5..300i32, 0..64),
        solid in proptest::collection::vec(-5..300i32, 0..16),
    ) {
        let flags = build_collision_flags(&tiles, &solid).unwrap();

        let max_gid = tiles.iter().chain(&solid).copied().fold(0, i32::max);
        prop_assert_eq!(flags.len(), max_gid as usize + 1);

        for (gid, bits) in flags.iter().enumerate() {
            let expected = solid.contains(&(gid as i32));
            prop_assert_eq!(bits & COLLISION_SOLID != 0, expected, "gid {}", gid);
        }
    }

    /// Every assembled level satisfies tiles.len() == width * height.
    #[test]
    fn assembled_levels_are_consistent((w, h, tiles) in arb_grid(), solid in proptest::collection::vec(0..250i32, 0..8)) {
        let doc = tiled_document(w, h, &tiles, &solid);
        let decoded = TiledDecoder::decode(doc.as_bytes()).unwrap();
        let level = LevelDefinition::assemble(LevelKey::new(1, 1), decoded).unwrap();

        prop_assert_eq!(level.tiles().len(), (level.width() * level.height()) as usize);
        for gid in &solid {
            prop_assert!(level.is_solid(*gid));
        }
    }

    /// Area expansion emits each column `repeat` times as a contiguous block.
    #[test]
    fn area_column_blocks(
        height in 1..8i32,
        columns in proptest::collection::vec((1..4i32, proptest::collection::vec(0..50i32, 0..10)), 1..6),
    ) {
        let column_json: Vec<String> = columns
            .iter()
            .map(|(repeat, metatile)| format!(r#"{{"repeat": {}, "metatile": {:?}}}"#, repeat, metatile))
            .collect();
        let doc = format!(r#"{{"height": {}, "columns": [{}]}}"#, height, column_json.join(","));

        let decoded = AreaDecoder::decode(doc.as_bytes()).unwrap();

        let mut expected = Vec::new();
        for (repeat, metatile) in &columns {
            let mut template = vec![0; height as usize];
            for (row, gid) in metatile.iter().take(height as usize).enumerate() {
                template[row] = *gid;
            }
            for _ in 0..*repeat {
                expected.extend_from_slice(&template);
            }
        }

        let total_repeat: i32 = columns.iter().map(|(repeat, _)| *repeat).sum();
        prop_assert_eq!(decoded.width, total_repeat);
        prop_assert_eq!(decoded.tiles, expected);
    }
}
