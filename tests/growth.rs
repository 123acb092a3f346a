//! Growth-from-seed construction

mod common;

use common::{color_only_config, edge_coded_field, edge_coded_geometry};
use seamtile::algorithm::growth::{GrowthBuilder, GrowthStep};
use seamtile::analysis::signatures::SignatureSet;
use seamtile::io::configuration::SolverConfig;

#[test]
fn a_permissive_threshold_grows_the_whole_board_in_tile_count_steps() {
    let geometry = edge_coded_geometry(3, 3);
    let field = edge_coded_field(
        3,
        3,
        &[0.1, 0.9, 0.3, 0.7, 0.5, 0.2, 0.8, 0.4, 0.6],
    );
    let signatures = SignatureSet::build(&field, geometry);
    let config = SolverConfig {
        grow_match_threshold: 1e9,
        toroidal_x: false,
        toroidal_y: false,
        ..color_only_config()
    };
    let mut growth = GrowthBuilder::new(field, geometry, signatures, config, 5);

    let mut placements = 0usize;
    loop {
        match growth.step() {
            GrowthStep::Placed { pos, tile } => {
                placements += 1;
                // the placed tile left the unused set and landed on the board
                assert!(!growth.is_unused(tile));
                assert_eq!(growth.board().placement(pos).tile(), Some(tile));
                assert_eq!(growth.unused_count(), geometry.tile_count() - placements);
            }
            GrowthStep::Relaxed => unreachable!("threshold admits everything"),
            GrowthStep::Complete => break,
        }
    }
    assert_eq!(placements, geometry.tile_count());
    assert!(growth.board().is_full_permutation(geometry.tile_count()));
}

#[test]
fn an_impossible_threshold_relaxes_until_placement_succeeds() {
    let geometry = edge_coded_geometry(2, 2);
    // all tile lightnesses are distinct, so every seam costs well above zero
    let field = edge_coded_field(2, 2, &[0.0, 1.0, 0.3, 0.7]);
    let signatures = SignatureSet::build(&field, geometry);
    let config = SolverConfig {
        grow_match_threshold: 1e-12,
        toroidal_x: false,
        toroidal_y: false,
        ..color_only_config()
    };
    let mut growth = GrowthBuilder::new(field, geometry, signatures, config, 3);

    // the seed ignores the threshold
    assert!(matches!(growth.step(), GrowthStep::Placed { .. }));

    let before = growth.threshold();
    let mut relaxed = 0usize;
    for _ in 0..10_000 {
        match growth.step() {
            GrowthStep::Relaxed => relaxed += 1,
            GrowthStep::Placed { .. } => break,
            GrowthStep::Complete => unreachable!("tiles remain unplaced"),
        }
    }
    assert!(relaxed > 0);
    assert!(growth.threshold() > before);
}

#[test]
fn growth_eventually_completes_even_from_a_tiny_threshold() {
    let geometry = edge_coded_geometry(2, 2);
    let field = edge_coded_field(2, 2, &[0.0, 1.0, 0.3, 0.7]);
    let signatures = SignatureSet::build(&field, geometry);
    let config = SolverConfig {
        grow_match_threshold: 1e-12,
        ..color_only_config()
    };
    let mut growth = GrowthBuilder::new(field, geometry, signatures, config, 8);

    for _ in 0..100_000 {
        if growth.step() == GrowthStep::Complete {
            break;
        }
    }
    assert_eq!(growth.unused_count(), 0);
    assert!(growth.board().is_full_permutation(geometry.tile_count()));
}
