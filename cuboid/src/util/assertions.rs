use itertools::Itertools;
use log::error;

use crate::entities::{Container, Instance, OccupancyGrid, Placement, Solution};

//Various checks to verify correctness of the state of the system
//Used in debug_assert!() blocks and tests

/// No two placements intersect on all three axes simultaneously.
pub fn placements_are_disjoint(placements: &[Placement]) -> bool {
    for (p1, p2) in placements.iter().tuple_combinations() {
        if p1.overlaps(p2) {
            error!("placements {p1} and {p2} overlap");
            return false;
        }
    }
    true
}

/// Every placement lies within the bounds of the container.
pub fn placements_within_bounds(container: &Container, placements: &[Placement]) -> bool {
    placements.iter().all(|p| {
        let inside = container.contains((p.x, p.y, p.z), p.orientation());
        if !inside {
            error!("placement {p} exceeds the container {container:?}");
        }
        inside
    })
}

/// The occupied cells of the grid are exactly the union of its logged placements.
pub fn grid_is_consistent(grid: &OccupancyGrid) -> bool {
    let placements = grid.placements();
    let placed_volume = placements.iter().map(|p| p.volume()).sum::<usize>();

    if placed_volume != grid.occupied_cells() {
        error!(
            "placed volume ({placed_volume}) does not match the occupied cells ({})",
            grid.occupied_cells()
        );
        return false;
    }

    let placements_occupied = placements.iter().all(|p| {
        (p.x..p.x + p.w)
            .cartesian_product(p.y..p.y + p.h)
            .cartesian_product(p.z..p.z + p.d)
            .all(|((x, y), z)| grid.is_occupied(x, y, z))
    });

    placements_occupied
        && placements_are_disjoint(placements)
        && placements_within_bounds(&grid.container, placements)
}

/// The solution is geometrically valid for the instance and its utilization matches the placed volume.
/// Every placement must refer to an item of the instance, placed in one of its orientations, at most once.
pub fn solution_is_valid(instance: &Instance, solution: &Solution) -> bool {
    let items_valid = solution.placements.iter().all(|p| {
        instance
            .items
            .iter()
            .find(|item| item.id == p.item_id)
            .is_some_and(|item| item.orientations.contains(&p.orientation()))
    });
    let ids_unique = solution.placements.iter().map(|p| p.item_id).all_unique();

    let expected_util =
        solution.placed_volume() as f64 / instance.container.volume() as f64 * 100.0;
    let util_matches = (expected_util - solution.utilization).abs() < 1e-9;

    items_valid
        && ids_unique
        && util_matches
        && (0.0..=100.0).contains(&solution.utilization)
        && placements_are_disjoint(&solution.placements)
        && placements_within_bounds(&instance.container, &solution.placements)
}
