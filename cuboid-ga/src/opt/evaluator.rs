use cuboid::entities::{Container, OccupancyGrid, Orientation, Solution};
use cuboid::util::assertions;
use itertools::iproduct;

use crate::opt::arrangement::Arrangement;

/// Position of the minimum corner of a box inside the container
pub type Position = (usize, usize, usize);

/// Greedily places the items of the arrangement, in order, in a fresh [`OccupancyGrid`] of the container.
///
/// Every item is placed at the first free position found by [`find_position`].
/// Processing stops at the first item for which no position exists, the result then holds the
/// placements made so far and is not `fully_placed`.
/// If the items together exceed the volume of the container, nothing is attempted at all.
pub fn evaluate(container: Container, arrangement: &Arrangement) -> Solution {
    if arrangement.total_item_volume() > container.volume() {
        return Solution::empty();
    }

    let mut grid = OccupancyGrid::new(container);
    let mut fully_placed = true;

    for gene in &arrangement.genes {
        match find_position(&grid, gene.orientation) {
            Some((x, y, z)) => {
                grid.place(gene.item.id, x, y, z, gene.orientation);
            }
            None => {
                fully_placed = false;
                break;
            }
        }
    }

    debug_assert!(assertions::grid_is_consistent(&grid));

    Solution {
        utilization: grid.utilization(),
        placements: grid.into_placements(),
        fully_placed,
    }
}

/// Searches a free position for a box with extents `o`, in three increasingly expensive tiers:
/// candidate points against existing placements, a coarse scan and finally an exhaustive scan.
pub fn find_position(grid: &OccupancyGrid, o: Orientation) -> Option<Position> {
    let step = coarse_step(&grid.container);
    first_fitting_candidate(grid, o)
        .or_else(|| scan(grid, o, step))
        .or_else(|| match step > 1 {
            true => scan(grid, o, 1),
            false => None,
        })
}

/// The origin, followed by the points just past every placement along the x, y and z axis (in placement order).
/// Points where the box would exceed the container are left out.
pub fn candidate_points(grid: &OccupancyGrid, o: Orientation) -> impl Iterator<Item = Position> + '_ {
    let adjacent = grid.placements().iter().flat_map(|p| {
        [
            (p.x + p.w, p.y, p.z),
            (p.x, p.y + p.h, p.z),
            (p.x, p.y, p.z + p.d),
        ]
    });

    std::iter::once((0, 0, 0))
        .chain(adjacent)
        .filter(move |&pos| grid.container.contains(pos, o))
}

/// First candidate point at which the box fits (first-fit, not best-fit).
pub fn first_fitting_candidate(grid: &OccupancyGrid, o: Orientation) -> Option<Position> {
    candidate_points(grid, o).find(|&(x, y, z)| grid.fits(x, y, z, o))
}

/// Scans the container with the given step, x ascending, then y, then z, and returns the first position where the box fits.
pub fn scan(grid: &OccupancyGrid, o: Orientation, step: usize) -> Option<Position> {
    let c = &grid.container;
    let x_max = c.width.checked_sub(o.w)?;
    let y_max = c.height.checked_sub(o.h)?;
    let z_max = c.depth.checked_sub(o.d)?;

    iproduct!(
        (0..=x_max).step_by(step),
        (0..=y_max).step_by(step),
        (0..=z_max).step_by(step)
    )
    .find(|&(x, y, z)| grid.fits(x, y, z, o))
}

/// Step of the coarse scan: a quarter of the smallest container dimension, at least 1.
pub fn coarse_step(container: &Container) -> usize {
    usize::max(1, container.min_dim() / 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opt::arrangement::Gene;
    use cuboid::entities::{Item, Placement};
    use float_cmp::approx_eq;
    use itertools::Itertools;
    use test_case::test_case;

    fn container(w: usize, h: usize, d: usize) -> Container {
        Container::new(w, h, d).unwrap()
    }

    fn items(dims: &[(usize, usize, usize)]) -> Vec<Item> {
        dims.iter()
            .enumerate()
            .map(|(i, &(w, h, d))| Item::new(i as u64, Orientation::new(w, h, d)).unwrap())
            .collect()
    }

    fn arrangement(items: &[Item]) -> Arrangement<'_> {
        Arrangement::new(items.iter().map(|i| Gene::new(i, i.dims)).collect())
    }

    #[test_case((4, 4, 4), 1; "small container")]
    #[test_case((8, 9, 10), 2; "medium container")]
    #[test_case((30, 20, 10), 2; "example container")]
    #[test_case((100, 1, 100), 1; "flat container")]
    fn coarse_step_is_quarter_of_min_dim(dims: (usize, usize, usize), expected: usize) {
        assert_eq!(coarse_step(&container(dims.0, dims.1, dims.2)), expected);
    }

    #[test]
    fn candidates_follow_placement_order() {
        let mut grid = OccupancyGrid::new(container(10, 10, 10));
        grid.place(0, 0, 0, 0, Orientation::new(2, 3, 4));
        grid.place(1, 2, 0, 0, Orientation::new(1, 1, 1));

        let candidates = candidate_points(&grid, Orientation::new(1, 1, 1)).collect_vec();
        assert_eq!(
            candidates,
            vec![
                (0, 0, 0),
                (2, 0, 0),
                (0, 3, 0),
                (0, 0, 4),
                (3, 0, 0),
                (2, 1, 0),
                (2, 0, 1)
            ]
        );
    }

    #[test]
    fn candidates_exceeding_the_container_are_dropped() {
        let mut grid = OccupancyGrid::new(container(4, 2, 2));
        grid.place(0, 0, 0, 0, Orientation::new(2, 2, 1));

        let candidates = candidate_points(&grid, Orientation::new(2, 2, 1)).collect_vec();
        assert_eq!(candidates, vec![(0, 0, 0), (2, 0, 0), (0, 0, 1)]);
        assert_eq!(first_fitting_candidate(&grid, Orientation::new(2, 2, 1)), Some((2, 0, 0)));
    }

    /// Fills everything but the box `[lx, W) x [ly, H) x [lz, D)` with four placements,
    /// none of which exposes a candidate point inside the free box.
    fn hide_far_corner(c: Container, (lx, ly, lz): Position) -> OccupancyGrid {
        let (w, h, d) = (c.width, c.height, c.depth);
        let mut grid = OccupancyGrid::new(c);
        grid.place(0, 0, 0, 0, Orientation::new(lx, ly, lz));
        grid.place(1, 0, 0, lz, Orientation::new(lx, h, d - lz));
        grid.place(2, lx, 0, 0, Orientation::new(w - lx, ly, d));
        grid.place(3, 0, ly, 0, Orientation::new(w, h - ly, lz));
        grid
    }

    #[test]
    fn exhaustive_scan_finds_what_the_coarse_scan_skips() {
        let grid = hide_far_corner(container(9, 9, 9), (5, 5, 5));
        let o = Orientation::new(4, 4, 4);

        assert_eq!(coarse_step(&grid.container), 2);
        assert_eq!(first_fitting_candidate(&grid, o), None);
        assert_eq!(scan(&grid, o, 2), None);
        assert_eq!(scan(&grid, o, 1), Some((5, 5, 5)));
        assert_eq!(find_position(&grid, o), Some((5, 5, 5)));
    }

    #[test]
    fn coarse_scan_is_tried_before_exhaustive_scan() {
        let grid = hide_far_corner(container(8, 8, 8), (3, 4, 4));
        let o = Orientation::new(4, 4, 4);

        assert_eq!(first_fitting_candidate(&grid, o), None);
        assert_eq!(scan(&grid, o, 1), Some((3, 4, 4)));
        assert_eq!(scan(&grid, o, 2), Some((4, 4, 4)));
        assert_eq!(find_position(&grid, o), Some((4, 4, 4)));
    }

    #[test]
    fn scan_of_oversized_box() {
        let grid = OccupancyGrid::new(container(2, 2, 2));
        assert_eq!(scan(&grid, Orientation::new(3, 1, 1), 1), None);
        assert_eq!(find_position(&grid, Orientation::new(1, 1, 3)), None);
    }

    #[test]
    fn volume_short_circuit() {
        let items = items(&[(2, 1, 1)]);
        let solution = evaluate(container(1, 1, 1), &arrangement(&items));
        assert_eq!(solution, Solution::empty());
    }

    #[test]
    fn fills_container_exactly() {
        let items = items(&[(1, 1, 1), (1, 1, 1)]);
        let solution = evaluate(container(2, 1, 1), &arrangement(&items));

        assert!(solution.fully_placed);
        assert!(approx_eq!(f64, solution.utilization, 100.0));
        assert_eq!(
            solution.placements,
            vec![
                Placement::new(0, (0, 0, 0), Orientation::new(1, 1, 1)),
                Placement::new(1, (1, 0, 0), Orientation::new(1, 1, 1)),
            ]
        );
    }

    #[test]
    fn stops_at_first_unplaceable_item() {
        // the second item only fits if it were rotated, the third would fit but is never attempted
        let items = items(&[(2, 2, 1), (1, 1, 3), (1, 1, 1)]);
        let c = container(2, 2, 2);
        let solution = evaluate(c, &arrangement(&items));

        assert!(!solution.fully_placed);
        assert_eq!(solution.placements.len(), 1);
        assert!(approx_eq!(f64, solution.utilization, 50.0));
    }

    #[test]
    fn order_determines_outcome() {
        let items = items(&[(1, 1, 1), (2, 2, 2)]);
        let c = container(2, 2, 3);

        let small_first = evaluate(c, &arrangement(&items));
        assert!(small_first.fully_placed);
        assert_eq!(small_first.placements[1], Placement::new(1, (0, 0, 1), Orientation::new(2, 2, 2)));

        let reversed = Arrangement::new(arrangement(&items).genes.into_iter().rev().collect());
        let large_first = evaluate(c, &reversed);
        assert!(large_first.fully_placed);
        assert_eq!(large_first.placements[0], Placement::new(1, (0, 0, 0), Orientation::new(2, 2, 2)));
        assert_eq!(large_first.placements[1], Placement::new(0, (0, 0, 2), Orientation::new(1, 1, 1)));
    }
}
