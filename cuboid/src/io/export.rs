use crate::entities::{Placement, Solution};
use crate::io::ext_repr::{ExtPlacement, ExtResult, ExtStatus};

/// Message attached to a result in which not every item could be placed
pub const PARTIAL_PLACEMENT_MESSAGE: &str = "Not all items could be placed.";

/// Exports a solution out of the library
pub fn export(solution: &Solution) -> ExtResult {
    let (status, message) = match solution.fully_placed {
        true => (ExtStatus::Success, None),
        false => (
            ExtStatus::Failure,
            Some(PARTIAL_PLACEMENT_MESSAGE.to_string()),
        ),
    };

    ExtResult {
        status,
        placements: solution.placements.iter().map(export_placement).collect(),
        space_utilization: round_to_hundredths(solution.utilization),
        message,
    }
}

pub fn export_placement(p: &Placement) -> ExtPlacement {
    ExtPlacement {
        item_id: p.item_id,
        x: p.x,
        y: p.y,
        z: p.z,
        width: p.w,
        height: p.h,
        depth: p.d,
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
