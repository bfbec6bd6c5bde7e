mod container;
mod grid;
mod instance;
mod item;
mod placement;
mod solution;

#[doc(inline)]
pub use container::{Container, MAX_CONTAINER_CELLS};

#[doc(inline)]
pub use grid::OccupancyGrid;

#[doc(inline)]
pub use instance::Instance;

#[doc(inline)]
pub use item::Item;

#[doc(inline)]
pub use item::Orientation;

#[doc(inline)]
pub use placement::Placement;

#[doc(inline)]
pub use solution::Solution;
