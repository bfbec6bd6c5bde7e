//!
//! Entities, occupancy model and I/O for packing axis-aligned cuboids into a single 3D container.
//!
//! The library answers the geometric questions of the packing process (does this box fit here,
//! place this box here, how much of the container is used), while optimizers built on top of it
//! decide in which order and orientation the items are offered.

/// Entities to model 3D packing problems
pub mod entities;

/// Importing problem instances into and exporting solutions out of this library
pub mod io;

/// Helper functions which do not belong to any specific module
pub mod util;
