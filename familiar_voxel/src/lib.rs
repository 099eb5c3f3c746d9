// familiar_voxel: the world model the familiar pathfinder reads.
//
// This crate owns nothing but data and a read-only query surface. The
// pathfinder (`familiar_pathing`) never mutates the world; it captures a
// bounded snapshot through `BlockReader` and searches that.
//
// Module overview:
// - `types.rs`: `BlockPos` and `Direction`.
// - `block.rs`: `BlockKind`, `BlockState`, derived `CollisionShape` and `FluidState`.
// - `world.rs`: the `BlockReader` trait and the dense `VoxelWorld` grid.

pub mod block;
pub mod types;
pub mod world;

pub use block::{BlockKind, BlockState, CollisionShape, FluidState, Half};
pub use types::{BlockPos, Direction};
pub use world::{BlockReader, VoxelWorld};
