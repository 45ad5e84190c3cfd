//! Scheduling logic: partitioning, fixture generation, slot grid, allocation and writing.

mod allocate;
mod fixtures;
mod generate;
mod grid;
mod partition;
mod roster;
mod writer;

pub use allocate::{allocate, AllocationResult, Assignment, CategoryFixtures};
pub use fixtures::{generate_category_fixtures, generate_fixtures, ordered_fixtures, round_robin_pairings};
pub use generate::{generate_schedule, GenerateRequest, GenerationReport};
pub use grid::{build_grid, capacity};
pub use partition::{partition, partition_category};
pub use roster::{export_schedule, import_roster};
pub use writer::{apply_allocation, clear_schedule, ScheduleWriter};
