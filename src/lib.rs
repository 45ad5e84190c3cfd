//! Padel tournament fixtures: group partitioning, round-robin fixtures and court scheduling.

pub mod config;
pub mod events;
pub mod logic;
pub mod models;
pub mod store;

pub use config::ServerConfig;
pub use events::{LogObserver, RecordingObserver, ScheduleEvent, ScheduleObserver};
pub use logic::{
    allocate, apply_allocation, build_grid, capacity, clear_schedule, export_schedule,
    generate_category_fixtures, generate_fixtures, generate_schedule, import_roster, ordered_fixtures,
    partition, partition_category, round_robin_pairings, AllocationResult, Assignment, CategoryFixtures,
    GenerateRequest, GenerationReport, ScheduleWriter,
};
pub use models::{
    ContactUpdate, Fixture, FixtureId, FixtureSlot, Group, GroupId, GroupPair, Member, Pair, PairId,
    ScheduleParams, ScheduleSummary, SchedulerError, SchedulingWindow, SetScore, Slot, SlotGrid,
    Tournament, TournamentId, WorkOrder,
};
pub use store::TournamentStore;
