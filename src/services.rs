pub mod groups;
pub mod schedule;
pub mod stats;
pub mod tags;
pub mod tasks;
