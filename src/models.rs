pub mod group;
pub mod store;
pub mod tag;
pub mod task;
