pub mod merge;
pub mod project;
pub mod store;
