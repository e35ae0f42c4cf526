pub mod cache;
pub mod limit;
