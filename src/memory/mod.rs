pub mod search;
pub mod stats;
pub mod types;
