//! Saved-opportunity storage

pub mod json_file;
pub mod memory;
pub mod traits;
