//! Genre filer library - shared modules for the filing and preview binaries.

pub mod error;
pub mod metadata;
pub mod models;
pub mod normalize;
pub mod planner;
pub mod progress;
pub mod report;
pub mod scoring;
pub mod store;
