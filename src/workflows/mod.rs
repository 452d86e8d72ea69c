pub mod dataset;
pub mod export;
pub mod roster;
pub mod scoring;
