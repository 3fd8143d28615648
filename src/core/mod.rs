pub mod analysis;
pub mod annotate;
pub mod graph;
pub mod mapper;
pub mod observer;
pub mod property;
pub mod reach;
pub mod reduce;
pub mod types;
