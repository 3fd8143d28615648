pub mod compatibility;
pub mod loader;
