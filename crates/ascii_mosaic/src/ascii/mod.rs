pub mod grid;
pub mod mapping;
