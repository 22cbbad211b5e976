pub mod compose;
pub mod loader;
