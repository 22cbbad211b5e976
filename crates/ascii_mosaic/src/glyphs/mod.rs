pub mod brightness;
pub mod font;
pub mod table;
