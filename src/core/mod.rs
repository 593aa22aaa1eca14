pub mod item;
pub mod theme;
