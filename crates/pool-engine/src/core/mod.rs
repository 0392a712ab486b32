pub mod balls;
pub mod geometry;
pub mod physics;
pub mod table;
pub mod time;
