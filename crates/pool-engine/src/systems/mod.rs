pub mod rules;
pub mod schedule;
pub mod shot;
