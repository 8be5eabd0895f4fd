pub mod championship;
pub mod class_assignment;
pub mod common;
pub mod penalty;
pub mod points_config;
