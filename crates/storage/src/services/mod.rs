pub mod championship;
pub mod class_assignments;
pub mod penalties;
pub mod points_config;
