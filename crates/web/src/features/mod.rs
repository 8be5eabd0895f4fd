pub mod championship;
pub mod classes;
pub mod penalties;
pub mod points_config;
