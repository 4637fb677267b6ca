pub mod config;
pub mod daily;
pub mod target;
