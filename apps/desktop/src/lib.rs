pub mod commands;
pub mod config;
pub mod grid;
pub mod state;
