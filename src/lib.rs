pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod output;
pub mod profile;
pub mod ryzenadj;
