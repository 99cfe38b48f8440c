pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod fetch;
pub mod filter;
pub mod ui;
