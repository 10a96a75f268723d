//! tea-dashboard library: command-line surface, pages and text formatting.

pub mod app;
pub mod cli;
pub mod format;
pub mod screens;
