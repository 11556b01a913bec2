//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`tiles`] - Tile inspection (list, check)
//! - [`viewshed`] - Viewshed computation

pub mod config;
pub mod tiles;
pub mod viewshed;
