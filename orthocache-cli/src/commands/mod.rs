//! CLI command implementations.
//!
//! - [`sync`] - Bring the local raster cache up to date
//! - [`serve`] - Run the tile server
//! - [`grid`] - Show tile counts for the configured region
//! - [`config`] - Show or initialize the configuration file

pub mod common;
pub mod config;
pub mod grid;
pub mod serve;
pub mod sync;
