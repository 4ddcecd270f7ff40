//! Periodic table web app: a table view of element tiles, a detail view per
//! element and an animated Bohr model.

pub mod config;
pub mod dataset;
pub mod detail;
pub mod error;
pub mod html;
pub mod layout;
pub mod logging;
pub mod pages;
pub mod scene;
pub mod selection;
pub mod server;
pub mod shells;
pub mod tile;
