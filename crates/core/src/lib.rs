//! Domain core for the link-in-bio widget grid.
//!
//! Everything in this crate is free of database and HTTP dependencies so the
//! editor front-end, the persistence layer and the API server can share one
//! model of widgets, grid geometry and pointer interactions.

pub mod editor;
pub mod error;
pub mod gateway;
pub mod grid;
pub mod interaction;
pub mod layout;
pub mod platform;
pub mod sync;
pub mod types;
pub mod widget;
