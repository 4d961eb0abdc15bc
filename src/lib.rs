//! # genoview - Terminal Genome Browser
//!
//! A track-based genome browser for the terminal using ratatui. One genome is
//! active at a time; its annotations are drawn as coloured boxes on one
//! horizontal track per feature type, with strand chevrons and a coordinate
//! ruler, inside a zoomable and pannable window.
//!
//! ## Architecture
//!
//! - `model`: features, strands, the genome window and colours
//! - `viewport`: zoom, pan, goto and reset over the genome window
//! - `projection`: genomic coordinates to canvas pixels
//! - `layout`: vertical placement of tracks and the ruler
//! - `render`: draws a frame onto any [`render::DrawSurface`]
//! - `catalog`: annotations grouped by type, with a cursor
//! - `provider`: where features and sequence come from, plus a worker thread
//! - `formats`: FASTA and GFF3 loaders
//! - `session`: browser state and command entry points
//! - `event`: keyboard input to actions
//! - `ui`: TUI rendering with ratatui
//! - `controller`: terminal lifecycle and main loop
//! - `config`: TOML configuration
//! - `error`: user-facing error taxonomy

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod formats;
pub mod layout;
pub mod model;
pub mod projection;
pub mod provider;
pub mod render;
pub mod session;
pub mod ui;
pub mod viewport;
