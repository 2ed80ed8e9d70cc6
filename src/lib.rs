//! Client for the silica primer analysis service: submits jobs, retrieves
//! result sets and keeps one paginated result session.

pub mod about;
pub mod config;
pub mod controller;
pub mod deep_link;
pub mod error;
pub mod export_sink;
pub mod fasta;
pub mod gateway;
pub mod genomes;
pub mod session;
pub mod shell;

pub use silica_protocol as protocol;
pub use silica_render as render;
