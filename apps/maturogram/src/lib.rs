//! # maturogram
//!
//! Server and CLI around `maturogram-core`.
//!
//! - `api`: axum HTTP API (public checklist scoring, admin record management)
//! - `cli`: clap command-line interface
//! - `config`: TOML + flag configuration

pub mod api;
pub mod cli;
pub mod config;
