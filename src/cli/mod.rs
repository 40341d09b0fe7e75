//! CLI module for the AgriSense inference service
//!
//! Subcommands:
//! - `serve`: load the models and run the HTTP API
//! - `check-models`: load every model once and print the registry status
//! - `check-image`: run an image through the preprocessing pipeline

pub mod check_image;
pub mod check_models;
pub mod serve;

use clap::{Parser, Subcommand};

/// AgriSense inference service - crop, yield and disease models over HTTP
#[derive(Parser)]
#[command(name = "agrisense-inference")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the models and serve the HTTP API
    Serve(serve::ServeArgs),

    /// Load every model and print its status as JSON
    CheckModels,

    /// Validate and preprocess an image file
    CheckImage(check_image::CheckImageArgs),
}
