//! Infrastructure layer - Model artifacts, image pipeline, orchestrators and observability

pub mod image;
pub mod logging;
pub mod models;
pub mod observability;
pub mod services;
