//! Check-image command - runs a file through the preprocessing pipeline

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;

use crate::infrastructure::image::ImageProcessor;

#[derive(Args, Clone, Debug)]
pub struct CheckImageArgs {
    /// Image file to check
    pub path: PathBuf,
}

pub async fn run(args: CheckImageArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("cannot read {}", args.path.display()))?;

    println!("{}", describe(&ImageProcessor::default(), &raw)?);

    Ok(())
}

/// One-line report of the tensor an image turns into
fn describe(processor: &ImageProcessor, raw: &[u8]) -> anyhow::Result<String> {
    if !processor.validate(raw) {
        bail!("not a decodable image ({} bytes)", raw.len());
    }

    let tensor = processor.process(raw)?;
    let [batch, height, width, channels] = tensor.shape();
    let [r, g, b] = tensor.mean_rgb();
    let (target_width, target_height) = processor.target_size();

    Ok(format!(
        "valid image: tensor shape ({}, {}, {}, {}), target {}x{}, mean rgb ({:.3}, {:.3}, {:.3})",
        batch, height, width, channels, target_width, target_height, r, g, b
    ))
}
