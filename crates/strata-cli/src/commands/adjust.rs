//! Adjust command

use anyhow::{Context, Result};
use strata_color::Preset;
use strata_ops::pipeline::process_with;
use strata_ops::{AdjustmentSet, PipelineOptions};
use tracing::{debug, info};

use crate::image_io::{read_png, write_png};
use crate::AdjustArgs;

pub fn run(args: AdjustArgs, verbose: u8) -> Result<()> {
    let adj = build_adjustments(&args)?;
    let image = read_png(&args.input)?;

    if verbose > 0 {
        println!("Adjusting {} ({}x{})", args.input.display(), image.width(), image.height());
    }
    debug!(?adj, "adjustment set");

    let opts = if args.sequential { PipelineOptions::sequential() } else { PipelineOptions::default() };
    let out = process_with(&image, &adj, &opts);
    write_png(&args.output, &out)?;

    info!(output = %args.output.display(), "adjusted");
    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

/// Settings file (if any) with command line overrides applied.
fn build_adjustments(args: &AdjustArgs) -> Result<AdjustmentSet> {
    let mut adj = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("invalid adjustment set in {}", path.display()))?
        }
        None => AdjustmentSet::default(),
    };

    let overrides = [
        (args.brightness, &mut adj.brightness),
        (args.contrast, &mut adj.contrast),
        (args.saturation, &mut adj.saturation),
        (args.exposure, &mut adj.exposure),
        (args.vibrance, &mut adj.vibrance),
        (args.sharpen, &mut adj.sharpen),
        (args.blur, &mut adj.blur),
        (args.filter_intensity, &mut adj.filter_intensity),
    ];
    for (value, slot) in overrides {
        if let Some(v) = value {
            *slot = v;
        }
    }
    if let Some(name) = &args.filter {
        adj.filter = name.parse::<Preset>()?;
    }
    if let Some(points) = &args.curve {
        adj.curves.rgb = super::parse_points(points)?;
    }
    Ok(adj)
}
