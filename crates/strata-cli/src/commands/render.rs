//! Render command

use anyhow::Result;
use strata_layers::{compositor, LayerContent, TextRasterizer};
use strata_ops::PipelineOptions;
use tracing::{info, warn};

use crate::image_io::write_png;
use crate::project::Project;
use crate::RenderArgs;

pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    let project = Project::load(&args.project)?;
    let root = args.project.parent().unwrap_or(std::path::Path::new("."));
    let (base, stack) = project.build(root)?;

    if verbose > 0 {
        println!(
            "Rendering {} layers over {}x{}",
            stack.len(),
            base.width(),
            base.height()
        );
    }

    let text = rasterizer();
    if !cfg!(feature = "text") && stack.iter().any(|l| !matches!(l.content, LayerContent::Image(_))) {
        warn!("built without the `text` feature; text and sticker layers are skipped");
    }

    let opts = if args.sequential { PipelineOptions::sequential() } else { PipelineOptions::default() };
    let out = compositor::composite_with(&stack, &base, text.as_ref(), &opts);
    write_png(&args.output, &out)?;

    info!(output = %args.output.display(), "rendered");
    if verbose > 0 {
        println!("Done.");
    }
    Ok(())
}

#[cfg(feature = "text")]
fn rasterizer() -> Box<dyn TextRasterizer> {
    Box::new(strata_layers::CosmicText::new())
}

#[cfg(not(feature = "text"))]
fn rasterizer() -> Box<dyn TextRasterizer> {
    Box::new(strata_layers::NoText)
}
