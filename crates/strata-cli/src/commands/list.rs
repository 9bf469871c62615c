//! List command

use anyhow::Result;
use strata_color::Preset;
use strata_ops::BlendMode;

pub fn run() -> Result<()> {
    println!("Filters:");
    for p in Preset::ALL {
        println!("  {:<12} {}", p.name(), p.label());
    }
    println!("Blend modes:");
    for m in BlendMode::ALL {
        println!("  {:<12} {}", m.name(), m.label());
    }
    Ok(())
}
