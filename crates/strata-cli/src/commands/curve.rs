//! Curve command

use anyhow::Result;
use strata_lut::ToneLut;
use tracing::debug;

use crate::CurveArgs;

pub fn run(args: CurveArgs) -> Result<()> {
    let points = super::parse_points(&args.points)?;
    debug!(points = points.len(), "building curve");
    let lut = ToneLut::from_points(&points);

    if args.json {
        println!("{}", serde_json::to_string(&lut.as_table()[..])?);
    } else {
        for (i, v) in lut.as_table().iter().enumerate() {
            println!("{i}\t{v}");
        }
    }
    Ok(())
}
