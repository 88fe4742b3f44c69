use anyhow::Result;
use tracing::info;
use wardseed::Pipeline;

use super::{emit_report, inputs, load_config};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let pipeline = Pipeline::new(load_config(&args.source)?)?;
    let inputs = inputs(&args.source);

    let config = pipeline.config();
    info!(
        constituencies = %inputs.constituencies.display(),
        wards = %inputs.wards.display(),
        threshold = config.overlap_threshold,
        metric = ?config.area_metric,
        "inspecting"
    );
    let report = pipeline.run_dry(&inputs)?;

    emit_report(&report, args.source.report.as_deref())
}
