use anyhow::{Context as _, Result};
use tracing::info;

use legistree::profiles::builtin_registry;
use legistree::{build_toc, run_pipeline};

use crate::cli::ParseArgs;
use crate::commands::{prepare, write_manifest};
use crate::util::{to_json_pretty, write_output};

pub fn run(args: ParseArgs) -> Result<()> {
    let registry = builtin_registry();
    let (run, context) = prepare(&registry, &args)?;

    let context = run_pipeline(&run.pipeline, context)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;
    let toc = build_toc(&registry, &context.tree, &context.locale)
        .context("failed to build table of contents")?;
    let entries = toc.iter().map(|element| element.walk().len()).sum();

    write_output(args.output.as_deref(), &to_json_pretty(&toc)?)?;
    write_manifest("toc", &args, &run, &context, entries)?;

    info!(run_id = %run.run_id, entries, "table of contents completed");
    Ok(())
}
