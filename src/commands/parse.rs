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

    let view = context.tree.view();
    write_output(args.output.as_deref(), &to_json_pretty(&view)?)?;

    let toc_entries = if args.manifest_path.is_some() {
        build_toc(&registry, &context.tree, &context.locale)?
            .iter()
            .map(|element| element.walk().len())
            .sum()
    } else {
        0
    };
    write_manifest("parse", &args, &run, &context, toc_entries)?;

    info!(
        run_id = %run.run_id,
        top_level = view.len(),
        "parse completed"
    );
    Ok(())
}
