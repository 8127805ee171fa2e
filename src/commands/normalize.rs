use anyhow::{Context as _, Result};
use tracing::info;

use legistree::profiles::{NORMALISE, builtin_registry};
use legistree::{Context, run_pipeline};

use crate::cli::NormalizeArgs;
use crate::commands::resolve_locale;
use crate::util::{read_file, write_output};

pub fn run(args: NormalizeArgs) -> Result<()> {
    let registry = builtin_registry();
    let (_, locale) = resolve_locale(&args.locale)?;
    let pipeline = registry.pipeline(NORMALISE, &locale)?;

    let bytes = read_file(&args.input)?;
    let before = bytes.len();
    let context = Context::from_bytes(bytes)
        .with_context(|| format!("failed to read {}", args.input.display()))?
        .with_locale(locale);
    let context = run_pipeline(&pipeline, context)
        .with_context(|| format!("failed to normalise {}", args.input.display()))?;

    let mut text = context.text;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    write_output(args.output.as_deref(), text.as_bytes())?;

    info!(before, after = text.len(), "normalise completed");
    Ok(())
}
