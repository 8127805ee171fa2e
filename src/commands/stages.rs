use std::io::Write;

use anyhow::{Context as _, Result};
use tracing::info;

use legistree::profiles::{DocumentKind, builtin_registry};

use crate::cli::StagesArgs;
use crate::commands::{resolve_locale, stage_list};

pub fn run(args: StagesArgs) -> Result<()> {
    let registry = builtin_registry();

    let names = if args.all {
        registry
            .stage_names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<String>>()
    } else {
        let (uri, locale) = resolve_locale(&args.locale)?;
        let kind = DocumentKind::for_uri(uri.as_ref());
        info!(pipeline = kind.as_str(), %locale, "resolving pipeline");
        stage_list(&registry, kind, args.format, &locale)?
    };

    let mut stdout = std::io::stdout().lock();
    for name in &names {
        writeln!(stdout, "{name}").context("failed to write to stdout")?;
    }
    Ok(())
}
