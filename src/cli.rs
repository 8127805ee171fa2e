use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "legistree",
    version,
    about = "Structure legislative text into a document tree"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Parse(ParseArgs),
    Toc(ParseArgs),
    Normalize(NormalizeArgs),
    Stages(StagesArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum InputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct LocaleArgs {
    #[arg(long)]
    pub frbr_uri: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub locality: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = InputFormat::Text)]
    pub format: InputFormat,

    #[command(flatten)]
    pub locale: LocaleArgs,

    #[arg(long)]
    pub fragment: Option<String>,

    #[arg(long = "attachment")]
    pub attachments: Vec<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    pub input: PathBuf,

    #[command(flatten)]
    pub locale: LocaleArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct StagesArgs {
    #[command(flatten)]
    pub locale: LocaleArgs,

    #[arg(long, value_enum, default_value_t = InputFormat::Text)]
    pub format: InputFormat,

    #[arg(long, default_value_t = false)]
    pub all: bool,
}
