use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("stage '{stage}' failed: {reason}")]
    ParseFailure {
        stage: String,
        reason: String,
        position: Option<String>,
    },

    /// Conflicting recognition signals. Recognisers log this and keep the
    /// fragment as prose; it is never returned from a stage.
    #[error("ambiguous {what}: {fragment}")]
    Ambiguous { what: String, fragment: String },

    #[error("pipeline cancelled before stage '{stage}'")]
    Cancelled { stage: String },

    #[error("no {what} registered for '{name}' matching locale {locale}")]
    PluginLookupFailure {
        what: &'static str,
        name: String,
        locale: String,
    },

    #[error("failed to compile {what} pattern")]
    Pattern {
        what: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl Error {
    pub fn parse_failure(stage: &str, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            stage: stage.to_string(),
            reason: reason.into(),
            position: None,
        }
    }

    pub fn parse_failure_at(
        stage: &str,
        reason: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self::ParseFailure {
            stage: stage.to_string(),
            reason: reason.into(),
            position: Some(position.into()),
        }
    }
}

pub fn compile(what: &'static str, pattern: &str) -> Result<regex::Regex> {
    regex::Regex::new(pattern).map_err(|source| Error::Pattern { what, source })
}
