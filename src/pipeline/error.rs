use thiserror::Error;

/// Errors raised while building a pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A pattern rule's matcher is not a valid regular expression
    #[error("Invalid pattern for rule '{rule}': {source}")]
    InvalidPattern {
        rule: &'static str,
        #[source]
        source: regex::Error,
    },
    /// The dictionary document could not be parsed
    #[error("Failed to parse dictionary: {0}")]
    Dictionary(#[from] serde_json::Error),
    /// The dictionary file could not be read
    #[error("Failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a rewriter. The rule is then treated as non-matching.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    /// The rewriter needed a capture group that did not participate in the match
    #[error("Capture group {0} did not participate in the match")]
    MissingGroup(usize),
    /// The captured text was not usable by the rewriter
    #[error("Invalid capture: {0}")]
    InvalidCapture(String),
}
