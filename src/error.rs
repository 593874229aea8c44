use thiserror::Error;

/// Errors raised while loading or plotting the workout timings.
/// Nothing is caught along the way, every variant propagates to main
/// and aborts the run.
#[derive(Debug, Error)]
pub enum TimingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read csv record: {0}")]
    Csv(#[from] csv::Error),

    /// The header line does not carry a required column.
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A date cell does not match the expected day/month/year format.
    #[error("line {line}: bad date '{value}': {source}")]
    Date {
        line: usize,
        value: String,
        source: chrono::ParseError,
    },

    /// A duration cell is not minutes and seconds split by one apostrophe.
    #[error("bad duration '{value}': {reason}")]
    Duration { value: String, reason: String },

    /// Adds the csv line number to an error found in one of its cells.
    #[error("line {line}: {source}")]
    Row {
        line: usize,
        source: Box<TimingError>,
    },

    #[error("could not render chart: {0}")]
    Render(String),
}
