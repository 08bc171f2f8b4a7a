use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Header name must not be empty in '{value}'.")]
    EmptyHeaderName { value: String },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid ratio '{value}': {source}")]
    InvalidRatio {
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("Ratio '{value}' must be between 0 and 1.")]
    RatioOutOfRange { value: String },
    #[error("Block number overflow: {base} + {offset}.")]
    BlockNumberOverflow { base: u64, offset: u64 },
    #[error("Missing URL (set --url or provide in config).")]
    MissingUrl,
    #[error("{failed} check(s) failed.")]
    ChecksFailed { failed: u64 },
}
