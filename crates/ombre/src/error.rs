pub type Result<T> = std::result::Result<T, Error>;

/// Structural failures. These abort the current parse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid fraction: {value:?}")]
    InvalidFraction { value: String },

    #[error("invalid color: {token:?}")]
    InvalidColor { token: String },

    #[error("invalid number for `{attribute}`: {value:?}")]
    InvalidNumber { attribute: String, value: String },

    #[error("XML parse error: {message}")]
    Xml { message: String },

    #[error("unsupported XML encoding label: {label}")]
    UnsupportedEncoding { label: String },

    #[error("no linearGradient or radialGradient element found")]
    MissingGradient,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml {
            message: err.to_string(),
        }
    }
}

/// Recoverable problems. The parser logs them, keeps a best-effort default and continues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Warning {
    #[error("unsupported gradient type: {kind}")]
    UnsupportedGradient { kind: String },

    #[error("gradient parameters not found in {descriptor:?}")]
    MissingParameters { descriptor: String },

    #[error("invalid gradient angle, must be at 45 degree increments: {angle}")]
    InvalidAngle { angle: String },

    #[error("unknown keyword `{keyword}` in {segment:?}")]
    UnknownKeyword { keyword: String, segment: String },

    #[error("rejected color stop {segment:?}: {reason}")]
    RejectedStop { segment: String, reason: String },

    #[error("not able to find url: {url}")]
    UnresolvedUrl { url: String },

    #[error("invalid color string: {token:?}")]
    InvalidColor { token: String },

    #[error("unknown value for `{attribute}`: {value:?}")]
    UnknownAttributeValue { attribute: String, value: String },

    #[error("cannot process svg element `{name}`")]
    UnknownElement { name: String },

    #[error("unexpected end element `{name}`")]
    UnexpectedEndElement { name: String },

    #[error("stop element outside of a gradient")]
    StopOutsideGradient,
}

/// Logs a warning and records it.
pub(crate) fn report(warnings: &mut Vec<Warning>, warning: Warning) {
    tracing::warn!("{warning}");
    warnings.push(warning);
}
