use thiserror::Error;

/// Everything that can go wrong while interpreting a location file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("EOF")]
    EndOfInput,

    #[error("Keyword ({0}) is incomplete")]
    IncompleteKeyword(String),

    #[error("Expected quotation mark at beginning of string")]
    MissingQuote,

    #[error("Unexpected end of file while reading a string")]
    UnexpectedEof,

    #[error("Incomplete string")]
    IncompleteString,

    #[error("Text is not valid UTF-8")]
    InvalidEncoding,

    #[error("Only one location should be defined per file")]
    LocationRedefined,

    #[error("Location must be defined before activity")]
    ActivityWithoutLocation,

    #[error("Activity must be defined before a preference")]
    PreferenceWithoutActivity,

    #[error("Preference ({0}) defined more than once")]
    DuplicatePreference(String),

    #[error("Keyword ({0}) not recognized")]
    UnknownKeyword(String),

    #[error("Preference ({0}) is undefined")]
    UndefinedPreference(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorCategory {
    EndOfInput,
    MalformedToken,
    SemanticViolation,
    UnresolvedReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Stream exhausted between directives.
    Terminal,
    Warning,
    Fatal,
}

impl ParseError {
    pub fn category(&self) -> ParseErrorCategory {
        match self {
            ParseError::EndOfInput => ParseErrorCategory::EndOfInput,
            ParseError::IncompleteKeyword(_)
            | ParseError::MissingQuote
            | ParseError::UnexpectedEof
            | ParseError::IncompleteString
            | ParseError::InvalidEncoding => ParseErrorCategory::MalformedToken,
            ParseError::LocationRedefined
            | ParseError::ActivityWithoutLocation
            | ParseError::PreferenceWithoutActivity
            | ParseError::DuplicatePreference(_)
            | ParseError::UnknownKeyword(_) => ParseErrorCategory::SemanticViolation,
            ParseError::UndefinedPreference(_) => ParseErrorCategory::UnresolvedReference,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.category() {
            ParseErrorCategory::EndOfInput => Severity::Terminal,
            ParseErrorCategory::UnresolvedReference => Severity::Warning,
            ParseErrorCategory::MalformedToken | ParseErrorCategory::SemanticViolation => {
                Severity::Fatal
            }
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

/// Result of a single interpreter step, checked by the load loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Warning(ParseError),
    Fatal(ParseError),
}

impl From<Result<(), ParseError>> for Outcome {
    fn from(result: Result<(), ParseError>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(e) if e.is_warning() => Outcome::Warning(e),
            Err(e) => Outcome::Fatal(e),
        }
    }
}
