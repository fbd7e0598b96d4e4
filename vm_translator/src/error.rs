use vm_command::ArgumentError;

pub type Result<T> = std::result::Result<T, TranslateError>;

#[derive(Debug)]
pub enum TranslateError {
    Io(std::io::Error),
    Dump(serde_json::Error),
    Malformed {
        line: usize,
        text: String,
        error: ArgumentError,
    },
    NoCurrentCommand,
}

impl TranslateError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, TranslateError::Malformed { .. })
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(error: std::io::Error) -> TranslateError {
        TranslateError::Io(error)
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(error: serde_json::Error) -> TranslateError {
        TranslateError::Dump(error)
    }
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::Io(e) => write!(f, "I/O error: {}", e),
            TranslateError::Dump(e) => write!(f, "could not dump command: {}", e),
            TranslateError::Malformed { line, text, error } => {
                write!(f, "malformed command on line {} ({:?}): {}", line, text, error)
            }
            TranslateError::NoCurrentCommand => write!(f, "no current command"),
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslateError::Io(e) => Some(e),
            TranslateError::Dump(e) => Some(e),
            TranslateError::Malformed { error, .. } => Some(error),
            TranslateError::NoCurrentCommand => None,
        }
    }
}
