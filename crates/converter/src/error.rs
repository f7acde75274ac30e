use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("line {line}: invalid syntax: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: indentation error: {message}")]
    Indentation { line: usize, message: String },
    #[error("line {line}: {construct} is not supported")]
    Unsupported { line: usize, construct: String },
    #[error("line {line}: name '{name}' is not defined")]
    UndefinedName { line: usize, name: String },
    #[error("line {line}: all registers are already in use")]
    RegistersExhausted { line: usize },
}

impl ConvertError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub fn unsupported(line: usize, construct: impl Into<String>) -> Self {
        Self::Unsupported {
            line,
            construct: construct.into(),
        }
    }

    /// 1-based source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. }
            | Self::Indentation { line, .. }
            | Self::Unsupported { line, .. }
            | Self::UndefinedName { line, .. }
            | Self::RegistersExhausted { line } => *line,
        }
    }
}
