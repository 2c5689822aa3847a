//! Line-oriented control protocol
//!
//! A request is a single line of UTF-8 text: a verb followed by
//! whitespace-separated parameters, each a `name=value` pair or a bare
//! switch. The verb set is closed; an unknown verb is a protocol error
//! that aborts only the offending connection.
//!
//! ```text
//! Activate
//! LogFile file=/var/log/build.log solution=MyApp skip_existing=true
//! ```
//!
//! Whitespace splits tokens, so paths containing spaces cannot be sent
//! over this protocol (a limitation inherited from the wire format).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Errors produced while parsing a request line
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Nothing but whitespace on the request line
    #[error("empty request line")]
    EmptyRequest,

    /// Verb outside the recognized set
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// A required parameter was not supplied
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// A path parameter must be absolute
    #[error("expected an absolute pathname, got '{0}'")]
    NotAbsolute(String),

    /// A parameter value could not be interpreted
    #[error("invalid value '{value}' for parameter '{name}'")]
    InvalidValue { name: &'static str, value: String },
}

/// A parsed control request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Bring the application window to the foreground.
    Activate,

    /// Begin tailing `file`, forwarding appended text to the
    /// destination named `solution` (empty name: first available).
    LogFile {
        file: PathBuf,
        solution: String,
        skip_existing: bool,
    },
}

impl Request {
    /// Parse a request line.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ProtocolError::EmptyRequest)?;
        let params: Vec<&str> = tokens.collect();

        match verb {
            "Activate" => {
                if !params.is_empty() {
                    debug!(params = ?params, "ignoring unexpected parameters on Activate");
                }
                Ok(Self::Activate)
            }
            "LogFile" => Self::parse_log_file(&params),
            other => Err(ProtocolError::UnknownVerb(other.to_string())),
        }
    }

    fn parse_log_file(params: &[&str]) -> Result<Self, ProtocolError> {
        let mut file: Option<&str> = None;
        let mut solution = "";
        let mut skip_existing = false;

        for param in params {
            let (name, value) = match param.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (*param, None),
            };
            match (name, value) {
                ("file", Some(value)) if !value.is_empty() => file = Some(value),
                ("file", _) => return Err(ProtocolError::MissingParameter("file")),
                ("solution", value) => solution = value.unwrap_or(""),
                // A bare switch means true.
                ("skip_existing", None) => skip_existing = true,
                ("skip_existing", Some(value)) => {
                    skip_existing = value.parse().map_err(|_| ProtocolError::InvalidValue {
                        name: "skip_existing",
                        value: value.to_string(),
                    })?;
                }
                _ => debug!(param = %param, "ignoring unknown parameter"),
            }
        }

        let file = file.ok_or(ProtocolError::MissingParameter("file"))?;
        let path = Path::new(file);
        if !path.is_absolute() {
            return Err(ProtocolError::NotAbsolute(file.to_string()));
        }

        Ok(Self::LogFile {
            file: path.to_path_buf(),
            solution: solution.to_string(),
            skip_existing,
        })
    }

    /// Render the request as a wire line (without a trailing newline).
    pub fn to_line(&self) -> String {
        match self {
            Self::Activate => "Activate".to_string(),
            Self::LogFile {
                file,
                solution,
                skip_existing,
            } => {
                let mut line = format!("LogFile file={}", file.display());
                if !solution.is_empty() {
                    line.push_str(" solution=");
                    line.push_str(solution);
                }
                if *skip_existing {
                    line.push_str(" skip_existing=true");
                }
                line
            }
        }
    }
}

#[cfg(test)]
#[path = "protocol_test.rs"]
mod tests;
