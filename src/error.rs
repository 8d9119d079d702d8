use crate::status::Status;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bootstrap endpoint `{0}`, expected host:port")]
    InvalidEndpoint(String),

    #[error("no bootstrap endpoints configured")]
    NoEndpoints,

    #[error("Can not find {}", .0.display())]
    MissingTool(PathBuf),

    #[error("Command {command} failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Error running {command}: {line}")]
    ToolError { command: String, line: String },

    #[error(transparent)]
    Io(#[from] io::Error)
}

impl Error {
    /// The status a metrics run reports for this error.
    ///
    /// Environment problems mean the lag could not be determined at all, which
    /// is not the same thing as an unhealthy cluster.
    pub fn status(&self) -> Status {
        match self {
            Error::InvalidEndpoint(_)
            | Error::NoEndpoints
            | Error::MissingTool(_)
            | Error::CommandFailed { .. }
            | Error::ToolError { .. } => Status::Unknown,
            Error::Io(_) => Status::Critical
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
