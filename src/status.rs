use std::fmt;
use std::process::exit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Critical,
    Unknown
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Critical => 2,
            Status::Unknown => 3
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN"
        })
    }
}

/// The terminal result of a probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub message: Option<String>
}

impl Outcome {
    pub fn ok() -> Self {
        Outcome { status: Status::Ok, message: None }
    }

    pub fn critical<S: Into<String>>(message: S) -> Self {
        Outcome { status: Status::Critical, message: Some(message.into()) }
    }

    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Outcome { status: Status::Unknown, message: Some(message.into()) }
    }

    /// Formats the outcome the way check plugins report it: `NAME STATUS[: message]`.
    pub fn check_line(&self, name: &str) -> String {
        match &self.message {
            Some(message) => format!("{} {}: {}", name, self.status, message),
            None => format!("{} {}", name, self.status)
        }
    }

    pub fn exit(self) -> ! {
        exit(self.status.exit_code())
    }
}
