use std::io::{self, Write};

use tap::TapFallible;
use tracing::error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    /// The program was invoked incorrectly.
    Usage,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::Usage => 2,
        }
    }
}

/// The result of one invocation: the exit status plus everything that should be written to
/// stdout and stderr.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            status: ExitStatus::Success,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn help(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::success()
        }
    }

    pub fn usage_error(stderr: impl Into<String>) -> Self {
        Self {
            status: ExitStatus::Usage,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            status: ExitStatus::Failure,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.status.code()
    }

    pub fn emit(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.stdout.as_bytes())?;
        stdout.flush()?;
        let mut stderr = io::stderr().lock();
        stderr.write_all(self.stderr.as_bytes())?;
        stderr.flush()
    }

    /// Writes the captured output and terminates the process with the outcome's status.
    pub fn exit(self) -> ! {
        self.emit()
            .tap_err(|e| error!("Failed to write program output: {e}"))
            .ok();
        std::process::exit(self.code())
    }
}
