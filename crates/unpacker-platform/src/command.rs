use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Thin builder over [`std::process::Command`] that remembers the program
/// name for error reporting.
#[derive(Debug)]
pub struct Command {
    inner: StdCommand,
    program: String,
}

impl Command {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        let program = program.as_ref();
        Self {
            inner: StdCommand::new(program),
            program: program.to_string_lossy().into_owned(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> impl Iterator<Item = &OsStr> {
        self.inner.get_args()
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.inner.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    /// Discard everything the child writes and give it no stdin.
    pub fn quiet(mut self) -> Self {
        self.inner
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        self
    }

    /// Run the child to completion and return its exit status.
    ///
    /// A non-zero status is not an error here; callers decide what it means.
    pub fn status(&mut self) -> Result<ExitStatus> {
        tracing::debug!(program = %self.program, "spawning child process");
        self.inner.status().map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, source: std::io::Error) -> Error {
        match source.kind() {
            std::io::ErrorKind::NotFound => Error::CommandNotFound {
                cmd: self.program.clone(),
            },
            _ => Error::CommandFailed {
                cmd: self.program.clone(),
                source,
            },
        }
    }
}
