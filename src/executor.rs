use std::{fmt, path::Path};
use log::debug;
use crate::{
    command::CommandLine,
    error::{BuilderError, BuilderResult},
};

/// How a child process finished. `code` is `None` when it was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub code: Option<i32>,
}

impl Status {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "termination by signal"),
        }
    }
}

pub trait Executor {
    /// Runs `cmd` in `dir` and blocks until it exits.
    fn execute(&mut self, cmd: &CommandLine, dir: &Path) -> BuilderResult<Status>;
}

/// Spawns real processes, sharing this process's stdin/stdout/stderr.
#[derive(Debug, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&mut self, cmd: &CommandLine, dir: &Path) -> BuilderResult<Status> {
        debug!("Spawning {} in {}", cmd.program, dir.display());
        let status = cmd
            .to_command(dir)?
            .status()
            .map_err(|e| BuilderError::Spawn {
                program: cmd.program.clone(),
                source: e,
            })?;

        Ok(Status { code: status.code() })
    }
}
