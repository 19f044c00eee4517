use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

use super::json::Diagnostics;

/// Runs an external compiler, linker or analyzer and captures its streams
pub trait ToolRunner {
    fn run(&self, program: &Path, args: &[&OsStr]) -> std::io::Result<Diagnostics>;
}

/// Spawns the tool as a child process and blocks until it exits
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn run(&self, program: &Path, args: &[&OsStr]) -> std::io::Result<Diagnostics> {
        let output = Command::new(program).args(args).output()?;

        Ok(Diagnostics {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            // killed by a signal
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

impl<F> ToolRunner for F
where
    F: Fn(&Path, &[&OsStr]) -> std::io::Result<Diagnostics>,
{
    fn run(&self, program: &Path, args: &[&OsStr]) -> std::io::Result<Diagnostics> {
        self(program, args)
    }
}
