use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;
use anyhow::{Context, Result};

use crate::console;

/// Abstraction for System interactions (File System, Console, Process execution).
/// This keeps the dispatch logic independent of the platform and lets tests run it
/// against a recorded fake.
pub trait SystemOps {
    /// Check if a file exists on the file system.
    fn path_exists(&self, path: &str) -> bool;

    /// Hide the console window of the current process.
    fn hide_console(&self);

    /// Show the console window again (used before printing a diagnostic).
    fn restore_console(&self);

    /// Block until the user acknowledges (press any key).
    fn wait_for_key(&self);

    /// Run a full command line through the platform command processor and wait for it.
    /// Returns the child's exit code, if it had one.
    fn run_command(&self, command_line: &str) -> Result<Option<i32>>;
}

/// The Real System implementation (Production).
pub struct NativeSystem;

impl SystemOps for NativeSystem {
    fn path_exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    fn hide_console(&self) {
        console::hide_console_window();
    }

    fn restore_console(&self) {
        console::restore_console_window();
    }

    #[cfg(windows)]
    fn wait_for_key(&self) {
        let _ = std::process::Command::new("cmd").args(["/C", "pause"]).status();
    }

    #[cfg(not(windows))]
    fn wait_for_key(&self) {
        use std::io::{BufRead, Write};
        print!("Press Enter to continue . . . ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
    }

    #[cfg(windows)]
    fn run_command(&self, command_line: &str) -> Result<Option<i32>> {
        use std::os::windows::process::CommandExt;

        // Passed raw: the line already carries its own quoting for cmd.exe.
        let status = std::process::Command::new("cmd")
            .arg("/C")
            .raw_arg(command_line)
            .status()
            .with_context(|| format!("Failed to execute: {}", command_line))?;
        Ok(status.code())
    }

    #[cfg(not(windows))]
    fn run_command(&self, command_line: &str) -> Result<Option<i32>> {
        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(command_line)
            .status()
            .with_context(|| format!("Failed to execute: {}", command_line))?;
        Ok(status.code())
    }
}

/// A Mock System for Testing.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockSystem {
    pub file_system: Mutex<HashSet<String>>,
    pub probed: Mutex<Vec<String>>,
    pub commands: Mutex<Vec<String>>,
    pub events: Mutex<Vec<&'static str>>,
    pub child_exit_code: Option<i32>,
}

#[allow(dead_code)]
impl MockSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: &[&str]) -> Self {
        Self {
            file_system: Mutex::new(files.iter().map(|f| f.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl SystemOps for MockSystem {
    fn path_exists(&self, path: &str) -> bool {
        self.probed.lock().unwrap().push(path.to_string());
        self.file_system.lock().unwrap().contains(path)
    }

    fn hide_console(&self) {
        self.events.lock().unwrap().push("hide");
    }

    fn restore_console(&self) {
        self.events.lock().unwrap().push("restore");
    }

    fn wait_for_key(&self) {
        self.events.lock().unwrap().push("wait");
    }

    fn run_command(&self, command_line: &str) -> Result<Option<i32>> {
        self.commands.lock().unwrap().push(command_line.to_string());
        self.events.lock().unwrap().push("run");
        Ok(Some(self.child_exit_code.unwrap_or(0)))
    }
}
