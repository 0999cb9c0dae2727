//! # Launch Profile
//!
//! Everything the launcher needs to know about the application it starts: where the
//! bundled interpreter lives, which module to import, which folder marks a source checkout.
//! `Profile::default()` is the pyDatView profile.
//!
//! `LaunchEnv` is the snapshot of the process environment taken once at startup.
//! Nothing downstream reads `std::env` directly, which keeps discovery testable.

use std::path::PathBuf;
use log::{warn, LevelFilter};

/// Environment variable controlling the log level (`error|warn|info|debug|trace`).
pub const LOG_LEVEL_VAR: &str = "PYDATVIEW_LAUNCHER_LOG";

/// Placeholder used when the working directory cannot be read.
pub const CWD_PLACEHOLDER: &str = ".";

/// Static description of the application being launched.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Directory name marking "running from inside a source checkout".
    pub tools_sentinel: &'static str,
    /// Bare interpreter command used in repo mode, resolved through PATH.
    pub repo_interpreter: &'static str,
    /// Script run in repo mode, relative to the checkout root.
    pub script_name: &'static str,
    /// Python module imported in ImportCall mode.
    pub app_module: &'static str,
    /// Interpreter location relative to an install root.
    pub interpreter_subpath: &'static [&'static str],
    /// Folder name of the per-user installation under the local app-data directory.
    pub install_dir_name: &'static str,
    /// Variable holding the current user's name.
    pub user_var: &'static str,
    /// Variable naming an alternate installation root.
    pub override_var: &'static str,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            tools_sentinel: "_tools",
            repo_interpreter: "pythonw",
            script_name: "pyDatView.py",
            app_module: "pydatview",
            interpreter_subpath: &["Python", "pythonw.exe"],
            install_dir_name: "pyDatView",
            user_var: "USERNAME",
            override_var: "PYDATPATH",
        }
    }
}

/// Process environment as seen by the launcher, captured once.
#[derive(Debug, Clone, Default)]
pub struct LaunchEnv {
    /// Absolute path of the running launcher, if the OS reported one.
    pub exe_path: Option<String>,
    /// Working directory at launch, or [`CWD_PLACEHOLDER`].
    pub working_dir: String,
    /// Value of the user identity variable.
    pub user_name: Option<String>,
    /// Value of the override variable.
    pub override_root: Option<String>,
    /// Platform local-data directory, used when the user name is missing.
    pub local_data_dir: Option<String>,
}

impl LaunchEnv {
    /// Reads the executable path, working directory and relevant variables.
    pub fn capture(profile: &Profile) -> Self {
        let exe_path = match std::env::current_exe() {
            Ok(p) => Some(p.to_string_lossy().into_owned()),
            Err(e) => {
                warn!("Can not get executable path: {}", e);
                None
            }
        };

        let working_dir = working_dir_from(std::env::current_dir());

        let local_data_dir = directories::BaseDirs::new()
            .map(|b| b.data_local_dir().to_path_buf())
            .map(|p: PathBuf| p.to_string_lossy().into_owned());

        Self {
            exe_path,
            working_dir,
            user_name: non_empty_var(profile.user_var),
            override_root: non_empty_var(profile.override_var),
            local_data_dir,
        }
    }
}

/// Working directory text, or [`CWD_PLACEHOLDER`] when it could not be read.
pub fn working_dir_from(result: std::io::Result<PathBuf>) -> String {
    match result {
        Ok(p) => p.to_string_lossy().into_owned(),
        Err(e) => {
            warn!("Can not get current working directory: {}", e);
            CWD_PLACEHOLDER.to_string()
        }
    }
}

/// An unset variable and an empty one mean the same thing here.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parses a log level name, falling back to `Info` on anything unrecognised.
pub fn parse_log_level(value: Option<&str>) -> LevelFilter {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("off") => LevelFilter::Off,
        Some("error") => LevelFilter::Error,
        Some("warn") | Some("warning") => LevelFilter::Warn,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Log level from [`LOG_LEVEL_VAR`].
pub fn log_level_from_env() -> LevelFilter {
    parse_log_level(std::env::var(LOG_LEVEL_VAR).ok().as_deref())
}
