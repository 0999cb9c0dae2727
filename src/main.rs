//! # pyDatView Launcher: The Main Entry Point
//!
//! A double-clickable native entry point for pyDatView. It finds a Python interpreter
//! relative to its own location, hides its console and hands the command-line arguments
//! (usually file names dropped on the executable) to `pydatview.show`.
//!
//! No flags are parsed: every argument is passed through to the interpreter.
//! Logging verbosity is set with the `PYDATVIEW_LAUNCHER_LOG` environment variable.

use std::ffi::OsString;

use clap::Parser;
use simplelog::{Config, SimpleLogger};

mod command;
mod console;
mod discovery;
mod invariant_ppt;
mod launcher;
mod profile;
mod system;

use profile::{LaunchEnv, Profile};
use system::NativeSystem;

/// Command Line Interface: positional file arguments only.
#[derive(Parser)]
#[command(name = "pyDatView", about = "Launch pyDatView with the given files", long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Files to open, forwarded verbatim to pyDatView.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        value_parser = clap::value_parser!(OsString)
    )]
    files: Vec<OsString>,
}

/// Parses the raw process arguments into the list forwarded to the interpreter.
///
/// An end-of-options marker is inserted after the program name so that clap treats
/// every user argument, including a literal `--`, as a value. Non-UTF-8 arguments are
/// converted lossily rather than rejected.
fn forwarded_args<I, T>(argv: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv.into_iter().map(Into::<OsString>::into);
    let program = argv.next().unwrap_or_else(|| OsString::from("pyDatView"));
    let input = std::iter::once(program)
        .chain(std::iter::once(OsString::from("--")))
        .chain(argv);

    Cli::parse_from(input)
        .files
        .iter()
        .map(|f| f.to_string_lossy().into_owned())
        .collect()
}

fn main() {
    let files = forwarded_args(std::env::args_os());

    // Logging failure shouldn't stop the launch
    let _ = SimpleLogger::init(profile::log_level_from_env(), Config::default());

    let profile = Profile::default();
    let code = launcher::launch(&profile, LaunchEnv::capture, &files, &NativeSystem);
    std::process::exit(code);
}
