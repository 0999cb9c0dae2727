//! # Launcher
//!
//! Orchestrates one launch: hide the console, look at where we are, pick an interpreter,
//! build the command line and run it. Exactly one candidate is selected per run, or the
//! launch fails before any command is built.
//!
//! The child's exit status is logged but does not affect the launcher's own exit code:
//! a dispatched launch always exits 0.

use anyhow::Result;
use log::{debug, error, info, warn};

use crate::command;
use crate::discovery;
use crate::profile::{LaunchEnv, Profile};
use crate::system::SystemOps;

/// Exit code when no interpreter could be located (or no command could be built).
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Result of a launch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command was handed to the command processor.
    Dispatched {
        command_line: String,
        /// `None` if the child had no exit code or could not be started.
        child_code: Option<i32>,
    },
    /// No interpreter candidate was usable.
    NotFound,
}

/// Runs the launch sequence up to and including the child process.
///
/// `capture` reads the environment; it is called after the console is hidden so that
/// nothing it logs flashes on screen.
pub fn run(
    profile: &Profile,
    capture: impl FnOnce(&Profile) -> LaunchEnv,
    args: &[String],
    system: &impl SystemOps,
) -> Result<Outcome> {
    system.hide_console();

    let env = capture(profile);
    info!("Arguments: {:?}", args);
    info!("Current Dir: {}", env.working_dir);

    let candidate = match discovery::select(discovery::candidates(profile, &env), system) {
        Some(c) => c,
        None => return Ok(Outcome::NotFound),
    };

    let command_line = command::build_command_line(profile, &candidate, args)?;
    info!("Full command: {}", command_line);

    let child_code = match system.run_command(&command_line) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            None
        }
    };
    match child_code {
        Some(0) => debug!("Interpreter exited normally"),
        other => warn!("Interpreter exited with status {:?}", other),
    }

    Ok(Outcome::Dispatched { command_line, child_code })
}

/// Text shown when no interpreter can be found.
pub fn remediation_message(profile: &Profile) -> String {
    let subpath = profile.interpreter_subpath.join("\\");
    format!(
        "Cannot find {interp}.\n\
         The launcher looked next to itself, in the per-user installation folder and in %{var}%.\n\
         To fix this, do one of the following:\n\
         \x20 1) Run this executable from the root of the installation (where {subpath} lives).\n\
         \x20 2) When working from a source checkout, put this executable in the '{tools}' folder\n\
         \x20    of the checkout (rename it to match) so that {script} is found one level up.\n\
         \x20 3) Set the environment variable {var} to the installation folder containing {subpath}.",
        interp = profile.interpreter_subpath.last().copied().unwrap_or("python"),
        var = profile.override_var,
        subpath = subpath,
        tools = profile.tools_sentinel,
        script = profile.script_name,
    )
}

/// Shows the console, prints the diagnostic and waits for the user before failing.
fn report_failure(system: &impl SystemOps, message: &str) -> i32 {
    system.restore_console();
    error!("{}", message);
    println!("{}", message);
    system.wait_for_key();
    FAILURE_EXIT_CODE
}

/// Full launch: runs, then maps the outcome to the process exit code.
pub fn launch(
    profile: &Profile,
    capture: impl FnOnce(&Profile) -> LaunchEnv,
    args: &[String],
    system: &impl SystemOps,
) -> i32 {
    match run(profile, capture, args, system) {
        Ok(Outcome::Dispatched { command_line, child_code }) => {
            debug!("Dispatched '{}' (child status {:?})", command_line, child_code);
            0
        }
        Ok(Outcome::NotFound) => report_failure(system, &remediation_message(profile)),
        Err(e) => report_failure(system, &format!("{:#}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    fn env_at(exe: &str) -> LaunchEnv {
        LaunchEnv {
            exe_path: Some(exe.to_string()),
            working_dir: r"C:\Users\ana\Desktop".to_string(),
            ..Default::default()
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn bundled_install_end_to_end() {
        let system = MockSystem::with_files(&[r"C:\Install\Python\pythonw.exe"]);
        let env = env_at(r"C:\Install\pyDatView.exe");

        let code = launch(&Profile::default(), |_| env, &args(&["a.csv", "b c.csv"]), &system);

        assert_eq!(code, 0);
        assert_eq!(
            system.commands(),
            vec![r#"C:\Install\Python\pythonw.exe -c "import pydatview; pydatview.show(filenames=['a.csv','b c.csv']);""#]
        );
        assert_eq!(system.events(), vec!["hide", "run"]);
    }

    #[test]
    fn repo_mode_end_to_end() {
        let system = MockSystem::new();
        let env = env_at(r"C:\repo\_tools\pyDatView.exe");

        let outcome = run(&Profile::default(), |_| env, &[], &system).unwrap();

        assert_eq!(
            outcome,
            Outcome::Dispatched {
                command_line: r"pythonw C:\repo\pyDatView.py ".to_string(),
                child_code: Some(0),
            }
        );
        assert!(system.probed().is_empty());
    }

    #[test]
    fn child_failure_still_exits_zero() {
        let system = MockSystem {
            child_exit_code: Some(3),
            ..MockSystem::with_files(&[r"C:\Install\Python\pythonw.exe"])
        };
        let env = env_at(r"C:\Install\pyDatView.exe");
        assert_eq!(launch(&Profile::default(), |_| env, &[], &system), 0);
    }

    #[test]
    fn nothing_found_reports_and_fails() {
        let system = MockSystem::new();
        let env = env_at(r"C:\Install\pyDatView.exe");

        let code = launch(&Profile::default(), |_| env, &args(&["a.csv"]), &system);

        assert_eq!(code, FAILURE_EXIT_CODE);
        assert!(system.commands().is_empty());
        assert_eq!(system.events(), vec!["hide", "restore", "wait"]);
    }

    #[test]
    fn remediation_names_all_three_options() {
        let msg = remediation_message(&Profile::default());
        assert!(msg.contains("pythonw.exe"));
        assert!(msg.contains("1) Run this executable from the root of the installation"));
        assert!(msg.contains("2) ") && msg.contains("'_tools'"));
        assert!(msg.contains("3) Set the environment variable PYDATPATH"));
    }

    #[test]
    fn overlong_command_is_fatal() {
        let system = MockSystem::with_files(&[r"C:\Install\Python\pythonw.exe"]);
        let env = env_at(r"C:\Install\pyDatView.exe");
        let huge = vec!["x".repeat(command::MAX_COMMAND_LINE)];

        assert_eq!(launch(&Profile::default(), |_| env, &huge, &system), FAILURE_EXIT_CODE);
        assert!(system.commands().is_empty());
    }
}
