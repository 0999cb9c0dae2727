//! # Discovery Module
//!
//! Finds the Python interpreter to hand off to. The launcher never searches the disk;
//! it tries a short, fixed list of hypotheses and takes the first one that holds.
//!
//! ## Candidates, in priority order
//!
//! 1.  **Repo mode**: the launcher sits in the `_tools` folder of a source checkout.
//!     Run `pyDatView.py` from the checkout root with `pythonw` from PATH. No existence
//!     check, and nothing after it is considered.
//! 2.  **Bundled install**: `<exe dir>\Python\pythonw.exe`.
//! 3.  **Per-user install**: `C:\Users\<USERNAME>\AppData\Local\pyDatView\Python\pythonw.exe`.
//! 4.  **Override**: `%PYDATPATH%\Python\pythonw.exe`, only when the variable is set.
//!
//! Paths are handled as strings with Windows or POSIX separators so the same logic can be
//! exercised from any host.

use log::{debug, info};

use crate::invariant_ppt::{assert_invariant, INV_REPO_UNPROBED};
use crate::profile::{LaunchEnv, Profile};
use crate::system::SystemOps;

/// How the selected interpreter is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// `pythonw <script> "arg" "arg" `
    DirectScript,
    /// `python.exe -c "import app; app.show(filenames=[...]);"`
    ImportCall,
}

/// Where a candidate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Launcher inside the `_tools` folder of a source checkout.
    Repo,
    /// Interpreter shipped next to the launcher.
    Bundled,
    /// Per-user installation under the local app-data directory.
    PerUser,
    /// Installation root named by the override variable.
    Override,
}

/// One hypothesis about where the interpreter lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Which hypothesis produced this candidate.
    pub origin: Origin,
    /// Interpreter path, or a bare command name resolved through PATH.
    pub interpreter: String,
    /// How the interpreter is invoked.
    pub mode: InvocationMode,
    /// Script run in DirectScript mode.
    pub script: Option<String>,
    /// Whether `interpreter` must exist on disk to be selected.
    pub verify: bool,
}

/// The launcher's own directory, and the name of that directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExeLocation {
    /// Directory holding the launcher.
    pub dir: String,
    /// Last component of `dir`, compared against the tools sentinel.
    pub dir_name: String,
}

fn is_sep(c: char) -> bool {
    c == '\\' || c == '/'
}

/// Separator style of `root`: backslash unless the root only uses forward slashes.
fn separator_for(root: &str) -> char {
    if !root.contains('\\') && root.contains('/') { '/' } else { '\\' }
}

/// Appends `parts` to `root` with the root's own separator style.
pub fn join(root: &str, parts: &[&str]) -> String {
    let sep = separator_for(root);
    let mut out = root.trim_end_matches(is_sep).to_string();
    for part in parts {
        out.push(sep);
        out.push_str(part);
    }
    out
}

/// Everything before the last separator, if there is one.
///
/// A file directly under the root keeps the root separator as its parent.
fn parent_of(path: &str) -> Option<&str> {
    path.trim_end_matches(is_sep)
        .rfind(is_sep)
        .map(|i| if i == 0 { &path[..1] } else { &path[..i] })
}

/// Last path component.
fn file_name_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches(is_sep);
    match trimmed.rfind(is_sep) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}

/// Splits the launcher path into its directory and that directory's name.
///
/// An unknown path or a bare file name (no directory part) resolves to the working directory.
pub fn split_exe_path(exe_path: Option<&str>, working_dir: &str) -> ExeLocation {
    let dir = exe_path.and_then(parent_of).unwrap_or(working_dir).to_string();
    let dir_name = file_name_of(&dir).to_string();
    ExeLocation { dir, dir_name }
}

/// Root of the per-user installation, if the environment allows deriving one.
fn per_user_root(profile: &Profile, env: &LaunchEnv) -> Option<String> {
    if let Some(user) = &env.user_name {
        let root = format!(r"C:\Users\{}\AppData\Local", user);
        return Some(join(&root, &[profile.install_dir_name]));
    }
    env.local_data_dir
        .as_deref()
        .map(|dir| join(dir, &[profile.install_dir_name]))
}

/// Builds the ordered candidate list for this launch.
///
/// When the repo-mode sentinel matches, the list holds only the repo candidate.
pub fn candidates(profile: &Profile, env: &LaunchEnv) -> Vec<Candidate> {
    let location = split_exe_path(env.exe_path.as_deref(), &env.working_dir);
    debug!("Executable dir: {} (folder name '{}')", location.dir, location.dir_name);

    if location.dir_name == profile.tools_sentinel {
        let checkout_root = parent_of(&location.dir).unwrap_or(&env.working_dir);
        return vec![Candidate {
            origin: Origin::Repo,
            interpreter: profile.repo_interpreter.to_string(),
            mode: InvocationMode::DirectScript,
            script: Some(join(checkout_root, &[profile.script_name])),
            verify: false,
        }];
    }

    let import_call = |origin: Origin, root: &str| Candidate {
        origin,
        interpreter: join(root, profile.interpreter_subpath),
        mode: InvocationMode::ImportCall,
        script: None,
        verify: true,
    };

    let mut list = vec![import_call(Origin::Bundled, &location.dir)];
    if let Some(root) = per_user_root(profile, env) {
        list.push(import_call(Origin::PerUser, &root));
    }
    if let Some(root) = &env.override_root {
        list.push(import_call(Origin::Override, root));
    }
    list
}

/// Returns the first candidate that is usable, probing the file system lazily.
pub fn select(candidates: Vec<Candidate>, system: &impl SystemOps) -> Option<Candidate> {
    let mut probes = 0;
    for candidate in candidates {
        if candidate.verify {
            probes += 1;
            if !system.path_exists(&candidate.interpreter) {
                debug!("Not found: {}", candidate.interpreter);
                continue;
            }
        }
        assert_invariant(
            candidate.origin != Origin::Repo || probes == 0,
            INV_REPO_UNPROBED,
            Some("Discovery"),
        );
        info!("Using {:?} interpreter: {}", candidate.origin, candidate.interpreter);
        return Some(candidate);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invariant_ppt::contract_test;
    use crate::system::MockSystem;
    use proptest::prelude::*;

    fn env_at(exe: &str) -> LaunchEnv {
        LaunchEnv {
            exe_path: Some(exe.to_string()),
            working_dir: r"C:\Work".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn split_windows_path() {
        let loc = split_exe_path(Some(r"C:\repo\_tools\pyDatView.exe"), ".");
        assert_eq!(loc.dir, r"C:\repo\_tools");
        assert_eq!(loc.dir_name, "_tools");
    }

    #[test]
    fn split_bare_name_uses_working_dir() {
        let loc = split_exe_path(Some("pyDatView.exe"), r"D:\data");
        assert_eq!(loc.dir, r"D:\data");
        assert_eq!(loc.dir_name, "data");
        assert_eq!(split_exe_path(None, r"D:\data"), loc);
    }

    #[test]
    fn exe_directly_under_root() {
        let loc = split_exe_path(Some("/pyDatView.exe"), ".");
        assert_eq!(loc.dir, "/");
        let env = env_at("/pyDatView.exe");
        let list = candidates(&Profile::default(), &env);
        assert_eq!(list[0].interpreter, "/Python/pythonw.exe");

        let env = env_at(r"\pyDatView.exe");
        assert_eq!(candidates(&Profile::default(), &env)[0].interpreter, r"\Python\pythonw.exe");
    }

    #[test]
    fn placeholder_working_dir_without_exe_path() {
        let env = LaunchEnv {
            exe_path: None,
            working_dir: crate::profile::CWD_PLACEHOLDER.to_string(),
            ..Default::default()
        };
        let list = candidates(&Profile::default(), &env);
        assert_eq!(list[0].origin, Origin::Bundled);
        assert_eq!(list[0].interpreter, r".\Python\pythonw.exe");
    }

    #[test]
    fn join_follows_root_separator() {
        assert_eq!(join(r"C:\Install", &["Python", "pythonw.exe"]), r"C:\Install\Python\pythonw.exe");
        assert_eq!(join(r"C:\Install\", &["Python"]), r"C:\Install\Python");
        assert_eq!(join("/opt/pdv", &["Python", "pythonw.exe"]), "/opt/pdv/Python/pythonw.exe");
    }

    #[test]
    fn candidate_order_without_sentinel() {
        let mut env = env_at(r"C:\Install\pyDatView.exe");
        env.user_name = Some("ana".to_string());
        env.override_root = Some(r"E:\pdv".to_string());

        let list = candidates(&Profile::default(), &env);
        let interpreters: Vec<&str> = list.iter().map(|c| c.interpreter.as_str()).collect();
        assert_eq!(
            interpreters,
            vec![
                r"C:\Install\Python\pythonw.exe",
                r"C:\Users\ana\AppData\Local\pyDatView\Python\pythonw.exe",
                r"E:\pdv\Python\pythonw.exe",
            ]
        );
        assert!(list.iter().all(|c| c.mode == InvocationMode::ImportCall && c.verify));
    }

    #[test]
    fn override_only_when_set() {
        let list = candidates(&Profile::default(), &env_at(r"C:\Install\pyDatView.exe"));
        assert!(list.iter().all(|c| c.origin != Origin::Override));
    }

    #[test]
    fn per_user_falls_back_to_local_data_dir() {
        let mut env = env_at(r"C:\Install\pyDatView.exe");
        env.local_data_dir = Some(r"C:\Users\bo\AppData\Local".to_string());
        let list = candidates(&Profile::default(), &env);
        assert_eq!(list[1].origin, Origin::PerUser);
        assert_eq!(list[1].interpreter, r"C:\Users\bo\AppData\Local\pyDatView\Python\pythonw.exe");
    }

    #[test]
    fn only_per_user_install_exists() {
        let mut env = env_at(r"C:\Install\pyDatView.exe");
        env.user_name = Some("ana".to_string());
        env.override_root = Some(r"E:\pdv".to_string());
        let system = MockSystem::with_files(&[
            r"C:\Users\ana\AppData\Local\pyDatView\Python\pythonw.exe",
            r"E:\pdv\Python\pythonw.exe",
        ]);

        let selected = select(candidates(&Profile::default(), &env), &system).unwrap();
        assert_eq!(selected.origin, Origin::PerUser);
        // Lazy: the override is never probed once the per-user install matched.
        assert_eq!(system.probed().len(), 2);
    }

    #[test]
    fn nothing_found() {
        let system = MockSystem::new();
        let env = env_at(r"C:\Install\pyDatView.exe");
        assert_eq!(select(candidates(&Profile::default(), &env), &system), None);
    }

    #[test]
    fn repo_mode_contract() {
        let system = MockSystem::new();
        let env = env_at(r"C:\repo\_tools\pyDatView.exe");
        let selected = select(candidates(&Profile::default(), &env), &system).unwrap();
        assert_eq!(selected.origin, Origin::Repo);
        assert_eq!(selected.script.as_deref(), Some(r"C:\repo\pyDatView.py"));
        contract_test("repo mode selection", &[INV_REPO_UNPROBED]);
    }

    proptest! {
        #[test]
        fn repo_mode_ignores_filesystem(
            root in "[A-Z]:(\\\\[a-zA-Z0-9 ]{1,8}){0,3}",
            files in prop::collection::vec("[A-Z]:\\\\[a-z]{1,8}\\\\Python\\\\pythonw.exe", 0..4),
            user in proptest::option::of("[a-z]{2,8}"),
        ) {
            let exe = format!(r"{}\_tools\pyDatView.exe", root);
            let mut env = env_at(&exe);
            env.user_name = user;
            env.override_root = Some(r"E:\pdv".to_string());
            let refs: Vec<&str> = files.iter().map(String::as_str).collect();
            let system = MockSystem::with_files(&refs);

            let selected = select(candidates(&Profile::default(), &env), &system).unwrap();
            prop_assert_eq!(selected.origin, Origin::Repo);
            prop_assert_eq!(selected.mode, InvocationMode::DirectScript);
            prop_assert!(system.probed().is_empty());
        }
    }
}
