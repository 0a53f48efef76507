//! Session lifecycle operations
//!
//! Each operation is a short, synchronous sequence of tmux (and possibly
//! git) invocations. Nothing is retried; the first failing command ends
//! the operation and its error is handed back to the caller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, ReadinessProbe};
use crate::git::{self, RemoteUrl};
use crate::process::CommandRunner;

use super::tmux::Tmux;
use super::{normalize_session_name, session_name_from_path, SessionError};

/// Performs the session operations the picker commits to
pub struct SessionOrchestrator<R: CommandRunner + 'static> {
    tmux: Tmux<R>,
    runner: Arc<R>,
    inside_tmux: bool,
    clone_root: PathBuf,
    startup_command: Option<String>,
    readiness: ReadinessProbe,
}

impl<R: CommandRunner + 'static> SessionOrchestrator<R> {
    pub fn new(config: &Config, runner: Arc<R>) -> Self {
        Self {
            tmux: Tmux::new(Arc::clone(&runner)),
            runner,
            inside_tmux: config.inside_tmux,
            clone_root: config.clone_root.clone(),
            startup_command: config.startup_command.clone(),
            readiness: config.readiness,
        }
    }

    /// Open (creating if needed) a session for a project directory
    pub fn create(&self, path: &Path) -> Result<(), SessionError> {
        let name = session_name_from_path(path);
        if name.is_empty() {
            return Err(SessionError::EmptySessionName);
        }
        self.open_session(&name, Some(path))
    }

    /// Open (creating if needed) a session with a literal name and no working directory
    pub fn create_named(&self, name: &str) -> Result<(), SessionError> {
        let name = normalize_session_name(name);
        if name.is_empty() {
            return Err(SessionError::EmptySessionName);
        }
        self.open_session(&name, None)
    }

    /// Make `name` the active session of this terminal
    ///
    /// Inside a tmux client this switches the client; outside it attaches
    /// the terminal, blocking until the user detaches.
    pub fn switch(&self, name: &str) -> Result<(), SessionError> {
        tracing::info!("Switching to session {}", name);
        if self.inside_tmux {
            self.tmux.switch_client(name)
        } else {
            self.tmux.attach_session(name)
        }
    }

    pub fn kill(&self, name: &str) -> Result<(), SessionError> {
        tracing::info!("Killing session {}", name);
        self.tmux.kill_session(name)
    }

    /// Rename a session, returning the normalized new name
    pub fn rename(&self, old: &str, new: &str) -> Result<String, SessionError> {
        let new = normalize_session_name(new);
        if old.trim().is_empty() || new.is_empty() {
            return Err(SessionError::EmptySessionName);
        }
        tracing::info!("Renaming session {} to {}", old, new);
        self.tmux.rename_session(old, &new)?;
        Ok(new)
    }

    /// Clone a remote repository under the clone root (unless already
    /// present) and open a session in it
    pub fn clone_and_create(&self, url: &str) -> Result<(), SessionError> {
        let remote =
            RemoteUrl::parse(url).ok_or_else(|| SessionError::InvalidRemoteUrl(url.to_string()))?;

        std::fs::create_dir_all(&self.clone_root).map_err(|source| SessionError::CreateDir {
            path: self.clone_root.clone(),
            source,
        })?;

        let dest = self.clone_root.join(remote.name());
        if dest.exists() {
            tracing::info!("{} already cloned at {}", remote.as_str(), dest.display());
        } else {
            git::clone_repository(self.runner.as_ref(), &remote, &dest)?;
        }

        self.create(&dest)
    }

    fn open_session(&self, name: &str, cwd: Option<&Path>) -> Result<(), SessionError> {
        if !self.inside_tmux && !self.tmux.server_running() {
            tracing::info!("Starting tmux with new session {}", name);
            self.spawn_startup_injection(name);
            return self.tmux.new_session_attached(name, cwd);
        }

        if !self.tmux.has_session(name) {
            tracing::info!("Creating session {}", name);
            self.tmux.new_session_detached(name, cwd)?;
            if let Some(command) = &self.startup_command {
                inject_startup_command(&self.tmux, name, command, self.readiness);
            }
        }

        self.switch(name)
    }

    /// Inject the startup command from a background task while the
    /// foreground blocks inside `new-session`
    fn spawn_startup_injection(&self, name: &str) {
        let Some(command) = self.startup_command.clone() else {
            return;
        };
        let tmux = self.tmux.clone();
        let name = name.to_string();
        let probe = self.readiness;
        let task = move || {
            inject_startup_command(&tmux, &name, &command, probe);
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(task);
            }
            Err(_) => {
                std::thread::spawn(task);
            }
        }
    }
}

/// Wait until `name` answers `has-session`, then type `command` into it
///
/// Returns whether the command was sent. Exhausting the probe or a failed
/// `send-keys` is logged and otherwise ignored.
fn inject_startup_command<R: CommandRunner>(
    tmux: &Tmux<R>,
    name: &str,
    command: &str,
    probe: ReadinessProbe,
) -> bool {
    let ready = (0..probe.attempts).any(|attempt| {
        if attempt > 0 {
            std::thread::sleep(probe.interval);
        }
        tmux.has_session(name)
    });
    if !ready {
        tracing::warn!(
            "Session {} not ready after {} checks, skipping startup command",
            name,
            probe.attempts
        );
        return false;
    }

    match tmux.send_keys(name, command) {
        Ok(()) => {
            tracing::debug!("Sent startup command to {}", name);
            true
        }
        Err(e) => {
            tracing::warn!("Failed to send startup command to {}: {}", name, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::fake::FakeRunner;
    use std::time::{Duration, Instant};

    fn config(inside_tmux: bool, clone_root: PathBuf) -> Config {
        let mut config = Config::with_home(PathBuf::from("/home/u"));
        config.inside_tmux = inside_tmux;
        config.clone_root = clone_root;
        config.readiness = ReadinessProbe {
            attempts: 200,
            interval: Duration::from_millis(5),
        };
        config
    }

    fn orchestrator(runner: &Arc<FakeRunner>, inside_tmux: bool) -> SessionOrchestrator<FakeRunner> {
        SessionOrchestrator::new(&config(inside_tmux, PathBuf::from("/tmp/unused")), Arc::clone(runner))
    }

    fn wait_for_send_keys(runner: &FakeRunner) -> Vec<crate::process::fake::Call> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let calls = runner.calls_to("tmux", "send-keys");
            if !calls.is_empty() || Instant::now() > deadline {
                return calls;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_create_inside_tmux_creates_injects_and_switches() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("other", 1, 1)]));
        let orch = orchestrator(&runner, true);

        orch.create(Path::new("/home/u/dev/site.io")).unwrap();

        let subs: Vec<String> = runner
            .calls()
            .iter()
            .filter(|c| c.program == "tmux")
            .map(|c| c.subcommand().to_string())
            .collect();
        assert_eq!(
            subs,
            vec!["has-session", "new-session", "has-session", "send-keys", "switch-client"]
        );
        let new = &runner.calls_to("tmux", "new-session")[0];
        assert_eq!(
            new.args,
            vec!["new-session", "-d", "-s", "site_io", "-c", "/home/u/dev/site.io"]
        );
        let keys = &runner.calls_to("tmux", "send-keys")[0];
        assert_eq!(keys.args, vec!["send-keys", "-t", "site_io", "nvim .", "Enter"]);
    }

    #[test]
    fn test_create_existing_session_only_switches() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("alpha", 0, 1)]));
        let orch = orchestrator(&runner, true);

        orch.create(Path::new("/home/u/dev/alpha")).unwrap();

        assert!(runner.calls_to("tmux", "new-session").is_empty());
        assert!(runner.calls_to("tmux", "send-keys").is_empty());
        let switch = &runner.calls_to("tmux", "switch-client")[0];
        assert_eq!(switch.args, vec!["switch-client", "-t", "=alpha"]);
    }

    #[test]
    fn test_create_without_server_attaches_and_injects_in_background() {
        let runner = Arc::new(FakeRunner::new());
        let orch = orchestrator(&runner, false);

        orch.create(Path::new("/home/u/dev/alpha")).unwrap();

        let new = &runner.calls_to("tmux", "new-session")[0];
        assert!(new.interactive);
        assert_eq!(
            new.args,
            vec!["new-session", "-s", "alpha", "-c", "/home/u/dev/alpha"]
        );
        assert!(runner.calls_to("tmux", "switch-client").is_empty());
        assert!(runner.calls_to("tmux", "attach-session").is_empty());

        let keys = wait_for_send_keys(&runner);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].args[2], "alpha");
    }

    #[test]
    fn test_outside_tmux_with_server_attaches() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("work", 0, 2)]));
        let orch = orchestrator(&runner, false);

        orch.create_named("work").unwrap();

        let attach = &runner.calls_to("tmux", "attach-session")[0];
        assert!(attach.interactive);
        assert_eq!(attach.args, vec!["attach-session", "-t", "=work"]);
    }

    #[test]
    fn test_create_named_normalizes_and_omits_cwd() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("x", 1, 1)]));
        let orch = orchestrator(&runner, true);

        orch.create_named("my notes.v2").unwrap();

        let new = &runner.calls_to("tmux", "new-session")[0];
        assert_eq!(new.args, vec!["new-session", "-d", "-s", "my_notes_v2"]);
        assert!(runner.session_names().contains(&"my_notes_v2".to_string()));
    }

    #[test]
    fn test_create_named_rejects_empty() {
        let runner = Arc::new(FakeRunner::new());
        let orch = orchestrator(&runner, true);
        assert!(matches!(
            orch.create_named("   "),
            Err(SessionError::EmptySessionName)
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_startup_command_can_be_disabled() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("x", 1, 1)]));
        let mut cfg = config(true, PathBuf::from("/tmp/unused"));
        cfg.startup_command = None;
        let orch = SessionOrchestrator::new(&cfg, Arc::clone(&runner));

        orch.create_named("fresh").unwrap();
        assert!(runner.calls_to("tmux", "send-keys").is_empty());
    }

    #[test]
    fn test_injection_gives_up_when_session_never_appears() {
        let runner = Arc::new(FakeRunner::new());
        let tmux = Tmux::new(Arc::clone(&runner));
        let probe = ReadinessProbe {
            attempts: 3,
            interval: Duration::from_millis(1),
        };

        assert!(!inject_startup_command(&tmux, "ghost", "nvim .", probe));
        assert_eq!(runner.calls_to("tmux", "has-session").len(), 3);
        assert!(runner.calls_to("tmux", "send-keys").is_empty());
    }

    #[test]
    fn test_switch_failure_propagates() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("a", 0, 1)]));
        runner.fail("switch-client");
        let orch = orchestrator(&runner, true);
        assert!(matches!(
            orch.switch("a"),
            Err(SessionError::CommandFailed { .. })
        ));
    }

    #[test]
    fn test_kill_and_rename() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("a", 0, 1), ("b", 0, 1)]));
        let orch = orchestrator(&runner, true);

        orch.kill("a").unwrap();
        assert_eq!(runner.session_names(), vec!["b"]);

        let renamed = orch.rename("b", "new name.x").unwrap();
        assert_eq!(renamed, "new_name_x");
        assert_eq!(runner.session_names(), vec!["new_name_x"]);
        assert_eq!(runner.calls_to("tmux", "rename-session").len(), 1);
    }

    #[test]
    fn test_rename_validates_before_running_anything() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("a", 0, 1)]));
        let orch = orchestrator(&runner, true);

        assert!(matches!(orch.rename("a", " "), Err(SessionError::EmptySessionName)));
        assert!(matches!(orch.rename("", "b"), Err(SessionError::EmptySessionName)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_clone_and_create_clones_once() {
        let tmp = tempfile::tempdir().unwrap();
        let clone_root = tmp.path().join("clones");
        let runner = Arc::new(FakeRunner::with_sessions(&[("x", 1, 1)]));
        let orch = SessionOrchestrator::new(&config(true, clone_root.clone()), Arc::clone(&runner));

        orch.clone_and_create("https://github.com/user/repo.git").unwrap();

        let clones = runner.calls_to("git", "clone");
        assert_eq!(clones.len(), 1);
        assert_eq!(clones[0].args[2], clone_root.join("repo").to_string_lossy());
        let new = &runner.calls_to("tmux", "new-session")[0];
        assert_eq!(new.args[3], "repo");
        assert_eq!(new.args[5], clone_root.join("repo").to_string_lossy());

        orch.clone_and_create("https://github.com/user/repo.git").unwrap();
        assert_eq!(runner.calls_to("git", "clone").len(), 1);
        assert_eq!(runner.calls_to("tmux", "switch-client").len(), 2);
    }

    #[test]
    fn test_clone_and_create_rejects_unknown_url() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::new());
        let orch = SessionOrchestrator::new(&config(true, tmp.path().join("c")), Arc::clone(&runner));

        let err = orch.clone_and_create("not a url").unwrap_err();
        assert!(matches!(err, SessionError::InvalidRemoteUrl(_)));
        assert!(runner.calls().is_empty());
        assert!(!tmp.path().join("c").exists());
    }

    #[test]
    fn test_clone_failure_skips_session_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Arc::new(FakeRunner::with_sessions(&[("x", 1, 1)]));
        runner.fail("clone");
        let orch = SessionOrchestrator::new(&config(true, tmp.path().to_path_buf()), Arc::clone(&runner));

        assert!(orch.clone_and_create("git@github.com:user/tool.git").is_err());
        assert!(runner.calls_to("tmux", "new-session").is_empty());
    }
    #[test]
    fn test_stale_kill_does_not_touch_prefix_sibling() {
        let runner = Arc::new(FakeRunner::with_sessions(&[("apiserver", 0, 1)]));
        let orch = orchestrator(&runner, true);

        assert!(orch.kill("api").is_err());
        assert!(orch.switch("api").is_err());
        assert_eq!(runner.session_names(), vec!["apiserver"]);
        let kill = &runner.calls_to("tmux", "kill-session")[0];
        assert_eq!(kill.args, vec!["kill-session", "-t", "=api"]);
    }

    #[tokio::test]
    async fn test_background_injection_inside_runtime() {
        let runner = Arc::new(FakeRunner::new());
        let orch = orchestrator(&runner, false);

        orch.create(Path::new("/home/u/dev/beta")).unwrap();

        let new = &runner.calls_to("tmux", "new-session")[0];
        assert!(new.interactive);
        let keys = wait_for_send_keys(&runner);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].args, vec!["send-keys", "-t", "beta", "nvim .", "Enter"]);
    }
}
