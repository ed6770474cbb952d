use crate::config::{AppConfig, DEFAULT_PORT};
use autostart::StartupRegistrar;
use clap::Parser;
use std::path::PathBuf;

/// Email Task Manager launcher
#[derive(Parser, Debug)]
#[command(name = "email-task-manager", version, about = "Email Task Manager Launcher")]
pub struct Cli {
    /// Run in background mode (no browser open)
    #[arg(long)]
    pub background: bool,

    /// Add to startup at login
    #[arg(long)]
    pub enable_startup: bool,

    /// Remove from startup at login
    #[arg(long)]
    pub disable_startup: bool,

    /// Check startup status
    #[arg(long)]
    pub status: bool,

    /// Port to listen on
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory with the front-end files (defaults to the executable's directory)
    #[arg(long)]
    pub app_dir: Option<PathBuf>,
}

/// The single thing this invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    EnableStartup,
    DisableStartup,
    Status,
    Serve { open_browser: bool },
}

impl Cli {
    /// Picks the action, first match wins:
    /// enable, disable, status, then the server.
    pub fn action(&self) -> Action {
        if self.enable_startup {
            Action::EnableStartup
        } else if self.disable_startup {
            Action::DisableStartup
        } else if self.status {
            Action::Status
        } else {
            Action::Serve {
                open_browser: !self.background,
            }
        }
    }

    pub fn config(&self) -> AppConfig {
        let app_dir = match &self.app_dir {
            Some(dir) if dir.is_relative() => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .unwrap_or_else(|_| dir.clone()),
            Some(dir) => dir.clone(),
            None => AppConfig::default_app_dir(),
        };
        AppConfig::new(app_dir).with_port(self.port)
    }

    /// Overrides a login relaunch needs to end up serving the same thing.
    /// `--background` itself is added by the launch command.
    pub fn relaunch_args(&self, config: &AppConfig) -> Vec<String> {
        let mut args = Vec::new();
        if self.port != DEFAULT_PORT {
            args.push("--port".to_string());
            args.push(self.port.to_string());
        }
        if self.app_dir.is_some() {
            args.push("--app-dir".to_string());
            args.push(config.app_dir.display().to_string());
        }
        args
    }
}

/// Runs one of the registration actions and prints the outcome.
/// Failures are reported but still exit cleanly.
pub fn run_startup_action(action: Action, registrar: &dyn StartupRegistrar) {
    if let Some(line) = startup_action_output(action, registrar) {
        println!("{}", line);
    }
}

/// Performs `action` and returns what should go to stdout, if anything.
/// Enable and disable already report their outcome through the registrar's
/// log lines.
fn startup_action_output(action: Action, registrar: &dyn StartupRegistrar) -> Option<String> {
    match action {
        Action::EnableStartup => {
            registrar.enable();
            None
        }
        Action::DisableStartup => {
            registrar.disable();
            None
        }
        Action::Status => Some(status_line(registrar.is_enabled())),
        // The server path is handled by main
        Action::Serve { .. } => None,
    }
}

fn status_line(enabled: bool) -> String {
    format!("Startup: {}", if enabled { "Enabled" } else { "Disabled" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("email-task-manager").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_flags_serves_with_browser() {
        assert_eq!(parse(&[]).action(), Action::Serve { open_browser: true });
    }

    #[test]
    fn background_suppresses_browser() {
        assert_eq!(
            parse(&["--background"]).action(),
            Action::Serve { open_browser: false }
        );
    }

    #[test]
    fn registration_flags_follow_priority_order() {
        assert_eq!(
            parse(&["--status", "--disable-startup", "--enable-startup"]).action(),
            Action::EnableStartup
        );
        assert_eq!(
            parse(&["--status", "--disable-startup", "--background"]).action(),
            Action::DisableStartup
        );
        assert_eq!(parse(&["--background", "--status"]).action(), Action::Status);
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["email-task-manager", "--bogus"]).is_err());
    }

    #[test]
    fn relaunch_args_only_carry_overrides() {
        let cli = parse(&["--enable-startup"]);
        assert!(cli.relaunch_args(&cli.config()).is_empty());

        let cli = parse(&["--enable-startup", "--port", "9000", "--app-dir", "/srv/etm"]);
        let config = cli.config();
        assert_eq!(
            cli.relaunch_args(&config),
            vec!["--port", "9000", "--app-dir", "/srv/etm"]
        );
        assert_eq!(config.data_dir, PathBuf::from("/srv/etm").join("data"));
    }

    #[test]
    fn registration_outcome_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let launch = autostart::LaunchCommand {
            program: PathBuf::from("/opt/etm/email-task-manager"),
            args: vec!["--background".to_string()],
        };
        let registrar = autostart::XdgAutostart::new("EmailTaskManager", dir.path().to_path_buf(), launch);

        assert_eq!(startup_action_output(Action::EnableStartup, &registrar), None);
        assert!(registrar.is_enabled());
        assert_eq!(
            startup_action_output(Action::Status, &registrar).as_deref(),
            Some("Startup: Enabled")
        );

        assert_eq!(startup_action_output(Action::DisableStartup, &registrar), None);
        assert!(!registrar.is_enabled());
        assert_eq!(
            startup_action_output(Action::Status, &registrar).as_deref(),
            Some("Startup: Disabled")
        );
    }

    #[test]
    fn status_line_wording() {
        assert_eq!(status_line(true), "Startup: Enabled");
        assert_eq!(status_line(false), "Startup: Disabled");
    }
}
