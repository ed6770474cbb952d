//! Per-user "start at login" registration.
//!
//! Each platform gets its own [`StartupRegistrar`]; [`native_registrar`]
//! picks the one matching the build target.

pub mod error;
pub mod launch;
pub mod unsupported;
pub mod xdg;

#[cfg(windows)]
pub mod windows;

pub use error::AutostartError;
pub use launch::LaunchCommand;
pub use unsupported::Unsupported;
pub use xdg::XdgAutostart;

#[cfg(windows)]
pub use windows::RunKeyRegistrar;

use std::path::PathBuf;

/// Where and under which name the login entry is kept.
#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    pub app_name: String,
    /// Run key below `HKEY_CURRENT_USER` (Windows).
    pub registry_path: String,
    /// Overrides `$XDG_CONFIG_HOME/autostart` (Linux).
    pub autostart_dir: Option<PathBuf>,
}

/// A single named login entry that relaunches the app.
///
/// Implementors provide the fallible primitives. The provided
/// `is_enabled` / `enable` / `disable` methods log failures and fold them
/// into a plain `bool`, which is what the CLI and HTTP layers report.
pub trait StartupRegistrar: Send + Sync {
    /// Human readable name of the place the entry lives, used in messages.
    fn location(&self) -> String;

    /// Returns whether the entry exists.
    fn query(&self) -> Result<bool, AutostartError>;

    /// Creates or replaces the entry.
    fn register(&self) -> Result<(), AutostartError>;

    /// Removes the entry. Returns false if there was nothing to remove.
    fn unregister(&self) -> Result<bool, AutostartError>;

    fn is_enabled(&self) -> bool {
        match self.query() {
            Ok(enabled) => enabled,
            // Polled on every status request, not worth an error each time
            Err(AutostartError::Unsupported) => {
                log::debug!("Startup status unavailable on this platform");
                false
            }
            Err(e) => {
                log::error!("Error checking startup status: {}", e);
                false
            }
        }
    }

    fn enable(&self) -> bool {
        match self.register() {
            Ok(()) => {
                log::info!("Added to {}", self.location());
                true
            }
            Err(e) => {
                log::error!("Failed to add to {}: {}", self.location(), e);
                false
            }
        }
    }

    fn disable(&self) -> bool {
        match self.unregister() {
            Ok(true) => {
                log::info!("Removed from {}", self.location());
                true
            }
            Ok(false) => {
                log::info!("App was not in {}", self.location());
                true
            }
            Err(e) => {
                log::error!("Failed to remove from {}: {}", self.location(), e);
                false
            }
        }
    }
}

/// Returns the native registrar relaunching the running executable with
/// `extra_args`.
///
/// If the executable path can't be resolved this falls back to
/// [`Unsupported`], so status checks and the server still work and only
/// registration reports failure.
pub fn current_registrar(
    config: &RegistrarConfig,
    extra_args: Vec<String>,
) -> Box<dyn StartupRegistrar> {
    registrar_from(config, LaunchCommand::current(extra_args))
}

fn registrar_from(
    config: &RegistrarConfig,
    launch: Result<LaunchCommand, AutostartError>,
) -> Box<dyn StartupRegistrar> {
    match launch {
        Ok(launch) => native_registrar(config, launch),
        Err(e) => {
            log::warn!("Could not resolve the executable for startup registration: {}", e);
            Box::new(Unsupported)
        }
    }
}

/// Returns the registrar for the platform this binary was built for.
#[cfg(windows)]
pub fn native_registrar(
    config: &RegistrarConfig,
    launch: LaunchCommand,
) -> Box<dyn StartupRegistrar> {
    Box::new(RunKeyRegistrar::new(
        &config.app_name,
        &config.registry_path,
        launch,
    ))
}

/// Returns the registrar for the platform this binary was built for.
#[cfg(target_os = "linux")]
pub fn native_registrar(
    config: &RegistrarConfig,
    launch: LaunchCommand,
) -> Box<dyn StartupRegistrar> {
    let registrar = match &config.autostart_dir {
        Some(dir) => Ok(XdgAutostart::new(&config.app_name, dir.clone(), launch)),
        None => XdgAutostart::in_config_dir(&config.app_name, launch),
    };

    match registrar {
        Ok(registrar) => Box::new(registrar),
        Err(e) => {
            log::warn!("Startup registration unavailable: {}", e);
            Box::new(Unsupported)
        }
    }
}

/// Returns the registrar for the platform this binary was built for.
#[cfg(not(any(windows, target_os = "linux")))]
pub fn native_registrar(
    _config: &RegistrarConfig,
    _launch: LaunchCommand,
) -> Box<dyn StartupRegistrar> {
    Box::new(Unsupported)
}
