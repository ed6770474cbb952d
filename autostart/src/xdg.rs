use crate::{AutostartError, LaunchCommand, StartupRegistrar};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Login entry kept as a freedesktop autostart `.desktop` file.
/// The app counts as enabled while the file exists.
#[derive(Debug, Clone)]
pub struct XdgAutostart {
    app_name: String,
    dir: PathBuf,
    launch: LaunchCommand,
}

impl XdgAutostart {
    pub fn new(app_name: &str, dir: PathBuf, launch: LaunchCommand) -> Self {
        XdgAutostart {
            app_name: app_name.to_string(),
            dir,
            launch,
        }
    }

    /// Uses `$XDG_CONFIG_HOME/autostart`, falling back to `~/.config/autostart`.
    pub fn in_config_dir(app_name: &str, launch: LaunchCommand) -> Result<Self, AutostartError> {
        let dir = dirs::config_dir()
            .ok_or(AutostartError::NoConfigDir)?
            .join("autostart");
        Ok(XdgAutostart::new(app_name, dir, launch))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(format!("{}.desktop", self.app_name))
    }

    fn desktop_entry(&self) -> String {
        format!(
            "[Desktop Entry]\n\
             Type=Application\n\
             Name={}\n\
             Exec={}\n\
             Terminal=false\n\
             NoDisplay=true\n\
             X-GNOME-Autostart-enabled=true\n",
            self.app_name,
            self.launch.desktop_exec()
        )
    }
}

impl StartupRegistrar for XdgAutostart {
    fn location(&self) -> String {
        format!("login autostart ({})", self.entry_path().display())
    }

    fn query(&self) -> Result<bool, AutostartError> {
        Ok(self.entry_path().is_file())
    }

    fn register(&self) -> Result<(), AutostartError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entry_path(), self.desktop_entry())?;
        Ok(())
    }

    fn unregister(&self) -> Result<bool, AutostartError> {
        match fs::remove_file(self.entry_path()) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
