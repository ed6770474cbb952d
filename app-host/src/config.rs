use autostart::RegistrarConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "EmailTaskManager";
pub const DEFAULT_PORT: u16 = 8080;
pub const STARTUP_REG_PATH: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";

/// Everything the server, store and registrar need, built once in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Root for static files.
    pub app_dir: PathBuf,
    /// Where documents are persisted, `<app_dir>/data` by default.
    pub data_dir: PathBuf,
    pub app_name: String,
    pub registry_path: String,
}

impl AppConfig {
    /// Loopback config serving `app_dir`.
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        AppConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            data_dir: app_dir.join("data"),
            app_dir,
            app_name: APP_NAME.to_string(),
            registry_path: STARTUP_REG_PATH.to_string(),
        }
    }

    /// Directory holding the running executable, or the working directory if
    /// that can't be resolved.
    pub fn default_app_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn registrar_config(&self) -> RegistrarConfig {
        RegistrarConfig {
            app_name: self.app_name.clone(),
            registry_path: self.registry_path.clone(),
            autostart_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback_on_8080() {
        let config = AppConfig::new("/srv/etm");

        assert!(config.host.is_loopback());
        assert_eq!(config.addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("/srv/etm").join("data"));
        assert_eq!(config.app_name, "EmailTaskManager");
    }

    #[test]
    fn port_override_changes_address() {
        let config = AppConfig::new("/srv/etm").with_port(9123);
        assert_eq!(config.addr().port(), 9123);
    }
}
