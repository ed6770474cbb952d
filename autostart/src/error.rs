use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutostartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A registry call returned a non-success status code.
    #[error("Registry {op} failed with code {code}")]
    Registry { op: &'static str, code: u32 },

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("Startup registration is not supported on this platform")]
    Unsupported,
}
