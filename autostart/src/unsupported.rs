use crate::{AutostartError, StartupRegistrar};

/// Stand-in for targets without a login mechanism we know how to drive.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl StartupRegistrar for Unsupported {
    fn location(&self) -> String {
        "startup".to_string()
    }

    fn query(&self) -> Result<bool, AutostartError> {
        Err(AutostartError::Unsupported)
    }

    fn register(&self) -> Result<(), AutostartError> {
        Err(AutostartError::Unsupported)
    }

    fn unregister(&self) -> Result<bool, AutostartError> {
        Err(AutostartError::Unsupported)
    }
}
