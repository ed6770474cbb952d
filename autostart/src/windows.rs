use crate::{AutostartError, LaunchCommand, StartupRegistrar};
use std::ptr::{null, null_mut};
use windows_sys::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_SUCCESS};
use windows_sys::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_READ, KEY_SET_VALUE, REG_SZ,
};

/// Login entry kept as a `REG_SZ` value under the per-user Run key.
/// No admin rights are needed since everything lives in `HKEY_CURRENT_USER`.
#[derive(Debug, Clone)]
pub struct RunKeyRegistrar {
    app_name: String,
    key_path: String,
    launch: LaunchCommand,
}

/// Open registry key, closed on drop.
struct OpenKey(HKEY);

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            RegCloseKey(self.0);
        }
    }
}

fn wide_string(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn check(op: &'static str, code: u32) -> Result<(), AutostartError> {
    if code == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(AutostartError::Registry { op, code })
    }
}

impl RunKeyRegistrar {
    pub fn new(app_name: &str, key_path: &str, launch: LaunchCommand) -> Self {
        RunKeyRegistrar {
            app_name: app_name.to_string(),
            key_path: key_path.to_string(),
            launch,
        }
    }

    fn open(&self, access: u32) -> Result<OpenKey, AutostartError> {
        let key_path = wide_string(&self.key_path);
        let mut hkey: HKEY = null_mut();
        let code = unsafe { RegOpenKeyExW(HKEY_CURRENT_USER, key_path.as_ptr(), 0, access, &mut hkey) };
        check("open", code)?;
        Ok(OpenKey(hkey))
    }
}

impl StartupRegistrar for RunKeyRegistrar {
    fn location(&self) -> String {
        "Windows startup".to_string()
    }

    fn query(&self) -> Result<bool, AutostartError> {
        let key = self.open(KEY_READ)?;
        let name = wide_string(&self.app_name);
        let mut data_size: u32 = 0;
        let code = unsafe {
            RegQueryValueExW(
                key.0,
                name.as_ptr(),
                null(),
                null_mut(),
                null_mut(),
                &mut data_size,
            )
        };
        if code == ERROR_FILE_NOT_FOUND {
            return Ok(false);
        }
        check("query", code)?;
        Ok(true)
    }

    fn register(&self) -> Result<(), AutostartError> {
        let key = self.open(KEY_SET_VALUE)?;
        let name = wide_string(&self.app_name);
        let data = wide_string(&self.launch.command_line());
        // Size in bytes, including the terminating nul
        let data_len = (data.len() * std::mem::size_of::<u16>()) as u32;
        let code = unsafe {
            RegSetValueExW(
                key.0,
                name.as_ptr(),
                0,
                REG_SZ,
                data.as_ptr() as *const u8,
                data_len,
            )
        };
        check("set", code)
    }

    fn unregister(&self) -> Result<bool, AutostartError> {
        let key = self.open(KEY_SET_VALUE)?;
        let name = wide_string(&self.app_name);
        let code = unsafe { RegDeleteValueW(key.0, name.as_ptr()) };
        if code == ERROR_FILE_NOT_FOUND {
            return Ok(false);
        }
        check("delete", code)?;
        Ok(true)
    }
}
