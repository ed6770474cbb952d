use crate::AutostartError;
use std::path::PathBuf;

/// Flag that tells a relaunched instance not to open a browser window.
pub const BACKGROUND_FLAG: &str = "--background";

/// The program and arguments written into a login entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    /// Builds the relaunch command for the running executable.
    ///
    /// The path is looked up on every call, so registering again after the
    /// binary moved writes the new location. `extra_args` go after
    /// `--background`.
    pub fn current(extra_args: Vec<String>) -> Result<Self, AutostartError> {
        let program = std::env::current_exe()?;
        let mut args = vec![BACKGROUND_FLAG.to_string()];
        args.extend(extra_args);
        Ok(LaunchCommand { program, args })
    }

    /// Renders the command the way a Windows Run value expects it: program
    /// always quoted, arguments quoted only when they contain whitespace.
    pub fn command_line(&self) -> String {
        let mut line = format!("\"{}\"", self.program.display());
        for arg in &self.args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }

    /// Renders the command for a desktop entry `Exec=` key, where every
    /// argument is quoted and `"`, `` ` ``, `$` and `\` are escaped.
    pub fn desktop_exec(&self) -> String {
        let program = self.program.display().to_string();
        std::iter::once(program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_desktop_arg)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn quote_desktop_arg(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    // Field codes start with '%', which has to be doubled even inside quotes
    quoted.replace('%', "%%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(program: &str, args: &[&str]) -> LaunchCommand {
        LaunchCommand {
            program: PathBuf::from(program),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    #[test]
    fn current_always_starts_with_background_flag() {
        let launch = LaunchCommand::current(vec!["--port".into(), "9000".into()]).unwrap();
        assert_eq!(launch.args, vec!["--background", "--port", "9000"]);
        assert!(launch.program.is_absolute());
    }

    #[test]
    fn command_line_quotes_program_and_spaced_args() {
        let launch = command(
            r"C:\Program Files\Email Task Manager\email-task-manager.exe",
            &["--background", "--app-dir", r"C:\My Apps\etm"],
        );
        assert_eq!(
            launch.command_line(),
            r#""C:\Program Files\Email Task Manager\email-task-manager.exe" --background --app-dir "C:\My Apps\etm""#
        );
    }

    #[test]
    fn desktop_exec_escapes_reserved_characters() {
        let launch = command("/opt/etm/email-task-manager", &["--background", "/home/u/$weird%dir"]);
        assert_eq!(
            launch.desktop_exec(),
            r#""/opt/etm/email-task-manager" "--background" "/home/u/\$weird%%dir""#
        );
    }
}
