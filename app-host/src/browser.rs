use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinHandle;

/// Opens `url` in the default browser once `delay` has passed.
/// A failure to launch is logged and otherwise ignored. The opener is
/// waited on so it doesn't linger as a zombie while the server runs.
pub fn open_after(url: String, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        run_opener(opener_command(&url), &url).await;
    })
}

/// Runs the opener to completion, reaping it.
async fn run_opener(mut command: Command, url: &str) {
    match command.status().await {
        Ok(status) if !status.success() => {
            log::warn!("Browser opener for {} exited with {}", url, status);
        }
        Ok(_) => {}
        Err(e) => log::warn!("Could not open browser at {}: {}", url, e),
    }
}

fn opener_command(url: &str) -> Command {
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        // The empty string is the window title `start` expects first
        command.args(["/C", "start", ""]).arg(url);
        command
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_uses_xdg_open() {
        let command = opener_command("http://127.0.0.1:8080");
        let command = command.as_std();
        assert_eq!(command.get_program(), "xdg-open");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["http://127.0.0.1:8080"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn opener_runs_to_completion() {
        let started = std::time::Instant::now();
        let mut command = Command::new("sh");
        command.args(["-c", "sleep 0.2"]);

        run_opener(command, "http://127.0.0.1:8080").await;

        // Returning only after the child exited means it was waited on
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn missing_opener_is_logged_not_fatal() {
        let command = Command::new("definitely-not-a-browser-opener-binary");
        run_opener(command, "http://127.0.0.1:8080").await;
    }
}
