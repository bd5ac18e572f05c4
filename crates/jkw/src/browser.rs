use color_eyre::eyre::{eyre, Result};
use std::process::{Command, Stdio};

/// Opens a URL in the default browser.
///
/// Windows and macOS are picked at compile time; WSL is detected at runtime
/// since it builds as `target_os = "linux"` but needs `wslview`.
pub fn open_in_browser(url: &str) -> Result<()> {
    check_web_url(url)?;

    if cfg!(target_os = "windows") {
        // Empty "" title keeps `start` from treating the URL as a window title
        return spawn_detached("cmd", &["/C", "start", "", url])
            .map_err(|e| eyre!("Failed to open browser: {e}"));
    }

    let wsl = std::env::var_os("WSL_DISTRO_NAME").is_some();
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if wsl {
        "wslview"
    } else {
        "xdg-open"
    };

    match spawn_detached(opener, &[url]) {
        Ok(()) => return Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(eyre!("Failed to open browser with {opener}: {e}")),
    }

    if wsl {
        return spawn_detached("cmd.exe", &["/C", "start", "", url])
            .map_err(|e| eyre!("Failed to open browser via cmd.exe: {e}"));
    }

    Err(eyre!(
        "No browser opener found. On WSL install wslu; on Linux install xdg-utils."
    ))
}

/// Only http(s) URLs are handed to the opener.
pub fn check_web_url(url: &str) -> Result<()> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(eyre!("Refusing to open non-HTTP URL: {url}"));
    }
    Ok(())
}

fn spawn_detached(cmd: &str, args: &[&str]) -> std::io::Result<()> {
    Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
