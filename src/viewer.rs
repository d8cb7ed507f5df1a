//! Opening the finished PDF in the user's default viewer.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Something that can show a PDF to the user.
pub trait Viewer {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// Launches the platform's default application for the file.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemViewer;

impl SystemViewer {
    fn command(path: &Path) -> Command {
        if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.args(["/C", "start", ""]).arg(path);
            command
        } else if cfg!(target_os = "macos") {
            let mut command = Command::new("open");
            command.arg(path);
            command
        } else {
            let mut command = Command::new("xdg-open");
            command.arg(path);
            command
        }
    }
}

impl Viewer for SystemViewer {
    fn open(&self, path: &Path) -> io::Result<()> {
        Self::command(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
    }
}

/// Never opens anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoViewer;

impl Viewer for NoViewer {
    fn open(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
