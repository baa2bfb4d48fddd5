use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated working directory with its own HOME, so no user or
/// workspace config leaks into a test.
pub struct MedhistWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl MedhistWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().to_path_buf();
        Self { temp_dir, root }
    }

    /// Write `.medhist/config.yaml` in the workspace.
    pub fn write_config(&self, yaml: &str) {
        let dir = self.root.join(".medhist");
        fs::create_dir_all(&dir).expect("create .medhist");
        fs::write(dir.join("config.yaml"), yaml).expect("write config");
    }

    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, content).expect("write file");
        path
    }

    /// Export files currently in `dir`, sorted by name.
    pub fn exports_in(dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = fs::read_dir(dir)
            .expect("read dir")
            .map(|entry| entry.expect("dir entry").path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("medical-history-") && n.ends_with(".json"))
            })
            .collect();
        found.sort();
        found
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("medhist").expect("medhist binary");
        cmd.current_dir(&self.root)
            .env("HOME", &self.root)
            .env("XDG_CONFIG_HOME", self.root.join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("MEDHIST_EXPORT_DIR")
            .env_remove("MEDHIST_LOG_FILE")
            .env_remove("MEDHIST_CONFIG");
        cmd
    }
}

pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn finish(output: &std::process::Output, label: &str) -> RunOutput {
    let run = RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    };
    if !run.status.success() {
        eprintln!("[{label}] exit {:?}\nstdout:\n{}\nstderr:\n{}", run.status.code(), run.stdout, run.stderr);
    }
    run
}

pub fn run_medhist<I, S>(workspace: &MedhistWorkspace, args: I, label: &str) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = workspace
        .command()
        .args(args)
        .output()
        .expect("run medhist");
    finish(&output, label)
}

pub fn run_medhist_with_stdin<I, S>(
    workspace: &MedhistWorkspace,
    args: I,
    stdin: &str,
    label: &str,
) -> RunOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let output = workspace
        .command()
        .args(args)
        .write_stdin(stdin.to_string())
        .output()
        .expect("run medhist");
    finish(&output, label)
}
