use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

#[derive(Clone)]
pub struct TestContext {
    pub bin_path: PathBuf,
}

pub struct TestEnv {
    /// Keeps the scratch directory alive for the scenario
    _dir: tempfile::TempDir,
    pub root: PathBuf,
    pub xdg_config: PathBuf,
}

pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestContext {
    pub fn new() -> Result<Self, String> {
        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_yorkshire"));
        if !bin_path.exists() {
            return Err(format!("Binary not found at {}", bin_path.display()));
        }
        Ok(Self { bin_path })
    }

    pub fn create_env(&self, name: &str) -> Result<TestEnv, String> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("yorkshire-e2e-{}-", name))
            .tempdir()
            .map_err(|e| format!("Failed to create temp dir: {}", e))?;
        let root = dir.path().join("project");
        let xdg_config = dir.path().join("config");
        fs::create_dir_all(&root).map_err(|e| format!("Failed to create project dir: {}", e))?;
        fs::create_dir_all(&xdg_config)
            .map_err(|e| format!("Failed to create config dir: {}", e))?;

        Ok(TestEnv {
            _dir: dir,
            root,
            xdg_config,
        })
    }

    pub fn run_yorkshire(&self, env: &TestEnv, args: &[&str]) -> Result<CommandOutput, String> {
        if std::env::var("YORKSHIRE_E2E_LOG").is_ok() {
            eprintln!("command: yorkshire {:?} (cwd: {})", args, env.root.display());
        }
        let output = Command::new(&self.bin_path)
            .args(args)
            .current_dir(&env.root)
            .env("XDG_CONFIG_HOME", &env.xdg_config)
            .env_remove("YORKSHIRE_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .map_err(|e| format!("Failed to run command: {}", e))?;

        Ok(CommandOutput::from_output(output))
    }
}

impl CommandOutput {
    pub fn from_output(output: Output) -> Self {
        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Self {
            status,
            stdout,
            stderr,
        }
    }

    pub fn assert_status(&self, expected: i32) -> Result<(), String> {
        if self.status == expected {
            Ok(())
        } else {
            Err(format!(
                "Expected exit {}, got {}.\nstdout: {}\nstderr: {}",
                expected, self.status, self.stdout, self.stderr
            ))
        }
    }

    pub fn assert_success(&self) -> Result<(), String> {
        self.assert_status(0)
    }

    pub fn assert_stdout_contains(&self, needle: &str) -> Result<(), String> {
        if self.stdout.contains(needle) {
            Ok(())
        } else {
            Err(format!(
                "Expected stdout to contain '{}'.\nstdout: {}",
                needle, self.stdout
            ))
        }
    }

    pub fn assert_stderr_contains(&self, needle: &str) -> Result<(), String> {
        if self.stderr.contains(needle) {
            Ok(())
        } else {
            Err(format!(
                "Expected stderr to contain '{}'.\nstderr: {}",
                needle, self.stderr
            ))
        }
    }
}

pub fn write_file(path: &Path, content: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create parent dirs: {}", e))?;
    }
    fs::write(path, content).map_err(|e| format!("Failed to write file: {}", e))
}

pub fn parse_json_lines(output: &str) -> Result<Vec<serde_json::Value>, String> {
    output
        .lines()
        .map(|line| serde_json::from_str(line).map_err(|e| format!("Invalid JSON output: {}", e)))
        .collect()
}
