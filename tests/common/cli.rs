use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Isolated home, config dir and cache file for one `nissue` run.
pub struct IssueWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub cache_path: PathBuf,
}

impl IssueWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let cache_path = root.join("notion.nvim.db");
        Self {
            temp_dir,
            root,
            cache_path,
        }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.root.join("config")
    }

    pub fn write_config(&self, yaml: &str) {
        let dir = self.config_dir().join("notion-issues");
        fs::create_dir_all(&dir).expect("config dir");
        fs::write(dir.join("config.yaml"), yaml).expect("write config");
    }

    /// A `nissue` command with every `NOTION_*` variable cleared.
    pub fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("nissue"));
        cmd.current_dir(&self.root);
        cmd.args(args);
        for key in [
            "NOTION_INTEGRATION_TOKEN",
            "NOTION_DATABASE_ID",
            "NOTION_API_BASE_URL",
            "RUST_LOG",
        ] {
            cmd.env_remove(key);
        }
        cmd.env("HOME", &self.root);
        cmd.env("XDG_CONFIG_HOME", self.config_dir());
        cmd.env("NOTION_ISSUES_CACHE", &self.cache_path);
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("json stdout")
}
