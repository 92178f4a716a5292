//! Version control of the data directory
//!
//! After each mutating step the mirror asks a [`VersionControl`] to record
//! the changed path. With git enabled this stages the path, commits it if
//! anything is staged, and pushes. Any failing git command is fatal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Records changes below a path
pub trait VersionControl {
    /// Stage `path`, commit it with `message` and publish the commit
    fn commit_path(&self, path: &Path, message: &str) -> Result<()>;
}

/// Used when version control is disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVersionControl;

impl VersionControl for NoVersionControl {
    fn commit_path(&self, _path: &Path, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// Git working tree containing the data directory
#[derive(Debug, Clone)]
pub struct Git {
    git: PathBuf,
    work_dir: PathBuf,
    push: bool,
}

impl Git {
    /// Open the git repository that contains `work_dir`
    ///
    /// Fails if `git` is not installed or `work_dir` is not inside a work tree.
    pub fn open(work_dir: &Path, push: bool) -> Result<Self> {
        let git = which::which("git").map_err(|_| Error::Capability {
            tool: "git".to_string(),
        })?;

        let repo = Self {
            git,
            work_dir: work_dir.to_path_buf(),
            push,
        };

        let output = repo.output(["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(Error::Config(format!(
                "No git repository found in data path {:?}. Initialize it with `git init` \
                 (tracking large files with git-lfs is recommended)",
                work_dir
            )));
        }
        debug!(
            "Using git repository at {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );

        Ok(repo)
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.git);
        cmd.arg("-C").arg(&self.work_dir).args(args);
        cmd
    }

    fn output<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command(args)
            .output()
            .map_err(|e| Error::io(e, &self.git))
    }

    /// Run a prepared git command, failing on non-zero exit
    fn run(&self, mut cmd: Command) -> Result<()> {
        let description = describe(&cmd);
        let output = cmd.output().map_err(|e| Error::io(e, &self.git))?;
        check(description, &output)
    }

    /// `path` as a pathspec for commands run with `-C work_dir`
    fn pathspec(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.work_dir) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => path.to_path_buf(),
        }
    }

    /// Whether anything is staged below `path`
    fn has_staged_changes(&self, path: &Path) -> Result<bool> {
        let mut cmd = self.command(["diff", "--cached", "--quiet", "--"]);
        cmd.arg(path);
        let description = describe(&cmd);
        let output = cmd.output().map_err(|e| Error::io(e, &self.git))?;

        // --quiet exits 1 when there are differences
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => check(description, &output).map(|_| false),
        }
    }
}

impl VersionControl for Git {
    fn commit_path(&self, path: &Path, message: &str) -> Result<()> {
        let path = &self.pathspec(path);
        let mut add = self.command(["add", "--all", "--"]);
        add.arg(path);
        self.run(add)?;

        if !self.has_staged_changes(path)? {
            debug!("Nothing to commit for {:?}", path);
            return Ok(());
        }

        let mut commit = self.command(["commit", "--quiet", "-m"]);
        commit.arg(message).arg("--").arg(path);
        self.run(commit)?;
        info!("Committed {:?}: {}", path, message);

        if self.push {
            self.run(self.command(["push", "--quiet"]))?;
        }
        Ok(())
    }
}

/// Version control selected by the configuration
pub fn from_config(config: &Config) -> Result<Box<dyn VersionControl>> {
    if config.use_git {
        Ok(Box::new(Git::open(&config.data_dir, config.git_push)?))
    } else {
        Ok(Box::new(NoVersionControl))
    }
}

fn describe(cmd: &Command) -> String {
    let args: Vec<_> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    format!("git {}", args.join(" "))
}

fn check(description: String, output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(Error::Command {
        command: description,
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
