//! In-memory stand-ins for the remote API and version control

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::api::RemoteApi;
use crate::error::{Error, Result};
use crate::vcs::VersionControl;

#[derive(Default)]
struct FakeState {
    json: HashMap<String, serde_json::Value>,
    blobs: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

/// Serves canned JSON and binary responses and records every request
///
/// Clones share their state, so a test can keep a handle after moving
/// one into the code under test. Unknown paths answer 404.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Rc<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, path: &str, value: serde_json::Value) -> Self {
        self.state_mut().json.insert(path.to_string(), value);
        self
    }

    pub fn with_blob(mut self, path: &str, bytes: &[u8]) -> Self {
        self.state_mut().blobs.insert(path.to_string(), bytes.to_vec());
        self
    }

    fn state_mut(&mut self) -> &mut FakeState {
        Rc::get_mut(&mut self.state).expect("configure FakeApi before cloning it")
    }

    pub fn requested(&self, path: &str) -> bool {
        self.count_of(path) > 0
    }

    pub fn count_of(&self, path: &str) -> usize {
        self.state
            .requests
            .borrow()
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.borrow().len()
    }

    /// Number of binary downloads served
    pub fn download_count(&self) -> usize {
        self.state
            .requests
            .borrow()
            .iter()
            .filter(|p| p.ends_with("/download"))
            .count()
    }

    fn record(&self, path: &str) {
        self.state.requests.borrow_mut().push(path.to_string());
    }

    fn not_found(path: &str) -> Error {
        Error::Transport {
            url: path.to_string(),
            status: 404,
        }
    }
}

impl RemoteApi for FakeApi {
    fn get_json(&self, path: &str) -> Result<serde_json::Value> {
        self.record(path);
        self.state
            .json
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn download(&self, path: &str, sink: &mut dyn Write) -> Result<u64> {
        self.record(path);
        let bytes = self
            .state
            .blobs
            .get(path)
            .ok_or_else(|| Self::not_found(path))?;
        sink.write_all(bytes)
            .map_err(|e| Error::io(e, PathBuf::from(path)))?;
        Ok(bytes.len() as u64)
    }
}

/// Records commit requests instead of running git
#[derive(Clone, Default)]
pub struct RecordingVcs {
    commits: Rc<RefCell<Vec<(PathBuf, String)>>>,
}

impl RecordingVcs {
    pub fn commits(&self) -> Vec<(PathBuf, String)> {
        self.commits.borrow().clone()
    }
}

impl VersionControl for RecordingVcs {
    fn commit_path(&self, path: &Path, message: &str) -> Result<()> {
        self.commits
            .borrow_mut()
            .push((path.to_path_buf(), message.to_string()));
        Ok(())
    }
}

/// Version control whose commits always fail
pub struct FailingVcs;

impl VersionControl for FailingVcs {
    fn commit_path(&self, _path: &Path, _message: &str) -> Result<()> {
        Err(Error::Command {
            command: "git push".to_string(),
            status: "exit status: 128".to_string(),
            stderr: "fatal: no configured push destination".to_string(),
        })
    }
}
