//! In-memory port fakes shared by unit tests.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::context::ServiceContext;
use crate::error::SubmitError;
use crate::ports::{Clock, FileSystem, SubmitFuture, WorkOrderApi};
use crate::workorder::WorkOrder;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Default)]
struct MemFsState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    fail_renames: bool,
}

/// In-memory filesystem. Clones share state.
#[derive(Clone, Default)]
pub struct MemFs {
    state: Arc<Mutex<MemFsState>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, creating its parent directory.
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        if let Some(parent) = path.parent() {
            state.dirs.insert(parent.to_path_buf());
        }
        state.files.insert(path.to_path_buf(), content.to_string());
    }

    pub fn fail_renames(&self) {
        self.state.lock().unwrap().fail_renames = true;
    }

    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().files.contains_key(path.as_ref())
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().unwrap().dirs.contains(path.as_ref())
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemFs {
    fn create_dir_all(&self, path: &Path) -> Result<(), BoxError> {
        let mut state = self.state.lock().unwrap();
        for ancestor in path.ancestors() {
            state.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, BoxError> {
        let state = self.state.lock().unwrap();
        if !state.dirs.contains(path) {
            return Err(format!("not a directory: {}", path.display()).into());
        }
        Ok(state
            .files
            .keys()
            .filter(|k| k.parent() == Some(path))
            .filter_map(|k| k.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect())
    }

    fn read_to_string(&self, path: &Path) -> Result<String, BoxError> {
        self.content(path).ok_or_else(|| format!("file not found: {}", path.display()).into())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), BoxError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_renames {
            return Err("permission denied".into());
        }
        if !to.parent().is_some_and(|p| state.dirs.contains(p)) {
            return Err(format!("no such directory for {}", to.display()).into());
        }
        let content =
            state.files.remove(from).ok_or_else(|| format!("file not found: {}", from.display()))?;
        state.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }
}

/// 2024-08-15T10:00:00Z
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 15, 10, 0, 0).unwrap()
}

pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_time()
    }
}

/// Records accepted documents and rejects configured references.
#[derive(Clone, Default)]
pub struct FakeApi {
    accepted: Arc<Mutex<Vec<WorkOrder>>>,
    calls: Arc<Mutex<usize>>,
    reject: Arc<HashSet<String>>,
}

impl FakeApi {
    pub fn rejecting(refs: &[&str]) -> Self {
        Self { reject: Arc::new(refs.iter().map(ToString::to_string).collect()), ..Self::default() }
    }

    pub fn accepted(&self) -> Vec<WorkOrder> {
        self.accepted.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl WorkOrderApi for FakeApi {
    fn submit<'a>(&'a self, order: &'a WorkOrder) -> SubmitFuture<'a> {
        Box::pin(async move {
            *self.calls.lock().unwrap() += 1;
            if self.reject.contains(&order.customer_reference) {
                return Err(SubmitError::Rejected {
                    customer_reference: order.customer_reference.clone(),
                    status: 400,
                    details: "rejected by test".to_string(),
                });
            }
            self.accepted.lock().unwrap().push(order.clone());
            Ok(())
        })
    }
}

pub fn test_context(fs: MemFs) -> ServiceContext {
    test_context_with(fs, FakeApi::default())
}

pub fn test_context_with(fs: MemFs, api: FakeApi) -> ServiceContext {
    ServiceContext::new(Box::new(fs), Box::new(FixedClock), Box::new(api))
}
