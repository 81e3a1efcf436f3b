//! JSON-backed task store.
//!
//! The store owns the ordered task list, hands out identifiers and rewrites the
//! whole backing file after every mutation. There is no locking: two processes
//! sharing one file can race.

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::StoreError;
use crate::task::Task;

/// In-memory task list synchronised with a JSON file.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

/// Rendering of the store contents; distinguishes an empty store from an empty listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'a> {
    Empty,
    Tasks(&'a [Task]),
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Empty => write!(f, "No pending tasks."),
            Listing::Tasks(tasks) => {
                for (i, t) in tasks.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
        }
    }
}

impl TaskStore {
    /// Open the store at `path`, loading every task eagerly.
    ///
    /// A missing file yields an empty store. A file that is not a JSON array of
    /// tasks, that repeats an id or that uses id 0 is rejected and left untouched.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match fs::read_to_string(&path) {
            Ok(buf) => serde_json::from_str::<Vec<Task>>(&buf).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no task file yet, starting empty");
                Vec::new()
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let mut seen = HashSet::new();
        for t in &tasks {
            if t.id == 0 {
                return Err(StoreError::ZeroId { path });
            }
            if !seen.insert(t.id) {
                return Err(StoreError::DuplicateId { path, id: t.id });
            }
        }

        let next_id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdExhausted)?;
        debug!(path = %path.display(), count = tasks.len(), next_id, "loaded tasks");
        Ok(Self { path, tasks, next_id })
    }

    /// Write the full task list using temp file + rename.
    pub fn save(&self) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(&self.tasks)?;
        let tmp = self.path.with_extension("json.tmp");
        let write = || -> std::io::Result<()> {
            let mut f = File::create(&tmp)?;
            f.write_all(data.as_bytes())?;
            f.flush()?;
            fs::rename(&tmp, &self.path)
        };
        if let Err(source) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Save {
                path: self.path.clone(),
                source,
            });
        }
        debug!(path = %self.path.display(), count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Append a new task and persist.
    ///
    /// On a save failure the task stays in memory and the error is returned;
    /// the next successful save rewrites the file in full.
    pub fn add(&mut self, description: impl Into<String>) -> Result<Task, StoreError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(StoreError::EmptyDescription);
        }
        let following = self.next_id.checked_add(1).ok_or(StoreError::IdExhausted)?;
        let task = Task::new(self.next_id, description);
        self.next_id = following;
        self.tasks.push(task.clone());
        info!(id = task.id, "added task");
        self.save()?;
        Ok(task)
    }

    /// Add each description as its own task, stopping at the first failure.
    pub fn add_all<I, S>(&mut self, descriptions: I) -> Result<Vec<Task>, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = Vec::new();
        for d in descriptions {
            added.push(self.add(d)?);
        }
        Ok(added)
    }

    /// Current contents, in insertion order.
    pub fn list(&self) -> Listing<'_> {
        if self.tasks.is_empty() {
            Listing::Empty
        } else {
            Listing::Tasks(&self.tasks)
        }
    }

    /// Mark a task completed. `Ok(None)` means no task has that id.
    ///
    /// Completing an already completed task returns it without writing.
    pub fn complete(&mut self, id: u64) -> Result<Option<Task>, StoreError> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "complete: task not found");
            return Ok(None);
        };
        if task.completed {
            debug!(id, "task already completed");
            return Ok(Some(task.clone()));
        }
        task.completed = true;
        let task = task.clone();
        info!(id, "completed task");
        self.save()?;
        Ok(Some(task))
    }

    /// Remove a task. `Ok(None)` means no task has that id.
    pub fn delete(&mut self, id: u64) -> Result<Option<Task>, StoreError> {
        let Some(idx) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(id, "delete: task not found");
            return Ok(None);
        };
        let task = self.tasks.remove(idx);
        info!(id, "deleted task");
        self.save()?;
        Ok(Some(task))
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Id the next `add` will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
        assert_eq!(store.list(), Listing::Empty);
    }

    #[test]
    fn test_ids_strictly_increase_from_one() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        let ids: Vec<u64> = ["a", "b", "c", "d"]
            .iter()
            .map(|d| store.add(*d).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_add_persists_full_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        store.add("Try a task").unwrap();

        let data = read_json(&path);
        assert_eq!(data[0]["description"], "Try a task");
        assert_eq!(data[0]["completed"], false);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_blank_description_rejected_without_consuming_id() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert!(matches!(store.add("   "), Err(StoreError::EmptyDescription)));
        assert!(matches!(store.add(""), Err(StoreError::EmptyDescription)));
        assert_eq!(store.add("real").unwrap().id, 1);
    }

    #[test]
    fn test_complete_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        store.add("Task to complete").unwrap();

        let first = store.complete(1).unwrap().unwrap();
        assert!(first.completed);
        let modified = fs::metadata(&path).unwrap().modified().unwrap();

        let second = store.complete(1).unwrap().unwrap();
        assert!(second.completed);
        assert_eq!(store.len(), 1);
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), modified);
        assert_eq!(read_json(&path)[0]["completed"], true);
    }

    #[test]
    fn test_complete_unknown_id_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        store.add("only").unwrap();
        assert_eq!(store.complete(42).unwrap(), None);
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn test_delete_never_reuses_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        store.add("one").unwrap();
        store.add("two").unwrap();

        let removed = store.delete(2).unwrap().unwrap();
        assert_eq!(removed.description, "two");
        assert_eq!(store.len(), 1);
        assert_eq!(store.add("three").unwrap().id, 3);
    }

    #[test]
    fn test_delete_unknown_id_changes_nothing() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        store.add("keep").unwrap();
        assert_eq!(store.delete(9).unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_last_leaves_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        store.add("Task to delete").unwrap();
        store.delete(1).unwrap();
        assert_eq!(read_json(&path), serde_json::json!([]));
    }

    #[test]
    fn test_round_trip_restores_order_and_next_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        store.add("first").unwrap();
        store.add("second").unwrap();
        store.add("third").unwrap();
        store.complete(2).unwrap();
        store.delete(1).unwrap();

        let reopened = TaskStore::open(&path).unwrap();
        assert_eq!(reopened.tasks(), store.tasks());
        assert_eq!(reopened.next_id(), 4);
    }

    #[test]
    fn test_next_id_uses_max_not_last() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 7, "description": "t7", "completed": false},
                {"id": 2, "description": "t2", "completed": true}]"#,
        )
        .unwrap();
        let store = TaskStore::open(&path).unwrap();
        assert_eq!(store.next_id(), 8);
        assert_eq!(store.tasks()[0].id, 7);
    }

    #[test]
    fn test_malformed_file_fails_fast_and_is_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{"id": 1}"#).unwrap();
        assert!(matches!(TaskStore::open(&path), Err(StoreError::Parse { .. })));

        fs::write(&path, r#"[{"id": 1, "description": "no flag"}]"#).unwrap();
        assert!(matches!(TaskStore::open(&path), Err(StoreError::Parse { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"[{"id": 1, "description": "no flag"}]"#);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id": 1, "description": "a", "completed": false},
                {"id": 1, "description": "b", "completed": false}]"#,
        )
        .unwrap();
        assert!(matches!(
            TaskStore::open(&path),
            Err(StoreError::DuplicateId { id: 1, .. })
        ));
    }

    #[test]
    fn test_zero_id_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"[{"id": 0, "description": "zero", "completed": false}]"#).unwrap();
        assert!(matches!(TaskStore::open(&path), Err(StoreError::ZeroId { .. })));
    }

    #[test]
    fn test_max_id_on_disk_is_exhausted_not_overflow() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let body = format!(r#"[{{"id": {}, "description": "last", "completed": false}}]"#, u64::MAX);
        fs::write(&path, &body).unwrap();
        assert!(matches!(TaskStore::open(&path), Err(StoreError::IdExhausted)));
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
    }

    #[test]
    fn test_add_refuses_when_ids_run_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let body = format!(r#"[{{"id": {}, "description": "near", "completed": false}}]"#, u64::MAX - 1);
        fs::write(&path, &body).unwrap();

        let mut store = TaskStore::open(&path).unwrap();
        assert_eq!(store.next_id(), u64::MAX);
        assert!(matches!(store.add("one more"), Err(StoreError::IdExhausted)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), u64::MAX);
        assert_eq!(fs::read_to_string(&path).unwrap(), body);
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        // A directory in the way makes the final rename fail.
        fs::create_dir(&path).unwrap();

        assert!(matches!(store.add("blocked"), Err(StoreError::Save { .. })));
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("tasks.json");
        let mut store = TaskStore::open(&path).unwrap();
        assert!(matches!(store.add("unsaved"), Err(StoreError::Save { .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), 2);

        fs::create_dir_all(path.parent().unwrap()).unwrap();
        store.add("saved").unwrap();
        assert_eq!(read_json(&path).as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_add_all_stops_at_first_failure() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        let err = store.add_all(["a", " ", "c"]).unwrap_err();
        assert!(matches!(err, StoreError::EmptyDescription));
        assert_eq!(store.len(), 1);

        let added = store.add_all(vec!["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(added.iter().map(|t| t.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_list_scenario() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        assert_eq!(store.list().to_string(), "No pending tasks.");

        store.add("Buy milk").unwrap();
        assert_eq!(store.list().to_string(), "[ ] #1: Buy milk");

        store.complete(1).unwrap();
        assert_eq!(store.list().to_string(), "[✔] #1: Buy milk");

        store.delete(1).unwrap();
        assert_eq!(store.list(), Listing::Empty);
        assert_eq!(store.list().to_string(), "No pending tasks.");
    }

    #[test]
    fn test_listing_one_line_per_task() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("tasks.json")).unwrap();
        store.add("a").unwrap();
        store.add("b").unwrap();
        assert_eq!(store.list().to_string(), "[ ] #1: a\n[ ] #2: b");
    }
}
