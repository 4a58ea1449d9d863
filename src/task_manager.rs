//! TaskManager — ordered, tagged registry of pluggable render-pipeline stages.
//!
//! Grounded in the reference engine's task-registry pattern (register once,
//! mutate parameters every frame via a commit closure, execute a tag-filtered
//! subset) and in the teacher's `RenderNode`/`RenderGraph` pair for the actual
//! per-node execution (§4.1, §4.7 of the design).

use bitflags::bitflags;
use rustc_hash::FxHashMap;

use crate::errors::{Result, ViewportError};
use crate::graph::{ExecuteContext, PrepareContext, RenderGraph, RenderNode};
use crate::ids::{Path, Token};
use crate::sync_delegate::SyncDelegate;

bitflags! {
    /// Classification bits a task record carries (§3.1 "TaskRecord").
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TaskTags: u8 {
        /// Runs during the normal per-frame pipeline.
        const EXECUTABLE = 0b001;
        /// Produces pixels (consulted by the shadow task's render-tag discovery).
        const RENDER      = 0b010;
        /// Runs only during an isolated pick query.
        const PICKING     = 0b100;
    }
}

impl Default for TaskTags {
    fn default() -> Self {
        TaskTags::EXECUTABLE
    }
}

/// Where a newly added task is inserted relative to existing tasks.
#[derive(Clone, Copy)]
pub enum Anchor {
    End,
    Before(Token),
    After(Token),
}

/// A commit function lifts current application state into a task's
/// parameter block. It is invoked once per [`TaskManager::commit_task_values`]
/// call for every enabled task matching the requested tag mask, in
/// registration order. It may read the task's own current parameters (stored
/// in the sync delegate under `(path, "params")`) to merge with new values.
pub type CommitFn = Box<dyn FnMut(&mut SyncDelegate, &Path) + Send>;

struct TaskRecord {
    path: Path,
    token: Token,
    task: Box<dyn RenderNode + Send>,
    commit: CommitFn,
    enabled: bool,
    tags: TaskTags,
}

/// Ordered, tagged registry of render-pipeline tasks for one frame pass.
pub struct TaskManager {
    pass_path: Path,
    records: Vec<TaskRecord>,
    index: FxHashMap<Token, usize>,
    sync: SyncDelegate,
}

impl TaskManager {
    #[must_use]
    pub fn new(pass_path: Path) -> Self {
        Self {
            pass_path,
            records: Vec::new(),
            index: FxHashMap::default(),
            sync: SyncDelegate::new(),
        }
    }

    #[must_use]
    pub fn sync_delegate(&self) -> &SyncDelegate {
        &self.sync
    }

    pub fn sync_delegate_mut(&mut self) -> &mut SyncDelegate {
        &mut self.sync
    }

    /// Registers a new task. Fails with [`ViewportError::Programming`] if
    /// `token` is already present.
    pub fn add_task<T: RenderNode + Send + 'static, P: 'static + Send + Sync>(
        &mut self,
        token: Token,
        initial_params: P,
        commit: CommitFn,
        task: T,
        anchor: Anchor,
        tags: TaskTags,
    ) -> Result<Path> {
        if self.index.contains_key(token) {
            log::warn!("task '{token}' already registered on pass {}", self.pass_path);
            return Err(ViewportError::programming(format!(
                "task '{token}' already exists"
            )));
        }

        let path = self.pass_path.append(token);
        self.sync.set(&path, "params", initial_params);

        let record = TaskRecord {
            path: path.clone(),
            token,
            task: Box::new(task),
            commit,
            enabled: true,
            tags,
        };

        let insert_at = match anchor {
            Anchor::End => self.records.len(),
            Anchor::Before(anchor_token) => {
                self.position_of(anchor_token).unwrap_or(self.records.len())
            }
            Anchor::After(anchor_token) => {
                self.position_of(anchor_token).map_or(self.records.len(), |i| i + 1)
            }
        };
        self.records.insert(insert_at, record);
        self.reindex();

        log::debug!("added task '{token}' at {path}");
        Ok(path)
    }

    fn position_of(&self, token: Token) -> Option<usize> {
        self.index.get(token).copied()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, r) in self.records.iter().enumerate() {
            self.index.insert(r.token, i);
        }
    }

    pub fn remove_task(&mut self, token: Token) {
        if let Some(i) = self.position_of(token) {
            let path = self.records[i].path.clone();
            self.records.remove(i);
            self.sync.remove_all(&path);
            self.reindex();
        }
    }

    /// Enables or disables a task. Idempotent; unknown tokens are a no-op.
    pub fn enable_task(&mut self, token: Token, enabled: bool) {
        if let Some(i) = self.position_of(token) {
            if self.records[i].enabled != enabled {
                log::trace!("task '{token}' enabled={enabled}");
            }
            self.records[i].enabled = enabled;
        }
    }

    #[must_use]
    pub fn is_enabled(&self, token: Token) -> bool {
        self.position_of(token).is_some_and(|i| self.records[i].enabled)
    }

    pub fn set_task_value<T: std::any::Any + Send + Sync>(
        &mut self,
        token: Token,
        key: Token,
        value: T,
    ) {
        if let Some(i) = self.position_of(token) {
            let path = self.records[i].path.clone();
            self.sync.set(&path, key, value);
        }
    }

    #[must_use]
    pub fn get_task_value<T: std::any::Any + Send + Sync + Clone>(
        &self,
        token: Token,
        key: Token,
    ) -> Option<T> {
        let i = self.position_of(token)?;
        self.sync.get(&self.records[i].path, key)
    }

    pub fn set_task_commit_fn(&mut self, token: Token, commit: CommitFn) {
        if let Some(i) = self.position_of(token) {
            self.records[i].commit = commit;
        }
    }

    /// Runs the commit function of every enabled task matching `mask`, in
    /// registration order. Must not be called re-entrantly from within a
    /// commit function (§4.1 invariant: commit does not mutate the task list).
    pub fn commit_task_values(&mut self, mask: TaskTags) {
        for record in &mut self.records {
            if record.enabled && record.tags.intersects(mask) {
                (record.commit)(&mut self.sync, &record.path);
            }
        }
    }

    /// Returns the enabled task objects matching `mask`, in registration order.
    pub fn get_tasks(&mut self, mask: TaskTags) -> Vec<&mut (dyn RenderNode + Send)> {
        self.records
            .iter_mut()
            .filter(|r| r.enabled && r.tags.intersects(mask))
            .map(|r| r.task.as_mut() as &mut (dyn RenderNode + Send))
            .collect()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn has_any_render_task(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.enabled && r.tags.contains(TaskTags::RENDER))
    }

    /// Convenience: commit the executable subset, prepare, build a transient
    /// `RenderGraph` from it, and execute it with one shared encoder.
    pub fn execute(&mut self, prepare_ctx: &mut PrepareContext<'_>, execute_ctx: &ExecuteContext<'_>) {
        self.commit_task_values(TaskTags::EXECUTABLE);
        let mut graph = RenderGraph::with_capacity(self.records.len());
        let nodes: Vec<&mut (dyn RenderNode + Send)> = self.get_tasks(TaskTags::EXECUTABLE);
        for node in nodes {
            node.prepare(prepare_ctx);
        }
        let nodes: Vec<&mut (dyn RenderNode + Send)> = self.get_tasks(TaskTags::EXECUTABLE);
        for node in nodes {
            graph.add_node(node);
        }
        graph.execute(execute_ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopTask;
    impl RenderNode for NoopTask {
        fn name(&self) -> &str {
            "noop"
        }
        fn run(&self, _ctx: &ExecuteContext<'_>, _encoder: &mut wgpu::CommandEncoder) {}
    }

    fn noop_commit() -> CommitFn {
        Box::new(|_sync, _path| {})
    }

    #[test]
    fn insertion_order_equals_execution_order() {
        let mut tm = TaskManager::new(Path::from("/pass"));
        tm.add_task("a", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE)
            .unwrap();
        tm.add_task("b", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE)
            .unwrap();
        tm.add_task("c", 0i32, noop_commit(), NoopTask, Anchor::Before("b"), TaskTags::EXECUTABLE)
            .unwrap();
        let order: Vec<Token> = tm.records.iter().map(|r| r.token).collect();
        assert_eq!(order, vec!["a", "c", "b"]);
    }

    #[test]
    fn duplicate_token_fails() {
        let mut tm = TaskManager::new(Path::from("/pass"));
        tm.add_task("a", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE)
            .unwrap();
        let err = tm.add_task("a", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE);
        assert!(err.is_err());
    }

    #[test]
    fn disabled_task_excluded_from_commit_and_get_tasks() {
        let mut tm = TaskManager::new(Path::from("/pass"));
        tm.add_task("a", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE)
            .unwrap();
        tm.enable_task("a", false);
        assert_eq!(tm.get_tasks(TaskTags::EXECUTABLE).len(), 0);
    }

    #[test]
    fn set_get_task_value_round_trips() {
        let mut tm = TaskManager::new(Path::from("/pass"));
        tm.add_task("a", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::EXECUTABLE)
            .unwrap();
        tm.set_task_value::<i32>("a", "extra", 7);
        assert_eq!(tm.get_task_value::<i32>("a", "extra"), Some(7));
    }

    #[test]
    fn picking_tasks_excluded_from_executable_mask() {
        let mut tm = TaskManager::new(Path::from("/pass"));
        tm.add_task("pick", 0i32, noop_commit(), NoopTask, Anchor::End, TaskTags::PICKING)
            .unwrap();
        assert_eq!(tm.get_tasks(TaskTags::EXECUTABLE).len(), 0);
        assert_eq!(tm.get_tasks(TaskTags::PICKING).len(), 1);
    }
}
