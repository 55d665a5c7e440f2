//! Interceptor registration and dispatch.
//!
//! File interceptors always run on the traversal's own control flow, one at a
//! time and in listing order. Directory interceptors run inline during
//! recursive walks; during flat walks they are spawned into a
//! [`DirectoryTaskGroup`], which reports every failure back over a channel and
//! is joined before the walk returns.

use crossbeam::channel::{self, Receiver, Sender};
use rayon::Scope;
use tracing::{debug, error};

use crate::api::model::{Directory, File};
use crate::core::errors::{InterceptorFailure, NodeKind};

/// Callback invoked for every delivered file.
pub type FileInterceptor<'a> = Box<dyn FnMut(File) -> anyhow::Result<()> + Send + 'a>;

/// Callback invoked for every delivered directory. It may run concurrently.
pub type DirectoryInterceptor<'a> =
    Box<dyn Fn(Directory) -> anyhow::Result<()> + Send + Sync + 'a>;

/// The pair of caller-supplied callbacks of one walk.
#[derive(Default)]
pub struct Interceptors<'a> {
    pub(crate) file: Option<FileInterceptor<'a>>,
    pub(crate) directory: Option<DirectoryInterceptor<'a>>,
}

impl<'a> Interceptors<'a> {
    /// Register the file interceptor, replacing any previous one.
    pub fn set_file(&mut self, interceptor: FileInterceptor<'a>) {
        self.file = Some(interceptor);
    }

    /// Register the directory interceptor, replacing any previous one.
    pub fn set_directory(&mut self, interceptor: DirectoryInterceptor<'a>) {
        self.directory = Some(interceptor);
    }
}

/// Invoke the file interceptor, if any, for `file`.
pub fn deliver_file(
    interceptor: &mut Option<FileInterceptor<'_>>,
    file: File,
) -> Result<(), InterceptorFailure> {
    let Some(handler) = interceptor.as_deref_mut() else {
        return Ok(());
    };
    let (name, path) = (file.name.clone(), file.path.clone());
    handler(file).map_err(|e| InterceptorFailure::new(NodeKind::File, name, path, e))
}

/// Invoke a directory interceptor synchronously.
pub fn deliver_directory(
    handler: &(dyn Fn(Directory) -> anyhow::Result<()> + Send + Sync),
    directory: Directory,
) -> Result<(), InterceptorFailure> {
    let (name, path) = (directory.name.clone(), directory.path.clone());
    handler(directory).map_err(|e| InterceptorFailure::new(NodeKind::Directory, name, path, e))
}

/// Directory interceptor calls spawned into a rayon scope.
///
/// Failures are sent over a channel; [`DirectoryTaskGroup::join`] must only be
/// called after the scope has ended, at which point every task has finished.
pub struct DirectoryTaskGroup {
    sender: Sender<InterceptorFailure>,
    receiver: Receiver<InterceptorFailure>,
    spawned: usize,
}

impl Default for DirectoryTaskGroup {
    fn default() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self {
            sender,
            receiver,
            spawned: 0,
        }
    }
}

impl DirectoryTaskGroup {
    /// Spawn `handler(directory)` on `scope`.
    pub fn spawn<'scope>(
        &mut self,
        scope: &Scope<'scope>,
        handler: &'scope (dyn Fn(Directory) -> anyhow::Result<()> + Send + Sync),
        directory: Directory,
    ) {
        let sender = self.sender.clone();
        self.spawned += 1;
        scope.spawn(move |_| {
            let path = directory.path.clone();
            if let Err(failure) = deliver_directory(handler, directory) {
                error!("Directory interceptor failed for {}: {}", path, failure.source);
                // The receiver outlives the scope, so sending cannot fail.
                let _ = sender.send(failure);
            } else {
                debug!("Directory interceptor finished for {}", path);
            }
        });
    }

    /// Number of tasks spawned so far.
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Collect all failures, ordered by path.
    pub fn join(self) -> Vec<InterceptorFailure> {
        let Self {
            sender, receiver, ..
        } = self;
        drop(sender);
        let mut failures: Vec<_> = receiver.into_iter().collect();
        failures.sort_by(|a, b| a.path.cmp(&b.path));
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn dir(name: &str) -> Directory {
        Directory {
            name: name.to_string(),
            path: format!("root/{name}"),
        }
    }

    #[test]
    fn deliver_file_without_interceptor_is_a_no_op() {
        let mut none: Option<FileInterceptor<'_>> = None;
        let file = File {
            name: "a".into(),
            path: "a".into(),
            size: 0,
            content: Vec::new(),
        };
        assert!(deliver_file(&mut none, file).is_ok());
    }

    #[test]
    fn deliver_file_wraps_handler_error() {
        let mut handler: Option<FileInterceptor<'_>> =
            Some(Box::new(|file: File| -> anyhow::Result<()> {
                anyhow::bail!("rejecting {}", file.name)
            }));
        let file = File {
            name: "a.yaml".into(),
            path: "manifests/a.yaml".into(),
            size: 0,
            content: Vec::new(),
        };

        let failure = deliver_file(&mut handler, file).unwrap_err();
        assert_eq!(failure.kind, NodeKind::File);
        assert_eq!(failure.path, "manifests/a.yaml");
        assert!(failure.source.to_string().contains("rejecting a.yaml"));
    }

    #[test]
    fn task_group_waits_for_all_tasks_and_collects_every_failure() {
        let finished = AtomicUsize::new(0);
        let handler = |directory: Directory| -> anyhow::Result<()> {
            std::thread::sleep(Duration::from_millis(20));
            finished.fetch_add(1, Ordering::SeqCst);
            if directory.name.starts_with("bad") {
                anyhow::bail!("cannot handle {}", directory.name);
            }
            Ok(())
        };

        let mut group = DirectoryTaskGroup::default();
        rayon::scope(|scope| {
            for name in ["bad-b", "good", "bad-a"] {
                group.spawn(scope, &handler, dir(name));
            }
        });

        assert_eq!(group.spawned(), 3);
        let failures = group.join();
        assert_eq!(finished.load(Ordering::SeqCst), 3);
        let paths: Vec<_> = failures.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["root/bad-a", "root/bad-b"]);
        assert!(failures.iter().all(|f| f.kind == NodeKind::Directory));
    }
}
