//! Shared fixtures: throwaway git repositories served from a local "host".

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;

use gitwalk::{WalkConfiguration, WalkConfigurationBuilder};

pub const OWNER: &str = "acme";
pub const REPOSITORY: &str = "charts";

/// A local repository laid out as `{host}/{OWNER}/{REPOSITORY}` plus an
/// empty directory to host workspaces.
pub struct Fixture {
    host: TempDir,
    workspaces: TempDir,
    repo: Repository,
}

impl Fixture {
    /// Repository on `master` with one commit containing `files`.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let host = TempDir::new().unwrap();
        let workspaces = TempDir::new().unwrap();
        let repo_path = host.path().join(OWNER).join(REPOSITORY);
        fs::create_dir_all(&repo_path).unwrap();

        let mut options = RepositoryInitOptions::new();
        options.initial_head("master");
        let repo = Repository::init_opts(&repo_path, &options).unwrap();

        let fixture = Self {
            host,
            workspaces,
            repo,
        };
        fixture.write(files);
        fixture.commit("refs/heads/master", "initial");
        fixture
    }

    /// The canonical scenario: `manifests/a.yaml` and `manifests/sub/b.yaml`.
    pub fn manifests() -> Self {
        Self::with_files(&[
            ("manifests/a.yaml", "kind: A\n"),
            ("manifests/sub/b.yaml", "kind: B\n"),
            ("README.md", "# charts\n"),
        ])
    }

    pub fn write(&self, files: &[(&str, &str)]) {
        for (path, content) in files {
            let full = self.repo_path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
    }

    /// Commit the whole working tree and point `reference` at the commit.
    pub fn commit(&self, reference: &str, message: &str) -> git2::Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let signature = Signature::now("Fixture", "fixture@example.com").unwrap();

        let parent = self
            .repo
            .refname_to_id(reference)
            .ok()
            .and_then(|id| self.repo.find_commit(id).ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(
                Some(reference),
                &signature,
                &signature,
                message,
                &tree,
                &parents,
            )
            .unwrap()
    }

    /// Lightweight tag at the current head of `master`.
    pub fn tag(&self, name: &str) {
        let head = self.repo.refname_to_id("refs/heads/master").unwrap();
        let object = self.repo.find_object(head, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    pub fn host(&self) -> &Path {
        self.host.path()
    }

    pub fn repo_path(&self) -> PathBuf {
        self.host.path().join(OWNER).join(REPOSITORY)
    }

    pub fn workspace_parent(&self) -> &Path {
        self.workspaces.path()
    }

    /// Builder already pointed at this fixture.
    pub fn builder(&self) -> WalkConfigurationBuilder {
        WalkConfiguration::builder()
            .host(self.host().to_string_lossy())
            .owner(OWNER)
            .repository(REPOSITORY)
            .workspace_parent(self.workspace_parent())
    }

    /// Number of entries left in the workspace parent.
    pub fn leftover_workspaces(&self) -> usize {
        fs::read_dir(self.workspace_parent()).unwrap().count()
    }
}
