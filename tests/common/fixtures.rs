//! Test data factories and local git remotes
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use content_publish::config::PublishConfig;
use content_publish::publish::{ScriptFailure, UpdateScript};
use content_publish::types::{Credentials, PublishRequest, RepoIdentity};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// URL the tests publish to; rewritten to a local bare repository
pub const REMOTE_URL: &str = "https://example.test/acme/site.git";

/// Run git in `dir`, panicking on failure; returns stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .env("GIT_AUTHOR_NAME", "Fixture")
        .env("GIT_AUTHOR_EMAIL", "fixture@example.com")
        .env("GIT_COMMITTER_NAME", "Fixture")
        .env("GIT_COMMITTER_EMAIL", "fixture@example.com")
        .output()
        .expect("git is installed");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// A bare repository seeded with one commit on `main`:
///
/// ```text
/// content/a.md
/// content/c.md
/// other.txt
/// ```
pub struct RemoteRepo {
    dir: TempDir,
    bare: PathBuf,
}

impl RemoteRepo {
    /// Create and seed the remote
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let seed = dir.path().join("seed");
        let bare = dir.path().join("remote.git");

        fs::create_dir_all(seed.join("content")).unwrap();
        git(dir.path(), &["init", "--quiet", "seed"]);
        git(&seed, &["checkout", "--quiet", "-b", "main"]);
        fs::write(seed.join("content/a.md"), "# A\n").unwrap();
        fs::write(seed.join("content/c.md"), "# C\n").unwrap();
        fs::write(seed.join("other.txt"), "other\n").unwrap();
        git(&seed, &["add", "--all"]);
        git(&seed, &["commit", "--quiet", "-m", "Initial content"]);

        git(dir.path(), &["init", "--quiet", "--bare", "remote.git"]);
        git(&seed, &["push", "--quiet", bare.to_str().unwrap(), "main"]);

        Self { dir, bare }
    }

    /// `file://` URL of the bare repository
    pub fn file_url(&self) -> String {
        format!("file://{}", self.bare.display())
    }

    /// Config that routes [`REMOTE_URL`] to this remote and skips install/build
    pub fn config(&self, scratch_root: &Path) -> PublishConfig {
        PublishConfig {
            scratch_root: scratch_root.to_path_buf(),
            scratch_prefix: "publish-".to_string(),
            install_command: None,
            build_command: None,
            author_name: "Docs Bot".to_string(),
            author_email: "docs-bot@example.com".to_string(),
            ..PublishConfig::default()
        }
        .with_git_config(format!("url.{}.insteadOf", self.file_url()), REMOTE_URL)
    }

    /// Request against [`REMOTE_URL`] with `main` as base
    pub fn request(&self, scratch_root: &Path) -> PublishRequest {
        PublishRequest {
            base_branch: "main".to_string(),
            script: "update-content".to_string(),
            commit_message: "Update content".to_string(),
            content_path: "content".to_string(),
            repo_url: REMOTE_URL.to_string(),
            credentials: Credentials {
                username: "docs-bot".to_string(),
                password: "test-token".to_string(),
            },
            scratch_root: scratch_root.to_path_buf(),
        }
    }

    /// Branch names on the remote
    pub fn branches(&self) -> Vec<String> {
        git(&self.bare, &["for-each-ref", "--format=%(refname:short)", "refs/heads"])
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    /// Files touched by the tip commit of `branch`
    pub fn files_in_tip(&self, branch: &str) -> Vec<String> {
        git(
            &self.bare,
            &["diff-tree", "--no-commit-id", "--name-only", "-r", branch],
        )
        .lines()
        .map(ToString::to_string)
        .collect()
    }

    /// Author of the tip commit of `branch` as "name <email>"
    pub fn tip_author(&self, branch: &str) -> String {
        git(&self.bare, &["log", "-1", "--format=%an <%ae>", branch])
            .trim()
            .to_string()
    }

    /// Path of the bare repository
    pub fn bare_path(&self) -> PathBuf {
        self.bare.clone()
    }

    /// Install a `pre-receive` hook that refuses every push
    pub fn reject_pushes(&self) {
        let hook = self.bare.join("hooks/pre-receive");
        fs::create_dir_all(hook.parent().unwrap()).unwrap();
        fs::write(&hook, "#!/bin/sh\necho 'pushes are frozen' >&2\nexit 1\n").unwrap();
        fs::set_permissions(&hook, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Write a global git config in `home` that routes [`REMOTE_URL`] here
    ///
    /// For driving the binary, which only sees the process environment.
    pub fn write_global_gitconfig(&self, home: &Path) {
        fs::write(
            home.join(".gitconfig"),
            format!(
                "[url \"{}\"]\n\tinsteadOf = {REMOTE_URL}\n",
                self.file_url()
            ),
        )
        .unwrap();
    }
}

/// Identity matching [`REMOTE_URL`]
pub fn remote_identity() -> RepoIdentity {
    RepoIdentity {
        host: "example.test".to_string(),
        owner: "acme".to_string(),
        repo: "site".to_string(),
        clone_url: REMOTE_URL.to_string(),
    }
}

type ScriptFn = dyn Fn(&Path) -> Result<(), ScriptFailure> + Send + Sync;

/// Update script backed by a closure
pub struct FnScript(Box<ScriptFn>);

impl FnScript {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Path) -> Result<(), ScriptFailure> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }

    /// Script that touches nothing
    pub fn noop() -> Self {
        Self::new(|_| Ok(()))
    }

    /// Script that writes `contents` to each repository-relative path
    pub fn writes(files: &[(&str, &str)]) -> Self {
        let files: Vec<(String, String)> = files
            .iter()
            .map(|(p, c)| ((*p).to_string(), (*c).to_string()))
            .collect();
        Self::new(move |dir| {
            for (path, contents) in &files {
                let target = dir.join(path);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent).unwrap();
                }
                fs::write(target, contents).unwrap();
            }
            Ok(())
        })
    }
}

#[async_trait]
impl UpdateScript for FnScript {
    async fn execute(&self, workdir: &Path) -> Result<(), ScriptFailure> {
        (self.0)(workdir)
    }

    fn describe(&self) -> String {
        "test script".to_string()
    }
}

/// Number of entries directly inside `dir`
pub fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}
