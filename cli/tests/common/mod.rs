// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed home and data directory with a
// config file pointing at both, so each integration test can run the
// commands against a real filesystem in isolation.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use punkt_cli::cli::LinkOpts;
use punkt_cli::commands::CommandSetup;
use punkt_cli::logging::Logger;
use punkt_cli::operations::SystemFileSystemOps;
use punkt_cli::tasks::{CheckReport, LinkSet, RunReport};

/// An isolated home, data directory, and backup root backed by a
/// [`tempfile::TempDir`].
///
/// Layout:
/// - `home/`                      - link parent for the `home` directory pair
/// - `dotfiles/data/home/.foo`    - managed file with content `foo`
/// - `dotfiles/punkt.toml`        - config with absolute paths
/// - `backups/`                   - backup root (created lazily by runs)
pub struct IntegrationTestContext {
    /// Temporary directory holding everything.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a context with the default layout and no extra config.
    pub fn new() -> Self {
        TestContextBuilder::new().build()
    }

    /// The stand-in home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// The data directory.
    pub fn data(&self) -> PathBuf {
        self.root.path().join("dotfiles").join("data")
    }

    /// The backup root.
    pub fn backups(&self) -> PathBuf {
        self.root.path().join("backups")
    }

    /// The config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("dotfiles").join("punkt.toml")
    }

    /// Load the config and expand its links, the way every command starts.
    pub fn setup(&self, action: &str) -> (CommandSetup, LinkSet) {
        let log = logger();
        let setup = CommandSetup::load(&self.config_path(), action, &SystemFileSystemOps, &log)
            .expect("load config");
        let links = setup
            .links(&SystemFileSystemOps, &log)
            .expect("expand links");
        (setup, links)
    }

    /// Run `check` against the real filesystem.
    pub fn check(&self) -> CheckReport {
        let (_, links) = self.setup("check");
        punkt_cli::commands::check::execute(&links, &SystemFileSystemOps, &logger())
    }

    /// Run `install` against the real filesystem.
    pub fn install(&self, opts: &LinkOpts) -> RunReport {
        let (setup, links) = self.setup("install");
        punkt_cli::commands::install::execute(&setup, &links, opts, &SystemFileSystemOps, &logger())
            .expect("install")
    }

    /// Run `uninstall` against the real filesystem.
    pub fn uninstall(&self, opts: &LinkOpts) -> RunReport {
        let (setup, links) = self.setup("uninstall");
        punkt_cli::commands::uninstall::execute(
            &setup,
            &links,
            opts,
            &SystemFileSystemOps,
            &logger(),
        )
        .expect("uninstall")
    }

    /// Every backup directory created so far, sorted.
    pub fn backup_dirs(&self) -> Vec<PathBuf> {
        let Ok(read) = std::fs::read_dir(self.backups()) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = read.map(|e| e.expect("dir entry").path()).collect();
        dirs.sort();
        dirs
    }

    /// Snapshot of the whole tree: relative path to a description of the
    /// entry (`dir`, `file:<content>`, or `link:<raw target>`).
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        let mut out = BTreeMap::new();
        walk(self.root.path(), self.root.path(), &mut out);
        out
    }
}

fn walk(base: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, String>) {
    for entry in std::fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();
        let rel = path.strip_prefix(base).expect("under base").to_path_buf();
        let meta = std::fs::symlink_metadata(&path).expect("lstat");
        if meta.file_type().is_symlink() {
            let raw = std::fs::read_link(&path).expect("read link");
            out.insert(rel, format!("link:{}", raw.display()));
        } else if meta.is_dir() {
            out.insert(rel, "dir".to_string());
            walk(base, &path, out);
        } else {
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            out.insert(rel, format!("file:{content}"));
        }
    }
}

/// A logger with no subscriber attached; events are discarded.
pub fn logger() -> Logger {
    Logger::new("integration")
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
    directories: Vec<(String, PathBuf)>,
    symlinks: Vec<(PathBuf, PathBuf)>,
}

impl TestContextBuilder {
    /// Begin with the default layout: one `home` pair and `data/home/.foo`.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let ctx = IntegrationTestContext { root };
        std::fs::create_dir_all(ctx.home()).expect("create home");
        std::fs::create_dir_all(ctx.data().join("home")).expect("create data/home");
        std::fs::write(ctx.data().join("home").join(".foo"), "foo").expect("write .foo");
        let home = ctx.home();
        Self {
            ctx,
            directories: vec![("home".to_string(), home)],
            symlinks: Vec::new(),
        }
    }

    /// Write `content` to `relative` under the data directory.
    pub fn with_data_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.data().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create data parent");
        }
        std::fs::write(path, content).expect("write data file");
        self
    }

    /// Write `content` to `relative` under the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        let path = self.ctx.home().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(path, content).expect("write home file");
        self
    }

    /// Add an explicit `[target, link]` pair, both relative to the root.
    pub fn with_symlink_pair(mut self, target: &str, link: &str) -> Self {
        let root = self.ctx.root.path();
        self.symlinks.push((root.join(target), root.join(link)));
        self
    }

    /// Write the config file and return the context.
    pub fn build(self) -> IntegrationTestContext {
        let quote = |p: &Path| format!("\"{}\"", p.display());
        let mut config = format!(
            "data_path = {}\nbackup_path = {}\n",
            quote(&self.ctx.data()),
            quote(&self.ctx.backups())
        );
        let directories: Vec<String> = self
            .directories
            .iter()
            .map(|(data, parent)| format!("[\"{data}\", {}]", quote(parent)))
            .collect();
        config.push_str(&format!("directories = [{}]\n", directories.join(", ")));
        if !self.symlinks.is_empty() {
            let pairs: Vec<String> = self
                .symlinks
                .iter()
                .map(|(target, link)| format!("[{}, {}]", quote(target), quote(link)))
                .collect();
            config.push_str(&format!("symlinks = [{}]\n", pairs.join(", ")));
        }
        std::fs::write(self.ctx.config_path(), config).expect("write punkt.toml");
        self.ctx
    }
}
