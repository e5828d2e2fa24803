#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use synapse_core::Network;
use tempfile::TempDir;

/// Throwaway vault with every category directory created.
pub struct Example {
    dir: TempDir,
}

impl Example {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        for subdir in ["image", "thought", "journal", "project", "file", "raw"] {
            fs::create_dir(dir.path().join(subdir)).unwrap();
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn network(&self) -> Network {
        Network::new(self.path())
    }

    pub fn make_notes(&self, keys: &[&str]) {
        for key in keys {
            self.make_note(key, "");
        }
    }

    /// Writes a note file; `key` is `name` or `kind:name`.
    pub fn make_note(&self, key: &str, contents: &str) {
        let path = match key.split_once(':') {
            Some((kind, name)) => self.path().join(kind).join(format!("{name}.md")),
            None => self.path().join(format!("{key}.md")),
        };
        fs::write(path, contents).unwrap();
    }

    pub fn make_image(&self, name: &str) -> PathBuf {
        self.make_attachment("image", name)
    }

    pub fn make_file(&self, name: &str) -> PathBuf {
        self.make_attachment("file", name)
    }

    pub fn make_raw(&self, name: &str) -> PathBuf {
        self.make_attachment("raw", name)
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).unwrap()
    }

    fn make_attachment(&self, kind: &str, name: &str) -> PathBuf {
        let path = self.path().join(kind).join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }
}
