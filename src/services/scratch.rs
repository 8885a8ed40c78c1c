//! Request-scoped temporary files.
//!
//! Every intermediate file a pipeline run creates is reserved through one
//! `Scratch`, and released in one place when the run ends. If the run is
//! dropped mid-flight (client disconnect, panic) the `TempPath`s still delete
//! their files on drop.

use std::{
    io::{self, ErrorKind},
    path::PathBuf,
};
use tempfile::TempPath;
use tracing::{debug, warn};

pub struct Scratch {
    dir: PathBuf,
    files: Vec<TempPath>,
}

impl Scratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    /// Create an empty, uniquely named file in the staging dir and take
    /// ownership of its deletion.
    pub fn reserve(&mut self, prefix: &str, suffix: &str) -> io::Result<PathBuf> {
        let temp = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?
            .into_temp_path();
        let path = temp.to_path_buf();
        self.files.push(temp);
        Ok(path)
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Delete every reserved file. Failures are logged, never propagated.
    pub fn release(mut self) {
        for temp in self.files.drain(..) {
            let path = temp.to_path_buf();
            match temp.close() {
                Ok(()) => debug!(path = %path.display(), "removed scratch file"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to remove scratch file")
                }
            }
        }
    }
}
