//! In-memory staging of the file mutations of one add or remove.
//!
//! Every document is rendered before the first file changes, so a failure
//! while staging leaves the lexicon untouched. A failure during
//! [`StagedWrites::commit`] does not roll back.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;
use crate::error::{LexiconError, Result};
use crate::xml::{self, Document};

/// One pending file mutation.
#[derive(Debug)]
pub enum WriteOp {
    /// Replace (or create) a file
    Write { path: PathBuf, contents: Vec<u8> },
    /// Delete a file
    Delete { path: PathBuf },
}

impl WriteOp {
    pub fn path(&self) -> &Path {
        match self {
            WriteOp::Write { path, .. } | WriteOp::Delete { path } => path,
        }
    }
}

/// Ordered list of pending mutations, applied by [`StagedWrites::commit`].
#[derive(Debug, Default)]
pub struct StagedWrites {
    ops: Vec<WriteOp>,
}

impl StagedWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders `document` now; the file is written on commit.
    pub fn write_document(&mut self, path: PathBuf, document: &Document) -> Result<()> {
        let contents = xml::render_document(document, &path)?;
        self.ops.push(WriteOp::Write { path, contents });
        Ok(())
    }

    pub fn delete(&mut self, path: PathBuf) {
        self.ops.push(WriteOp::Delete { path });
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every mutation in order.
    pub fn commit(self) -> Result<()> {
        for op in self.ops {
            match op {
                WriteOp::Write { path, contents } => {
                    xml::write_bytes(&path, &contents)?;
                    debug!("Wrote {}", path.display());
                }
                WriteOp::Delete { path } => {
                    fs::remove_file(&path)?;
                    debug!("Deleted {}", path.display());
                }
            }
        }
        Ok(())
    }
}

/// Exclusive advisory lock on the lock file of a lexicon, released on drop.
#[derive(Debug)]
pub struct LexiconLock {
    file: File,
    path: PathBuf,
}

impl LexiconLock {
    /// Fails with [`LexiconError::Locked`] instead of waiting when another
    /// process holds the lock.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        file.try_lock_exclusive()
            .map_err(|_| LexiconError::Locked(path.to_path_buf()))?;
        debug!("Acquired lock {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for LexiconLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!("Released lock {}", self.path.display());
    }
}
