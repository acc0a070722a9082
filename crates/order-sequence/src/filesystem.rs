//! Filesystem-based counter storage implementation.

use order_generator::{format_order_id, SequenceAllocator, SequenceError};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File-backed implementation of [`SequenceAllocator`].
///
/// The file holds the last allocated counter value as a decimal integer
/// (`0` when nothing was allocated yet). Each allocation rewrites the file
/// through a temporary sibling and a rename, so a crash leaves either the
/// old or the new value.
#[derive(Debug)]
pub struct FileSequence {
    path: PathBuf,
    last: u64,
}

impl FileSequence {
    /// Open the counter at `path`, creating it with value `0` if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SequenceError> {
        let path = path.into();

        let last = match fs::read_to_string(&path) {
            Ok(content) => parse_counter(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                write_counter(&path, 0)?;
                tracing::info!("Created order id counter at {}", path.display());
                0
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Order id counter {} at {}", path.display(), last);
        Ok(Self { path, last })
    }

    /// Last allocated counter value.
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Get the counter file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SequenceAllocator for FileSequence {
    fn next_id(&mut self) -> Result<String, SequenceError> {
        let next = self.last.checked_add(1).ok_or(SequenceError::Exhausted)?;
        write_counter(&self.path, next)?;
        self.last = next;
        Ok(format_order_id(next))
    }
}

fn parse_counter(content: &str) -> Result<u64, SequenceError> {
    let trimmed = content.trim();
    trimmed
        .parse()
        .map_err(|_| SequenceError::Corrupt(format!("expected an integer, found '{trimmed}'")))
}

fn write_counter(path: &Path, value: u64) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(value.to_string().as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
