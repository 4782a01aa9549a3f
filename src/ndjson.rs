use crate::util::{create_with_backoff, replace_file_atomic_backoff};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only NDJSON writer. Writes to `<path>.inprogress` and promotes the
/// file on `finish`, so a crashed run never leaves a half-written journal in place.
pub struct NdjsonWriter {
    tmp: PathBuf,
    dest: PathBuf,
    w: Option<BufWriter<File>>,
    lines: u64,
}

impl NdjsonWriter {
    pub fn create(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = path.with_extension("ndjson.inprogress");
        let f = create_with_backoff(&tmp, 16, 50)?;
        Ok(Self {
            tmp,
            dest: path.to_path_buf(),
            w: Some(BufWriter::with_capacity(buf_bytes.max(8 * 1024), f)),
            lines: 0,
        })
    }

    pub fn write_record<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if let Some(w) = &mut self.w {
            serde_json::to_writer(&mut *w, value)?;
            w.write_all(b"\n")?;
            self.lines += 1;
        }
        Ok(())
    }

    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and move the journal to its final name.
    pub fn finish(mut self) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            w.flush().with_context(|| format!("flush {}", self.tmp.display()))?;
        }
        replace_file_atomic_backoff(&self.tmp, &self.dest)
    }

    /// Close and delete the in-progress file without promoting it.
    pub fn discard(mut self) -> Result<()> {
        drop(self.w.take());
        crate::util::remove_with_backoff(&self.tmp, 10, 25)
    }
}
