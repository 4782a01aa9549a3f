//! Record store: dedup at emission time, stream accepted rows into the sinks,
//! feed the keyword counter, and write the output files on completion.

use crate::export::{write_keywords, MasterSheet};
use crate::keywords::KeywordCounter;
use crate::model::CommentRecord;
use crate::ndjson::NdjsonWriter;
use ahash::AHashSet;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where the store writes on completion.
#[derive(Clone, Debug)]
pub struct StoreOutputs {
    pub master_file: PathBuf,
    pub keyword_file: PathBuf,
    pub top_keywords: usize,
}

/// What [`RecordStore::finish`] produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub accepted: u64,
    pub duplicates: u64,
    pub keyword_rows: usize,
    pub master_written: bool,
    pub keywords_written: bool,
}

pub struct RecordStore {
    seen: AHashSet<String>,
    master: MasterSheet,
    journal: Option<NdjsonWriter>,
    keywords: KeywordCounter,
    accepted: u64,
    duplicates: u64,
}

impl RecordStore {
    pub fn new(journal: Option<&Path>) -> Result<Self> {
        let journal = match journal {
            Some(p) => Some(NdjsonWriter::create(p, 256 * 1024).with_context(|| format!("create {}", p.display()))?),
            None => None,
        };
        Ok(Self {
            seen: AHashSet::with_capacity(16 * 1024),
            master: MasterSheet::new()?,
            journal,
            keywords: KeywordCounter::new(),
            accepted: 0,
            duplicates: 0,
        })
    }

    /// Accept `rec` unless its comment id was already stored. Returns whether it was kept.
    pub fn push(&mut self, rec: &CommentRecord) -> Result<bool> {
        if !self.seen.insert(rec.comment_id.clone()) {
            self.duplicates += 1;
            tracing::trace!(comment = %rec.comment_id, "duplicate dropped");
            return Ok(false);
        }
        self.master.push(rec)?;
        if let Some(j) = &mut self.journal {
            j.write_record(rec)?;
        }
        self.keywords.add_text(&rec.text);
        self.accepted += 1;
        Ok(true)
    }

    /// Push a batch in order; returns how many were kept.
    pub fn extend<'a>(&mut self, recs: impl IntoIterator<Item = &'a CommentRecord>) -> Result<u64> {
        let mut kept = 0;
        for r in recs {
            if self.push(r)? {
                kept += 1;
            }
        }
        Ok(kept)
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn duplicates(&self) -> u64 {
        self.duplicates
    }

    pub fn keywords(&self) -> &KeywordCounter {
        &self.keywords
    }

    /// Write the master and keyword files. Nothing is written when no record was accepted.
    pub fn finish(self, out: &StoreOutputs) -> Result<StoreSummary> {
        let mut summary = StoreSummary { accepted: self.accepted, duplicates: self.duplicates, ..Default::default() };

        if self.accepted == 0 {
            if let Some(j) = self.journal {
                j.discard()?;
            }
            tracing::info!("No comments collected; nothing written");
            return Ok(summary);
        }

        if let Some(j) = self.journal {
            let n = j.lines();
            j.finish()?;
            tracing::info!("Journal saved ({n} lines)");
        }

        let rows = self.master.rows();
        self.master.save(&out.master_file)?;
        summary.master_written = true;
        tracing::info!("Master Excel saved: {} ({rows} rows)", out.master_file.display());

        let top = self.keywords.top(out.top_keywords);
        write_keywords(&out.keyword_file, &top)?;
        summary.keyword_rows = top.len();
        summary.keywords_written = true;
        tracing::info!("Keyword file created: {} ({} keywords)", out.keyword_file.display(), top.len());

        Ok(summary)
    }
}
