//! Spreadsheet export. Rows go into a constant-memory worksheet as they arrive,
//! so finished rows are flushed to a temp file instead of being held until the end.
//! The workbook is assembled on `save` and atomically moved into place.

use crate::model::{CommentRecord, KeywordCount, KEYWORD_COLUMNS, MASTER_COLUMNS};
use crate::util::replace_file_atomic_backoff;
use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Longest string a single xlsx cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;

pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// A single-sheet table with a bold header row. Rows must be pushed in order.
pub struct TableSheet {
    wb: Workbook,
    columns: usize,
    rows: u32, // data rows, header excluded
}

impl TableSheet {
    pub fn new(name: &str, columns: &[&str]) -> Result<Self> {
        let mut wb = Workbook::new();
        let sheet = wb.add_worksheet_with_constant_memory();
        sheet.set_name(name)?;
        let bold = Format::new().set_bold();
        for (col, header) in columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *header, &bold)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        Ok(Self { wb, columns: columns.len(), rows: 0 })
    }

    fn sheet(&mut self) -> Result<&mut Worksheet> {
        Ok(self.wb.worksheet_from_index(0)?)
    }

    pub fn push_row(&mut self, cells: &[Cell<'_>]) -> Result<()> {
        debug_assert_eq!(cells.len(), self.columns);
        let row = self.rows + 1;
        let sheet = self.sheet()?;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => {
                    sheet.write_string(row, col, truncate_cell(s))?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
            }
        }
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Write the workbook next to `path` and promote it over any previous file.
    pub fn save(mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        }
        let tmp = path.with_extension("xlsx.inprogress");
        self.wb.save(&tmp).with_context(|| format!("write {}", tmp.display()))?;
        replace_file_atomic_backoff(&tmp, path)
    }
}

fn truncate_cell(s: &str) -> &str {
    match s.char_indices().nth(MAX_CELL_CHARS) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The master comments table.
pub struct MasterSheet {
    table: TableSheet,
}

impl MasterSheet {
    pub fn new() -> Result<Self> {
        Ok(Self { table: TableSheet::new("Comments", &MASTER_COLUMNS)? })
    }

    pub fn push(&mut self, r: &CommentRecord) -> Result<()> {
        self.table.push_row(&[
            Cell::Text(&r.video_id),
            Cell::Text(&r.video_url),
            Cell::Text(&r.comment_id),
            Cell::Text(&r.parent_comment_id),
            Cell::Text(&r.comment_url),
            Cell::Text(&r.author),
            Cell::Text(&r.text),
            Cell::Number(r.like_count as f64),
            Cell::Text(&r.published_at),
        ])
    }

    pub fn rows(&self) -> u32 {
        self.table.rows()
    }

    pub fn save(self, path: &Path) -> Result<()> {
        self.table.save(path)
    }
}

/// Write the keyword ranking as its own workbook.
pub fn write_keywords(path: &Path, keywords: &[KeywordCount]) -> Result<()> {
    let mut table = TableSheet::new("Keywords", &KEYWORD_COLUMNS)?;
    for k in keywords {
        table.push_row(&[Cell::Text(&k.keyword), Cell::Number(k.frequency as f64)])?;
    }
    table.save(path)
}
