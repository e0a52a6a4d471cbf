// src/file.rs

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::config::consts::SEP;
use crate::csv;
use crate::error::{Error, Result};
use crate::store::{self, DataSet};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::Config(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    Ok(())
}

/// Replace `path` with header + rows.
/// Written next to the target and renamed over it, so readers see either the
/// old file or the new one.
pub fn write_dataset(path: &Path, ds: &DataSet) -> Result<()> {
    ensure_parent(path)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let buf = csv::to_bytes(Some(&ds.headers), &ds.rows, SEP);
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(&buf)?;
        f.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Append-only writer for one dataset file.
///
/// The header is written once, with the first batch into an absent (or blank)
/// file; a header line cut off before its line break counts as no header. Later batches are re-projected onto that header by column name so the
/// file stays rectangular even if the source adds or reorders columns.
/// Existing bytes are never touched.
pub struct Appender {
    path: PathBuf,
    header: Option<Vec<String>>,
}

impl Appender {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self { path: path.to_path_buf(), header: store::read_header(path)? })
    }

    /// Append one batch as a single write, then flush it to disk.
    /// Returns the number of data rows written.
    pub fn append(&mut self, batch: &DataSet) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let buf = match &self.header {
            None => {
                ensure_parent(&self.path)?;
                csv::to_bytes(Some(&batch.headers), &batch.rows, SEP)
            }
            Some(h) if *h == batch.headers => csv::to_bytes(None, &batch.rows, SEP),
            Some(h) => {
                let (rows, dropped) = batch.project_onto(h);
                if !dropped.is_empty() {
                    logw!("{}: dropping columns not in file header: {:?}", self.path.display(), dropped);
                }
                csv::to_bytes(None, &rows, SEP)
            }
        };

        // Blank leftovers from an interrupted first write are replaced, not appended to.
        let mut f = if self.header.is_none() {
            OpenOptions::new().create(true).write(true).truncate(true).open(&self.path)?
        } else {
            OpenOptions::new().append(true).open(&self.path)?
        };
        f.write_all(&buf)?;
        f.sync_data()?;

        if self.header.is_none() {
            self.header = Some(batch.headers.clone());
        }
        Ok(batch.row_count())
    }
}
