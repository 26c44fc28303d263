//! On-disk record store.
//!
//! `JsonArray`: the file is one JSON array. Each append reads the whole
//! array, extends it and writes it back through a temp file + rename, so an
//! interrupted write leaves the previous array intact.
//!
//! `JsonLines`: one record per line, appended in place.
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::StoreFormat;

#[derive(Debug, Clone)]
pub struct VideoStore {
    path: PathBuf,
    format: StoreFormat,
}

impl VideoStore {
    pub fn new(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> StoreFormat {
        self.format
    }

    /// Everything currently stored. A missing file is empty; so is one that
    /// is not valid UTF-8 or not valid JSON (logged, and its contents are
    /// replaced on the next array write). Any other read error is returned.
    pub fn load(&self) -> Result<Vec<Value>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), error = %err, "store is not text; treating as empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", self.path.display()))
            }
        };
        let items = match self.format {
            StoreFormat::JsonArray => match serde_json::from_str::<Vec<Value>>(&raw) {
                Ok(items) => items,
                Err(err) => {
                    if !raw.trim().is_empty() {
                        warn!(path = %self.path.display(), error = %err, "store is not a JSON array; treating as empty");
                    }
                    Vec::new()
                }
            },
            StoreFormat::JsonLines => raw
                .lines()
                .filter(|l| !l.trim().is_empty())
                .filter_map(|line| match serde_json::from_str::<Value>(line) {
                    Ok(v) => Some(v),
                    Err(err) => {
                        warn!(path = %self.path.display(), error = %err, "skipping corrupt store line");
                        None
                    }
                })
                .collect(),
        };
        Ok(items)
    }

    /// Append one chunk. Returns the number of records stored afterwards
    /// (for `JsonLines`, the number of records just written).
    pub fn append<T: Serialize>(&self, records: &[T]) -> Result<usize> {
        match self.format {
            StoreFormat::JsonArray => {
                let mut existing = self.load()?;
                for rec in records {
                    existing.push(serde_json::to_value(rec).context("serializing record")?);
                }
                self.write_array_atomic(&existing)?;
                Ok(existing.len())
            }
            StoreFormat::JsonLines => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .read(true)
                    .append(true)
                    .open(&self.path)
                    .with_context(|| format!("opening {}", self.path.display()))?;
                let torn = ends_without_newline(&mut file)
                    .with_context(|| format!("inspecting {}", self.path.display()))?;
                let mut out = BufWriter::new(file);
                if torn {
                    warn!(path = %self.path.display(), "store ends in a partial line; starting a new one");
                    out.write_all(b"\n")?;
                }
                for rec in records {
                    serde_json::to_writer(&mut out, rec).context("serializing record")?;
                    out.write_all(b"\n")?;
                }
                out.flush()
                    .with_context(|| format!("writing {}", self.path.display()))?;
                Ok(records.len())
            }
        }
    }

    /// Append `records` `chunk_size` at a time. Returns the number of chunks.
    pub fn save_in_chunks<T: Serialize>(&self, records: &[T], chunk_size: usize) -> Result<usize> {
        if chunk_size == 0 {
            bail!("chunk size must be at least 1");
        }
        let mut chunks = 0usize;
        for chunk in records.chunks(chunk_size) {
            let stored = self.append(chunk)?;
            chunks += 1;
            info!(
                rows = chunk.len(),
                stored,
                path = %self.path.display(),
                "{} rows added",
                chunk.len()
            );
        }
        Ok(chunks)
    }

    fn write_array_atomic(&self, items: &[Value]) -> Result<()> {
        let tmp = self.tmp_path();
        {
            let file = fs::File::create(&tmp)
                .with_context(|| format!("creating {}", tmp.display()))?;
            let mut out = BufWriter::new(file);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
            items
                .serialize(&mut ser)
                .context("serializing store")?;
            out.flush()
                .with_context(|| format!("writing {}", tmp.display()))?;
            out.get_ref()
                .sync_all()
                .with_context(|| format!("syncing {}", tmp.display()))?;
        }
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "store".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// True when the file has content and its last byte is not `\n`.
fn ends_without_newline(file: &mut fs::File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
