//! Out-of-line payload files for TEXT and VECTOR fields.
//!
//! Each table owns two append-only files, `<table>.text` and `<table>.vector`.
//! A record stores a 16-byte indirection per out-of-line field:
//!
//! - text: `offset u64 | len u64`
//! - vector: `dim u64 | offset u64`
//!
//! Writes always append at the end of the file and return the offset they
//! landed at; reads are positioned.

use shoal_core::types::INDIRECTION_LEN;
use shoal_core::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Location of a text payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextData {
    pub offset: u64,
    pub len: u64,
}

/// Location of a vector payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VectorData {
    pub dim: u64,
    pub offset: u64,
}

fn split_indirection(bytes: &[u8]) -> Result<(u64, u64)> {
    if bytes.len() < INDIRECTION_LEN {
        return Err(Error::internal(format!(
            "indirection of {} bytes is too short",
            bytes.len()
        )));
    }
    let mut a = [0u8; 8];
    let mut b = [0u8; 8];
    a.copy_from_slice(&bytes[..8]);
    b.copy_from_slice(&bytes[8..16]);
    Ok((u64::from_le_bytes(a), u64::from_le_bytes(b)))
}

impl TextData {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (offset, len) = split_indirection(bytes)?;
        Ok(Self { offset, len })
    }

    pub fn to_bytes(&self) -> [u8; INDIRECTION_LEN] {
        let mut out = [0u8; INDIRECTION_LEN];
        out[..8].copy_from_slice(&self.offset.to_le_bytes());
        out[8..].copy_from_slice(&self.len.to_le_bytes());
        out
    }
}

impl VectorData {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (dim, offset) = split_indirection(bytes)?;
        Ok(Self { dim, offset })
    }

    pub fn to_bytes(&self) -> [u8; INDIRECTION_LEN] {
        let mut out = [0u8; INDIRECTION_LEN];
        out[..8].copy_from_slice(&self.dim.to_le_bytes());
        out[8..].copy_from_slice(&self.offset.to_le_bytes());
        out
    }
}

/// Payload files of one table.
#[derive(Debug)]
pub struct PayloadStore {
    text_path: PathBuf,
    vector_path: PathBuf,
}

impl PayloadStore {
    fn paths(dir: &Path, table: &str) -> (PathBuf, PathBuf) {
        (dir.join(format!("{table}.text")), dir.join(format!("{table}.vector")))
    }

    /// Creates empty payload files for `table` under `dir`.
    pub fn create(dir: &Path, table: &str) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| Error::io_open(dir, e))?;
        let (text_path, vector_path) = Self::paths(dir, table);
        for path in [&text_path, &vector_path] {
            File::create(path).map_err(|e| Error::io_open(path, e))?;
        }
        tracing::debug!(table, dir = %dir.display(), "payload files created");
        Ok(Self { text_path, vector_path })
    }

    /// Opens existing payload files for `table` under `dir`.
    pub fn open(dir: &Path, table: &str) -> Result<Self> {
        let (text_path, vector_path) = Self::paths(dir, table);
        for path in [&text_path, &vector_path] {
            if !path.is_file() {
                return Err(Error::io_open(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "payload file is missing"),
                ));
            }
        }
        Ok(Self { text_path, vector_path })
    }

    pub fn text_path(&self) -> &Path {
        &self.text_path
    }

    pub fn vector_path(&self) -> &Path {
        &self.vector_path
    }

    fn read_at(path: &Path, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to open payload file");
            Error::io_open(path, e)
        })?;
        let mut buf = vec![0u8; len];
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(&mut buf))
            .map_err(|e| {
                tracing::warn!(path = %path.display(), offset, len, error = %e, "failed to read payload");
                Error::io_read(path, e)
            })?;
        Ok(buf)
    }

    fn append(path: &Path, bytes: &[u8]) -> Result<u64> {
        let mut file = OpenOptions::new().read(true).write(true).open(path).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to open payload file");
            Error::io_open(path, e)
        })?;
        let end = file.seek(SeekFrom::End(0)).map_err(|e| Error::io_write(path, e))?;
        file.write_all(bytes).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to write payload");
            Error::io_write(path, e)
        })?;
        Ok(end)
    }

    pub fn load_text(&self, data: &TextData) -> Result<String> {
        let bytes = Self::read_at(&self.text_path, data.offset, data.len as usize)?;
        String::from_utf8(bytes).map_err(|e| Error::internal(format!("text payload is not utf-8: {e}")))
    }

    pub fn dump_text(&self, text: &str) -> Result<TextData> {
        let offset = Self::append(&self.text_path, text.as_bytes())?;
        Ok(TextData {
            offset,
            len: text.len() as u64,
        })
    }

    pub fn load_vector(&self, data: &VectorData) -> Result<Vec<f32>> {
        let len = data.dim as usize * std::mem::size_of::<f32>();
        let bytes = Self::read_at(&self.vector_path, data.offset, len)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    pub fn dump_vector(&self, vector: &[f32]) -> Result<VectorData> {
        let bytes: Vec<u8> = vector.iter().flat_map(|x| x.to_le_bytes()).collect();
        let offset = Self::append(&self.vector_path, &bytes)?;
        Ok(VectorData {
            dim: vector.len() as u64,
            offset,
        })
    }
}
