//! Brute-force vector index.
//!
//! Every query computes the distance to each indexed vector. Entries live in
//! memory; `sync` writes them to a single file and `load` reads them back.
//!
//! File layout (little-endian):
//!
//! ```text
//! magic "SHVI" | metric u8 | dim u32 | count u64 | count * (page u32, slot u32, dim * f32)
//! ```

use crate::distance::DistanceMetric;
use crate::traits::VectorIndex;
use hashbrown::HashMap;
use shoal_core::{Error, Result, Rid};
use std::fs;
use std::path::{Path, PathBuf};

const MAGIC: &[u8; 4] = b"SHVI";
const HEADER_LEN: usize = 4 + 1 + 4 + 8;

#[derive(Debug)]
pub struct FlatVectorIndex {
    path: PathBuf,
    dim: usize,
    metric: DistanceMetric,
    vectors: HashMap<Rid, Vec<f32>>,
    loaded: bool,
}

impl FlatVectorIndex {
    /// Creates an empty index that persists to `path`. Nothing is written
    /// until `sync`.
    pub fn create(path: impl Into<PathBuf>, dim: usize, metric: DistanceMetric) -> Result<Self> {
        if dim == 0 {
            return Err(Error::invalid_argument("vector index dimension must be positive"));
        }
        Ok(Self {
            path: path.into(),
            dim,
            metric,
            vectors: HashMap::new(),
            loaded: false,
        })
    }

    /// Opens a persisted index. Only the header is read; entries are read by
    /// `load`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|e| Error::io_open(&path, e))?;
        let (metric, dim, _) = parse_header(&path, &bytes)?;
        Ok(Self {
            path,
            dim,
            metric,
            vectors: HashMap::new(),
            loaded: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    fn check_dim(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(Error::invalid_argument(format!(
                "vector dimension {} does not match index dimension {}",
                vector.len(),
                self.dim
            )));
        }
        Ok(())
    }

    fn encode(&self) -> Vec<u8> {
        let mut rids: Vec<&Rid> = self.vectors.keys().collect();
        rids.sort();
        let mut out = Vec::with_capacity(HEADER_LEN + rids.len() * (8 + self.dim * 4));
        out.extend_from_slice(MAGIC);
        out.push(self.metric.code());
        out.extend_from_slice(&(self.dim as u32).to_le_bytes());
        out.extend_from_slice(&(rids.len() as u64).to_le_bytes());
        for rid in rids {
            out.extend_from_slice(&rid.page_num.to_le_bytes());
            out.extend_from_slice(&rid.slot_num.to_le_bytes());
            for x in &self.vectors[rid] {
                out.extend_from_slice(&x.to_le_bytes());
            }
        }
        out
    }
}

fn corrupt(path: &Path, what: &str) -> Error {
    Error::internal(format!("corrupt vector index file {}: {what}", path.display()))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let b = bytes.get(at..at + 4)?;
    Some(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn parse_header(path: &Path, bytes: &[u8]) -> Result<(DistanceMetric, usize, u64)> {
    if bytes.len() < HEADER_LEN || &bytes[..4] != MAGIC {
        return Err(corrupt(path, "bad header"));
    }
    let metric = DistanceMetric::from_code(bytes[4]).ok_or_else(|| corrupt(path, "unknown metric"))?;
    let dim = read_u32(bytes, 5).ok_or_else(|| corrupt(path, "truncated header"))? as usize;
    let mut count = [0u8; 8];
    count.copy_from_slice(&bytes[9..17]);
    Ok((metric, dim, u64::from_le_bytes(count)))
}

impl VectorIndex for FlatVectorIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn load(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "vector index not persisted yet");
            self.loaded = true;
            return Ok(());
        }
        let bytes = fs::read(&self.path).map_err(|e| Error::io_read(&self.path, e))?;
        let (_, dim, count) = parse_header(&self.path, &bytes)?;
        if dim != self.dim {
            return Err(corrupt(&self.path, "dimension mismatch"));
        }

        let entry_len = 8 + dim * 4;
        let mut at = HEADER_LEN;
        for _ in 0..count {
            let entry = bytes
                .get(at..at + entry_len)
                .ok_or_else(|| corrupt(&self.path, "truncated entry"))?;
            let rid = Rid::new(
                u32::from_le_bytes([entry[0], entry[1], entry[2], entry[3]]),
                u32::from_le_bytes([entry[4], entry[5], entry[6], entry[7]]),
            );
            let vector = entry[8..]
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            // entries inserted since creation take precedence
            self.vectors.entry(rid).or_insert(vector);
            at += entry_len;
        }
        self.loaded = true;
        tracing::debug!(path = %self.path.display(), entries = count, "vector index loaded");
        Ok(())
    }

    fn insert(&mut self, rid: Rid, vector: &[f32]) -> Result<()> {
        self.check_dim(vector)?;
        self.vectors.insert(rid, vector.to_vec());
        Ok(())
    }

    fn remove(&mut self, rid: Rid) -> bool {
        self.vectors.remove(&rid).is_some()
    }

    fn query(&self, vector: &[f32], limit: usize) -> Result<(Vec<Rid>, Vec<f32>)> {
        self.check_dim(vector)?;
        let mut scored = Vec::with_capacity(self.vectors.len());
        for (rid, candidate) in &self.vectors {
            let distance = self.metric.distance(vector, candidate)?;
            scored.push((*rid, distance));
        }
        scored.sort_by(|(ra, da), (rb, db)| {
            self.metric
                .rank_key(*da)
                .total_cmp(&self.metric.rank_key(*db))
                .then_with(|| ra.cmp(rb))
        });
        scored.truncate(limit);
        Ok(scored.into_iter().unzip())
    }

    fn sync(&self) -> Result<()> {
        fs::write(&self.path, self.encode()).map_err(|e| Error::io_write(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), entries = self.vectors.len(), "vector index synced");
        Ok(())
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(dir: &Path) -> FlatVectorIndex {
        let mut index = FlatVectorIndex::create(dir.join("v.idx"), 2, DistanceMetric::L2).unwrap();
        index.insert(Rid::new(1, 0), &[0.0, 0.0]).unwrap();
        index.insert(Rid::new(1, 1), &[1.0, 1.0]).unwrap();
        index.insert(Rid::new(1, 2), &[5.0, 5.0]).unwrap();
        index
    }

    #[test]
    fn test_query_orders_by_distance() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(dir.path());
        let (rids, distances) = index.query(&[0.9, 0.9], 2).unwrap();
        assert_eq!(rids, vec![Rid::new(1, 1), Rid::new(1, 0)]);
        assert_eq!(distances.len(), 2);
        assert!(distances[0] < distances[1]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = index(dir.path());
        assert!(index.insert(Rid::new(2, 0), &[1.0]).is_err());
        assert!(index.query(&[1.0, 2.0, 3.0], 1).is_err());
    }

    #[test]
    fn test_sync_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let index = index(dir.path());
        index.sync().unwrap();

        let mut reopened = FlatVectorIndex::open(dir.path().join("v.idx")).unwrap();
        assert_eq!(reopened.dim(), 2);
        assert!(reopened.is_empty());
        reopened.load().unwrap();
        assert_eq!(reopened.len(), 3);
        let (rids, _) = reopened.query(&[5.0, 4.0], 1).unwrap();
        assert_eq!(rids, vec![Rid::new(1, 2)]);
    }

    #[test]
    fn test_load_without_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = index(dir.path());
        index.load().unwrap();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FlatVectorIndex::open(dir.path().join("missing.idx")).unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::IoErrOpen);
    }
}
