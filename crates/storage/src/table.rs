//! Table storage.
//!
//! A `Table` owns its record heap, payload files, ordered secondary indexes
//! and vector indexes. Tables are shared between operators as `Rc<Table>`;
//! mutation goes through interior `RefCell`s since execution is
//! single-threaded.

use crate::heap::RecordHeap;
use crate::layout::RowLayout;
use crate::payload::PayloadStore;
use crate::scanner::RecordScanner;
use crate::trx::{ReadWriteMode, Trx};
use shoal_core::schema::{FieldMeta, TableMeta};
use shoal_core::{AttrType, Error, Record, Result, Rid, Value};
use shoal_index::{DistanceMetric, FlatVectorIndex, IndexKey, KeyRange, OrderedIndex, VectorIndex};
use std::cell::{Ref, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Definition of an ordered secondary index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexMeta {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
}

/// Definition of a vector index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VectorIndexMeta {
    pub name: String,
    pub field: String,
    pub metric: DistanceMetric,
}

struct TableIndex {
    meta: IndexMeta,
    index: OrderedIndex<IndexKey>,
}

struct TableVectorIndex {
    meta: VectorIndexMeta,
    index: Box<dyn VectorIndex>,
}

/// Index entries staged by `update_index` and applied by
/// `index_flush_cached_entries`: all deletes, then all inserts, then the
/// vector replacements.
#[derive(Default)]
struct IndexEntryCache {
    deletes: Vec<(String, IndexKey, Rid)>,
    inserts: Vec<(String, IndexKey, Rid)>,
    vectors: Vec<(String, Rid, Option<Vec<f32>>)>,
}

pub struct Table {
    layout: RowLayout,
    data_dir: PathBuf,
    heap: RefCell<RecordHeap>,
    indexes: RefCell<Vec<TableIndex>>,
    vector_indexes: RefCell<Vec<TableVectorIndex>>,
    index_cache: RefCell<IndexEntryCache>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name())
            .field("records", &self.record_count())
            .finish()
    }
}

impl Table {
    /// Creates a table and its payload files under `data_dir`.
    pub fn create(meta: TableMeta, data_dir: &Path) -> Result<Rc<Self>> {
        let payload = PayloadStore::create(data_dir, meta.name())?;
        tracing::info!(table = meta.name(), fields = meta.field_count(), "table created");
        Ok(Rc::new(Self::with_payload(meta, payload, data_dir)))
    }

    /// Binds a table definition to existing payload files under `data_dir`.
    pub fn open(meta: TableMeta, data_dir: &Path) -> Result<Rc<Self>> {
        let payload = PayloadStore::open(data_dir, meta.name())?;
        Ok(Rc::new(Self::with_payload(meta, payload, data_dir)))
    }

    fn with_payload(meta: TableMeta, payload: PayloadStore, data_dir: &Path) -> Self {
        let record_size = meta.record_size();
        Self {
            layout: RowLayout::new(Rc::new(meta), Rc::new(payload)),
            data_dir: data_dir.to_path_buf(),
            heap: RefCell::new(RecordHeap::new(record_size)),
            indexes: RefCell::new(Vec::new()),
            vector_indexes: RefCell::new(Vec::new()),
            index_cache: RefCell::new(IndexEntryCache::default()),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.layout.table_name()
    }

    #[inline]
    pub fn meta(&self) -> &Rc<TableMeta> {
        self.layout.meta()
    }

    #[inline]
    pub fn layout(&self) -> &RowLayout {
        &self.layout
    }

    #[inline]
    pub fn payload(&self) -> &Rc<PayloadStore> {
        self.layout.payload()
    }

    /// Number of live records.
    pub fn record_count(&self) -> usize {
        self.heap.borrow().len()
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Builds a record image from one value per user field.
    ///
    /// Values are cast to their field types; a NULL for a non-nullable field
    /// is rejected.
    pub fn make_record(&self, values: &[Value]) -> Result<Vec<u8>> {
        let meta = self.meta();
        if values.len() != meta.field_count() {
            return Err(Error::invalid_argument(format!(
                "table {} expects {} values, got {}",
                meta.name(),
                meta.field_count(),
                values.len()
            )));
        }
        let mut data = vec![0u8; meta.record_size()];
        for (field, value) in meta.fields().iter().zip(values) {
            let value = coerce(field, value)?;
            self.layout.write_field(&mut data, field, &value)?;
        }
        Ok(data)
    }

    /// Inserts a raw record image and indexes it.
    pub fn insert_record(&self, data: Vec<u8>) -> Result<Rid> {
        let rid = self.heap.borrow_mut().insert(data)?;
        if let Err(e) = self.index_new_record(rid) {
            tracing::warn!(table = self.name(), %rid, rc = %e.rc(), "failed to index record, rolling back insert");
            let _ = self.heap.borrow_mut().delete(rid);
            return Err(e);
        }
        tracing::trace!(table = self.name(), %rid, "record inserted");
        Ok(rid)
    }

    /// Builds, stamps and inserts a record within `trx`.
    pub fn insert_values(&self, trx: &Trx, values: &[Value]) -> Result<Rid> {
        trx.check_mode(ReadWriteMode::ReadWrite)?;
        let mut data = self.make_record(values)?;
        self.layout.stamp_begin(&mut data, trx.xid()?);
        self.insert_record(data)
    }

    /// Copies the record at `rid`.
    pub fn get_record(&self, rid: Rid) -> Result<Record> {
        let heap = self.heap.borrow();
        let data = heap
            .get(rid)
            .ok_or_else(|| Error::not_found(format!("record {rid} in table {}", self.name())))?;
        Ok(Record::new(rid, data.to_vec()))
    }

    /// Opens a scanner over the records visible to `trx`.
    pub fn get_record_scanner(self: &Rc<Self>, trx: &Trx, mode: ReadWriteMode) -> Result<RecordScanner> {
        trx.check_mode(mode)?;
        let rids = self.heap.borrow().rids();
        tracing::debug!(table = self.name(), records = rids.len(), ?mode, "record scanner opened");
        Ok(RecordScanner::new(Rc::clone(self), trx.clone(), rids))
    }

    /// Runs `visitor` on a copy of the record at `rid` and stores the result.
    ///
    /// If the visitor fails the stored bytes are left untouched.
    pub fn visit_record<F>(&self, rid: Rid, visitor: F) -> Result<()>
    where
        F: FnOnce(&mut Record) -> Result<()>,
    {
        let mut record = self.get_record(rid)?;
        visitor(&mut record)?;
        if record.len() != self.meta().record_size() {
            return Err(Error::internal(format!(
                "visitor resized record {rid} to {} bytes",
                record.len()
            )));
        }
        let mut heap = self.heap.borrow_mut();
        let slot = heap
            .get_mut(rid)
            .ok_or_else(|| Error::not_found(format!("record {rid} in table {}", self.name())))?;
        slot.copy_from_slice(record.data());
        Ok(())
    }

    // =========================================================================
    // Ordered indexes
    // =========================================================================

    /// Creates an ordered index over `fields` and fills it from the stored
    /// records.
    pub fn create_index(&self, name: &str, fields: &[&str], unique: bool) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::invalid_argument(format!("index {name} has no fields")));
        }
        if self.find_index(name).is_some() {
            return Err(Error::invalid_argument(format!("index {name} already exists")));
        }
        for field in fields {
            let meta = self.meta().require_field(field)?;
            if meta.attr_type().is_out_of_line() {
                return Err(Error::invalid_argument(format!(
                    "{} field {field} cannot be indexed",
                    meta.attr_type()
                )));
            }
        }

        let meta = IndexMeta {
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            unique,
        };
        let mut index = OrderedIndex::new(name, unique);
        let heap = self.heap.borrow();
        for rid in heap.rids() {
            if let Some(data) = heap.get(rid) {
                index.insert_entry(self.index_key(data, &meta.fields)?, rid)?;
            }
        }
        drop(heap);

        tracing::info!(table = self.name(), index = name, entries = index.len(), "index created");
        self.indexes.borrow_mut().push(TableIndex { meta, index });
        Ok(())
    }

    pub fn find_index(&self, name: &str) -> Option<IndexMeta> {
        self.indexes
            .borrow()
            .iter()
            .find(|i| i.meta.name == name)
            .map(|i| i.meta.clone())
    }

    /// Finds an index whose leading field is `field`.
    pub fn find_index_by_field(&self, field: &str) -> Option<IndexMeta> {
        self.indexes
            .borrow()
            .iter()
            .find(|i| i.meta.fields.first().map(String::as_str) == Some(field))
            .map(|i| i.meta.clone())
    }

    pub fn has_indexes(&self) -> bool {
        !self.indexes.borrow().is_empty() || !self.vector_indexes.borrow().is_empty()
    }

    /// Rids whose key in index `name` lies in `range`, in key order.
    pub fn index_scan(&self, name: &str, range: &KeyRange<IndexKey>) -> Result<Vec<Rid>> {
        let indexes = self.indexes.borrow();
        let index = indexes
            .iter()
            .find(|i| i.meta.name == name)
            .ok_or_else(|| Error::not_found(format!("index {name} on table {}", self.name())))?;
        Ok(index.index.scan(range))
    }

    fn index_key(&self, data: &[u8], fields: &[String]) -> Result<IndexKey> {
        let meta = self.meta();
        let values = fields
            .iter()
            .map(|f| self.layout.read_field(data, meta.require_field(f)?))
            .collect::<Result<Vec<_>>>()?;
        Ok(IndexKey::new(values))
    }

    fn index_new_record(&self, rid: Rid) -> Result<()> {
        let heap = self.heap.borrow();
        let data = heap
            .get(rid)
            .ok_or_else(|| Error::internal(format!("record {rid} vanished before indexing")))?;

        let mut indexes = self.indexes.borrow_mut();
        let keys = indexes
            .iter()
            .map(|entry| self.index_key(data, &entry.meta.fields))
            .collect::<Result<Vec<_>>>()?;
        for (pos, key) in keys.iter().enumerate() {
            if let Err(e) = indexes[pos].index.insert_entry(key.clone(), rid) {
                // undo the entries already added for this record
                for (undo, key) in keys.iter().enumerate().take(pos) {
                    let _ = indexes[undo].index.delete_entry(key, rid);
                }
                return Err(e);
            }
        }
        drop(indexes);

        for entry in self.vector_indexes.borrow_mut().iter_mut() {
            let field = self.meta().require_field(&entry.meta.field)?;
            if let Value::Vector(v) = self.layout.read_field(data, field)? {
                entry.index.insert(rid, &v)?;
            }
        }
        Ok(())
    }

    /// Stages the index maintenance for a record whose image changed from
    /// `old` to `new_data` through an update of `fields`.
    ///
    /// Nothing is applied until `index_flush_cached_entries`.
    pub fn update_index(&self, old: &Record, new_data: &[u8], fields: &[FieldMeta]) -> Result<()> {
        let rid = old.rid();
        let touched = |name: &str| fields.iter().any(|f| f.name() == name);

        let staged: Vec<(String, IndexKey, IndexKey)> = {
            let indexes = self.indexes.borrow();
            let mut staged = Vec::new();
            for entry in indexes.iter() {
                if !entry.meta.fields.iter().any(|f| touched(f)) {
                    continue;
                }
                let old_key = self.index_key(old.data(), &entry.meta.fields)?;
                let new_key = self.index_key(new_data, &entry.meta.fields)?;
                if old_key != new_key {
                    staged.push((entry.meta.name.clone(), old_key, new_key));
                }
            }
            staged
        };
        for (name, old_key, new_key) in staged {
            self.index_cache_delete_entry(&name, old_key, rid);
            self.index_cache_insert_entry(&name, new_key, rid);
        }

        let vectors = self.vector_indexes.borrow();
        for entry in vectors.iter().filter(|e| touched(&e.meta.field)) {
            let field = self.meta().require_field(&entry.meta.field)?;
            let vector = match self.layout.read_field(new_data, field)? {
                Value::Vector(v) => Some(v),
                _ => None,
            };
            self.index_cache
                .borrow_mut()
                .vectors
                .push((entry.meta.name.clone(), rid, vector));
        }
        Ok(())
    }

    pub fn index_cache_insert_entry(&self, index: &str, key: IndexKey, rid: Rid) {
        self.index_cache.borrow_mut().inserts.push((index.to_string(), key, rid));
    }

    pub fn index_cache_delete_entry(&self, index: &str, key: IndexKey, rid: Rid) {
        self.index_cache.borrow_mut().deletes.push((index.to_string(), key, rid));
    }

    /// Applies the staged index entries: deletes first, then inserts, so
    /// that keys swapped between records do not collide in a unique index.
    ///
    /// All or nothing: if an ordered entry is rejected every entry already
    /// applied is undone, and vector replacements are only made once all
    /// ordered entries went in. The cache is empty afterwards either way.
    pub fn index_flush_cached_entries(&self) -> Result<()> {
        let cache = std::mem::take(&mut *self.index_cache.borrow_mut());
        {
            let mut indexes = self.indexes.borrow_mut();
            let (mut deleted, mut inserted) = (0, 0);
            if let Err(e) = apply_cached(&mut indexes, &cache, &mut deleted, &mut inserted) {
                tracing::warn!(table = self.name(), rc = %e.rc(), deleted, inserted, "index flush failed, undoing");
                for (name, key, rid) in cache.inserts[..inserted].iter().rev() {
                    if let Ok(index) = cached_target(&mut indexes, name) {
                        let _ = index.delete_entry(key, *rid);
                    }
                }
                for (name, key, rid) in cache.deletes[..deleted].iter().rev() {
                    if let Ok(index) = cached_target(&mut indexes, name) {
                        let _ = index.insert_entry(key.clone(), *rid);
                    }
                }
                return Err(e);
            }
        }

        let mut vector_indexes = self.vector_indexes.borrow_mut();
        for (name, _, vector) in &cache.vectors {
            let entry = vector_indexes
                .iter()
                .find(|i| &i.meta.name == name)
                .ok_or_else(|| Error::internal(format!("cached entry for unknown vector index {name}")))?;
            if let Some(v) = vector {
                if v.len() != entry.index.dim() {
                    return Err(Error::invalid_argument(format!(
                        "vector index {name} holds {}-dimensional vectors, got {}",
                        entry.index.dim(),
                        v.len()
                    )));
                }
            }
        }
        for (name, rid, vector) in cache.vectors {
            if let Some(entry) = vector_indexes.iter_mut().find(|i| i.meta.name == name) {
                entry.index.remove(rid);
                if let Some(v) = vector {
                    entry.index.insert(rid, &v)?;
                }
            }
        }
        tracing::trace!(table = self.name(), "cached index entries flushed");
        Ok(())
    }

    /// Drops every staged entry without applying it.
    pub fn index_discard_cached_entries(&self) {
        *self.index_cache.borrow_mut() = IndexEntryCache::default();
    }

    // =========================================================================
    // Vector indexes
    // =========================================================================

    /// Creates a flat vector index over a VECTOR field with a declared
    /// dimension, persisted next to the payload files.
    pub fn create_vector_index(&self, name: &str, field: &str, metric: DistanceMetric) -> Result<()> {
        if self.find_vector_index(name).is_some() {
            return Err(Error::invalid_argument(format!("vector index {name} already exists")));
        }
        let field_meta = self.meta().require_field(field)?.clone();
        if field_meta.attr_type() != AttrType::Vectors {
            return Err(Error::invalid_argument(format!("field {field} is not a vector field")));
        }
        let dim = field_meta
            .vector_dim()
            .ok_or_else(|| Error::invalid_argument(format!("vector field {field} has no declared dimension")))?;

        let path = self.data_dir.join(format!("{}.{name}.vidx", self.name()));
        let mut index = FlatVectorIndex::create(path, dim, metric)?;
        let heap = self.heap.borrow();
        for rid in heap.rids() {
            if let Some(data) = heap.get(rid) {
                if let Value::Vector(v) = self.layout.read_field(data, &field_meta)? {
                    index.insert(rid, &v)?;
                }
            }
        }
        drop(heap);

        tracing::info!(table = self.name(), index = name, entries = index.len(), %metric, "vector index created");
        self.vector_indexes.borrow_mut().push(TableVectorIndex {
            meta: VectorIndexMeta {
                name: name.to_string(),
                field: field.to_string(),
                metric,
            },
            index: Box::new(index),
        });
        Ok(())
    }

    pub fn find_vector_index(&self, name: &str) -> Option<VectorIndexMeta> {
        self.vector_indexes
            .borrow()
            .iter()
            .find(|i| i.meta.name == name)
            .map(|i| i.meta.clone())
    }

    /// Runs `f` with mutable access to vector index `name`.
    pub fn with_vector_index<R, F>(&self, name: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut dyn VectorIndex) -> Result<R>,
    {
        let mut indexes = self.vector_indexes.borrow_mut();
        let entry = indexes
            .iter_mut()
            .find(|i| i.meta.name == name)
            .ok_or_else(|| Error::not_found(format!("vector index {name} on table {}", self.name())))?;
        f(entry.index.as_mut())
    }

    /// Persists every vector index.
    pub fn sync_vector_indexes(&self) -> Result<()> {
        for entry in self.vector_indexes.borrow().iter() {
            entry.index.sync()?;
        }
        Ok(())
    }

    pub(crate) fn heap(&self) -> Ref<'_, RecordHeap> {
        self.heap.borrow()
    }
}

fn apply_cached(
    indexes: &mut [TableIndex],
    cache: &IndexEntryCache,
    deleted: &mut usize,
    inserted: &mut usize,
) -> Result<()> {
    for (name, key, rid) in &cache.deletes {
        cached_target(indexes, name)?.delete_entry(key, *rid)?;
        *deleted += 1;
    }
    for (name, key, rid) in &cache.inserts {
        cached_target(indexes, name)?.insert_entry(key.clone(), *rid)?;
        *inserted += 1;
    }
    Ok(())
}

fn cached_target<'a>(indexes: &'a mut [TableIndex], name: &str) -> Result<&'a mut OrderedIndex<IndexKey>> {
    indexes
        .iter_mut()
        .find(|i| i.meta.name == name)
        .map(|i| &mut i.index)
        .ok_or_else(|| Error::internal(format!("cached entry for unknown index {name}")))
}

/// Casts `value` to the type of `field`.
fn coerce(field: &FieldMeta, value: &Value) -> Result<Value> {
    if value.is_null() {
        return Ok(Value::Null(field.attr_type()));
    }
    if value.attr_type() == field.attr_type() {
        return Ok(value.clone());
    }
    value.cast_to(field.attr_type()).map_err(|e| {
        Error::invalid_argument(format!(
            "cannot store {} in {} field {}: {e}",
            value.attr_type(),
            field.attr_type(),
            field.name()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::schema::TableMetaBuilder;

    fn people(dir: &Path) -> Rc<Table> {
        let meta = TableMetaBuilder::new("people")
            .unwrap()
            .with_trx_fields()
            .add_field(FieldMeta::new("id", AttrType::Ints))
            .unwrap()
            .add_field(FieldMeta::new("name", AttrType::Chars).len(8).nullable(true))
            .unwrap()
            .add_field(FieldMeta::new("emb", AttrType::Vectors).dim(2).nullable(true))
            .unwrap()
            .build()
            .unwrap();
        Table::create(meta, dir).unwrap()
    }

    fn row(id: i32, name: &str, emb: [f32; 2]) -> Vec<Value> {
        vec![Value::Int(id), Value::from(name), Value::Vector(emb.to_vec())]
    }

    #[test]
    fn test_insert_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        let trx = Trx::begin();
        let rid = table.insert_values(&trx, &row(1, "ann", [1.0, 0.0])).unwrap();
        let record = table.get_record(rid).unwrap();
        let name = table.meta().field("name").unwrap();
        assert_eq!(table.layout().read_field(record.data(), name).unwrap(), Value::from("ann"));
        assert_eq!(table.layout().trx_stamps(record.data()), Some((trx.xid().unwrap(), 0)));
        assert_eq!(table.record_count(), 1);
    }

    #[test]
    fn test_make_record_casts_and_checks() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        // float into int field is cast
        let data = table
            .make_record(&[Value::Float(2.7), Value::Null(AttrType::Undefined), Value::Null(AttrType::Undefined)])
            .unwrap();
        let id = table.meta().field("id").unwrap();
        assert_eq!(table.layout().read_field(&data, id).unwrap(), Value::Int(2));

        let err = table
            .make_record(&[Value::Null(AttrType::Undefined), Value::from("x"), Value::Null(AttrType::Vectors)])
            .unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::InvalidArgument);
        assert!(table.make_record(&[Value::Int(1)]).is_err());
    }

    #[test]
    fn test_visit_record_failure_leaves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        let rid = table.insert_values(&Trx::begin(), &row(1, "ann", [1.0, 0.0])).unwrap();
        let before = table.get_record(rid).unwrap();
        let err = table
            .visit_record(rid, |record| {
                record.data_mut()[0] ^= 0xff;
                Err(Error::invalid_argument("nope"))
            })
            .unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::InvalidArgument);
        assert_eq!(table.get_record(rid).unwrap(), before);
    }

    #[test]
    fn test_index_maintenance() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        let trx = Trx::begin();
        let a = table.insert_values(&trx, &row(1, "ann", [1.0, 0.0])).unwrap();
        let b = table.insert_values(&trx, &row(2, "bob", [0.0, 1.0])).unwrap();
        table.create_index("idx_id", &["id"], true).unwrap();
        assert!(table.find_index_by_field("id").is_some());

        // unique violation rolls back the insert
        assert!(table.insert_values(&trx, &row(2, "dup", [0.0, 0.0])).is_err());
        assert_eq!(table.record_count(), 2);

        // swap ids through the entry cache
        let id_field = table.meta().field("id").unwrap().clone();
        for (rid, new_id) in [(a, 2), (b, 1)] {
            let old = table.get_record(rid).unwrap();
            let mut new = old.clone();
            table.layout().write_field(new.data_mut(), &id_field, &Value::Int(new_id)).unwrap();
            table.update_index(&old, new.data(), &[id_field.clone()]).unwrap();
            table.visit_record(rid, |r| {
                r.copy_from(&new);
                Ok(())
            })
            .unwrap();
        }
        table.index_flush_cached_entries().unwrap();

        let key = |i| KeyRange::only(IndexKey::new(vec![Value::Int(i)]));
        assert_eq!(table.index_scan("idx_id", &key(1)).unwrap(), vec![b]);
        assert_eq!(table.index_scan("idx_id", &key(2)).unwrap(), vec![a]);
        assert!(table.index_scan("missing", &key(1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_failed_flush_leaves_indexes_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        let trx = Trx::begin();
        let a = table.insert_values(&trx, &row(1, "ann", [1.0, 0.0])).unwrap();
        let b = table.insert_values(&trx, &row(2, "bob", [0.0, 1.0])).unwrap();
        table.create_index("idx_id", &["id"], true).unwrap();
        table.create_vector_index("vidx", "emb", DistanceMetric::L2).unwrap();

        // both rows to id 1 and a new vector for b
        let id_field = table.meta().field("id").unwrap().clone();
        let emb_field = table.meta().field("emb").unwrap().clone();
        let old = table.get_record(b).unwrap();
        let mut new = old.clone();
        table.layout().write_field(new.data_mut(), &id_field, &Value::Int(1)).unwrap();
        table
            .layout()
            .write_field(new.data_mut(), &emb_field, &Value::Vector(vec![9.0, 9.0]))
            .unwrap();
        table.update_index(&old, new.data(), &[id_field, emb_field]).unwrap();

        let err = table.index_flush_cached_entries().unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::InvalidArgument);

        let key = |i| KeyRange::only(IndexKey::new(vec![Value::Int(i)]));
        assert_eq!(table.index_scan("idx_id", &key(1)).unwrap(), vec![a]);
        assert_eq!(table.index_scan("idx_id", &key(2)).unwrap(), vec![b]);
        let (rids, distances) = table
            .with_vector_index("vidx", |index| {
                index.load()?;
                index.query(&[0.0, 1.0], 1)
            })
            .unwrap();
        assert_eq!((rids, distances), (vec![b], vec![0.0]));

        // nothing left staged
        table.index_flush_cached_entries().unwrap();
        assert_eq!(table.index_scan("idx_id", &key(2)).unwrap(), vec![b]);
    }

    #[test]
    fn test_vector_index() {
        let dir = tempfile::tempdir().unwrap();
        let table = people(dir.path());
        let trx = Trx::begin();
        let a = table.insert_values(&trx, &row(1, "ann", [1.0, 0.0])).unwrap();
        table.create_vector_index("vidx", "emb", DistanceMetric::L2).unwrap();
        let b = table.insert_values(&trx, &row(2, "bob", [0.0, 1.0])).unwrap();

        let (rids, _) = table
            .with_vector_index("vidx", |index| {
                index.load()?;
                index.query(&[0.1, 0.9], 2)
            })
            .unwrap();
        assert_eq!(rids, vec![b, a]);
        assert!(table.create_vector_index("bad", "id", DistanceMetric::L2).is_err());
        table.sync_vector_indexes().unwrap();
    }
}
