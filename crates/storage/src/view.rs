//! Updatable views over a single base table.

use crate::table::Table;
use hashbrown::HashMap;
use shoal_core::schema::FieldMeta;
use shoal_core::{Error, Result};
use std::rc::Rc;

/// A view column and the base field it exposes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewColumn {
    pub name: String,
    pub base_field: String,
}

/// A named projection of one base table. Writes through the view are
/// redirected to the base table's fields.
#[derive(Debug)]
pub struct View {
    name: String,
    base: Rc<Table>,
    columns: Vec<ViewColumn>,
    by_name: HashMap<String, usize>,
}

impl View {
    /// Creates a view exposing `(column, base_field)` pairs of `base`.
    pub fn new(name: impl Into<String>, base: Rc<Table>, columns: Vec<(String, String)>) -> Result<Self> {
        let name = name.into();
        let mut mapped: Vec<ViewColumn> = Vec::with_capacity(columns.len());
        let mut by_name = HashMap::with_capacity(columns.len());
        for (column, base_field) in columns {
            base.meta().require_field(&base_field)?;
            if by_name.insert(column.clone(), mapped.len()).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate column {column} in view {name}"
                )));
            }
            mapped.push(ViewColumn {
                name: column,
                base_field,
            });
        }
        if mapped.is_empty() {
            return Err(Error::invalid_schema(format!("view {name} has no columns")));
        }
        Ok(Self {
            name,
            base,
            columns: mapped,
            by_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_table(&self) -> &Rc<Table> {
        &self.base
    }

    pub fn columns(&self) -> &[ViewColumn] {
        &self.columns
    }

    /// Base field behind view column `column`.
    pub fn base_field(&self, column: &str) -> Result<&FieldMeta> {
        let &at = self
            .by_name
            .get(column)
            .ok_or_else(|| Error::field_not_exist(&self.name, column))?;
        self.base.meta().require_field(&self.columns[at].base_field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoal_core::schema::TableMetaBuilder;
    use shoal_core::AttrType;

    #[test]
    fn test_view_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let meta = TableMetaBuilder::new("people")
            .unwrap()
            .add_field(FieldMeta::new("id", AttrType::Ints))
            .unwrap()
            .add_field(FieldMeta::new("name", AttrType::Chars).len(8))
            .unwrap()
            .build()
            .unwrap();
        let table = Table::create(meta, dir.path()).unwrap();
        let view = View::new(
            "v_people",
            table,
            vec![("pid".into(), "id".into()), ("pname".into(), "name".into())],
        )
        .unwrap();

        assert_eq!(view.base_field("pname").unwrap().name(), "name");
        let err = view.base_field("id").unwrap_err();
        assert_eq!(err.rc(), shoal_core::Rc::SchemaFieldNotExist);
        assert_eq!(view.base_table().name(), "people");
    }

    #[test]
    fn test_view_rejects_unknown_base_field() {
        let dir = tempfile::tempdir().unwrap();
        let meta = TableMetaBuilder::new("t")
            .unwrap()
            .add_field(FieldMeta::new("a", AttrType::Ints))
            .unwrap()
            .build()
            .unwrap();
        let table = Table::create(meta, dir.path()).unwrap();
        assert!(View::new("v", table.clone(), vec![("x".into(), "nope".into())]).is_err());
        assert!(View::new("v", table, vec![]).is_err());
    }
}
