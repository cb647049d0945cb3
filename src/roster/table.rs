use crate::roster::error::RosterError;
use crate::roster::schema::RosterSchema;
use crate::roster::value::FieldValue;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::Serialize;
use serde::Serializer;
use std::sync::Arc;

static MISSING: FieldValue = FieldValue::Null;

/// One roster row, values aligned with the owning table's columns.
#[derive(Clone, Debug, PartialEq)]
pub struct AthleteRecord {
    pub(crate) values: Vec<FieldValue>,
}

impl AthleteRecord {
    pub(crate) fn new(values: Vec<FieldValue>) -> Self {
        Self { values }
    }

    pub fn value(&self, index: usize) -> &FieldValue {
        self.values.get(index).unwrap_or(&MISSING)
    }
}

/// The normalized roster in source row order.
///
/// Records are addressed by their zero-based position; the position is not stable
/// across reloads of a changed file.
#[derive(Clone, Debug)]
pub struct AthleteTable {
    columns: Arc<[String]>,
    records: Vec<AthleteRecord>,
    schema: RosterSchema,
}

impl AthleteTable {
    pub(crate) fn new(columns: Vec<String>, records: Vec<AthleteRecord>, schema: RosterSchema) -> Self {
        Self {
            columns: columns.into(),
            records,
            schema,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn schema(&self) -> &RosterSchema {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AthleteRecord] {
        &self.records
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of `name`, or [`RosterError::Schema`] when the sheet has no such column.
    pub fn require_column(&self, name: &str) -> Result<usize, RosterError> {
        self.column_index(name)
            .ok_or_else(|| RosterError::Schema(name.to_string()))
    }

    /// Values of one column in row order.
    pub fn values<'a>(&'a self, name: &str) -> Result<impl Iterator<Item = &'a FieldValue> + 'a, RosterError> {
        let index = self.require_column(name)?;
        Ok(self.records.iter().map(move |record| record.value(index)))
    }

    /// Row at a zero-based position. Negative and past-the-end positions are not found.
    pub fn row(&self, position: i64) -> Result<RowView<'_>, RosterError> {
        usize::try_from(position)
            .ok()
            .and_then(|index| self.records.get(index))
            .map(|record| self.view(record))
            .ok_or(RosterError::NotFound(position))
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.records.iter().map(|record| self.view(record))
    }

    /// A new table holding the records accepted by `predicate`, order preserved.
    pub fn filter<P>(&self, mut predicate: P) -> AthleteTable
    where
        P: FnMut(&AthleteTable, &AthleteRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|record| predicate(self, record))
            .cloned()
            .collect();
        Self {
            columns: Arc::clone(&self.columns),
            records,
            schema: self.schema.clone(),
        }
    }

    /// Text form of a record's value in the named column; `None` when the column is absent.
    pub fn text(&self, record: &AthleteRecord, name: &str) -> Option<String> {
        self.column_index(name)
            .map(|index| record.value(index).to_string())
    }

    fn view<'a>(&'a self, record: &'a AthleteRecord) -> RowView<'a> {
        RowView {
            columns: &self.columns,
            record,
        }
    }
}

/// A record paired with its column names; serializes as an object in column order.
#[derive(Clone, Copy, Debug)]
pub struct RowView<'a> {
    columns: &'a [String],
    record: &'a AthleteRecord,
}

impl<'a> RowView<'a> {
    pub fn get(&self, name: &str) -> Option<&'a FieldValue> {
        let record = self.record;
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|index| record.value(index))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a FieldValue)> + 'a {
        let (columns, record) = (self.columns, self.record);
        columns
            .iter()
            .enumerate()
            .map(move |(index, column)| (column.as_str(), record.value(index)))
    }
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for AthleteTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for row in self.rows() {
            seq.serialize_element(&row)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AthleteTable {
        AthleteTable::new(
            vec!["nama".to_string(), "umur".to_string()],
            vec![
                AthleteRecord::new(vec!["Ani".into(), 21.0.into()]),
                AthleteRecord::new(vec!["Budi".into(), FieldValue::Null]),
            ],
            RosterSchema::new(),
        )
    }

    #[test]
    fn row_lookup_is_positional() {
        let table = table();
        assert_eq!(table.row(0).unwrap().get("nama"), Some(&FieldValue::from("Ani")));
        assert_eq!(table.row(1).unwrap().get("umur"), Some(&FieldValue::Null));
        assert!(matches!(table.row(2), Err(RosterError::NotFound(2))));
        assert!(matches!(table.row(-1), Err(RosterError::NotFound(-1))));
    }

    #[test]
    fn serializes_rows_in_column_order() {
        let json = serde_json::to_string(&table()).unwrap();
        assert_eq!(json, r#"[{"nama":"Ani","umur":21},{"nama":"Budi","umur":null}]"#);
    }

    #[test]
    fn values_require_the_column() {
        let table = table();
        let names: Vec<String> = table.values("nama").unwrap().map(|value| value.to_string()).collect();
        assert_eq!(names, ["Ani", "Budi"]);
        assert!(matches!(table.values("kota"), Err(RosterError::Schema(name)) if name == "kota"));
    }

    #[test]
    fn filter_keeps_columns_and_order() {
        let table = table();
        let subset = table.filter(|table, record| table.text(record, "nama").as_deref() == Some("Budi"));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset.columns(), table.columns());
        assert_eq!(table.text(&table.records()[0], "kota"), None);
    }
}
