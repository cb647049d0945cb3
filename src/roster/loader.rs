use crate::error::ResultMessage;
use crate::roster::error::RosterError;
use crate::roster::schema::normalize_column_name;
use crate::roster::schema::title_case;
use crate::roster::schema::RosterSchema;
use crate::roster::table::AthleteRecord;
use crate::roster::table::AthleteTable;
use crate::roster::value::FieldValue;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::open_spreadsheet;
use crate::spreadsheet::sheet::Sheet;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Reads a roster workbook into a normalized [`AthleteTable`].
///
/// Every call reads the file again; the loader holds no table state and can be shared
/// between threads.
#[derive(Clone, Debug, Default)]
pub struct Loader {
    schema: RosterSchema,
    criteria: Criteria,
}

impl Loader {
    pub fn new(schema: RosterSchema, criteria: Criteria) -> Self {
        Self { schema, criteria }
    }

    pub fn schema(&self) -> &RosterSchema {
        &self.schema
    }

    /// Loads and normalizes the first matching sheet of the workbook at `path`.
    ///
    /// # Errors
    ///
    /// [`RosterError::DataSource`] when the file is missing, unreadable, not an xlsx
    /// workbook or has no matching sheet.
    pub fn load(&self, path: &Path) -> Result<AthleteTable, RosterError> {
        let started = Instant::now();
        let sheet = open_spreadsheet(path)
            .and_then(|mut source| source.read_sheet(&self.criteria))
            .with_prefix(&format!("Failed to load roster '{}'", path.display()))
            .map_err(|error| RosterError::data_source(path, error))?;
        let table = self.normalize(&sheet);
        debug!(
            file = %path.display(),
            sheet = %sheet.name,
            rows = table.len(),
            columns = table.columns().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded roster"
        );
        Ok(table)
    }

    /// Builds the table from a sheet: the first row with data is the header, later
    /// rows are records. Categorical columns are filled and title-cased.
    pub(crate) fn normalize(&self, sheet: &Sheet) -> AthleteTable {
        let mut rows = sheet.rows().into_iter();
        let Some((_, header)) = rows.next() else {
            return AthleteTable::new(Vec::new(), Vec::new(), self.schema.clone());
        };

        let columns = unique_names(
            header
                .iter()
                .enumerate()
                .map(|(index, cell)| {
                    let name = cell.map(|cell| cell.to_field_value().to_string()).unwrap_or_default();
                    if name.is_empty() {
                        format!("Unnamed: {index}")
                    } else {
                        name
                    }
                })
                .map(|name| normalize_column_name(&name))
                .collect(),
        );

        let categorical: Vec<usize> = self
            .schema
            .categorical_columns()
            .iter()
            .filter_map(|name| columns.iter().position(|column| column == name))
            .collect();

        let records = rows
            .map(|(_, cells)| {
                let mut values: Vec<FieldValue> = cells
                    .iter()
                    .map(|cell| match cell.map(|cell| cell.to_field_value()) {
                        Some(FieldValue::Text(text)) if self.criteria.is_null(&text) => FieldValue::Null,
                        Some(value) => value,
                        None => FieldValue::Null,
                    })
                    .collect();
                for &index in &categorical {
                    values[index] = normalize_category(&values[index], self.schema.sentinel_label());
                }
                AthleteRecord::new(values)
            })
            .collect();

        AthleteTable::new(columns, records, self.schema.clone())
    }
}

/// Missing or blank values become `sentinel`; anything else is stringified, stripped
/// and title-cased.
pub fn normalize_category(value: &FieldValue, sentinel: &str) -> FieldValue {
    let text = value.to_string();
    let text = text.trim();
    if value.is_null() || text.is_empty() {
        FieldValue::Text(sentinel.to_string())
    } else {
        FieldValue::Text(title_case(text))
    }
}

/// Appends `.1`, `.2`, ... to repeated names, keeping the first occurrence as is.
fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut candidate = name.clone();
        while result.contains(&candidate) {
            let counter = seen.entry(name.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{name}.{counter}");
        }
        result.push(candidate);
    }
    result
}
