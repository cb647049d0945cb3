use crate::roster::error::RosterError;
use crate::roster::period::year_column;
use crate::roster::table::AthleteTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rows sharing one value of a categorical column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Rows whose period holds a given year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct YearCount {
    #[serde(rename = "tahun")]
    pub year: i32,
    #[serde(rename = "jumlah_atlet")]
    pub count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CountOrder {
    /// Ascending by value.
    #[default]
    ByValue,
    /// Most frequent first, ties broken by ascending value.
    ByCountDesc,
}

/// Counts non-null values of `column`.
///
/// # Errors
///
/// [`RosterError::Schema`] when the column does not exist.
pub fn count_by_category(table: &AthleteTable, column: &str, order: CountOrder) -> Result<Vec<CategoryCount>, RosterError> {
    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    for value in table.values(column)?.filter(|value| !value.is_null()) {
        *groups.entry(value.to_string()).or_insert(0) += 1;
    }
    let mut counts: Vec<CategoryCount> = groups
        .into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect();
    if order == CountOrder::ByCountDesc {
        // stable sort keeps the ascending value order among ties
        counts.sort_by(|a, b| b.count.cmp(&a.count));
    }
    Ok(counts)
}

/// Distinct non-null values of `column`, ascending.
pub fn distinct_values(table: &AthleteTable, column: &str) -> Result<Vec<String>, RosterError> {
    Ok(count_by_category(table, column, CountOrder::ByValue)?
        .into_iter()
        .map(|entry| entry.value)
        .collect())
}

/// Rows per extracted year, ascending by year. Rows without a year are left out.
pub fn count_by_year(table: &AthleteTable) -> Result<Vec<YearCount>, RosterError> {
    let mut groups: BTreeMap<i32, usize> = BTreeMap::new();
    for year in year_column(table)?.into_iter().flatten() {
        *groups.entry(year).or_insert(0) += 1;
    }
    Ok(groups
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect())
}

/// Distinct extracted years, ascending.
pub fn distinct_years(table: &AthleteTable) -> Result<Vec<i32>, RosterError> {
    Ok(count_by_year(table)?.into_iter().map(|entry| entry.year).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::schema::RosterSchema;
    use crate::roster::table::AthleteRecord;
    use crate::roster::value::FieldValue;

    fn table(rows: &[(&str, FieldValue)]) -> AthleteTable {
        AthleteTable::new(
            vec!["jenis_kelamin".to_string(), "periode_data".to_string()],
            rows.iter()
                .map(|(gender, period)| AthleteRecord::new(vec![FieldValue::from(*gender), period.clone()]))
                .collect(),
            RosterSchema::new(),
        )
    }

    fn sample() -> AthleteTable {
        table(&[
            ("Putri", FieldValue::from("Data 2021")),
            ("Putra", FieldValue::Number(2019.0)),
            ("Putra", FieldValue::from("tanpa tahun")),
            ("Putri", FieldValue::from("2021")),
            ("Putra", FieldValue::Null),
            ("Tidak Diketahui", FieldValue::from("2020 Q1")),
        ])
    }

    #[test]
    fn category_counts_by_value_and_by_frequency() {
        let table = sample();
        let by_value = count_by_category(&table, "jenis_kelamin", CountOrder::ByValue).unwrap();
        let values: Vec<(&str, usize)> = by_value.iter().map(|entry| (entry.value.as_str(), entry.count)).collect();
        assert_eq!(values, [("Putra", 3), ("Putri", 2), ("Tidak Diketahui", 1)]);

        let by_count = count_by_category(&table, "jenis_kelamin", CountOrder::ByCountDesc).unwrap();
        assert_eq!(by_count[0].value, "Putra");
        assert_eq!(by_count.iter().map(|entry| entry.count).sum::<usize>(), table.len());
    }

    #[test]
    fn year_counts_are_ascending_and_skip_missing() {
        let table = sample();
        let counts = count_by_year(&table).unwrap();
        assert_eq!(
            counts,
            [
                YearCount { year: 2019, count: 1 },
                YearCount { year: 2020, count: 1 },
                YearCount { year: 2021, count: 2 },
            ]
        );
        assert!(counts.windows(2).all(|pair| pair[0].year < pair[1].year));
        assert_eq!(distinct_years(&table).unwrap(), [2019, 2020, 2021]);
    }

    #[test]
    fn empty_table_gives_empty_results() {
        let table = table(&[]);
        assert!(count_by_category(&table, "jenis_kelamin", CountOrder::ByValue).unwrap().is_empty());
        assert!(count_by_year(&table).unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_schema_error() {
        let table = sample();
        assert!(matches!(
            count_by_category(&table, "wilayah_domisili", CountOrder::ByValue),
            Err(RosterError::Schema(name)) if name == "wilayah_domisili"
        ));

        let schema = RosterSchema::new().period("tahun");
        let table = AthleteTable::new(vec!["jenis_kelamin".to_string()], Vec::new(), schema);
        assert!(matches!(count_by_year(&table), Err(RosterError::Schema(name)) if name == "tahun"));
    }

    #[test]
    fn year_count_field_names() {
        let json = serde_json::to_string(&YearCount { year: 2021, count: 4 }).unwrap();
        assert_eq!(json, r#"{"tahun":2021,"jumlah_atlet":4}"#);
    }
}
