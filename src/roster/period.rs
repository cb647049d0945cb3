use crate::roster::error::RosterError;
use crate::roster::table::AthleteTable;
use crate::roster::value::FieldValue;
use regex::Regex;
use std::sync::LazyLock;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("Hardcode regex pattern"));

/// Year found in a period value: the first run of four ASCII digits in its text form.
/// `Null` and text without such a run give `None`.
pub fn extract_year(value: &FieldValue) -> Option<i32> {
    if value.is_null() {
        return None;
    }
    extract_year_from_text(&value.to_string())
}

pub fn extract_year_from_text(text: &str) -> Option<i32> {
    YEAR_PATTERN
        .find(text)
        .and_then(|found| found.as_str().parse::<i32>().ok())
}

/// Element-wise year extraction over the table's period column.
///
/// # Errors
///
/// [`RosterError::Schema`] when the table has no period column.
pub fn year_column(table: &AthleteTable) -> Result<Vec<Option<i32>>, RosterError> {
    Ok(table
        .values(table.schema().period_column())?
        .map(extract_year)
        .collect())
}
