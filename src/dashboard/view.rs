use crate::dashboard::filter::Selection;
use crate::roster::aggregate::count_by_category;
use crate::roster::aggregate::count_by_year;
use crate::roster::aggregate::distinct_values;
use crate::roster::aggregate::CategoryCount;
use crate::roster::aggregate::CountOrder;
use crate::roster::aggregate::YearCount;
use crate::roster::AthleteTable;
use crate::roster::RosterError;

/// Headline numbers over the filtered rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub athletes: usize,
    pub sports: usize,
    pub categories: usize,
    pub regions: usize,
}

/// Everything the page renders, computed from the full table and a selection.
#[derive(Debug)]
pub struct DashboardView {
    pub region_options: Vec<String>,
    pub sport_options: Vec<String>,
    pub selection: Selection,
    pub counters: Counters,
    pub genders: Option<Vec<CategoryCount>>,
    pub sports: Option<Vec<CategoryCount>>,
    pub categories: Option<Vec<CategoryCount>>,
    pub regions: Option<Vec<CategoryCount>>,
    pub years: Option<Vec<YearCount>>,
    /// Informational messages for sections that could not be drawn.
    pub notices: Vec<String>,
    pub filtered: AthleteTable,
}

impl DashboardView {
    /// Filter options come from the full table; every count and chart, the year chart
    /// included, uses the filtered rows. A missing column only drops its own section.
    pub fn build(table: &AthleteTable, selection: Selection) -> Self {
        let schema = table.schema().clone();
        let mut notices = Vec::new();

        let region_options = distinct_values(table, schema.region_column()).unwrap_or_default();
        let sport_options = distinct_values(table, schema.sport_column()).unwrap_or_default();
        let filtered = selection.apply(table);

        let mut breakdown = |column: &str| -> Option<Vec<CategoryCount>> {
            noticed(count_by_category(&filtered, column, CountOrder::ByCountDesc), &mut notices)
        };
        let genders = breakdown(schema.gender_column());
        let sports = breakdown(schema.sport_column());
        let categories = breakdown(schema.disability_category_column());
        let regions = breakdown(schema.region_column());
        let years = noticed(count_by_year(&filtered), &mut notices);

        let counters = Counters {
            athletes: filtered.len(),
            sports: sports.as_ref().map(Vec::len).unwrap_or(0),
            categories: categories.as_ref().map(Vec::len).unwrap_or(0),
            regions: regions.as_ref().map(Vec::len).unwrap_or(0),
        };

        Self {
            region_options,
            sport_options,
            selection,
            counters,
            genders,
            sports,
            categories,
            regions,
            years,
            notices,
            filtered,
        }
    }
}

/// Turns a missing column into a notice, keeping the rest of the page alive.
fn noticed<T>(result: Result<T, RosterError>, notices: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(RosterError::Schema(column)) => {
            let notice = format!("Kolom '{column}' tidak ditemukan di dataset.");
            if !notices.contains(&notice) {
                notices.push(notice);
            }
            None
        }
        Err(_) => None,
    }
}
