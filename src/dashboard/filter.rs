use crate::roster::AthleteTable;
use std::collections::BTreeSet;

/// Query marker sent by the filter form; without it every value counts as selected.
pub const FILTER_MARKER: &str = "filter";
pub const REGION_PARAMETER: &str = "wilayah";
pub const SPORT_PARAMETER: &str = "cabor";

/// Region and sport values picked in the sidebar. `None` selects everything.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub regions: Option<BTreeSet<String>>,
    pub sports: Option<BTreeSet<String>>,
}

impl Selection {
    /// Reads repeated `wilayah=..&cabor=..` pairs. The form always sends
    /// `filter=1`, so an empty multi-select still means "nothing selected".
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        if !pairs.iter().any(|(key, _)| key == FILTER_MARKER) {
            return Self::default();
        }
        let collect = |name: &str| -> BTreeSet<String> {
            pairs
                .iter()
                .filter(|(key, _)| key == name)
                .map(|(_, value)| value.to_owned())
                .collect()
        };
        Self {
            regions: Some(collect(REGION_PARAMETER)),
            sports: Some(collect(SPORT_PARAMETER)),
        }
    }

    pub fn region_selected(&self, value: &str) -> bool {
        is_selected(&self.regions, value)
    }

    pub fn sport_selected(&self, value: &str) -> bool {
        is_selected(&self.sports, value)
    }

    /// Rows whose region and sport are selected. Rows carrying the sentinel in
    /// either column always pass that column's check; an absent column never filters.
    pub fn apply(&self, table: &AthleteTable) -> AthleteTable {
        let schema = table.schema();
        let sentinel = schema.sentinel_label();
        let region_column = schema.region_column().to_string();
        let sport_column = schema.sport_column().to_string();
        table.filter(|table, record| {
            let region = table.text(record, &region_column);
            let sport = table.text(record, &sport_column);
            let keep = |value: Option<String>, selected: &dyn Fn(&str) -> bool| match value {
                Some(value) => value == sentinel || selected(&value),
                None => true,
            };
            keep(region, &|value| self.region_selected(value)) && keep(sport, &|value| self.sport_selected(value))
        })
    }
}

fn is_selected(selection: &Option<BTreeSet<String>>, value: &str) -> bool {
    selection
        .as_ref()
        .map(|values| values.contains(value))
        .unwrap_or(true)
}
