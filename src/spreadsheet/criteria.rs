use glob::Pattern;

/// Pandas-style literals that read as missing when a text cell holds exactly one of them.
pub const DEFAULT_NULLS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Which sheet to read from a workbook and how to treat its text cells.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet name pattern; `None` selects the first sheet.
    pub sheet_name_pattern: Option<Pattern>,

    /// Text literals read as missing values.
    pub nulls: Vec<String>,
}

impl Criteria {
    /// Criteria selecting sheets whose name matches `pattern`.
    pub fn with_sheet_pattern(pattern: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            sheet_name_pattern: Some(Pattern::new(pattern)?),
            ..Self::default()
        })
    }

    /// Checks if a sheet name matches the criteria pattern.
    /// Returns true if no pattern is specified.
    pub(crate) fn accept(&self, sheet_name: &str) -> bool {
        self.sheet_name_pattern
            .as_ref()
            .map(|pattern| pattern.matches(sheet_name))
            .unwrap_or(true)
    }

    pub(crate) fn is_null(&self, text: &str) -> bool {
        self.nulls.iter().any(|null| null == text)
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            sheet_name_pattern: None,
            nulls: DEFAULT_NULLS.iter().map(|null| null.to_string()).collect(),
        }
    }
}
