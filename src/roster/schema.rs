/// Names the semantic columns of a roster sheet and the label used for missing categories.
///
/// Column names are compared after the same strip + lower-case step applied to the
/// sheet header, so `RosterSchema::new().region(" Wilayah_Domisili ")` still matches.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterSchema {
    pub(crate) region: String,
    pub(crate) sport: String,
    pub(crate) gender: String,
    pub(crate) disability_category: String,
    pub(crate) period: String,
    pub(crate) sentinel: String,
}

pub const DEFAULT_SENTINEL: &str = "Tidak Diketahui";

impl RosterSchema {
    pub fn new() -> Self {
        Self {
            region: "wilayah_domisili".to_string(),
            sport: "cabang_olahraga".to_string(),
            gender: "jenis_kelamin".to_string(),
            disability_category: "kategori_ketunaan".to_string(),
            period: "periode_data".to_string(),
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }

    pub fn region(mut self, name: &str) -> Self {
        self.region = normalize_column_name(name);
        self
    }

    pub fn sport(mut self, name: &str) -> Self {
        self.sport = normalize_column_name(name);
        self
    }

    pub fn gender(mut self, name: &str) -> Self {
        self.gender = normalize_column_name(name);
        self
    }

    pub fn disability_category(mut self, name: &str) -> Self {
        self.disability_category = normalize_column_name(name);
        self
    }

    pub fn period(mut self, name: &str) -> Self {
        self.period = normalize_column_name(name);
        self
    }

    /// Label written into categorical cells that are missing or blank.
    /// Used verbatim, never title-cased.
    pub fn sentinel(mut self, label: &str) -> Self {
        self.sentinel = label.to_string();
        self
    }

    pub fn region_column(&self) -> &str {
        &self.region
    }

    pub fn sport_column(&self) -> &str {
        &self.sport
    }

    pub fn gender_column(&self) -> &str {
        &self.gender
    }

    pub fn disability_category_column(&self) -> &str {
        &self.disability_category
    }

    pub fn period_column(&self) -> &str {
        &self.period
    }

    pub fn sentinel_label(&self) -> &str {
        &self.sentinel
    }

    /// The four columns that are normalized and defaulted on load.
    pub fn categorical_columns(&self) -> [&str; 4] {
        [&self.region, &self.sport, &self.gender, &self.disability_category]
    }
}

impl Default for RosterSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Header normalization: surrounding whitespace removed, lower-cased.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Upper-cases every letter that follows a non-letter and lower-cases the rest.
///
/// `"dki  JAKARTA"` becomes `"Dki  Jakarta"`, `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_cased = false;
    for char in text.chars() {
        if previous_cased {
            result.extend(char.to_lowercase());
        } else {
            result.extend(char.to_uppercase());
        }
        previous_cased = char.is_lowercase() || char.is_uppercase();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("jakarta pusat"), "Jakarta Pusat");
        assert_eq!(title_case("BULU TANGKIS"), "Bulu Tangkis");
        assert_eq!(title_case("tuna-netra"), "Tuna-Netra");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case("kelas 3a"), "Kelas 3A");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn column_names_are_normalized() {
        assert_eq!(normalize_column_name("  Wilayah_Domisili "), "wilayah_domisili");

        let schema = RosterSchema::new().region(" Kota ").period("TAHUN");
        assert_eq!(schema.region_column(), "kota");
        assert_eq!(schema.period_column(), "tahun");
        assert_eq!(schema.sentinel_label(), DEFAULT_SENTINEL);
        assert_eq!(
            schema.categorical_columns(),
            ["kota", "cabang_olahraga", "jenis_kelamin", "kategori_ketunaan"]
        );
    }

    #[test]
    fn sentinel_is_kept_verbatim() {
        let schema = RosterSchema::new().sentinel("unknown");
        assert_eq!(schema.sentinel_label(), "unknown");
    }
}
