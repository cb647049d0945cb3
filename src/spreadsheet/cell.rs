use crate::roster::FieldValue;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeDelta;

/// Epoch used by numeric dates in a workbook.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum DateSystem {
    /// Serial 1 is 1900-01-01, with the Lotus 1-2-3 leap-year bug
    #[default]
    V1900,
    /// Serial 0 is 1904-01-01
    V1904,
}

/// Types of cell data found in xlsx worksheets.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values (`1`/`0`)
    Boolean,
    /// Plain numeric values
    Number,
    /// Numbers formatted as a date and time
    NumberDateTime(DateSystem),
    /// Numbers formatted as a date only
    NumberDate(DateSystem),
    /// Numbers formatted as a time of day
    NumberTime,
    /// ISO 8601 date/time strings (`t="d"`)
    IsoDateTime,
    /// Inline or formula string values
    InlineString,
    /// Index into the shared string table
    SharedString,
    /// Error values such as `#N/A`
    Error,
}

impl CellType {
    /// Cell type implied by a built-in number format id, if it is a date or time format.
    pub(crate) fn from_builtin_format(id: &str, system: DateSystem) -> Option<Self> {
        match id {
            "22" => Some(Self::NumberDateTime(system)),
            "14" | "15" | "16" | "17" => Some(Self::NumberDate(system)),
            "18" | "19" | "20" | "21" | "45" | "46" | "47" => Some(Self::NumberTime),
            _ => None,
        }
    }

    /// Cell type implied by a custom number format code.
    /// Quoted literals, escapes and bracketed sections (colors, conditions) are ignored.
    pub(crate) fn from_custom_format(format: &str, system: DateSystem) -> Self {
        let mut escaped = false;
        let mut literal = false;
        let mut bracket = false;
        let mut has_date = false;
        let mut has_time = false;
        for character in format.chars() {
            match character {
                _ if escaped => escaped = false,
                '_' | '\\' => escaped = true,
                '"' if !bracket => literal = !literal,
                _ if literal => (),
                '[' => bracket = true,
                ']' => bracket = false,
                _ if bracket => (),
                'Y' | 'y' | 'D' | 'd' => has_date = true,
                'H' | 'h' | 'S' | 's' => has_time = true,
                _ => (),
            }
        }

        match (has_date, has_time) {
            (true, true) => Self::NumberDateTime(system),
            (true, false) => Self::NumberDate(system),
            (false, true) => Self::NumberTime,
            (false, false) => Self::Number,
        }
    }
}

/// A single non-empty worksheet cell.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    pub(crate) kind: CellType,
    /// Raw value text; shared strings are already resolved
    pub(crate) value: String,
}

impl Cell {
    /// Converts the raw cell to a roster value.
    ///
    /// Numbers that do not parse and error cells read as `Null`; numeric dates become
    /// ISO text so that the period column can still be searched for a year.
    pub(crate) fn to_field_value(&self) -> FieldValue {
        match self.kind {
            CellType::Empty | CellType::Error => FieldValue::Null,
            CellType::Boolean => FieldValue::Bool(self.value.trim() == "1" || self.value.eq_ignore_ascii_case("true")),
            CellType::Number => match self.value.trim().parse::<f64>() {
                Ok(number) if number.is_finite() => FieldValue::Number(number),
                _ => FieldValue::Null,
            },
            CellType::NumberDate(system) => match self.serial().and_then(|serial| serial_to_date(serial, system)) {
                Some(date) => FieldValue::Text(date.format("%Y-%m-%d").to_string()),
                None => FieldValue::Null,
            },
            CellType::NumberDateTime(system) => match self.serial().and_then(|serial| serial_to_datetime(serial, system)) {
                Some(datetime) => FieldValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => FieldValue::Null,
            },
            CellType::NumberTime => match self.serial() {
                Some(serial) => FieldValue::Text(fraction_to_time(serial)),
                None => FieldValue::Null,
            },
            CellType::IsoDateTime => FieldValue::Text(self.value.replace('T', " ")),
            CellType::InlineString | CellType::SharedString => FieldValue::Text(self.value.to_owned()),
        }
    }

    fn serial(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|serial| serial.is_finite() && *serial >= 0.0)
    }
}

/// Converts a serial day number to a calendar date, `None` past chrono's range.
fn serial_to_date(serial: f64, system: DateSystem) -> Option<NaiveDate> {
    let days = serial.trunc() as i64;
    let offset = match system {
        DateSystem::V1904 => 1_462,
        // Serials before 1900-03-01 sit before the phantom 1900-02-29
        DateSystem::V1900 if days < 60 => 1,
        DateSystem::V1900 => 0,
    };
    base_date().checked_add_signed(TimeDelta::try_days(days.checked_add(offset)?)?)
}

fn serial_to_datetime(serial: f64, system: DateSystem) -> Option<NaiveDateTime> {
    let date = serial_to_date(serial, system)?;
    let seconds = (serial.fract() * 86_400f64).round() as i64;
    date.and_hms_opt(0, 0, 0)?.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// Formats the fractional part of a serial as `HH:MM:SS`.
fn fraction_to_time(serial: f64) -> String {
    let mut seconds = (serial.fract() * 86_400f64).round() as i64;
    if seconds >= 86_400 {
        seconds = 0;
    }
    format!("{:02}:{:02}:{:02}", seconds / 3_600, seconds / 60 % 60, seconds % 60)
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(kind: CellType, value: &str) -> Cell {
        Cell {
            row: 1,
            col: 2,
            kind,
            value: value.to_owned(),
        }
    }

    #[test]
    fn custom_formats_detect_dates() {
        assert_eq!(CellType::from_custom_format("yyyy-mm-dd", DateSystem::V1900), CellType::NumberDate(DateSystem::V1900));
        assert_eq!(CellType::from_custom_format("dd/mm/yyyy hh:mm", DateSystem::V1904), CellType::NumberDateTime(DateSystem::V1904));
        assert_eq!(CellType::from_custom_format("h:mm:ss", DateSystem::V1900), CellType::NumberTime);
        assert_eq!(CellType::from_custom_format("#,##0.00", DateSystem::V1900), CellType::Number);
        assert_eq!(CellType::from_custom_format("[Red]0.0\"days\"", DateSystem::V1900), CellType::Number);
    }

    #[test]
    fn builtin_formats() {
        assert_eq!(CellType::from_builtin_format("14", DateSystem::V1900), Some(CellType::NumberDate(DateSystem::V1900)));
        assert_eq!(CellType::from_builtin_format("22", DateSystem::V1904), Some(CellType::NumberDateTime(DateSystem::V1904)));
        assert_eq!(CellType::from_builtin_format("0", DateSystem::V1900), None);
    }

    #[test]
    fn numeric_dates_render_as_iso_text() {
        assert_eq!(cell(CellType::NumberDate(DateSystem::V1900), "44197").to_field_value(), FieldValue::Text("2021-01-01".to_owned()));
        assert_eq!(cell(CellType::NumberDate(DateSystem::V1904), "42735").to_field_value(), FieldValue::Text("2021-01-01".to_owned()));
        assert_eq!(
            cell(CellType::NumberDateTime(DateSystem::V1900), "44197.5").to_field_value(),
            FieldValue::Text("2021-01-01 12:00:00".to_owned())
        );
        assert_eq!(cell(CellType::NumberTime, "0.75").to_field_value(), FieldValue::Text("18:00:00".to_owned()));
    }

    #[test]
    fn out_of_range_serials_read_as_null() {
        assert_eq!(cell(CellType::NumberDate(DateSystem::V1900), "100000000").to_field_value(), FieldValue::Null);
        assert_eq!(cell(CellType::NumberDateTime(DateSystem::V1904), "100000000.5").to_field_value(), FieldValue::Null);
        assert_eq!(cell(CellType::NumberDate(DateSystem::V1900), "1e300").to_field_value(), FieldValue::Null);
    }

    #[test]
    fn scalar_values() {
        assert_eq!(cell(CellType::Number, "2019").to_field_value(), FieldValue::Number(2019.0));
        assert_eq!(cell(CellType::Number, "abc").to_field_value(), FieldValue::Null);
        assert_eq!(cell(CellType::Boolean, "1").to_field_value(), FieldValue::Bool(true));
        assert_eq!(cell(CellType::Error, "#N/A").to_field_value(), FieldValue::Null);
        assert_eq!(cell(CellType::IsoDateTime, "2020-05-01T00:00:00").to_field_value(), FieldValue::Text("2020-05-01 00:00:00".to_owned()));
        assert_eq!(cell(CellType::SharedString, "Renang").to_field_value(), FieldValue::Text("Renang".to_owned()));
    }
}
