use crate::error::AtletError;
use crate::roster::schema::DEFAULT_SENTINEL;
use crate::roster::Loader;
use crate::roster::RosterSchema;
use crate::service::AppState;
use crate::service::DEFAULT_TITLE;
use crate::spreadsheet::criteria::Criteria;
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serve the disabled-athlete roster as JSON and as a dashboard.
#[derive(Debug, Parser)]
#[command(name = "atlet-roster", version, about)]
pub struct Config {
    /// Roster workbook (.xlsx)
    #[arg(long, env = "ATLET_DATA_FILE", default_value = "data-atlet-disabilitas.xlsx")]
    pub data_file: PathBuf,

    /// Listen address
    #[arg(long, env = "ATLET_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Glob selecting the worksheet; the first sheet when omitted
    #[arg(long, env = "ATLET_SHEET")]
    pub sheet: Option<String>,

    /// Label for missing region, sport, gender and disability category
    #[arg(long, env = "ATLET_SENTINEL", default_value = DEFAULT_SENTINEL)]
    pub sentinel: String,

    #[arg(long, env = "ATLET_REGION_COLUMN")]
    pub region_column: Option<String>,

    #[arg(long, env = "ATLET_SPORT_COLUMN")]
    pub sport_column: Option<String>,

    #[arg(long, env = "ATLET_GENDER_COLUMN")]
    pub gender_column: Option<String>,

    #[arg(long, env = "ATLET_CATEGORY_COLUMN")]
    pub category_column: Option<String>,

    #[arg(long, env = "ATLET_PERIOD_COLUMN")]
    pub period_column: Option<String>,

    /// Dashboard heading
    #[arg(long, env = "ATLET_TITLE", default_value = DEFAULT_TITLE)]
    pub title: String,

    /// Write logs as JSON lines
    #[arg(long, env = "ATLET_LOG_JSON", value_parser = FalseyValueParser::new())]
    pub log_json: bool,
}

impl Config {
    pub fn schema(&self) -> RosterSchema {
        let mut schema = RosterSchema::new().sentinel(&self.sentinel);
        if let Some(name) = &self.region_column {
            schema = schema.region(name);
        }
        if let Some(name) = &self.sport_column {
            schema = schema.sport(name);
        }
        if let Some(name) = &self.gender_column {
            schema = schema.gender(name);
        }
        if let Some(name) = &self.category_column {
            schema = schema.disability_category(name);
        }
        if let Some(name) = &self.period_column {
            schema = schema.period(name);
        }
        schema
    }

    /// # Errors
    ///
    /// Fails when `--sheet` is not a valid glob pattern.
    pub fn loader(&self) -> Result<Loader, AtletError> {
        let criteria = match &self.sheet {
            Some(pattern) => Criteria::with_sheet_pattern(pattern)?,
            None => Criteria::default(),
        };
        Ok(Loader::new(self.schema(), criteria))
    }

    pub fn app_state(&self) -> Result<AppState, AtletError> {
        Ok(AppState::new(self.loader()?, self.data_file.clone()).with_title(&self.title))
    }
}
