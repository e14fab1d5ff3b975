// Data Loader - daily bike rental table
// CSV -> sorted, validated in-memory records
//
// The table is loaded once at startup and never written back.

use crate::error::LoadError;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns every dataset must carry
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "dteday",
    "season",
    "weathersit",
    "holiday",
    "workingday",
    "casual",
    "cnt",
];

// ============================================================================
// CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Display order used by every chart
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Fall),
            4 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Human label for a `weathersit` code
pub fn weather_label(code: u8) -> &'static str {
    match code {
        1 => "Clear",
        2 => "Mist / Cloudy",
        3 => "Light Snow / Rain",
        4 => "Heavy Rain / Ice",
        _ => "Unknown",
    }
}

// ============================================================================
// RENTAL RECORD
// ============================================================================

/// One calendar day of rentals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weather: u8,
    pub holiday: bool,
    pub working_day: bool,
    /// Casual rider count, also the customer key for segmentation
    pub casual: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered: Option<u32>,
    pub total: u32,
}

impl RentalRecord {
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// Row as it appears in the CSV. Everything stays textual so that each
/// failure can be reported with its column and line.
#[derive(Debug, Deserialize)]
struct RawRentalRow {
    #[serde(rename = "dteday")]
    date: String,
    season: String,
    #[serde(rename = "weathersit")]
    weather: String,
    holiday: String,
    #[serde(rename = "workingday")]
    working_day: String,
    casual: String,
    #[serde(default)]
    registered: Option<String>,
    #[serde(rename = "cnt")]
    total: String,
}

impl RawRentalRow {
    fn into_record(self, line: usize) -> Result<RentalRecord, LoadError> {
        let date = parse_date(&self.date).ok_or_else(|| LoadError::InvalidDate {
            line,
            value: self.date.clone(),
        })?;

        let season_code = parse_count(&self.season, "season", line)?;
        let season = u8::try_from(season_code)
            .ok()
            .and_then(Season::from_code)
            .ok_or_else(|| invalid(line, "season", &self.season))?;

        let weather = parse_count(&self.weather, "weathersit", line)?;
        let weather = match u8::try_from(weather) {
            Ok(code @ 1..=4) => code,
            _ => return Err(invalid(line, "weathersit", &self.weather)),
        };

        let registered = match self.registered.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(parse_count(value, "registered", line)?),
        };

        Ok(RentalRecord {
            date,
            season,
            weather,
            holiday: parse_flag(&self.holiday, "holiday", line)?,
            working_day: parse_flag(&self.working_day, "workingday", line)?,
            casual: parse_count(&self.casual, "casual", line)?,
            registered,
            total: parse_count(&self.total, "cnt", line)?,
        })
    }
}

fn invalid(line: usize, column: &'static str, value: &str) -> LoadError {
    LoadError::InvalidField {
        line,
        column,
        value: value.to_string(),
    }
}

/// Parse a date cell. Accepts `2011-01-01`, `01/31/2011` and a full
/// `2011-01-01 00:00:00` timestamp (date part only).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn parse_count(value: &str, column: &'static str, line: usize) -> Result<u32, LoadError> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<u32>() {
        return Ok(n);
    }

    // Exported tables sometimes write integers as floats ("331.0")
    match trimmed.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err(invalid(line, column, value)),
    }
}

fn parse_flag(value: &str, column: &'static str, line: usize) -> Result<bool, LoadError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" => Ok(true),
        "0" | "0.0" | "false" | "no" => Ok(false),
        _ => Err(invalid(line, column, value)),
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// The loaded table: sorted ascending by date, one row per day, never empty
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<RentalRecord>,
}

impl Dataset {
    /// Build a dataset from already-parsed records
    pub fn from_records(mut records: Vec<RentalRecord>) -> Result<Self, LoadError> {
        if records.is_empty() {
            return Err(LoadError::Empty);
        }

        records.sort_by_key(|r| r.date);

        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(LoadError::DuplicateDate(pair[0].date));
        }

        Ok(Self { records })
    }

    /// Parse a CSV table from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(LoadError::MissingColumn(column.to_string()));
            }
        }

        let mut records = Vec::new();
        for (index, result) in rdr.records().enumerate() {
            let row = result?;
            let line = row
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(index + 2);
            let raw: RawRentalRow = row.deserialize(Some(&headers))?;
            records.push(raw.into_record(line)?);
        }

        Self::from_records(records)
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_date(&self) -> NaiveDate {
        self.records[0].date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.records[self.records.len() - 1].date
    }
}

/// Load the daily rental table from a CSV file
pub fn load_csv(csv_path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(csv_path).map_err(|source| LoadError::Io {
        path: csv_path.to_path_buf(),
        source,
    })?;

    let dataset = Dataset::from_reader(file)?;

    tracing::info!(
        path = %csv_path.display(),
        rows = dataset.len(),
        min_date = %dataset.min_date(),
        max_date = %dataset.max_date(),
        "dataset loaded"
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,casual,registered,cnt";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn test_load_sorts_by_date() {
        let csv = csv_with(&[
            "3,2011-01-03,1,0,1,0,1,1,1,0.19,120,1229,1349",
            "1,2011-01-01,1,0,1,0,6,0,2,0.34,331,654,985",
            "2,2011-01-02,1,0,1,0,0,0,2,0.36,131,670,801",
        ]);

        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.min_date(), NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(dataset.max_date(), NaiveDate::from_ymd_opt(2011, 1, 3).unwrap());
        assert_eq!(dataset.records()[0].casual, 331);
        assert_eq!(dataset.records()[0].registered, Some(654));
        assert!(!dataset.records()[0].working_day);
        assert!(dataset.records()[2].working_day);
    }

    #[test]
    fn test_missing_column_rejected() {
        let csv = "dteday,season,weathersit,holiday,workingday,casual\n2011-01-01,1,1,0,0,5";

        match Dataset::from_reader(csv.as_bytes()) {
            Err(LoadError::MissingColumn(column)) => assert_eq!(column, "cnt"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_date_reports_line() {
        let csv = csv_with(&[
            "1,2011-01-01,1,0,1,0,6,0,2,0.34,331,654,985",
            "2,not-a-date,1,0,1,0,0,0,2,0.36,131,670,801",
        ]);

        match Dataset::from_reader(csv.as_bytes()) {
            Err(LoadError::InvalidDate { line, value }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_season_rejected() {
        let csv = csv_with(&["1,2011-01-01,7,0,1,0,6,0,2,0.34,331,654,985"]);

        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(LoadError::InvalidField { column: "season", .. })
        ));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let csv = csv_with(&[
            "1,2011-01-01,1,0,1,0,6,0,2,0.34,331,654,985",
            "2,2011-01-01,1,0,1,0,0,0,2,0.36,131,670,801",
        ]);

        assert!(matches!(
            Dataset::from_reader(csv.as_bytes()),
            Err(LoadError::DuplicateDate(_))
        ));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            Dataset::from_reader(HEADER.as_bytes()),
            Err(LoadError::Empty)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_csv(Path::new("/nonexistent/day.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/day.csv"));
    }

    #[test]
    fn test_alternate_date_and_number_formats() {
        let csv = "dteday,season,weathersit,holiday,workingday,casual,cnt\n\
                   01/15/2012,4,3,true,false,12.0,200\n\
                   2012-01-16 00:00:00,4,1,0,1,40,900";

        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(dataset.min_date(), NaiveDate::from_ymd_opt(2012, 1, 15).unwrap());
        let first = &dataset.records()[0];
        assert_eq!(first.season, Season::Winter);
        assert_eq!(first.casual, 12);
        assert!(first.holiday);
        assert_eq!(first.registered, None);
    }

    #[test]
    fn test_season_codes_round_trip() {
        for season in Season::ALL {
            assert_eq!(Season::from_code(season.code()), Some(season));
        }
        assert_eq!(Season::from_code(0), None);
    }
}
