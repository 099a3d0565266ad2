//! Data-loader collaborator.
//!
//! Populates the traffic-incident table the benchmarked queries run against.
//! This is deliberately decoupled from the harness: the harness only requires
//! that the table and columns referenced by the configured queries exist and
//! are populated, not that this loader produced them.
//!
//! Input is a delimiter-separated export (tab for `.tsv`, comma otherwise)
//! with a header row and 29 data columns. Malformed rows are skipped and
//! counted, never fatal.

use querybench_adapters::{open_connection, ConnectError};
use querybench_core::{DatabaseTarget, DriverKind};
use sqlx::Executor;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading incident data.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The target could not be connected to.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// The input file could not be read as delimited records.
    #[error("failed to read input file: {0}")]
    Csv(#[from] csv::Error),

    /// Table creation failed.
    #[error("failed to create table: {0}")]
    CreateTable(#[source] sqlx::Error),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Counts of imported and skipped rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Rows inserted.
    pub imported: u64,
    /// Rows rejected (short records, unreadable lines, insert failures).
    pub skipped: u64,
}

const CREATE_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS crash_data (
    id BIGINT PRIMARY KEY,
    crash_date VARCHAR(10),
    crash_time VARCHAR(5),
    borough VARCHAR(50),
    zip_code VARCHAR(10),
    latitude DOUBLE PRECISION,
    longitude DOUBLE PRECISION,
    location VARCHAR(100),
    on_street_name VARCHAR(100),
    cross_street_name VARCHAR(100),
    off_street_name VARCHAR(100),
    persons_injured INTEGER,
    persons_killed INTEGER,
    pedestrians_injured INTEGER,
    pedestrians_killed INTEGER,
    cyclists_injured INTEGER,
    cyclists_killed INTEGER,
    motorists_injured INTEGER,
    motorists_killed INTEGER,
    contributing_factor_1 VARCHAR(100),
    contributing_factor_2 VARCHAR(100),
    contributing_factor_3 VARCHAR(100),
    contributing_factor_4 VARCHAR(100),
    contributing_factor_5 VARCHAR(100),
    vehicle_type_1 VARCHAR(50),
    vehicle_type_2 VARCHAR(50),
    vehicle_type_3 VARCHAR(50),
    vehicle_type_4 VARCHAR(50),
    vehicle_type_5 VARCHAR(50)
)";

const COLUMNS: [&str; 29] = [
    "id",
    "crash_date",
    "crash_time",
    "borough",
    "zip_code",
    "latitude",
    "longitude",
    "location",
    "on_street_name",
    "cross_street_name",
    "off_street_name",
    "persons_injured",
    "persons_killed",
    "pedestrians_injured",
    "pedestrians_killed",
    "cyclists_injured",
    "cyclists_killed",
    "motorists_injured",
    "motorists_killed",
    "contributing_factor_1",
    "contributing_factor_2",
    "contributing_factor_3",
    "contributing_factor_4",
    "contributing_factor_5",
    "vehicle_type_1",
    "vehicle_type_2",
    "vehicle_type_3",
    "vehicle_type_4",
    "vehicle_type_5",
];

/// Create the `crash_data` table if absent and import the file into it.
pub async fn load_file(target: &DatabaseTarget, path: &Path) -> Result<LoadOutcome> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut conn = open_connection(target).await?;
    conn.execute(CREATE_TABLE_SQL)
        .await
        .map_err(LoaderError::CreateTable)?;

    let insert_sql = insert_statement(target.driver);
    let mut outcome = LoadOutcome {
        imported: 0,
        skipped: 0,
    };

    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(error = %err, "unreadable record");
                outcome.skipped += 1;
                continue;
            }
        };
        if record.len() < 29 {
            tracing::warn!(
                fields = record.len(),
                "record has insufficient columns, skipping"
            );
            outcome.skipped += 1;
            continue;
        }

        let field = |i: usize| record.get(i).unwrap_or("").trim();
        let query = sqlx::query(&insert_sql)
            .bind(parse_i64(field(23))) // collision id
            .bind(null_if_empty(field(0))) // crash_date
            .bind(null_if_empty(field(1))) // crash_time
            .bind(null_if_empty(field(2))) // borough
            .bind(null_if_empty(field(3))) // zip_code
            .bind(parse_f64(field(4))) // latitude
            .bind(parse_f64(field(5))) // longitude
            .bind(null_if_empty(field(6))) // location
            .bind(null_if_empty(field(7))) // on_street_name
            .bind(null_if_empty(field(8))) // cross_street_name
            .bind(null_if_empty(field(9))) // off_street_name
            .bind(parse_i32(field(10))) // persons_injured
            .bind(parse_i32(field(11))) // persons_killed
            .bind(parse_i32(field(12))) // pedestrians_injured
            .bind(parse_i32(field(13))) // pedestrians_killed
            .bind(parse_i32(field(14))) // cyclists_injured
            .bind(parse_i32(field(15))) // cyclists_killed
            .bind(parse_i32(field(16))) // motorists_injured
            .bind(parse_i32(field(17))) // motorists_killed
            .bind(null_if_empty(field(18))) // contributing_factor_1
            .bind(null_if_empty(field(19))) // contributing_factor_2
            .bind(null_if_empty(field(20))) // contributing_factor_3
            .bind(null_if_empty(field(21))) // contributing_factor_4
            .bind(null_if_empty(field(22))) // contributing_factor_5
            .bind(null_if_empty(field(24))) // vehicle_type_1
            .bind(null_if_empty(field(25))) // vehicle_type_2
            .bind(null_if_empty(field(26))) // vehicle_type_3
            .bind(null_if_empty(field(27))) // vehicle_type_4
            .bind(null_if_empty(field(28))); // vehicle_type_5

        match query.execute(&mut conn).await {
            Ok(_) => {
                outcome.imported += 1;
                if outcome.imported % 100 == 0 {
                    tracing::info!(imported = outcome.imported, "import progress");
                }
            }
            Err(err) => {
                outcome.skipped += 1;
                if outcome.skipped <= 5 {
                    tracing::warn!(error = %err, "row insert failed, skipping");
                }
            }
        }
    }

    tracing::info!(
        imported = outcome.imported,
        skipped = outcome.skipped,
        "import finished"
    );
    Ok(outcome)
}

/// Build the 29-column insert with the backend's placeholder syntax.
fn insert_statement(driver: DriverKind) -> String {
    let placeholders: Vec<String> = match driver {
        DriverKind::Postgres => (1..=COLUMNS.len()).map(|i| format!("${i}")).collect(),
        DriverKind::MySql | DriverKind::Sqlite => {
            std::iter::repeat("?".to_string()).take(COLUMNS.len()).collect()
        }
    };
    format!(
        "INSERT INTO crash_data ({}) VALUES ({})",
        COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

fn null_if_empty(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}

fn parse_f64(field: &str) -> Option<f64> {
    field.parse().ok()
}

fn parse_i64(field: &str) -> Option<i64> {
    field.parse().ok()
}

// Count columns default to 0, matching the source data's export convention.
fn parse_i32(field: &str) -> i32 {
    field.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_insert_statement_placeholders() {
        let sqlite = insert_statement(DriverKind::Sqlite);
        assert_eq!(sqlite.matches('?').count(), 29);

        let postgres = insert_statement(DriverKind::Postgres);
        assert!(postgres.contains("$1"));
        assert!(postgres.contains("$29"));
        assert!(!postgres.contains('?'));
    }

    #[test]
    fn test_field_parsing_helpers() {
        assert_eq!(null_if_empty(""), None);
        assert_eq!(null_if_empty("QUEENS"), Some("QUEENS".to_string()));
        assert_eq!(parse_f64("40.7"), Some(40.7));
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_i64("4491807"), Some(4491807));
        assert_eq!(parse_i32("3"), 3);
        assert_eq!(parse_i32("not a number"), 0);
    }

    fn incident_row(id: i64, borough: &str, killed: i32) -> String {
        let mut fields = vec![String::new(); 29];
        fields[0] = "01/15/2024".to_string();
        fields[1] = "14:30".to_string();
        fields[2] = borough.to_string();
        fields[3] = "11201".to_string();
        fields[4] = "40.694900".to_string();
        fields[5] = "-73.990000".to_string();
        fields[10] = "1".to_string();
        fields[11] = killed.to_string();
        fields[18] = "Driver Inattention".to_string();
        fields[23] = id.to_string();
        fields[24] = "Sedan".to_string();
        fields.join("\t")
    }

    #[tokio::test]
    async fn test_load_into_sqlite_skips_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("incidents.tsv");
        let mut file = std::fs::File::create(&data_path).unwrap();
        writeln!(file, "{}", vec!["header"; 29].join("\t")).unwrap();
        writeln!(file, "{}", incident_row(1, "QUEENS", 0)).unwrap();
        writeln!(file, "{}", incident_row(2, "BROOKLYN", 2)).unwrap();
        writeln!(file, "short\trow").unwrap();
        writeln!(file, "{}", incident_row(3, "BRONX", 1)).unwrap();
        writeln!(file, "{}", incident_row(3, "BRONX", 1)).unwrap(); // duplicate key
        drop(file);

        let url = format!("sqlite:{}?mode=rwc", dir.path().join("load.db").display());
        let target = DatabaseTarget::new("loader", DriverKind::Sqlite, &url, "", "");

        let outcome = load_file(&target, &data_path).await.unwrap();
        assert_eq!(outcome.imported, 3);
        assert_eq!(outcome.skipped, 2);

        let mut conn = open_connection(&target).await.unwrap();
        let rows = sqlx::query("SELECT id, borough, persons_killed FROM crash_data")
            .fetch_all(&mut conn)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }
}
