// crates/nyc-taxi-core/src/validation.rs

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{Error, Result};

/// Column layout of the cleaned trips CSV and of the `trips` table, in order.
pub const EXPECTED_COLUMNS: [&str; 18] = [
    "pickup_datetime",
    "dropoff_datetime",
    "pickup_lat",
    "pickup_lon",
    "dropoff_lat",
    "dropoff_lon",
    "trip_distance_km",
    "trip_duration_sec",
    "fare_amount",
    "tip_amount",
    "passenger_count",
    "payment_type",
    "avg_speed_kmh",
    "fare_per_km",
    "pickup_hour",
    "weekday",
    "is_weekend",
    "haversine_km",
];

/// Reads the first record of a CSV file, trimming each field.
pub fn read_csv_header(csv_path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)?;

    let header = reader
        .records()
        .next()
        .ok_or_else(|| Error::EmptyCsv(csv_path.to_path_buf()))??;

    Ok(header.iter().map(|field| field.trim().to_string()).collect())
}

/// Order-sensitive comparison of a found header against the expected list.
///
/// On mismatch the error carries the expected names absent from `found` and
/// the found names absent from `expected`, each in its source order.
pub fn validate_header<S: AsRef<str>>(found: &[S], expected: &[&str]) -> Result<()> {
    let matches = found.len() == expected.len()
        && found.iter().zip(expected).all(|(f, e)| f.as_ref() == *e);
    if matches {
        return Ok(());
    }

    let found: Vec<String> = found.iter().map(|f| f.as_ref().to_string()).collect();
    let missing = expected
        .iter()
        .filter(|column| !found.iter().any(|f| f == *column))
        .map(|column| column.to_string())
        .collect();
    let extra = found
        .iter()
        .filter(|column| !expected.contains(&column.as_str()))
        .cloned()
        .collect();

    Err(Error::HeaderMismatch {
        expected: expected.iter().map(|column| column.to_string()).collect(),
        found,
        missing,
        extra,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn mismatch(found: &[&str]) -> (Vec<String>, Vec<String>) {
        match validate_header(found, &EXPECTED_COLUMNS) {
            Err(Error::HeaderMismatch { missing, extra, .. }) => (missing, extra),
            other => panic!("expected header mismatch, got {other:?}"),
        }
    }

    #[test]
    fn exact_header_passes() {
        assert!(validate_header(&EXPECTED_COLUMNS, &EXPECTED_COLUMNS).is_ok());

        let owned: Vec<String> = EXPECTED_COLUMNS.iter().map(|c| c.to_string()).collect();
        assert!(validate_header(&owned, &EXPECTED_COLUMNS).is_ok());
    }

    #[test]
    fn reordered_header_fails_with_empty_sets() {
        let mut found = EXPECTED_COLUMNS;
        found.swap(0, 1);

        let (missing, extra) = mismatch(&found);
        assert!(missing.is_empty());
        assert!(extra.is_empty());
    }

    #[test]
    fn truncated_header_lists_sixteen_missing() {
        let (missing, extra) = mismatch(&["pickup_datetime", "dropoff_datetime"]);

        assert_eq!(missing.len(), 16);
        assert_eq!(missing, EXPECTED_COLUMNS[2..].to_vec());
        assert!(extra.is_empty());
    }

    #[test]
    fn added_column_is_reported_as_extra() {
        let mut found = EXPECTED_COLUMNS.to_vec();
        found.push("vendor_id");

        let (missing, extra) = mismatch(&found);
        assert!(missing.is_empty());
        assert_eq!(extra, vec!["vendor_id".to_string()]);
    }

    #[test]
    fn renamed_column_is_both_missing_and_extra() {
        let mut found = EXPECTED_COLUMNS.to_vec();
        found[8] = "fare";

        let (missing, extra) = mismatch(&found);
        assert_eq!(missing, vec!["fare_amount".to_string()]);
        assert_eq!(extra, vec!["fare".to_string()]);
    }

    #[test]
    fn duplicated_column_fails_even_when_sets_agree() {
        let mut found = EXPECTED_COLUMNS.to_vec();
        found.push("weekday");

        let (missing, extra) = mismatch(&found);
        assert!(missing.is_empty());
        assert!(extra.is_empty());
    }

    #[test]
    fn mismatch_message_lists_both_sets() {
        let err = validate_header(&["pickup_datetime", "bogus"], &EXPECTED_COLUMNS)
            .expect_err("mismatch");
        let message = err.to_string();
        assert!(message.contains("Missing: ["));
        assert!(message.contains("Extra: [\"bogus\"]"));
    }

    #[test]
    fn header_fields_are_trimmed() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, " pickup_datetime , dropoff_datetime").expect("write");
        writeln!(file, "2016-01-01 00:00:00,2016-01-01 00:10:00").expect("write");

        let header = read_csv_header(file.path()).expect("header");
        assert_eq!(header, vec!["pickup_datetime", "dropoff_datetime"]);
    }

    #[test]
    fn empty_file_has_no_header() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let err = read_csv_header(file.path()).expect_err("empty csv");
        assert!(matches!(err, Error::EmptyCsv(_)), "unexpected error: {err:?}");
    }
}
