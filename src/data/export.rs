//! CSV export of the filtered table.

use crate::data::records::{columns, JoinedRecord};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Build a DataFrame with the joined columns, in input column naming.
pub fn to_dataframe(rows: &[&JoinedRecord]) -> Result<DataFrame, ExportError> {
    let df = DataFrame::new(vec![
        Column::new(
            columns::CITY_ID.into(),
            rows.iter().map(|r| r.city_id).collect::<Vec<i64>>(),
        ),
        Column::new(
            columns::YEAR.into(),
            rows.iter().map(|r| r.year).collect::<Vec<i32>>(),
        ),
        Column::new(
            columns::HOUSEHOLD_TYPE.into(),
            rows.iter()
                .map(|r| r.household_type.clone())
                .collect::<Vec<Option<String>>>(),
        ),
        Column::new(
            columns::HOUSEHOLD_TYPE_EN.into(),
            rows.iter()
                .map(|r| r.household_type_en.clone())
                .collect::<Vec<String>>(),
        ),
        Column::new(
            columns::HASCAR_PERC.into(),
            rows.iter().map(|r| r.hascar_perc).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            columns::CITY_NAME.into(),
            rows.iter().map(|r| r.name_nl.clone()).collect::<Vec<Option<String>>>(),
        ),
        Column::new(
            columns::REGION.into(),
            rows.iter().map(|r| r.region.clone()).collect::<Vec<Option<String>>>(),
        ),
        Column::new(
            columns::POP_DENSITY.into(),
            rows.iter().map(|r| r.pop_per_km2).collect::<Vec<Option<f64>>>(),
        ),
        Column::new(
            columns::PROSPERITY.into(),
            rows.iter()
                .map(|r| r.prosperity_index)
                .collect::<Vec<Option<f64>>>(),
        ),
    ])?;
    Ok(df)
}

/// Write rows to `path` as CSV with a header row.
pub fn write_csv(rows: &[&JoinedRecord], path: &Path) -> Result<(), ExportError> {
    let mut df = to_dataframe(rows)?;
    let mut file = File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DataLoader;

    fn row(city_id: i64, region: Option<&str>, perc: Option<f64>) -> JoinedRecord {
        JoinedRecord {
            city_id,
            year: 2021,
            household_type: Some("koppel".to_string()),
            household_type_en: "couple".to_string(),
            hascar_perc: perc,
            name_nl: region.map(|_| "Leuven".to_string()),
            region: region.map(str::to_string),
            pop_per_km2: region.map(|_| 1795.0),
            prosperity_index: region.map(|_| 118.0),
        }
    }

    #[test]
    fn test_dataframe_shape() {
        let a = row(24062, Some("Vlaams-Brabant"), Some(77.5));
        let b = row(12345, None, None);
        let df = to_dataframe(&[&a, &b]).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 9);
        assert_eq!(df.column(columns::REGION).unwrap().null_count(), 1);
        assert_eq!(df.column(columns::HASCAR_PERC).unwrap().null_count(), 1);
    }

    #[test]
    fn test_exported_file_reads_back_as_ownership_table() {
        let a = row(24062, Some("Vlaams-Brabant"), Some(77.5));
        let b = row(12345, None, Some(40.0));
        let path = std::env::temp_dir().join(format!(
            "car_dashboard_export_{}.csv",
            std::process::id()
        ));

        write_csv(&[&a, &b], &path).unwrap();
        let ownership = DataLoader::load_ownership(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ownership.len(), 2);
        assert_eq!(ownership[0].city_id, 24062);
        assert_eq!(ownership[0].hascar_perc, Some(77.5));
        assert_eq!(ownership[1].household_type.as_deref(), Some("koppel"));
    }
}
