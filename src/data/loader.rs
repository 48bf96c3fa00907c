//! CSV Data Loader Module
//! Reads the ownership and city tables with Polars, converts them into typed
//! records and memoizes the joined table for the lifetime of the process.

use crate::config::DashboardConfig;
use crate::data::processor::DataProcessor;
use crate::data::records::{columns, CityRecord, JoinedTable, OwnershipRecord};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data unavailable: {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },
    #[error("Schema mismatch in {} (column '{column}'): {reason}", .path.display())]
    SchemaMismatch {
        path: PathBuf,
        column: String,
        reason: String,
    },
}

/// Loads both tables once and hands out the joined result.
pub struct DataLoader {
    cardata_path: PathBuf,
    city_path: PathBuf,
    table: OnceLock<JoinedTable>,
}

static SHARED: OnceLock<DataLoader> = OnceLock::new();

impl DataLoader {
    pub fn new(cardata_path: impl Into<PathBuf>, city_path: impl Into<PathBuf>) -> Self {
        Self {
            cardata_path: cardata_path.into(),
            city_path: city_path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(config.cardata_path(), config.city_path())
    }

    /// Process-wide loader. Only the first call's `config` is used; later
    /// calls get the same loader whatever config they pass. `DashboardApp`
    /// calls this once, from its loading thread.
    pub fn shared(config: &DashboardConfig) -> &'static DataLoader {
        SHARED.get_or_init(|| Self::from_config(config))
    }

    /// Return the joined table, reading and joining the files on first use only.
    pub fn load(&self) -> Result<&JoinedTable, LoadError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let table = self.load_uncached()?;
        Ok(self.table.get_or_init(|| table))
    }

    fn load_uncached(&self) -> Result<JoinedTable, LoadError> {
        let ownership = Self::load_ownership(&self.cardata_path)?;
        let cities = Self::load_cities(&self.city_path)?;
        log::info!(
            "Loaded {} ownership rows from {} and {} cities from {}",
            ownership.len(),
            self.cardata_path.display(),
            cities.len(),
            self.city_path.display()
        );

        let table = DataProcessor::left_join(&ownership, &cities);
        if table.unmatched_rows > 0 {
            log::warn!(
                "{} ownership rows have no matching city in {}",
                table.unmatched_rows,
                self.city_path.display()
            );
        }
        Ok(table)
    }

    /// Read the ownership table.
    pub fn load_ownership(path: &Path) -> Result<Vec<OwnershipRecord>, LoadError> {
        let df = read_csv(path)?;

        let city_ids = required(path, columns::CITY_ID, int_column(&df, path, columns::CITY_ID)?)?;
        let years = required(path, columns::YEAR, int_column(&df, path, columns::YEAR)?)?;
        let household_types = if has_column(&df, columns::HOUSEHOLD_TYPE) {
            str_column(&df, path, columns::HOUSEHOLD_TYPE)?
        } else {
            vec![None; df.height()]
        };
        let household_types_en = required(
            path,
            columns::HOUSEHOLD_TYPE_EN,
            str_column(&df, path, columns::HOUSEHOLD_TYPE_EN)?,
        )?;
        let percentages = float_column(&df, path, columns::HASCAR_PERC)?;

        city_ids
            .into_iter()
            .zip(years)
            .zip(household_types)
            .zip(household_types_en)
            .zip(percentages)
            .map(|((((city_id, year), household_type), household_type_en), hascar_perc)| {
                let year = i32::try_from(year).map_err(|_| LoadError::SchemaMismatch {
                    path: path.to_path_buf(),
                    column: columns::YEAR.to_string(),
                    reason: format!("year {year} out of range"),
                })?;
                Ok(OwnershipRecord {
                    city_id,
                    year,
                    household_type,
                    household_type_en,
                    hascar_perc,
                })
            })
            .collect()
    }

    /// Read the city table. City ids must be unique.
    pub fn load_cities(path: &Path) -> Result<Vec<CityRecord>, LoadError> {
        let df = read_csv(path)?;

        let city_ids = required(path, columns::CITY_ID, int_column(&df, path, columns::CITY_ID)?)?;
        let names = str_column(&df, path, columns::CITY_NAME)?;
        let regions = str_column(&df, path, columns::REGION)?;
        let densities = float_column(&df, path, columns::POP_DENSITY)?;
        let prosperity = float_column(&df, path, columns::PROSPERITY)?;

        let mut seen = HashSet::with_capacity(city_ids.len());
        if let Some(dup) = city_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(LoadError::SchemaMismatch {
                path: path.to_path_buf(),
                column: columns::CITY_ID.to_string(),
                reason: format!("duplicate city id {dup}"),
            });
        }

        Ok(city_ids
            .into_iter()
            .zip(names)
            .zip(regions)
            .zip(densities)
            .zip(prosperity)
            .map(
                |((((city_id, name_nl), region), pop_per_km2), prosperity_index)| CityRecord {
                    city_id,
                    name_nl,
                    region,
                    pop_per_km2,
                    prosperity_index,
                },
            )
            .collect())
    }
}

fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
    if !path.is_file() {
        return Err(LoadError::DataUnavailable {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|e| LoadError::DataUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().iter().any(|c| c.as_str() == name)
}

fn mismatch(path: &Path, column: &str, reason: impl Into<String>) -> LoadError {
    LoadError::SchemaMismatch {
        path: path.to_path_buf(),
        column: column.to_string(),
        reason: reason.into(),
    }
}

fn column<'a>(df: &'a DataFrame, path: &Path, name: &str) -> Result<&'a Column, LoadError> {
    df.column(name).map_err(|_| mismatch(path, name, "column missing"))
}

/// Cast `name` to `dtype`. Values that only become null through the cast did
/// not parse.
fn cast_column(
    df: &DataFrame,
    path: &Path,
    name: &str,
    dtype: &DataType,
) -> Result<Column, LoadError> {
    let col = column(df, path, name)?;
    let cast = col
        .cast(dtype)
        .map_err(|e| mismatch(path, name, e.to_string()))?;
    if cast.null_count() > col.null_count() {
        return Err(mismatch(
            path,
            name,
            format!("{} value(s) are not of type {dtype}", cast.null_count() - col.null_count()),
        ));
    }
    Ok(cast)
}

fn int_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<i64>>, LoadError> {
    let dtype = column(df, path, name)?.dtype().clone();
    if dtype.is_float() {
        return Err(mismatch(path, name, format!("expected integers, found {dtype}")));
    }

    let cast = cast_column(df, path, name, &DataType::Int64)?;
    let ca = cast.i64().map_err(|e| mismatch(path, name, e.to_string()))?;
    Ok(ca.into_iter().collect())
}

fn float_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<f64>>, LoadError> {
    let cast = cast_column(df, path, name, &DataType::Float64)?;
    let ca = cast.f64().map_err(|e| mismatch(path, name, e.to_string()))?;
    // NaN and infinities count as missing
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|v| v.is_finite()))
        .collect())
}

fn str_column(df: &DataFrame, path: &Path, name: &str) -> Result<Vec<Option<String>>, LoadError> {
    let cast = cast_column(df, path, name, &DataType::String)?;
    let ca = cast.str().map_err(|e| mismatch(path, name, e.to_string()))?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
        .collect())
}

/// Key columns may not hold empty values.
fn required<T>(path: &Path, name: &str, values: Vec<Option<T>>) -> Result<Vec<T>, LoadError> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| mismatch(path, name, format!("empty value in row {}", row + 1))))
        .collect()
}
