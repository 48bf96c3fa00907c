//! Typed rows for the ownership, city and joined tables.

/// CSV column names shared by the loader and the CSV export.
pub mod columns {
    pub const CITY_ID: &str = "city_id";
    pub const YEAR: &str = "cardata_year";
    pub const HOUSEHOLD_TYPE: &str = "household_type";
    pub const HOUSEHOLD_TYPE_EN: &str = "household_type_en";
    pub const HASCAR_PERC: &str = "household_hascar_perc_of_total";
    pub const CITY_NAME: &str = "city_name_nl";
    pub const REGION: &str = "province_or_region";
    pub const POP_DENSITY: &str = "pop_per_km2";
    pub const PROSPERITY: &str = "prosperity_index";
}

/// One city from the city table.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRecord {
    pub city_id: i64,
    pub name_nl: Option<String>,
    pub region: Option<String>,
    pub pop_per_km2: Option<f64>,
    pub prosperity_index: Option<f64>,
}

/// One (city, year, household type) row from the ownership table.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnershipRecord {
    pub city_id: i64,
    pub year: i32,
    pub household_type: Option<String>,
    pub household_type_en: String,
    pub hascar_perc: Option<f64>,
}

/// Ownership row with the matching city's attributes, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    pub city_id: i64,
    pub year: i32,
    pub household_type: Option<String>,
    pub household_type_en: String,
    pub hascar_perc: Option<f64>,
    pub name_nl: Option<String>,
    pub region: Option<String>,
    pub pop_per_km2: Option<f64>,
    pub prosperity_index: Option<f64>,
}

impl JoinedRecord {
    /// Combine an ownership row with its city. `None` leaves city fields unset.
    pub fn from_parts(ownership: &OwnershipRecord, city: Option<&CityRecord>) -> Self {
        Self {
            city_id: ownership.city_id,
            year: ownership.year,
            household_type: ownership.household_type.clone(),
            household_type_en: ownership.household_type_en.clone(),
            hascar_perc: ownership.hascar_perc,
            name_nl: city.and_then(|c| c.name_nl.clone()),
            region: city.and_then(|c| c.region.clone()),
            pop_per_km2: city.and_then(|c| c.pop_per_km2),
            prosperity_index: city.and_then(|c| c.prosperity_index),
        }
    }
}

/// Mean ownership percentage for one household type.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub household_type_en: String,
    /// `None` when no row in the group carried a percentage
    pub mean_hascar_perc: Option<f64>,
    /// Rows that contributed to the mean
    pub count: usize,
}

/// The joined table plus metadata the controls are built from.
#[derive(Debug, Clone, Default)]
pub struct JoinedTable {
    pub rows: Vec<JoinedRecord>,
    /// Distinct non-empty regions, sorted
    pub regions: Vec<String>,
    /// Observed (min, max) year, `None` for an empty table
    pub year_bounds: Option<(i32, i32)>,
    /// Ownership rows whose city was not found
    pub unmatched_rows: usize,
}

impl JoinedTable {
    pub fn new(rows: Vec<JoinedRecord>, unmatched_rows: usize) -> Self {
        let mut regions: Vec<String> = rows.iter().filter_map(|r| r.region.clone()).collect();
        regions.sort();
        regions.dedup();

        let year_bounds = rows.iter().map(|r| r.year).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });

        Self {
            rows,
            regions,
            year_bounds,
            unmatched_rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
