//! Data Processor Module
//! Joins ownership rows onto cities and aggregates filtered rows per household type.

use crate::data::records::{AggregateRow, CityRecord, JoinedRecord, JoinedTable, OwnershipRecord};
use std::collections::{BTreeMap, HashMap};

/// Stateless join and aggregation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Left join on city id. Produces exactly one row per ownership row, in
    /// ownership order.
    pub fn left_join(ownership: &[OwnershipRecord], cities: &[CityRecord]) -> JoinedTable {
        let by_id: HashMap<i64, &CityRecord> = cities.iter().map(|c| (c.city_id, c)).collect();

        let mut unmatched = 0;
        let rows = ownership
            .iter()
            .map(|o| {
                let city = by_id.get(&o.city_id).copied();
                if city.is_none() {
                    unmatched += 1;
                }
                JoinedRecord::from_parts(o, city)
            })
            .collect();

        JoinedTable::new(rows, unmatched)
    }

    /// Mean ownership percentage per household type, sorted by label.
    ///
    /// Rows without a percentage are left out of the mean. A household type
    /// whose rows all lack one is still listed, with no mean.
    pub fn mean_by_household_type<'a, I>(rows: I) -> Vec<AggregateRow>
    where
        I: IntoIterator<Item = &'a JoinedRecord>,
    {
        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

        for row in rows {
            let entry = groups.entry(row.household_type_en.as_str()).or_insert((0.0, 0));
            if let Some(v) = row.hascar_perc {
                entry.0 += v;
                entry.1 += 1;
            }
        }

        groups
            .into_iter()
            .map(|(label, (sum, count))| AggregateRow {
                household_type_en: label.to_string(),
                mean_hascar_perc: (count > 0).then(|| sum / count as f64),
                count,
            })
            .collect()
    }
}
