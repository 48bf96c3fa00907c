//! Region and year filtering of the joined table.

use crate::data::records::{JoinedRecord, JoinedTable};
use std::collections::BTreeSet;

/// Current selection of the dashboard controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub regions: BTreeSet<String>,
    /// Keep rows whose city was not found, and so carry no region
    pub include_unmatched: bool,
    /// Inclusive year bounds
    pub min_year: i32,
    pub max_year: i32,
}

impl FilterState {
    /// Every region, unmatched rows included, and the full observed year range.
    pub fn full(table: &JoinedTable) -> Self {
        let (min_year, max_year) = table.year_bounds.unwrap_or((0, 0));
        Self {
            regions: table.regions.iter().cloned().collect(),
            include_unmatched: true,
            min_year,
            max_year,
        }
    }

    pub fn matches(&self, row: &JoinedRecord) -> bool {
        let in_region = match &row.region {
            Some(r) => self.regions.contains(r),
            None => self.include_unmatched,
        };
        in_region && self.min_year <= row.year && row.year <= self.max_year
    }

    /// Rows passing both predicates, in table order.
    pub fn apply<'a>(&self, table: &'a JoinedTable) -> Vec<&'a JoinedRecord> {
        table.rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::processor::DataProcessor;
    use crate::data::records::{CityRecord, OwnershipRecord};

    fn sample_table() -> JoinedTable {
        let cities = vec![
            CityRecord {
                city_id: 11002,
                name_nl: Some("Antwerpen".to_string()),
                region: Some("Antwerpen".to_string()),
                pop_per_km2: Some(2500.0),
                prosperity_index: Some(105.0),
            },
            CityRecord {
                city_id: 71022,
                name_nl: Some("Hasselt".to_string()),
                region: Some("Limburg".to_string()),
                pop_per_km2: Some(785.0),
                prosperity_index: Some(108.0),
            },
            CityRecord {
                city_id: 92094,
                name_nl: Some("Namen".to_string()),
                region: Some("Namur".to_string()),
                pop_per_km2: Some(635.0),
                prosperity_index: Some(97.0),
            },
        ];
        let mut ownership = Vec::new();
        for year in 2018..=2022 {
            for (city_id, household, perc) in [
                (11002, "single", 62.5),
                (71022, "family", 91.0),
                (92094, "single", 58.0),
                (55555, "couple", 80.0),
            ] {
                ownership.push(OwnershipRecord {
                    city_id,
                    year,
                    household_type: None,
                    household_type_en: household.to_string(),
                    hascar_perc: Some(perc + f64::from(year - 2018)),
                });
            }
        }
        DataProcessor::left_join(&ownership, &cities)
    }

    fn state(regions: &[&str], min_year: i32, max_year: i32) -> FilterState {
        FilterState {
            regions: regions.iter().map(|r| r.to_string()).collect(),
            include_unmatched: false,
            min_year,
            max_year,
        }
    }

    #[test]
    fn test_example_row_kept_and_excluded() {
        let table = sample_table();

        let kept = state(&["Antwerpen"], 2020, 2020).apply(&table);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].city_id, 11002);
        assert_eq!(kept[0].year, 2020);
        assert_eq!(kept[0].hascar_perc, Some(64.5));

        let excluded = state(&["Limburg"], 2020, 2020).apply(&table);
        assert!(excluded.iter().all(|r| r.city_id != 11002));
    }

    #[test]
    fn test_full_state_reproduces_joined_table() {
        let table = sample_table();
        assert_eq!(table.unmatched_rows, 5);

        let full = FilterState::full(&table);
        assert_eq!(full.min_year, 2018);
        assert_eq!(full.max_year, 2022);
        assert_eq!(full.regions.len(), 3);
        assert!(full.include_unmatched);

        let filtered = full.apply(&table);
        assert_eq!(filtered.len(), table.row_count());
        assert!(filtered.iter().zip(&table.rows).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_unmatched_rows_follow_their_own_toggle() {
        let table = sample_table();

        let mut only_unmatched = state(&[], 2018, 2022);
        only_unmatched.include_unmatched = true;
        let filtered = only_unmatched.apply(&table);
        assert_eq!(filtered.len(), 5);
        assert!(filtered.iter().all(|r| r.city_id == 55555 && r.region.is_none()));

        let mut without_unmatched = FilterState::full(&table);
        without_unmatched.include_unmatched = false;
        let filtered = without_unmatched.apply(&table);
        assert_eq!(filtered.len(), table.row_count() - 5);
        assert!(filtered.iter().all(|r| r.region.is_some()));
    }

    #[test]
    fn test_no_regions_yields_nothing() {
        let table = sample_table();
        let filtered = state(&[], 2018, 2022).apply(&table);

        assert!(filtered.is_empty());
        assert!(DataProcessor::mean_by_household_type(filtered).is_empty());
    }

    #[test]
    fn test_degenerate_year_range_yields_nothing() {
        let table = sample_table();
        assert!(state(&["Antwerpen", "Limburg", "Namur"], 2021, 2019)
            .apply(&table)
            .is_empty());
    }

    #[test]
    fn test_filter_is_sound_and_complete() {
        let table = sample_table();
        let region_sets: [&[&str]; 4] = [
            &["Antwerpen"],
            &["Limburg", "Namur"],
            &["Namur", "Unknown"],
            &["Antwerpen", "Limburg", "Namur"],
        ];

        for regions in region_sets {
            for min_year in 2017..=2023 {
                for max_year in min_year..=2023 {
                    let filter = state(regions, min_year, max_year);
                    let filtered = filter.apply(&table);

                    for row in &filtered {
                        let region = row.region.as_deref().unwrap();
                        assert!(regions.contains(&region));
                        assert!(min_year <= row.year && row.year <= max_year);
                    }

                    let expected = table
                        .rows
                        .iter()
                        .filter(|r| {
                            r.region.as_deref().is_some_and(|g| regions.contains(&g))
                                && (min_year..=max_year).contains(&r.year)
                        })
                        .count();
                    assert_eq!(filtered.len(), expected);
                }
            }
        }
    }

    #[test]
    fn test_filter_preserves_order() {
        let table = sample_table();
        let filtered = state(&["Limburg", "Antwerpen"], 2019, 2021).apply(&table);

        let positions: Vec<usize> = filtered
            .iter()
            .map(|r| table.rows.iter().position(|t| std::ptr::eq(t, *r)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(filtered.len(), 6);
    }
}
