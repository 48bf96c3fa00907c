//! Chart series built from filtered rows, shared by the interactive and PNG charts.

use crate::data::{columns, JoinedRecord};

/// Region colour palette (RGB)
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (121, 85, 72),   // Brown
];

pub fn palette_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// Which city attribute a scatter chart puts on the x-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    PopulationDensity,
    ProsperityIndex,
}

impl XAxis {
    pub fn column(self) -> &'static str {
        match self {
            XAxis::PopulationDensity => columns::POP_DENSITY,
            XAxis::ProsperityIndex => columns::PROSPERITY,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            XAxis::PopulationDensity => "Car Ownership vs Population Density",
            XAxis::ProsperityIndex => "Prosperity Index vs Car Ownership",
        }
    }

    pub fn value(self, row: &JoinedRecord) -> Option<f64> {
        match self {
            XAxis::PopulationDensity => row.pop_per_km2,
            XAxis::ProsperityIndex => row.prosperity_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub city_name: String,
    pub x: f64,
    pub y: f64,
}

/// Points of one region, drawn in one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub region: String,
    /// Position of the region in the full region list, so colours stay put while filtering
    pub color_index: usize,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    /// Group rows by region. Rows missing a region, x or y value are skipped.
    pub fn build(rows: &[&JoinedRecord], axis: XAxis, all_regions: &[String]) -> Vec<ScatterSeries> {
        let mut series: Vec<ScatterSeries> = all_regions
            .iter()
            .enumerate()
            .map(|(color_index, region)| ScatterSeries {
                region: region.clone(),
                color_index,
                points: Vec::new(),
            })
            .collect();

        for row in rows {
            let (Some(region), Some(x), Some(y)) = (&row.region, axis.value(row), row.hascar_perc)
            else {
                continue;
            };
            if let Some(s) = series.iter_mut().find(|s| &s.region == region) {
                s.points.push(ScatterPoint {
                    city_name: row.name_nl.clone().unwrap_or_default(),
                    x,
                    y,
                });
            }
        }

        series.retain(|s| !s.points.is_empty());
        series
    }

    /// Point closest to (x, y), used to resolve hover tooltips.
    pub fn nearest(&self, x: f64, y: f64) -> Option<&ScatterPoint> {
        self.points.iter().min_by(|a, b| {
            let da = (a.x - x).powi(2) + (a.y - y).powi(2);
            let db = (b.x - x).powi(2) + (b.y - y).powi(2);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn tooltip(&self, point: &ScatterPoint, axis: XAxis) -> String {
        format!(
            "{}\n{}: {}\n{}: {}\n{}: {}",
            point.city_name,
            axis.column(),
            point.x,
            columns::HASCAR_PERC,
            point.y,
            columns::REGION,
            self.region
        )
    }
}

/// Padded (x, y) ranges covering every point, with a fallback for empty charts.
pub fn scatter_bounds(series: &[ScatterSeries]) -> ((f64, f64), (f64, f64)) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for p in series.iter().flat_map(|s| &s.points) {
        x = (x.0.min(p.x), x.1.max(p.x));
        y = (y.0.min(p.y), y.1.max(p.y));
    }
    if x.0.is_infinite() {
        return ((0.0, 1.0), (0.0, 100.0));
    }
    (pad(x), pad(y))
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, region: Option<&str>, density: Option<f64>, perc: Option<f64>) -> JoinedRecord {
        JoinedRecord {
            city_id: 1,
            year: 2020,
            household_type: None,
            household_type_en: "single".to_string(),
            hascar_perc: perc,
            name_nl: Some(name.to_string()),
            region: region.map(str::to_string),
            pop_per_km2: density,
            prosperity_index: Some(100.0),
        }
    }

    fn regions() -> Vec<String> {
        vec!["Antwerpen".to_string(), "Limburg".to_string(), "Namur".to_string()]
    }

    #[test]
    fn test_series_grouped_by_region() {
        let rows = [
            row("Antwerpen", Some("Antwerpen"), Some(2500.0), Some(62.5)),
            row("Hasselt", Some("Limburg"), Some(785.0), Some(91.0)),
            row("Genk", Some("Limburg"), Some(750.0), Some(88.0)),
        ];
        let refs: Vec<&JoinedRecord> = rows.iter().collect();

        let series = ScatterSeries::build(&refs, XAxis::PopulationDensity, &regions());

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].region, "Antwerpen");
        assert_eq!(series[0].color_index, 0);
        assert_eq!(series[1].region, "Limburg");
        assert_eq!(series[1].color_index, 1);
        assert_eq!(series[1].points.len(), 2);
        assert_eq!(series[1].points[1].city_name, "Genk");
    }

    #[test]
    fn test_incomplete_rows_are_skipped() {
        let rows = [
            row("Nowhere", None, Some(100.0), Some(50.0)),
            row("Hasselt", Some("Limburg"), None, Some(91.0)),
            row("Genk", Some("Limburg"), Some(750.0), None),
        ];
        let refs: Vec<&JoinedRecord> = rows.iter().collect();

        assert!(ScatterSeries::build(&refs, XAxis::PopulationDensity, &regions()).is_empty());
    }

    #[test]
    fn test_prosperity_axis_uses_prosperity_index() {
        let rows = [row("Namen", Some("Namur"), Some(635.0), Some(58.0))];
        let refs: Vec<&JoinedRecord> = rows.iter().collect();

        let series = ScatterSeries::build(&refs, XAxis::ProsperityIndex, &regions());
        assert_eq!(series[0].points[0].x, 100.0);
        assert_eq!(series[0].color_index, 2);
    }

    #[test]
    fn test_nearest_and_tooltip() {
        let rows = [
            row("Hasselt", Some("Limburg"), Some(785.0), Some(91.0)),
            row("Genk", Some("Limburg"), Some(750.0), Some(88.0)),
        ];
        let refs: Vec<&JoinedRecord> = rows.iter().collect();
        let series = ScatterSeries::build(&refs, XAxis::PopulationDensity, &regions());

        let hit = series[0].nearest(751.0, 88.2).unwrap();
        assert_eq!(hit.city_name, "Genk");

        let text = series[0].tooltip(hit, XAxis::PopulationDensity);
        assert_eq!(
            text,
            "Genk\npop_per_km2: 750\nhousehold_hascar_perc_of_total: 88\nprovince_or_region: Limburg"
        );
    }

    #[test]
    fn test_bounds() {
        assert_eq!(scatter_bounds(&[]), ((0.0, 1.0), (0.0, 100.0)));

        let rows = [
            row("Hasselt", Some("Limburg"), Some(100.0), Some(40.0)),
            row("Genk", Some("Limburg"), Some(200.0), Some(60.0)),
        ];
        let refs: Vec<&JoinedRecord> = rows.iter().collect();
        let series = ScatterSeries::build(&refs, XAxis::PopulationDensity, &regions());
        let ((x0, x1), (y0, y1)) = scatter_bounds(&series);

        assert!(x0 < 100.0 && x1 > 200.0);
        assert!(y0 < 40.0 && y1 > 60.0);
    }
}
