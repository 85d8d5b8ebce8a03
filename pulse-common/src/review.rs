//! Aggregate review views for the admin dashboard
//!
//! All views take the oldest-first list returned by the store and derive
//! percentages through the triad transform, never from stored `analysis`.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::submission::{IdentityBreakdown, Submission, ValueBreakdown};
use crate::triad::{self, Point, CANVAS_SIZE};

/// Default heatmap resolution (cells per side)
pub const DEFAULT_HEATMAP_CELLS: usize = 10;

/// Everything the dashboard renders in one payload
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub summary: Summary,
    pub value_heatmap: Heatmap,
    pub identity_heatmap: Heatmap,
    pub timeline: Vec<TimelinePoint>,
}

impl Review {
    pub fn build(submissions: &[Submission], heatmap_cells: usize) -> Self {
        Self {
            summary: Summary::from_submissions(submissions),
            value_heatmap: Heatmap::from_points(submissions.iter().map(|s| s.value_triad), heatmap_cells),
            identity_heatmap: Heatmap::from_points(
                submissions.iter().map(|s| s.identity_triad),
                heatmap_cells,
            ),
            timeline: timeline(submissions),
        }
    }
}

/// Counts and means across all submissions
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub per_contributor: BTreeMap<String, usize>,
    /// Mean container / network / launchpad percentages; `None` when empty
    pub mean_values: Option<[f64; 3]>,
    /// Mean sanctuary / laboratory / guild percentages; `None` when empty
    pub mean_identity: Option<[f64; 3]>,
    pub mean_slider: Option<f64>,
}

impl Summary {
    pub fn from_submissions(submissions: &[Submission]) -> Self {
        let mut per_contributor = BTreeMap::new();
        let mut value_sums = [0.0; 3];
        let mut identity_sums = [0.0; 3];
        let mut slider_sum = 0.0;

        for s in submissions {
            *per_contributor.entry(s.name.clone()).or_insert(0) += 1;
            accumulate(&mut value_sums, triad::standard_percentages(s.value_triad));
            accumulate(&mut identity_sums, triad::standard_percentages(s.identity_triad));
            slider_sum += f64::from(s.university_startup_slider);
        }

        let total = submissions.len();
        let mean = |sum: f64| round_tenth(sum / total as f64);
        let (mean_values, mean_identity, mean_slider) = if total == 0 {
            (None, None, None)
        } else {
            (
                Some(value_sums.map(mean)),
                Some(identity_sums.map(mean)),
                Some(mean(slider_sum)),
            )
        };

        Self {
            total,
            per_contributor,
            mean_values,
            mean_identity,
            mean_slider,
        }
    }
}

fn accumulate(sums: &mut [f64; 3], percentages: [u32; 3]) {
    for (sum, pct) in sums.iter_mut().zip(percentages) {
        *sum += f64::from(pct);
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Square grid of counts over the triad canvas
///
/// `cells[row][col]`, row 0 at the top of the canvas.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Heatmap {
    pub size: usize,
    pub cells: Vec<Vec<u32>>,
}

impl Heatmap {
    /// Bin points; anything off-canvas lands in the nearest border cell
    pub fn from_points<I>(points: I, size: usize) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let size = size.max(1);
        let mut cells = vec![vec![0u32; size]; size];
        for p in points {
            let (row, col) = (cell_index(p.y, size), cell_index(p.x, size));
            cells[row][col] += 1;
        }
        Self { size, cells }
    }

    pub fn total(&self) -> u32 {
        self.cells.iter().flatten().sum()
    }
}

fn cell_index(coordinate: f64, size: usize) -> usize {
    let scaled = (coordinate / CANVAS_SIZE * size as f64).floor();
    if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(size - 1)
    }
}

/// One point of the trend chart
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub id: String,
    pub timestamp: String,
    pub name: String,
    pub slider: u8,
    pub values: ValueBreakdown,
    pub identity: IdentityBreakdown,
}

/// Oldest-first trend series
pub fn timeline(submissions: &[Submission]) -> Vec<TimelinePoint> {
    submissions
        .iter()
        .map(|s| {
            let analysis = s.compute_analysis();
            TimelinePoint {
                id: s.id.clone(),
                timestamp: s.timestamp.clone(),
                name: s.name.clone(),
                slider: s.university_startup_slider,
                values: analysis.values,
                identity: analysis.identity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: &str, name: &str, value: Point, slider: u8) -> Submission {
        Submission {
            id: id.to_string(),
            name: name.to_string(),
            date: "2024-11-01T09:00".to_string(),
            narrative: "n".to_string(),
            value_triad: value,
            identity_triad: Point::new(250.0, 250.0),
            university_startup_slider: slider,
            timestamp: format!("2024-11-0{}T09:00:00.000Z", id),
            analysis: None,
        }
    }

    #[test]
    fn test_empty_summary_has_no_means() {
        let summary = Summary::from_submissions(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.per_contributor.is_empty());
        assert_eq!(summary.mean_values, None);
        assert_eq!(summary.mean_slider, None);
    }

    #[test]
    fn test_summary_means_and_counts() {
        let subs = vec![
            submission("1", "Anna", Point::new(250.0, 100.0), 0),
            submission("2", "Anna", Point::new(250.0, 250.0), 50),
            submission("3", "Matt", Point::new(250.0, 250.0), 100),
        ];
        let summary = Summary::from_submissions(&subs);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.per_contributor["Anna"], 2);
        assert_eq!(summary.per_contributor["Matt"], 1);
        // container: (100 + 33 + 33) / 3 = 55.33
        assert_eq!(summary.mean_values.unwrap()[0], 55.3);
        assert_eq!(summary.mean_identity.unwrap(), [33.0, 33.0, 33.0]);
        assert_eq!(summary.mean_slider, Some(50.0));
    }

    #[test]
    fn test_heatmap_bins_and_clamps() {
        let points = vec![
            Point::new(250.0, 250.0),
            Point::new(255.0, 260.0),
            Point::new(-40.0, 10.0),
            Point::new(500.0, 900.0),
        ];
        let map = Heatmap::from_points(points, 10);

        assert_eq!(map.total(), 4);
        assert_eq!(map.cells[5][5], 2);
        assert_eq!(map.cells[0][0], 1);
        assert_eq!(map.cells[9][9], 1);
    }

    #[test]
    fn test_timeline_preserves_order() {
        let subs = vec![
            submission("1", "Jane", Point::new(250.0, 100.0), 10),
            submission("2", "Jordi", Point::new(250.0, 250.0), 90),
        ];
        let series = timeline(&subs);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].id, "1");
        assert_eq!(series[0].values.container, 100);
        assert_eq!(series[1].slider, 90);
    }

    #[test]
    fn test_review_payload_shape() {
        let subs = vec![submission("1", "Jane", Point::new(250.0, 250.0), 10)];
        let review = Review::build(&subs, DEFAULT_HEATMAP_CELLS);
        let value = serde_json::to_value(&review).unwrap();

        assert_eq!(value["summary"]["total"], 1);
        assert_eq!(value["valueHeatmap"]["size"], 10);
        assert_eq!(value["timeline"][0]["name"], "Jane");
    }
}
