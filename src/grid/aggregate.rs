use serde::Serialize;

use crate::error::Result;
use super::coords::{to_key, Grid};
use super::types::{CellStats, Responses};

/// Discrete heatmap intensity tiers, ordered from empty to fullest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatBucket {
    /// Nobody available, or no respondents at all
    Empty,
    /// More than zero, under 20%
    Low,
    /// At least 20%
    Fair,
    /// At least 40%
    Medium,
    /// At least 60%
    High,
    /// At least 80%
    Full,
}

impl HeatBucket {
    /// Intensity level 0-5, for renderers that want a number
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// Counts the respondents available at one cell.
///
/// Users are listed in the iteration order of `responses`.
pub fn aggregate(responses: &Responses, column: &str, time: &str) -> CellStats {
    let key = to_key(column, time);
    let available_users: Vec<String> = responses
        .iter()
        .filter(|(_, availability)| availability.is_available(&key))
        .map(|(name, _)| name.clone())
        .collect();

    CellStats {
        count: available_users.len(),
        available_users,
    }
}

/// Classifies `count / total` into a heatmap tier.
///
/// Tier bounds are inclusive on the lower end. Compared in integer
/// arithmetic so that e.g. 4 of 5 lands exactly on the 80% tier.
pub fn heatmap_bucket(count: usize, total: usize) -> HeatBucket {
    if total == 0 || count == 0 {
        return HeatBucket::Empty;
    }
    let scaled = count * 5;
    if scaled >= total * 4 {
        HeatBucket::Full
    } else if scaled >= total * 3 {
        HeatBucket::High
    } else if scaled >= total * 2 {
        HeatBucket::Medium
    } else if scaled >= total {
        HeatBucket::Fair
    } else {
        HeatBucket::Low
    }
}

/// Checks that every key marked available resolves against the grid.
///
/// A key left over from a different grid configuration would otherwise be
/// silently ignored and skew the counts.
pub fn validate_responses(grid: &Grid, responses: &Responses) -> Result<()> {
    for availability in responses.values() {
        for key in availability.selected_keys() {
            grid.to_coordinates(key)?;
        }
    }
    Ok(())
}

/// Everything a renderer needs for one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellView {
    pub key: String,
    pub column: String,
    pub time: String,
    pub count: usize,
    pub available_users: Vec<String>,
    pub unavailable_users: Vec<String>,
    pub bucket: HeatBucket,
}

/// Aggregates every cell of the grid in scan order
pub fn grid_summary(grid: &Grid, responses: &Responses) -> Result<Vec<CellView>> {
    validate_responses(grid, responses)?;
    let total = responses.len();

    let cells = grid
        .cells()
        .map(|(column, time)| {
            let stats = aggregate(responses, column, time);
            let unavailable_users = responses
                .keys()
                .filter(|name| !stats.available_users.contains(name))
                .cloned()
                .collect();
            CellView {
                key: to_key(column, time),
                column: column.to_string(),
                time: time.to_string(),
                count: stats.count,
                bucket: heatmap_bucket(stats.count, total),
                available_users: stats.available_users,
                unavailable_users,
            }
        })
        .collect();

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::types::Availability;
    use proptest::prelude::*;

    fn availability(keys: &[&str]) -> Availability {
        keys.iter().map(|k| (k.to_string(), true)).collect()
    }

    fn sample_responses() -> Responses {
        let mut responses = Responses::new();
        responses.insert("Alice".into(), availability(&["2024-06-03_09:00"]));
        responses.insert(
            "Bob".into(),
            availability(&["2024-06-03_09:00", "2024-06-03_09:30"]),
        );
        responses
    }

    #[test]
    fn test_aggregate_counts_and_users() {
        let stats = aggregate(&sample_responses(), "2024-06-03", "09:00");
        assert_eq!(stats.count, 2);
        assert_eq!(stats.available_users, vec!["Alice", "Bob"]);

        let stats = aggregate(&sample_responses(), "2024-06-04", "09:00");
        assert_eq!(stats.count, 0);
        assert!(stats.available_users.is_empty());
    }

    #[test]
    fn test_explicit_false_is_not_counted() {
        let mut responses = sample_responses();
        let mut carol = Availability::new();
        carol.set("2024-06-03_09:00", false);
        responses.insert("Carol".into(), carol);

        assert_eq!(aggregate(&responses, "2024-06-03", "09:00").count, 2);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(heatmap_bucket(0, 5), HeatBucket::Empty);
        assert_eq!(heatmap_bucket(0, 0), HeatBucket::Empty);
        assert_eq!(heatmap_bucket(1, 10), HeatBucket::Low);
        assert_eq!(heatmap_bucket(1, 5), HeatBucket::Fair);
        assert_eq!(heatmap_bucket(2, 5), HeatBucket::Medium);
        assert_eq!(heatmap_bucket(3, 5), HeatBucket::High);
        assert_eq!(heatmap_bucket(4, 5), HeatBucket::Full);
        assert_eq!(heatmap_bucket(5, 5), HeatBucket::Full);
        assert_eq!(heatmap_bucket(7, 10), HeatBucket::High);
    }

    #[test]
    fn test_summary_rejects_stale_keys() {
        let grid = Grid::new(vec!["2024-06-03".into()], vec!["09:00".into()]);
        let mut responses = Responses::new();
        responses.insert("Alice".into(), availability(&["2024-06-03_12:00"]));
        assert!(grid_summary(&grid, &responses).is_err());
    }

    #[test]
    fn test_summary_splits_users() {
        let grid = Grid::new(
            vec!["2024-06-03".into()],
            vec!["09:00".into(), "09:30".into()],
        );
        let cells = grid_summary(&grid, &sample_responses()).unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[1].key, "2024-06-03_09:30");
        assert_eq!(cells[1].available_users, vec!["Bob"]);
        assert_eq!(cells[1].unavailable_users, vec!["Alice"]);
        assert_eq!(cells[1].bucket, HeatBucket::Medium);
        assert_eq!(cells[0].bucket, HeatBucket::Full);
    }

    proptest! {
        #[test]
        fn bucket_is_monotonic(total in 1usize..50, a in 0usize..50, b in 0usize..50) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = lo.min(total);
            let hi = hi.min(total);
            prop_assert!(heatmap_bucket(lo, total) <= heatmap_bucket(hi, total));
        }

        #[test]
        fn zero_total_is_empty(count in 0usize..10) {
            prop_assert_eq!(heatmap_bucket(count, 0), HeatBucket::Empty);
        }

        #[test]
        fn count_matches_marks(marks in proptest::collection::vec(any::<bool>(), 0..12)) {
            let mut responses = Responses::new();
            for (i, mark) in marks.iter().enumerate() {
                let mut a = Availability::new();
                a.set("Monday_09:00", *mark);
                responses.insert(format!("user{}", i), a);
            }
            let stats = aggregate(&responses, "Monday", "09:00");
            prop_assert_eq!(stats.count, marks.iter().filter(|m| **m).count());
            prop_assert_eq!(stats.count, stats.available_users.len());
            prop_assert!(stats.count <= responses.len());
        }
    }
}
