use super::{PartialResult, Result, StationMap};

/// Final mapping together with its keys in lexicographic order, so the
/// rendered output doesn't depend on scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub readings: StationMap,
    pub stations: Vec<String>,
}

/// Combines one result per worker into a single report.
///
/// The caller has already drained every worker through the join barrier, so
/// failing fast on the first error (in worker order) leaves no worker
/// blocked, and no partial aggregate escapes. Per-key combination is
/// associative and commutative, so the report is independent of the order
/// workers finished in.
pub fn merge(results: impl IntoIterator<Item = PartialResult>) -> Result<AggregateReport> {
    let mut readings = StationMap::new();
    for result in results {
        for (station, stats) in result? {
            match readings.get_mut(&station) {
                Some(merged) => merged.combine(&stats),
                None => {
                    readings.insert(station, stats);
                }
            }
        }
    }

    let mut stations: Vec<String> = readings.keys().cloned().collect();
    stations.sort_unstable();

    Ok(AggregateReport { readings, stations })
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::super::error::AggregationError;
    use super::super::{StationMap, Stats};
    use super::merge;

    fn readings(entries: &[(&str, Stats)]) -> StationMap {
        entries
            .iter()
            .map(|(station, stats)| (station.to_string(), stats.clone()))
            .collect()
    }

    fn stats(min: f64, max: f64, sum: f64, count: u64) -> Stats {
        Stats {
            min,
            max,
            sum,
            count,
        }
    }

    #[test]
    fn test_merge_combines_keys() {
        let a = readings(&[("X", stats(1.0, 3.0, 4.0, 2)), ("Y", stats(5.0, 5.0, 5.0, 1))]);
        let b = readings(&[("X", stats(-2.0, 2.0, 0.0, 3))]);
        let report = merge([Ok(a), Ok(b)]).unwrap();
        assert_eq!(report.stations, vec!["X", "Y"]);
        assert_eq!(report.readings["X"], stats(-2.0, 3.0, 4.0, 5));
        assert_eq!(report.readings["Y"], stats(5.0, 5.0, 5.0, 1));
    }

    #[test]
    fn test_merge_order_independent() {
        let parts = vec![
            readings(&[("A", stats(1.0, 1.0, 1.0, 1)), ("B", stats(2.0, 4.0, 6.0, 2))]),
            readings(&[("B", stats(-1.0, 0.0, -1.0, 2))]),
            readings(&[("A", stats(3.0, 3.0, 3.0, 1)), ("C", stats(0.5, 0.5, 0.5, 1))]),
        ];
        let reference = merge(parts.clone().into_iter().map(Ok)).unwrap();
        for permutation in parts.into_iter().permutations(3) {
            let report = merge(permutation.into_iter().map(Ok)).unwrap();
            assert_eq!(report, reference);
        }
    }

    #[test]
    fn test_merge_surfaces_first_error() {
        let results = vec![
            Ok(readings(&[("A", stats(1.0, 1.0, 1.0, 1))])),
            Err(AggregationError::Configuration("first".to_owned())),
            Err(AggregationError::Configuration("second".to_owned())),
        ];
        match merge(results) {
            Err(AggregationError::Configuration(msg)) => assert_eq!(msg, "first"),
            other => panic!("Expected the first error, got {:?}", other),
        }
    }

    #[test]
    fn test_merge_empty_parts() {
        let report = merge([Ok(StationMap::new()), Ok(StationMap::new())]).unwrap();
        assert!(report.stations.is_empty());
        assert!(report.readings.is_empty());
    }
}
