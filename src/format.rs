use itertools::Itertools;

use crate::aggregation::{AggregateReport, AggregationError, Result};

/// Renders the report as `{station=min/mean/max, ...}` with one fractional
/// digit, stations in the report's sorted order.
pub fn render(report: &AggregateReport) -> Result<String> {
    let entries: Vec<String> = report
        .stations
        .iter()
        .map(|station| {
            let stats = report
                .readings
                .get(station)
                .ok_or_else(|| AggregationError::Consistency(station.clone()))?;
            Ok(format!(
                "{}={:.1}/{:.1}/{:.1}",
                station,
                stats.min,
                stats.mean(),
                stats.max
            ))
        })
        .collect::<Result<_>>()?;
    Ok(format!("{{{}}}", entries.iter().join(", ")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::aggregation::{AggregateReport, AggregationError, Stats};

    use super::render;

    #[test]
    fn test_render() {
        let mut readings = HashMap::new();
        readings.insert(
            "A".to_owned(),
            Stats {
                min: 10.0,
                max: 20.0,
                sum: 30.0,
                count: 2,
            },
        );
        readings.insert("B".to_owned(), Stats::new(-5.5));
        let report = AggregateReport {
            readings,
            stations: vec!["A".to_owned(), "B".to_owned()],
        };
        assert_eq!(
            render(&report).unwrap(),
            "{A=10.0/15.0/20.0, B=-5.5/-5.5/-5.5}"
        );
    }

    #[test]
    fn test_render_empty() {
        let report = AggregateReport {
            readings: HashMap::new(),
            stations: Vec::new(),
        };
        assert_eq!(render(&report).unwrap(), "{}");
    }

    #[test]
    fn test_missing_entry() {
        let report = AggregateReport {
            readings: HashMap::new(),
            stations: vec!["Ghost".to_owned()],
        };
        match render(&report) {
            Err(AggregationError::Consistency(station)) => assert_eq!(station, "Ghost"),
            other => panic!("Expected consistency error, got {:?}", other),
        }
    }
}
