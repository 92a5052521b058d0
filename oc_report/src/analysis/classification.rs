use crate::models::StopPair;

/// How a sample is drawn in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Rejected by the standard rule
    Standard,
    /// Rejected only when continuing after a non-significant batch
    ContinuationOnly { stop: i64 },
    NeverStopped,
}

pub fn classify(stops: StopPair) -> Category {
    match (stops.standard, stops.continuation) {
        (Some(_), _) => Category::Standard,
        (None, Some(stop)) => Category::ContinuationOnly { stop },
        (None, None) => Category::NeverStopped,
    }
}

/// A trajectory cut at its optional-continuation stop time.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitTrajectory {
    /// Points with `t <= stop`, the data actually collected
    pub real: Vec<(f64, f64)>,
    /// Points with `t > stop`, what continuing would have shown
    pub hypothetical: Vec<(f64, f64)>,
}

pub fn split_at_stop(points: &[(f64, f64)], stop: i64) -> SplitTrajectory {
    let stop = stop as f64;
    let (real, hypothetical): (Vec<(f64, f64)>, Vec<(f64, f64)>) = points.iter().partition(|&&(t, _)| t <= stop);
    SplitTrajectory { real, hypothetical }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{decode_stop, NOT_STOPPED};

    fn pair(standard: i64, continuation: i64) -> StopPair {
        StopPair {
            standard: decode_stop(standard),
            continuation: decode_stop(continuation),
        }
    }

    #[test]
    fn exactly_one_category_per_stop_pair() {
        let values = [NOT_STOPPED, 0, 39, 199];
        for &standard in &values {
            for &continuation in &values {
                let category = classify(pair(standard, continuation));
                let expected = if standard != NOT_STOPPED {
                    Category::Standard
                } else if continuation != NOT_STOPPED {
                    Category::ContinuationOnly { stop: continuation }
                } else {
                    Category::NeverStopped
                };
                assert_eq!(category, expected, "standard={standard} continuation={continuation}");
            }
        }
    }

    #[test]
    fn split_partitions_at_stop_time() {
        let points: Vec<(f64, f64)> = (0..10).map(|t| (t as f64, 1.0 / (t as f64 + 1.0))).collect();
        let split = split_at_stop(&points, 4);

        assert_eq!(split.real.len() + split.hypothetical.len(), points.len());
        assert_eq!(split.real.last().map(|p| p.0), Some(4.0));
        assert_eq!(split.hypothetical.first().map(|p| p.0), Some(5.0));
        assert!(split.hypothetical.iter().all(|&(t, _)| t > 4.0));
        assert_eq!([split.real, split.hypothetical].concat(), points);
    }

    #[test]
    fn split_at_last_point_leaves_no_hypothetical_segment() {
        let points = vec![(0.0, 1.0), (1.0, 0.5), (2.0, 0.01)];
        let split = split_at_stop(&points, 2);
        assert_eq!(split.real, points);
        assert!(split.hypothetical.is_empty());
    }
}
