use serde::Serialize;

/// How densely x ticks and markers are drawn. Longer series use the sparse
/// interval so labels don't collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDensity {
    pub dense_interval: usize,
    pub sparse_interval: usize,
    pub sparse_above: usize,
}

impl TickDensity {
    pub const LINE: TickDensity = TickDensity {
        dense_interval: 2,
        sparse_interval: 5,
        sparse_above: 20,
    };

    pub const AREA: TickDensity = TickDensity {
        dense_interval: 4,
        sparse_interval: 5,
        sparse_above: 20,
    };

    pub fn interval(self, len: usize) -> usize {
        let interval = if len > self.sparse_above {
            self.sparse_interval
        } else {
            self.dense_interval
        };
        interval.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
    pub label: String,
}

/// `count` evenly spaced values from `min` to `max` inclusive.
pub fn value_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as f64;
            (0..count).map(|i| min + step * i as f64).collect()
        }
    }
}

/// First, last and every `interval`-th index.
pub fn index_ticks(len: usize, density: TickDensity) -> Vec<usize> {
    let interval = density.interval(len);
    (0..len)
        .filter(|&idx| idx == 0 || idx + 1 == len || idx % interval == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn value_ticks_are_evenly_spaced() {
        assert_eq!(
            value_ticks(0.0, 1_000.0, 5),
            vec![0.0, 250.0, 500.0, 750.0, 1_000.0]
        );
        assert_eq!(value_ticks(0.0, 0.0, 5), vec![0.0; 5]);
        assert!(value_ticks(0.0, 10.0, 0).is_empty());
    }

    #[test]
    fn short_line_series_ticks_every_other_index() {
        assert_eq!(index_ticks(7, TickDensity::LINE), vec![0, 2, 4, 6]);
        assert_eq!(index_ticks(6, TickDensity::LINE), vec![0, 2, 4, 5]);
    }

    #[test]
    fn long_series_switch_to_sparse_interval() {
        let ticks = index_ticks(36, TickDensity::AREA);
        assert_eq!(ticks, vec![0, 5, 10, 15, 20, 25, 30, 35]);
        let short = index_ticks(20, TickDensity::AREA);
        assert_eq!(short, vec![0, 4, 8, 12, 16, 19]);
    }

    #[test]
    fn tiny_series_keep_their_endpoints() {
        assert_eq!(index_ticks(1, TickDensity::LINE), vec![0]);
        assert!(index_ticks(0, TickDensity::LINE).is_empty());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_index_ticks_are_sorted_and_bounded(len in 1usize..500) {
            let ticks = index_ticks(len, TickDensity::LINE);
            prop_assert_eq!(ticks.first().copied(), Some(0));
            prop_assert_eq!(ticks.last().copied(), Some(len - 1));
            prop_assert!(ticks.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(ticks.len() <= len / 2 + 2);
        }
    }
}
