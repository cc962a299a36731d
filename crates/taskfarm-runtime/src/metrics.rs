use std::time::Duration;

/// Sequential-versus-parallel timing comparison for one run.
#[derive(Debug, Clone, Copy)]
pub struct Comparison {
    pub sequential: Duration,
    pub parallel: Duration,
    /// Total role count, coordinator included.
    pub world_size: usize,
}

impl Comparison {
    /// `sequential / parallel`, or `None` when the parallel time is not a
    /// usable divisor.
    pub fn speedup(&self) -> Option<f64> {
        let parallel = self.parallel.as_secs_f64();
        if parallel <= 0.0 {
            return None;
        }
        Some(self.sequential.as_secs_f64() / parallel)
    }

    /// Speedup per worker as a percentage, or `None` when there are no
    /// workers to attribute it to.
    pub fn efficiency(&self) -> Option<f64> {
        if self.world_size <= 1 {
            return None;
        }
        self.speedup()
            .map(|s| s / (self.world_size - 1) as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speedup_and_efficiency() {
        let cmp = Comparison {
            sequential: Duration::from_secs(6),
            parallel: Duration::from_secs(2),
            world_size: 4,
        };
        assert_eq!(cmp.speedup(), Some(3.0));
        assert_eq!(cmp.efficiency(), Some(100.0));
    }

    #[test]
    fn test_zero_parallel_time_is_undefined() {
        let cmp = Comparison {
            sequential: Duration::from_secs(1),
            parallel: Duration::ZERO,
            world_size: 4,
        };
        assert_eq!(cmp.speedup(), None);
        assert_eq!(cmp.efficiency(), None);
    }

    #[test]
    fn test_no_workers_is_undefined_efficiency() {
        let cmp = Comparison {
            sequential: Duration::from_secs(1),
            parallel: Duration::from_secs(1),
            world_size: 1,
        };
        assert_eq!(cmp.speedup(), Some(1.0));
        assert_eq!(cmp.efficiency(), None);
    }
}
