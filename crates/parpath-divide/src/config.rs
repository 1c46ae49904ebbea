/// Options for [`par_divide`](crate::par_divide).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DivideConfig {
    /// Worker threads in the first wave, one per seed. Must be at least 1.
    pub workers: usize,
    /// Re-run the search between the first wave's meeting points.
    /// Only takes effect with more than two workers.
    pub smoothing: bool,
    /// Steps each seed-placement walker may take before giving up.
    /// `None` means `width + height` of the map being searched.
    pub scan_limit: Option<u32>,
}

impl Default for DivideConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            smoothing: true,
            scan_limit: None,
        }
    }
}

impl DivideConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_smoothing(mut self, smoothing: bool) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_scan_limit(mut self, limit: u32) -> Self {
        self.scan_limit = Some(limit);
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn config_round_trip() {
        let cfg = DivideConfig::default().with_workers(3).with_scan_limit(12);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: DivideConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
