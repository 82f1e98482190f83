use std::time::Instant;

use tdigest::TDigest;

/// Measures the latency of consecutive recommendation requests.
#[derive(Clone)]
pub struct Stopwatch {
    start_time: Instant,
    request_durations_micros: Vec<f64>,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Stopwatch {
        Stopwatch {
            start_time: Instant::now(),
            request_durations_micros: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = Instant::now();
    }

    pub fn stop(&mut self) {
        let duration_as_micros = self.start_time.elapsed().as_micros() as f64;
        self.request_durations_micros.push(duration_as_micros);
    }

    pub fn get_n(&self) -> usize {
        self.request_durations_micros.len()
    }

    /// `q` is a fraction, 0.995 for the 99.5th percentile.
    pub fn get_percentile_in_micros(&self, q: f64) -> f64 {
        if self.request_durations_micros.is_empty() {
            return 0.0;
        }
        TDigest::new_with_size(100)
            .merge_unsorted(self.request_durations_micros.clone())
            .estimate_quantile(q)
    }
}
