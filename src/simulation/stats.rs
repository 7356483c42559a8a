//! Statistics about served hall calls

/// Running totals for a scheduler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetStats {
    /// Hall calls accepted by `request_call`
    pub calls_placed: u64,

    /// Hall calls served by a car
    pub calls_served: u64,

    /// Sum of waits of served calls, in ticks
    pub total_wait: u64,

    /// Longest wait of any served call
    pub max_wait: u64,
}

impl FleetStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_placed(&mut self) {
        self.calls_placed += 1;
    }

    pub fn record_served(&mut self, wait: u64) {
        self.calls_served += 1;
        self.total_wait += wait;
        self.max_wait = self.max_wait.max(wait);
    }

    /// Mean wait of served calls, 0 when nothing was served yet
    pub fn average_wait(&self) -> f64 {
        if self.calls_served == 0 {
            0.0
        } else {
            self.total_wait as f64 / self.calls_served as f64
        }
    }

    /// Share of placed calls that were served, as a percentage
    pub fn service_rate(&self) -> f64 {
        if self.calls_placed == 0 {
            0.0
        } else {
            self.calls_served as f64 / self.calls_placed as f64 * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Calls placed: {} | Calls served: {} | Avg wait: {:.1} | Max wait: {}",
            self.calls_placed,
            self.calls_served,
            self.average_wait(),
            self.max_wait
        )
    }
}
