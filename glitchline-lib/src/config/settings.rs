use super::cli::Cli;

/// Process-wide unreliability parameters.
///
/// Every numeric write is clamped to its domain before commit, and every
/// read hands back a snapshot of the current values — there is no way to
/// observe a write half-applied because `Settings` is only ever touched
/// from the single-threaded receive loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub drop: f64,
    pub flip: f64,
    pub burst: f64,
    pub delay: f64,
    pub burst_len_lower: u64,
    pub burst_len_upper: u64,
    pub delay_len_lower: u64,
    pub delay_len_upper: u64,
    /// Set at startup, immutable thereafter.
    pub max_clients: usize,
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        let (delay_len_lower, delay_len_upper) = (
            cli.delay_len_lower.min(cli.delay_len_upper),
            cli.delay_len_lower.max(cli.delay_len_upper),
        );
        Self {
            drop: clamp_unit(cli.drop),
            flip: clamp_unit(cli.flip),
            burst: clamp_unit(cli.burst),
            delay: clamp_unit(cli.delay),
            burst_len_lower: cli.burst_len_lower,
            burst_len_upper: cli.burst_len_upper,
            delay_len_lower,
            delay_len_upper,
            max_clients: cli.max_clients,
        }
    }

    /// Atomically restores the defaults documented for `RESET`.
    pub fn reset(&mut self) {
        self.drop = 0.0;
        self.flip = 0.0;
        self.burst = 0.0;
        self.delay = 0.0;
        self.burst_len_lower = 3;
        self.burst_len_upper = 3;
        self.delay_len_lower = 5;
        self.delay_len_upper = 5;
    }

    /// `SET <key> <real>` — returns `false` for an unknown key.
    pub fn set_scalar(&mut self, key: &str, value: f64) -> bool {
        match key {
            "DROP" => self.drop = clamp_unit(value),
            "FLIP" => self.flip = clamp_unit(value),
            "BURST" => self.burst = clamp_unit(value),
            "DELAY" => self.delay = clamp_unit(value),
            _ => return false,
        }
        true
    }

    /// `SET <key> <int> <int>` — returns `false` for an unknown key.
    ///
    /// `BURST-LEN` is stored as given after non-negativity clamping (the
    /// bounds are already `u64`, so only the per-field clamp to a sane max
    /// applies); `DELAY-LEN` additionally normalises lower <= upper.
    pub fn set_range(&mut self, key: &str, lower: u64, upper: u64) -> bool {
        match key {
            "BURST-LEN" => {
                self.burst_len_lower = lower;
                self.burst_len_upper = upper;
            }
            "DELAY-LEN" => {
                self.delay_len_lower = lower.min(upper);
                self.delay_len_upper = lower.max(upper);
            }
            _ => return false,
        }
        true
    }

    /// `GET <key>` formatted value, or `None` for an unknown key.
    pub fn get_formatted(&self, key: &str) -> Option<String> {
        match key {
            "DROP" => Some(format!("{:.6}", self.drop)),
            "FLIP" => Some(format!("{:.6}", self.flip)),
            "BURST" => Some(format!("{:.6}", self.burst)),
            "DELAY" => Some(format!("{:.6}", self.delay)),
            "BURST-LEN" => Some(format!("{} {}", self.burst_len_lower, self.burst_len_upper)),
            "DELAY-LEN" => Some(format!("{} {}", self.delay_len_lower, self.delay_len_upper)),
            _ => None,
        }
    }
}
