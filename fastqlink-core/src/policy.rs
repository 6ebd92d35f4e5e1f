use serde::{Deserialize, Serialize};

pub const DEFAULT_ANOMALY_THRESHOLD: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkPolicy {
    /// Keep only matched files ending with this suffix, e.g. ".gz".
    pub required_suffix: Option<String>,
    /// Samples matching at least this many files are reported as anomalies.
    pub anomaly_threshold: usize,
    /// Restrict the pass to samples whose lane name contains this string.
    pub lane: Option<String>,
    pub skip_unsequenced: bool,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            required_suffix: None,
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            lane: None,
            skip_unsequenced: false,
        }
    }
}

impl LinkPolicy {
    pub fn accepts_file(&self, name: &str) -> bool {
        match &self.required_suffix {
            Some(suffix) => name.ends_with(suffix.as_str()),
            None => true,
        }
    }

    pub fn in_lane(&self, lane_name: Option<&str>) -> bool {
        match &self.lane {
            Some(lane) => lane_name.is_some_and(|l| l.contains(lane.as_str())),
            None => true,
        }
    }
}
