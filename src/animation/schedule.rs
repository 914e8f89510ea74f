//! Distribution of per-path draw windows across one shared timeline.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::animation::ease::Ease;
use crate::foundation::error::{DrawonError, DrawonResult};

/// How draw windows are spread across paths in document order.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StaggerPolicy {
    /// Every path animates across the whole timeline.
    None,
    /// Path `i` of `N` gets the window `[i/N, (i+1)/N]`.
    #[default]
    Sequential,
    /// Equal windows where each one overlaps the next by `fraction` of its own length.
    Overlapping { fraction: f64 },
}

impl StaggerPolicy {
    pub fn validate(self) -> DrawonResult<()> {
        if let Self::Overlapping { fraction } = self
            && !(0.0..=1.0).contains(&fraction)
        {
            return Err(DrawonError::config(format!(
                "overlap fraction must be in [0, 1], got {fraction}"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for StaggerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Sequential => f.write_str("sequential"),
            Self::Overlapping { fraction } => write!(f, "overlapping:{fraction}"),
        }
    }
}

impl FromStr for StaggerPolicy {
    type Err = DrawonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let policy = match s {
            "none" => Self::None,
            "sequential" => Self::Sequential,
            other => {
                let Some(raw) = other.strip_prefix("overlapping:") else {
                    return Err(DrawonError::config(format!(
                        "unknown stagger policy '{s}' (expected none, sequential or overlapping:<fraction>)"
                    )));
                };
                let fraction: f64 = raw.trim().parse().map_err(|_| {
                    DrawonError::config(format!("invalid overlap fraction '{raw}'"))
                })?;
                Self::Overlapping { fraction }
            }
        };
        policy.validate()?;
        Ok(policy)
    }
}

impl TryFrom<String> for StaggerPolicy {
    type Error = DrawonError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StaggerPolicy> for String {
    fn from(value: StaggerPolicy) -> Self {
        value.to_string()
    }
}

/// One path's draw window, as fractions of the total duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleEntry {
    pub path_id: String,
    pub start_fraction: f64,
    pub duration_fraction: f64,
    pub easing: Ease,
}

impl ScheduleEntry {
    pub fn end_fraction(&self) -> f64 {
        (self.start_fraction + self.duration_fraction).min(1.0)
    }

    /// Start offset in seconds, for exporters that express timing as delays.
    pub fn start_seconds(&self, total_duration: f64) -> f64 {
        self.start_fraction * total_duration
    }

    pub fn duration_seconds(&self, total_duration: f64) -> f64 {
        self.duration_fraction * total_duration
    }
}

/// Draw windows for every path, in document order.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TimingSchedule {
    total_duration: f64,
    policy: StaggerPolicy,
    entries: Vec<ScheduleEntry>,
    #[serde(skip)]
    index: BTreeMap<String, usize>,
}

impl TimingSchedule {
    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn policy(&self) -> StaggerPolicy {
        self.policy
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn get(&self, path_id: &str) -> Option<&ScheduleEntry> {
        self.index.get(path_id).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assign each path a window within `[0, 1]` of the timeline.
///
/// Windows never reorder: a later path in `path_ids` never starts before an earlier one.
#[tracing::instrument(skip(path_ids), fields(paths = path_ids.len()))]
pub fn schedule<S: AsRef<str>>(
    path_ids: &[S],
    total_duration: f64,
    policy: StaggerPolicy,
    easing: Ease,
) -> DrawonResult<TimingSchedule> {
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(DrawonError::config(format!(
            "duration must be positive, got {total_duration}"
        )));
    }
    policy.validate()?;

    let n = path_ids.len();
    let mut entries = Vec::with_capacity(n);
    let mut index = BTreeMap::new();
    for (i, id) in path_ids.iter().enumerate() {
        let id = id.as_ref();
        if index.insert(id.to_owned(), i).is_some() {
            return Err(DrawonError::config(format!("duplicate path id '{id}'")));
        }
        let (start, duration) = window(i, n, policy);
        entries.push(ScheduleEntry {
            path_id: id.to_owned(),
            start_fraction: start,
            duration_fraction: duration,
            easing,
        });
    }

    tracing::debug!(%policy, %easing, paths = n, "computed timing schedule");
    Ok(TimingSchedule {
        total_duration,
        policy,
        entries,
        index,
    })
}

/// `(start_fraction, duration_fraction)` for path `i` of `n`.
fn window(i: usize, n: usize, policy: StaggerPolicy) -> (f64, f64) {
    let nf = n as f64;
    let fi = i as f64;
    let (start, duration) = match policy {
        StaggerPolicy::None => (0.0, 1.0),
        StaggerPolicy::Sequential => (fi / nf, 1.0 / nf),
        StaggerPolicy::Overlapping { fraction } => {
            let step = 1.0 - fraction;
            let d = 1.0 / ((nf - 1.0) * step + 1.0);
            (fi * d * step, d)
        }
    };
    let start = start.clamp(0.0, 1.0);
    (start, duration.min(1.0 - start).max(0.0))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/schedule.rs"]
mod tests;
