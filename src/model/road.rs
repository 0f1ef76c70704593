use serde::{Deserialize, Serialize};

/// Physical and operational attributes of a location.
///
/// Every field is optional and `None` means unknown. Unknown is never read as
/// "no": an undivided road is `Some(false)`, a road of unknown cross-section
/// is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadProperties {
    /// e.g. "signal", "stop sign", "roundabout"
    #[serde(default)]
    pub traffic_control: Option<String>,

    /// e.g. "minor arterial", "collector"
    #[serde(default)]
    pub functional_class: Option<String>,

    /// e.g. "four-leg", "t-intersection"
    #[serde(default)]
    pub intersection_geometry: Option<String>,

    #[serde(default)]
    pub min_lanes: Option<u32>,

    #[serde(default)]
    pub max_lanes: Option<u32>,

    #[serde(default)]
    pub is_divided: Option<bool>,
}

impl RoadProperties {
    /// Known lane range of the road. A single known bound is used for both
    /// ends; `None` when neither bound is known.
    pub fn lane_range(&self) -> Option<(u32, u32)> {
        match (self.min_lanes, self.max_lanes) {
            (Some(min), Some(max)) => Some((min.min(max), min.max(max))),
            (Some(n), None) | (None, Some(n)) => Some((n, n)),
            (None, None) => None,
        }
    }
}
