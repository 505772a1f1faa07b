//! Weather thresholds for the flying-conditions assessment.

use serde::{Deserialize, Serialize};

/// Thresholds applied by [`crate::conditions::assess_with_rules`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyingRules {
    /// Wind above this is a no-fly (mph)
    pub high_wind_mph: f64,
    /// Wind above this calls for caution (mph)
    pub moderate_wind_mph: f64,
    /// Wind above this is noted but not escalated (mph)
    pub light_wind_mph: f64,
    /// Below this visibility line of sight cannot be kept (miles)
    pub min_visibility_mi: f64,
    /// Below this visibility calls for caution (miles)
    pub caution_visibility_mi: f64,
    /// Visibility assumed when the provider reports none (miles)
    pub default_visibility_mi: f64,
    /// Battery performance drops below this (°F)
    pub freezing_temp_f: f64,
    /// Overheating risk above this (°F)
    pub hot_temp_f: f64,
    /// Cloud cover above this is noted (percent)
    pub overcast_pct: f64,
}

impl Default for FlyingRules {
    fn default() -> Self {
        Self {
            high_wind_mph: 25.0,
            moderate_wind_mph: 15.0,
            light_wind_mph: 10.0,
            min_visibility_mi: 3.0, // Part 107 VLOS minimum
            caution_visibility_mi: 5.0,
            default_visibility_mi: 10.0,
            freezing_temp_f: 32.0,
            hot_temp_f: 95.0,
            overcast_pct: 80.0,
        }
    }
}
