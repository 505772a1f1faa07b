//! Flying-conditions assessment from a weather observation.
//!
//! The assessment is a single pass over an ordered rule list. Each rule may
//! add a warning and may raise the risk level; nothing ever lowers it.

use serde::{Deserialize, Serialize};

use crate::rules::FlyingRules;
use crate::spatial::METERS_TO_MILES;

const MPS_TO_MPH: f64 = 2.237;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Unit system the weather provider reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// mph, °F
    #[default]
    Imperial,
    /// m/s, °C
    Metric,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "imperial" => Some(UnitSystem::Imperial),
            "metric" => Some(UnitSystem::Metric),
            _ => None,
        }
    }
}

/// Weather inputs to the assessment. Any measurement may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherObservation {
    pub wind_speed: Option<f64>,
    pub wind_gust: Option<f64>,
    /// Always meters, whatever the unit system.
    pub visibility_m: Option<f64>,
    /// Primary condition category, e.g. `Rain` or `Clear`.
    pub condition: Option<String>,
    pub temperature: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub units: UnitSystem,
}

impl WeatherObservation {
    fn to_mph(&self, speed: f64) -> f64 {
        match self.units {
            UnitSystem::Imperial => speed,
            UnitSystem::Metric => speed * MPS_TO_MPH,
        }
    }

    /// Sustained wind in mph. Gusts are reported but not assessed.
    pub fn wind_mph(&self) -> Option<f64> {
        self.wind_speed.map(|speed| self.to_mph(speed))
    }

    pub fn visibility_miles(&self) -> Option<f64> {
        self.visibility_m.map(|meters| meters * METERS_TO_MILES)
    }

    pub fn temperature_f(&self) -> Option<f64> {
        self.temperature.map(|temp| match self.units {
            UnitSystem::Imperial => temp,
            UnitSystem::Metric => temp * 9.0 / 5.0 + 32.0,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRiskAssessment {
    pub safe: bool,
    pub risk: RiskLevel,
    pub warnings: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq)]
struct RuleOutcome {
    warning: String,
    escalate_to: Option<RiskLevel>,
}

impl RuleOutcome {
    fn note(warning: String) -> Self {
        Self {
            warning,
            escalate_to: None,
        }
    }

    fn raise(warning: String, risk: RiskLevel) -> Self {
        Self {
            warning,
            escalate_to: Some(risk),
        }
    }
}

type Rule = fn(&WeatherObservation, &FlyingRules) -> Option<RuleOutcome>;

/// Evaluation order matters only for the order of warnings.
const RULES: [Rule; 5] = [
    wind_rule,
    visibility_rule,
    precipitation_rule,
    temperature_rule,
    cloud_cover_rule,
];

fn wind_rule(observation: &WeatherObservation, rules: &FlyingRules) -> Option<RuleOutcome> {
    let mph = observation.wind_mph()?;
    if mph > rules.high_wind_mph {
        Some(RuleOutcome::raise(format!("High winds: {:.0} mph", mph), RiskLevel::High))
    } else if mph > rules.moderate_wind_mph {
        Some(RuleOutcome::raise(format!("Moderate winds: {:.0} mph", mph), RiskLevel::Medium))
    } else if mph > rules.light_wind_mph {
        Some(RuleOutcome::note(format!("Light winds: {:.0} mph", mph)))
    } else {
        None
    }
}

fn visibility_rule(observation: &WeatherObservation, rules: &FlyingRules) -> Option<RuleOutcome> {
    let miles = observation
        .visibility_miles()
        .unwrap_or(rules.default_visibility_mi);
    if miles < rules.min_visibility_mi {
        Some(RuleOutcome::raise(
            format!("Low visibility: {:.1} mi (below VLOS minimum)", miles),
            RiskLevel::High,
        ))
    } else if miles < rules.caution_visibility_mi {
        Some(RuleOutcome::raise(
            format!("Reduced visibility: {:.1} mi", miles),
            RiskLevel::Medium,
        ))
    } else {
        None
    }
}

fn precipitation_rule(observation: &WeatherObservation, _rules: &FlyingRules) -> Option<RuleOutcome> {
    match observation.condition.as_deref()? {
        condition @ ("Rain" | "Snow") => Some(RuleOutcome::raise(
            format!("Precipitation: {}", condition),
            RiskLevel::High,
        )),
        "Drizzle" => Some(RuleOutcome::raise(
            "Light precipitation: Drizzle".to_string(),
            RiskLevel::Medium,
        )),
        _ => None,
    }
}

fn temperature_rule(observation: &WeatherObservation, rules: &FlyingRules) -> Option<RuleOutcome> {
    let fahrenheit = observation.temperature_f()?;
    if fahrenheit < rules.freezing_temp_f {
        Some(RuleOutcome::raise(
            format!("Freezing temperature: {:.0}°F (reduced battery performance)", fahrenheit),
            RiskLevel::Medium,
        ))
    } else if fahrenheit > rules.hot_temp_f {
        Some(RuleOutcome::raise(
            format!("High temperature: {:.0}°F (overheating risk)", fahrenheit),
            RiskLevel::Medium,
        ))
    } else {
        None
    }
}

fn cloud_cover_rule(observation: &WeatherObservation, rules: &FlyingRules) -> Option<RuleOutcome> {
    let cover = observation.cloud_cover_pct?;
    (cover > rules.overcast_pct)
        .then(|| RuleOutcome::note(format!("Heavy cloud cover: {:.0}%", cover)))
}

/// Assess flying conditions with the default thresholds.
pub fn assess_flying_conditions(observation: &WeatherObservation) -> FlightRiskAssessment {
    assess_with_rules(observation, &FlyingRules::default())
}

/// Assess flying conditions with custom thresholds.
///
/// `safe` requires both low risk and no warnings at all: a warning that did
/// not raise the risk level still makes the flight unsafe.
pub fn assess_with_rules(observation: &WeatherObservation, rules: &FlyingRules) -> FlightRiskAssessment {
    let (risk, warnings) = RULES
        .iter()
        .filter_map(|rule| rule(observation, rules))
        .fold((RiskLevel::Low, Vec::new()), |(risk, mut warnings), outcome| {
            warnings.push(outcome.warning);
            let risk = outcome.escalate_to.map_or(risk, |level| risk.max(level));
            (risk, warnings)
        });

    let safe = risk == RiskLevel::Low && warnings.is_empty();
    let recommendation = if safe {
        "Good flying conditions"
    } else if risk == RiskLevel::High {
        "Do not fly"
    } else {
        "Fly with caution"
    };

    FlightRiskAssessment {
        safe,
        risk,
        warnings,
        recommendation: recommendation.to_string(),
    }
}
