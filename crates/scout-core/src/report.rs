//! Field-by-field inspection of a raw telemetry payload.
//!
//! Lets the app see which channels the fleet API actually filled for a
//! flight, before any normalization.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub fields: Vec<String>,
    pub field_count: usize,
    pub analysis: BTreeMap<String, FieldAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldAnalysis {
    Channel(ChannelAnalysis),
    Opaque(OpaqueField),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAnalysis {
    pub has_data: bool,
    pub total_points: usize,
    pub valid_points: usize,
    pub non_zero_points: usize,
    pub null_points: usize,
    pub zero_points: usize,
    pub sample_values: Vec<Value>,
    /// Over scalar samples only.
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub has_timestamps: bool,
}

/// A top-level entry that is not a channel object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpaqueField {
    pub has_data: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: Value,
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null | Value::Object(_) | Value::Array(_) => "object",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
    }
}

fn is_zero(value: &Value) -> bool {
    value.as_f64() == Some(0.0)
}

fn analyze_channel(field: &Value) -> ChannelAnalysis {
    let data = field
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let has_timestamps = field
        .get("timestamps")
        .and_then(Value::as_array)
        .is_some_and(|timestamps| !timestamps.is_empty());

    let valid: Vec<&Value> = data.iter().filter(|value| !value.is_null()).collect();
    let zero_points = valid.iter().filter(|value| is_zero(value)).count();
    let scalars: Vec<f64> = valid.iter().filter_map(|value| value.as_f64()).collect();

    let (min, max, avg) = if scalars.is_empty() {
        (None, None, None)
    } else {
        (
            Some(scalars.iter().copied().fold(f64::INFINITY, f64::min)),
            Some(scalars.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            Some(scalars.iter().sum::<f64>() / scalars.len() as f64),
        )
    };

    ChannelAnalysis {
        has_data: !data.is_empty(),
        total_points: data.len(),
        valid_points: valid.len(),
        non_zero_points: valid.len() - zero_points,
        null_points: data.len() - valid.len(),
        zero_points,
        sample_values: valid.iter().take(SAMPLE_LIMIT).map(|value| (*value).clone()).collect(),
        min,
        max,
        avg,
        has_timestamps,
    }
}

/// Inspect every top-level key of a `flight_telemetry` object.
///
/// `fields` lists keys in upstream order; `analysis` is keyed by name.
pub fn build_field_report(raw: &Map<String, Value>) -> FieldReport {
    let fields: Vec<String> = raw.keys().cloned().collect();
    let analysis = raw
        .iter()
        .map(|(name, value)| {
            let entry = match value {
                Value::Object(_) | Value::Array(_) => FieldAnalysis::Channel(analyze_channel(value)),
                other => FieldAnalysis::Opaque(OpaqueField {
                    has_data: false,
                    kind: json_type(other),
                    value: other.clone(),
                }),
            };
            (name.clone(), entry)
        })
        .collect();

    FieldReport {
        field_count: fields.len(),
        fields,
        analysis,
    }
}
