// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Metric request shapes and response shaping.
//!
//! The data-fetch layer issues one of two request kinds. Both share a [`MetricSelection`]; the
//! model variant additionally names the model whose prediction annotates the snapshot. The
//! variant is an explicit tag (`"type"`), and dispatch is a `match` on it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ChartError, Result};
use crate::model::{Annotation, MetricsData, Series};

/// Time bucket used by server-side aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grouping {
    /// One bucket per second.
    Second,
    /// One bucket per minute.
    Minute,
    /// One bucket per hour.
    Hour,
    /// One bucket per day.
    Day,
}

/// Aggregation applied within each bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Aggregation {
    /// Minimum.
    Min,
    /// Maximum.
    Max,
    /// Mean.
    Avg,
    /// Sum.
    Sum,
    /// Sample count.
    Count,
}

/// Fields shared by every metric request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSelection {
    /// Tenant owning the device.
    pub tenant_identifier: String,
    /// Device to query.
    pub device_identifier: String,
    /// Start of the window (ISO-8601).
    pub start: String,
    /// End of the window (ISO-8601).
    pub end: String,
    /// Metrics to include; empty means all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metric_identifier: Vec<String>,
    /// Optional unit filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Optional sensor path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional aggregation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    /// Optional time bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<Grouping>,
}

/// Model whose prediction should accompany the metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRef {
    /// Model name.
    pub name: String,
    /// Model family.
    pub model_type: String,
    /// Number of samples the model consumes.
    pub window_size: u32,
    /// Model version.
    pub version: String,
}

/// A metric request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MetricQuery {
    /// Plain numeric scalar series.
    NumericScalar(MetricSelection),
    /// Numeric scalar series annotated with a model prediction.
    NumericScalarModel {
        /// Shared selection.
        #[serde(flatten)]
        selection: MetricSelection,
        /// Model to evaluate.
        model: ModelRef,
    },
}

impl MetricQuery {
    /// Returns the shared selection.
    pub fn selection(&self) -> &MetricSelection {
        match self {
            Self::NumericScalar(selection) | Self::NumericScalarModel { selection, .. } => {
                selection
            }
        }
    }

    /// Name of the response field carrying this request's entries.
    pub fn response_field(&self) -> &'static str {
        match self {
            Self::NumericScalar(_) => "numericScalar",
            Self::NumericScalarModel { .. } => "numericScalarModel",
        }
    }

    /// Builds the request variables.
    ///
    /// `path` defaults to the empty string. `metricIdentifier` is omitted when no metric is
    /// named (all metrics). `aggregation` and `grouping` are only present when set, and `model`
    /// only on the model variant.
    pub fn variables(&self) -> Result<Map<String, Value>> {
        let s = self.selection();
        let mut vars = Map::new();
        vars.insert("tenantIdentifier".into(), s.tenant_identifier.clone().into());
        vars.insert("deviceIdentifier".into(), s.device_identifier.clone().into());
        vars.insert("start".into(), s.start.clone().into());
        vars.insert("end".into(), s.end.clone().into());
        if !s.metric_identifier.is_empty() {
            vars.insert(
                "metricIdentifier".into(),
                serde_json::to_value(&s.metric_identifier)?,
            );
        }
        vars.insert("path".into(), s.path.clone().unwrap_or_default().into());
        if let Some(aggregation) = s.aggregation {
            vars.insert("aggregation".into(), serde_json::to_value(aggregation)?);
        }
        if let Some(grouping) = s.grouping {
            vars.insert("grouping".into(), serde_json::to_value(grouping)?);
        }
        if let Self::NumericScalarModel { model, .. } = self {
            vars.insert("model".into(), serde_json::to_value(model)?);
        }
        Ok(vars)
    }
}

/// One timestamped value in a response entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// Instant in the device's local time (ISO-8601).
    pub timestamp_local: String,
    /// Value, or `null` for a missing sample.
    #[serde(default)]
    pub value: Option<f64>,
}

/// Model output attached to a response entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// Model name.
    #[serde(default)]
    pub name: Option<String>,
    /// Predicted label.
    #[serde(default)]
    pub predicted: Option<String>,
    /// Confidence in `[0, 1]`.
    #[serde(default)]
    pub probability: Option<f64>,
}

/// One metric in a response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEntry {
    /// Metric label.
    pub metric_identifier: String,
    /// Unit of the values.
    #[serde(default)]
    pub unit: String,
    /// Samples in time order.
    #[serde(default)]
    pub values: Vec<MetricSample>,
    /// Present on model responses.
    #[serde(default)]
    pub model: Option<ModelOutput>,
}

impl MetricsData {
    /// Shapes response entries into a snapshot.
    ///
    /// The timestamp axis and the annotation come from the first entry.
    pub fn from_entries(entries: &[MetricEntry]) -> Self {
        let Some(first) = entries.first() else {
            return Self::default();
        };
        let timestamp = first
            .values
            .iter()
            .map(|v| v.timestamp_local.clone())
            .collect();
        let metrics = entries
            .iter()
            .map(|e| Series {
                metric_identifier: e.metric_identifier.clone(),
                unit: e.unit.clone(),
                values: e.values.iter().map(|v| v.value).collect(),
            })
            .collect();
        let model = first.model.as_ref().map(|m| Annotation {
            name: m.name.clone(),
            prediction: m.predicted.clone(),
            probability: m.probability,
        });
        Self {
            timestamp,
            metrics,
            model,
        }
    }

    /// Shapes a response `data` object for the given request.
    pub fn from_response(query: &MetricQuery, data: &Value) -> Result<Self> {
        let field = query.response_field();
        let entries = data.get(field).ok_or(ChartError::MissingField(field))?;
        let entries: Vec<MetricEntry> = serde_json::from_value(entries.clone())?;
        Ok(Self::from_entries(&entries))
    }
}

/// Status of the data-fetch collaborator as seen by the chart's caller.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState {
    /// The request is in flight.
    Loading,
    /// The request failed.
    Failed(String),
    /// A snapshot is available.
    Ready(MetricsData),
}

impl FetchState {
    /// Text to show instead of the chart, if any.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading...".into()),
            Self::Failed(message) => Some(format!("Error: {message}")),
            Self::Ready(_) => None,
        }
    }

    /// The snapshot, once ready.
    pub fn data(&self) -> Option<&MetricsData> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Loading | Self::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn selection() -> MetricSelection {
        MetricSelection {
            tenant_identifier: "acme".into(),
            device_identifier: "gearbox-7".into(),
            start: "2024-03-01T00:00:00".into(),
            end: "2024-03-01T01:00:00".into(),
            metric_identifier: vec!["vibration_x".into()],
            ..MetricSelection::default()
        }
    }

    #[test]
    fn plain_variables_omit_optional_fields() {
        let vars = MetricQuery::NumericScalar(selection())
            .variables()
            .expect("serializable");
        assert_eq!(vars["path"], json!(""));
        assert_eq!(vars["metricIdentifier"], json!(["vibration_x"]));
        assert!(!vars.contains_key("aggregation"));
        assert!(!vars.contains_key("grouping"));
        assert!(!vars.contains_key("model"));
    }

    #[test]
    fn unnamed_metrics_are_left_out_of_the_variables() {
        let sel = MetricSelection {
            metric_identifier: Vec::new(),
            ..selection()
        };
        let vars = MetricQuery::NumericScalar(sel)
            .variables()
            .expect("serializable");
        assert!(!vars.contains_key("metricIdentifier"));
        assert_eq!(vars["deviceIdentifier"], json!("gearbox-7"));
    }

    #[test]
    fn model_variables_carry_model_and_buckets() {
        let mut sel = selection();
        sel.aggregation = Some(Aggregation::Avg);
        sel.grouping = Some(Grouping::Minute);
        let query = MetricQuery::NumericScalarModel {
            selection: sel,
            model: ModelRef {
                name: "gear".into(),
                model_type: "lstm".into(),
                window_size: 64,
                version: "1".into(),
            },
        };
        let vars = query.variables().expect("serializable");
        assert_eq!(vars["aggregation"], json!("AVG"));
        assert_eq!(vars["grouping"], json!("MINUTE"));
        assert_eq!(vars["model"]["windowSize"], json!(64));
        assert_eq!(query.response_field(), "numericScalarModel");
    }

    #[test]
    fn tagged_request_round_trips_through_json() {
        let query: MetricQuery = serde_json::from_value(json!({
            "type": "numeric_scalar",
            "tenantIdentifier": "acme",
            "deviceIdentifier": "d1",
            "start": "a",
            "end": "b"
        }))
        .expect("tagged request");
        assert!(matches!(query, MetricQuery::NumericScalar(_)));
        assert_eq!(query.selection().device_identifier, "d1");
    }

    #[test]
    fn response_is_shaped_per_variant() {
        let query = MetricQuery::NumericScalarModel {
            selection: selection(),
            model: ModelRef::default(),
        };
        let data = json!({
            "numericScalarModel": [
                {
                    "metricIdentifier": "vibration_x",
                    "unit": "g",
                    "values": [
                        { "timestampLocal": "2024-03-01T00:00:00", "value": 0.5 },
                        { "timestampLocal": "2024-03-01T00:01:00", "value": null }
                    ],
                    "model": { "name": "gear", "predicted": "anomaly", "probability": 0.9 }
                },
                {
                    "metricIdentifier": "vibration_y",
                    "unit": "g",
                    "values": [
                        { "timestampLocal": "2024-03-01T00:00:00", "value": 0.1 },
                        { "timestampLocal": "2024-03-01T00:01:00", "value": 0.2 }
                    ]
                }
            ]
        });
        let snapshot = MetricsData::from_response(&query, &data).expect("shaped");
        assert_eq!(snapshot.timestamp.len(), 2);
        assert_eq!(snapshot.metrics.len(), 2);
        assert_eq!(snapshot.metrics[0].values, vec![Some(0.5), None]);
        let model = snapshot.model.expect("annotation");
        assert_eq!(model.prediction.as_deref(), Some("anomaly"));

        let plain = MetricQuery::NumericScalar(selection());
        assert!(matches!(
            MetricsData::from_response(&plain, &data),
            Err(ChartError::MissingField("numericScalar"))
        ));
    }

    #[test]
    fn fetch_state_placeholders() {
        assert_eq!(FetchState::Loading.placeholder().as_deref(), Some("Loading..."));
        assert_eq!(
            FetchState::Failed("timeout".into()).placeholder().as_deref(),
            Some("Error: timeout")
        );
        let ready = FetchState::Ready(MetricsData::default());
        assert!(ready.placeholder().is_none());
        assert!(ready.data().is_some());
    }
}
