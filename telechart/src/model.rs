// Copyright 2025 the Telechart Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Snapshot data model.
//!
//! A [`MetricsData`] snapshot shares one timestamp axis across all series: position `i` of every
//! series' values corresponds to `timestamp[i]`. Absent samples are kept in place as `None`.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// One snapshot of multi-series telemetry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsData {
    /// ISO-8601 instants shared by all series.
    #[serde(default)]
    pub timestamp: Vec<String>,
    /// Series in display order.
    #[serde(default)]
    pub metrics: Vec<Series>,
    /// Optional model prediction for the snapshot.
    #[serde(default)]
    pub model: Option<Annotation>,
}

/// One named stream of values on the snapshot's timestamp axis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Display label, unique within a snapshot.
    pub metric_identifier: String,
    /// Unit of the values.
    #[serde(default)]
    pub unit: String,
    /// One entry per timestamp; `None` marks a missing sample.
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

/// A model-derived prediction attached to a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Model name.
    #[serde(default)]
    pub name: Option<String>,
    /// Predicted label.
    #[serde(default)]
    pub prediction: Option<String>,
    /// Confidence in `[0, 1]`.
    #[serde(default)]
    pub probability: Option<f64>,
}

impl Series {
    /// Creates a series from a label and values.
    pub fn new(
        metric_identifier: impl Into<String>,
        unit: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            metric_identifier: metric_identifier.into(),
            unit: unit.into(),
            values,
        }
    }

    /// Returns the sample at `index`, treating out-of-range positions as absent.
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }
}

impl MetricsData {
    /// Creates a snapshot without an annotation.
    pub fn new(timestamp: Vec<String>, metrics: Vec<Series>) -> Self {
        Self {
            timestamp,
            metrics,
            model: None,
        }
    }

    /// Attaches an annotation.
    pub fn with_model(mut self, model: Annotation) -> Self {
        self.model = Some(model);
        self
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Returns `true` if there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty() || self.metrics.is_empty()
    }

    /// Checks that every series has one value per timestamp.
    pub fn validate(&self) -> Result<()> {
        let expected = self.timestamp.len();
        for series in &self.metrics {
            if series.values.len() != expected {
                return Err(ChartError::LengthMismatch {
                    series: series.metric_identifier.clone(),
                    expected,
                    found: series.values.len(),
                });
            }
        }
        Ok(())
    }

    /// Returns the length of the longest series label, in characters.
    pub fn longest_label(&self) -> usize {
        self.metrics
            .iter()
            .map(|s| s.metric_identifier.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Thins the snapshot to at most `max_points` positions.
    ///
    /// Keeps every `ceil(len / max_points)`-th position of the timestamp axis and of every
    /// series, so index correspondence is preserved. Absent samples stay absent.
    pub fn downsample(&self, max_points: usize) -> Self {
        let len = self.timestamp.len();
        if max_points == 0 || len <= max_points {
            return self.clone();
        }
        let step = len.div_ceil(max_points);
        let keep = |i: &usize| i % step == 0;

        Self {
            timestamp: (0..len)
                .filter(keep)
                .map(|i| self.timestamp[i].clone())
                .collect(),
            metrics: self
                .metrics
                .iter()
                .map(|s| Series {
                    metric_identifier: s.metric_identifier.clone(),
                    unit: s.unit.clone(),
                    values: (0..len).filter(keep).map(|i| s.value(i)).collect(),
                })
                .collect(),
            model: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamps(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("2024-03-01T00:{:02}:00Z", i % 60))
            .collect()
    }

    #[test]
    fn deserializes_camel_case_with_nulls() {
        let data = MetricsData::from_json(
            r#"{
                "timestamp": ["2024-03-01T00:00:00Z", "2024-03-01T00:01:00Z"],
                "metrics": [{ "metricIdentifier": "temp", "unit": "C", "values": [1.5, null] }],
                "model": { "name": "gear", "prediction": "ok", "probability": null }
            }"#,
        )
        .expect("valid snapshot");
        assert_eq!(data.metrics[0].values, vec![Some(1.5), None]);
        let model = data.model.expect("model present");
        assert_eq!(model.prediction.as_deref(), Some("ok"));
        assert_eq!(model.probability, None);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let data = MetricsData::from_json("{}").expect("empty object");
        assert!(data.is_empty());
        assert!(data.model.is_none());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn validate_reports_length_mismatch() {
        let data = MetricsData::new(stamps(3), vec![Series::new("a", "", vec![Some(1.0)])]);
        assert!(matches!(
            data.validate(),
            Err(ChartError::LengthMismatch {
                expected: 3,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn downsample_keeps_index_correspondence() {
        let values: Vec<Option<f64>> = (0..10)
            .map(|i| if i == 4 { None } else { Some(i as f64) })
            .collect();
        let data = MetricsData::new(stamps(10), vec![Series::new("a", "", values)]);

        let thin = data.downsample(4);
        // step = ceil(10 / 4) = 3 -> positions 0, 3, 6, 9
        assert_eq!(thin.timestamp.len(), 4);
        assert_eq!(thin.timestamp[1], data.timestamp[3]);
        assert_eq!(
            thin.metrics[0].values,
            vec![Some(0.0), Some(3.0), Some(6.0), Some(9.0)]
        );
        assert!(thin.validate().is_ok());

        assert_eq!(data.downsample(0), data);
        assert_eq!(data.downsample(50), data);
    }
}
