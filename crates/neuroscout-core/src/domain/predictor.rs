//! Persisted predictor records.

use serde::{Deserialize, Serialize};

/// Marker the ingestion layer stores for a missing amplitude.
pub const NA_VALUE: &str = "n/a";

/// One value of a predictor's event series: a number or the `"n/a"`
/// marker.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorValue {
    Num(f64),
    Na,
}

impl PredictorValue {
    pub fn is_na(&self) -> bool {
        matches!(self, PredictorValue::Na)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PredictorValue::Num(v) => Some(*v),
            PredictorValue::Na => None,
        }
    }
}

impl Serialize for PredictorValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PredictorValue::Num(v) => serializer.serialize_f64(*v),
            PredictorValue::Na => serializer.serialize_str(NA_VALUE),
        }
    }
}

impl<'de> Deserialize<'de> for PredictorValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // The event store keeps values as text, so numbers may arrive as
        // either JSON numbers or numeric strings.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Num(v) => Ok(PredictorValue::Num(v)),
            Raw::Text(s) if s == NA_VALUE => Ok(PredictorValue::Na),
            Raw::Text(s) => s.parse::<f64>().map(PredictorValue::Num).map_err(|_| {
                serde::de::Error::custom(format!("expected a number or \"n/a\", got {:?}", s))
            }),
        }
    }
}

/// Persisted predictor record.
///
/// The derived fields are recomputed from `float_values` on demand and
/// written back; they are never independently authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Predictor {
    pub id: i64,
    pub name: String,

    /// Event value sequence, numeric with interspersed `"n/a"` markers.
    pub float_values: Vec<PredictorValue>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub mean: Option<f64>,

    /// Count of `"n/a"` markers observed in `float_values`, not the
    /// non-missing complement.
    #[serde(default)]
    pub num_na: Option<usize>,
}

impl Predictor {
    /// Create a predictor with no derived fields yet.
    pub fn new(id: i64, name: impl Into<String>, float_values: Vec<PredictorValue>) -> Self {
        Self {
            id,
            name: name.into(),
            float_values,
            max: None,
            min: None,
            mean: None,
            num_na: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predictor_value_serde() {
        let num: PredictorValue = serde_json::from_str("2.5").expect("deserialize");
        assert_eq!(num, PredictorValue::Num(2.5));

        let na: PredictorValue = serde_json::from_str(r#""n/a""#).expect("deserialize");
        assert_eq!(na, PredictorValue::Na);

        let from_text: PredictorValue = serde_json::from_str(r#""2.5""#).expect("deserialize");
        assert_eq!(from_text, PredictorValue::Num(2.5));

        assert!(serde_json::from_str::<PredictorValue>(r#""bogus""#).is_err());
    }

    #[test]
    fn test_predictor_value_serialize() {
        assert_eq!(
            serde_json::to_string(&PredictorValue::Na).expect("serialize"),
            r#""n/a""#
        );
        assert_eq!(
            serde_json::to_string(&PredictorValue::Num(1.0)).expect("serialize"),
            "1.0"
        );
    }

    #[test]
    fn test_predictor_serde_roundtrip() {
        let pred = Predictor::new(
            12,
            "brightness",
            vec![
                PredictorValue::Num(0.4),
                PredictorValue::Na,
                PredictorValue::Num(0.9),
            ],
        );
        let json = serde_json::to_string(&pred).expect("serialize");
        let deserialized: Predictor = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(pred, deserialized);
    }

    #[test]
    fn test_predictor_new_defaults() {
        let pred = Predictor::new(1, "rt", vec![]);
        assert!(pred.max.is_none());
        assert!(pred.min.is_none());
        assert!(pred.mean.is_none());
        assert!(pred.num_na.is_none());
    }
}
