use serde_json::Value;

use crate::types::RiskValue;

pub const STRESS_LEVEL: &str = "Stress Level";
pub const HEART_ALERT: &str = "Heart Alert";
pub const ERROR_FIELD: &str = "error";

/// Classified response of the prediction service.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success {
        stress_level: RiskValue,
        heart_alert: RiskValue,
    },
    /// Service reported an error in its `error` field.
    Failure { message: String },
    /// Parsed as JSON but matches neither shape.
    Malformed,
}

impl Outcome {
    /// Manual form: risk fields take precedence over `error`.
    pub fn from_prediction(body: &Value) -> Self {
        success(body)
            .or_else(|| failure(body))
            .unwrap_or(Outcome::Malformed)
    }

    /// Upload form: `error` takes precedence over risk fields.
    pub fn from_upload(body: &Value) -> Self {
        failure(body)
            .or_else(|| success(body))
            .unwrap_or(Outcome::Malformed)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

// A present-but-null field still counts as present.
fn success(body: &Value) -> Option<Outcome> {
    let obj = body.as_object()?;
    let stress_level = obj.get(STRESS_LEVEL)?;
    let heart_alert = obj.get(HEART_ALERT)?;
    Some(Outcome::Success {
        stress_level: RiskValue(stress_level.clone()),
        heart_alert: RiskValue(heart_alert.clone()),
    })
}

fn failure(body: &Value) -> Option<Outcome> {
    let err = body.as_object()?.get(ERROR_FIELD)?;
    if !is_truthy(err) {
        return None;
    }
    Some(Outcome::Failure {
        message: RiskValue(err.clone()).to_string(),
    })
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|x| x != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(s: Value, h: Value) -> Outcome {
        Outcome::Success {
            stress_level: RiskValue(s),
            heart_alert: RiskValue(h),
        }
    }

    #[test]
    fn test_prediction_success() {
        let body = json!({"Stress Level": "High", "Heart Alert": "Yes"});
        assert_eq!(Outcome::from_prediction(&body), ok(json!("High"), json!("Yes")));
    }

    #[test]
    fn test_prediction_prefers_risk_fields_over_error() {
        let body = json!({"Stress Level": 3.2, "Heart Alert": 0, "error": "ignored"});
        assert!(Outcome::from_prediction(&body).is_success());
    }

    #[test]
    fn test_upload_prefers_error_over_risk_fields() {
        let body = json!({"Stress Level": 3.2, "Heart Alert": 0, "error": "bad rows"});
        assert_eq!(
            Outcome::from_upload(&body),
            Outcome::Failure { message: "bad rows".into() }
        );
    }

    #[test]
    fn test_error_field() {
        let body = json!({"error": "invalid input"});
        let expected = Outcome::Failure { message: "invalid input".into() };
        assert_eq!(Outcome::from_prediction(&body), expected);
        assert_eq!(Outcome::from_upload(&body), expected);
    }

    #[test]
    fn test_falsy_error_is_not_a_failure() {
        for err in [json!(""), json!(null), json!(false), json!(0)] {
            let body = json!({ "error": err });
            assert_eq!(Outcome::from_prediction(&body), Outcome::Malformed);
            assert_eq!(Outcome::from_upload(&body), Outcome::Malformed);
        }
    }

    #[test]
    fn test_empty_and_partial_bodies_are_malformed() {
        assert_eq!(Outcome::from_prediction(&json!({})), Outcome::Malformed);
        assert_eq!(Outcome::from_upload(&json!({})), Outcome::Malformed);

        let partial = json!({"Stress Level": "Low"});
        assert_eq!(Outcome::from_prediction(&partial), Outcome::Malformed);
        assert_eq!(Outcome::from_upload(&partial), Outcome::Malformed);
    }

    #[test]
    fn test_non_object_bodies_are_malformed() {
        for body in [json!(null), json!([1, 2]), json!("text"), json!(5)] {
            assert_eq!(Outcome::from_prediction(&body), Outcome::Malformed);
            assert_eq!(Outcome::from_upload(&body), Outcome::Malformed);
        }
    }

    #[test]
    fn test_null_risk_fields_count_as_present() {
        let body = json!({"Stress Level": null, "Heart Alert": null});
        assert_eq!(Outcome::from_prediction(&body), ok(json!(null), json!(null)));
    }

    #[test]
    fn test_upload_per_row_arrays() {
        let body = json!({"Stress Level": [1.5, 2.5], "Heart Alert": [0, 1]});
        assert_eq!(
            Outcome::from_upload(&body),
            ok(json!([1.5, 2.5]), json!([0, 1]))
        );
    }
}
