use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::ClientError;
use crate::outcome::Outcome;

pub const PREDICTION_FAILED: &str = "Prediction failed. Please try again.";
pub const UPLOAD_MISSING_PREDICTION: &str =
    "File uploaded, but the response did not include a prediction.";

/// Where a form's result text ends up. Every call replaces the previous content.
pub trait ResultContainer: Send + Sync {
    fn show(&self, text: &str);
}

impl<T: ResultContainer + ?Sized> ResultContainer for Arc<T> {
    fn show(&self, text: &str) {
        (**self).show(text)
    }
}

/// Writes results to stdout; diagnostics go to stderr through tracing.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalContainer;

impl ResultContainer for TerminalContainer {
    fn show(&self, text: &str) {
        println!("{}", text);
    }
}

/// Keeps the latest result in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryContainer {
    content: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<String> {
        self.content.lock().clone()
    }

    /// Number of times the content has been overwritten.
    pub fn writes(&self) -> usize {
        *self.writes.lock()
    }
}

impl ResultContainer for MemoryContainer {
    fn show(&self, text: &str) {
        *self.content.lock() = Some(text.to_string());
        *self.writes.lock() += 1;
    }
}

pub fn render_prediction(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success {
            stress_level,
            heart_alert,
        } => format!("Stress Level: {}\nHeart Alert: {}", stress_level, heart_alert),
        Outcome::Failure { message } => format!("Error: {}", message),
        Outcome::Malformed => PREDICTION_FAILED.to_string(),
    }
}

pub fn render_upload(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success {
            stress_level,
            heart_alert,
        } => format!(
            "File uploaded successfully. Stress Level: {}, Heart Alert: {}",
            stress_level, heart_alert
        ),
        Outcome::Failure { message } => format!("Error: {}", message),
        Outcome::Malformed => UPLOAD_MISSING_PREDICTION.to_string(),
    }
}

pub fn render_transport_error(err: &ClientError) -> String {
    format!("Error: {}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RiskValue;
    use serde_json::json;

    #[test]
    fn test_prediction_texts() {
        let ok = Outcome::Success {
            stress_level: RiskValue(json!("High")),
            heart_alert: RiskValue(json!("Yes")),
        };
        assert_eq!(render_prediction(&ok), "Stress Level: High\nHeart Alert: Yes");

        let failed = Outcome::Failure { message: "invalid input".into() };
        assert_eq!(render_prediction(&failed), "Error: invalid input");

        assert_eq!(render_prediction(&Outcome::Malformed), PREDICTION_FAILED);
    }

    #[test]
    fn test_upload_texts() {
        let ok = Outcome::Success {
            stress_level: RiskValue(json!([2.5, 4.0])),
            heart_alert: RiskValue(json!([0, 1])),
        };
        assert_eq!(
            render_upload(&ok),
            "File uploaded successfully. Stress Level: 2.5,4, Heart Alert: 0,1"
        );

        let failed = Outcome::Failure { message: "No file part".into() };
        assert_eq!(render_upload(&failed), "Error: No file part");

        let malformed = render_upload(&Outcome::Malformed);
        assert!(!malformed.contains("undefined"));
    }

    #[test]
    fn test_memory_container_overwrites() {
        let container = MemoryContainer::new();
        assert_eq!(container.content(), None);

        container.show("first");
        container.show("second");

        assert_eq!(container.content().as_deref(), Some("second"));
        assert_eq!(container.writes(), 2);
    }
}
