use serde::Serialize;
use serde_json::Value;
use std::{fmt, path::Path};

use crate::parse::parse_float;

/// Raw text of the manual-entry form, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct SensorForm {
    pub hrv: String,
    pub spo2: String,
    pub accelerometer: String,
    pub gyroscope: String,
}

impl SensorForm {
    pub fn new(
        hrv: impl Into<String>,
        spo2: impl Into<String>,
        accelerometer: impl Into<String>,
        gyroscope: impl Into<String>,
    ) -> Self {
        Self {
            hrv: hrv.into(),
            spo2: spo2.into(),
            accelerometer: accelerometer.into(),
            gyroscope: gyroscope.into(),
        }
    }
}

// Wire body for POST /predict. serde_json writes non-finite floats as null,
// which is how blank or invalid readings reach the service.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "HRV")]
    pub hrv: f64,
    #[serde(rename = "SpO2")]
    pub spo2: f64,
    #[serde(rename = "Accelerometer")]
    pub accelerometer: f64,
    #[serde(rename = "Gyroscope")]
    pub gyroscope: f64,
}

impl PredictionRequest {
    pub fn from_form(form: &SensorForm) -> Self {
        Self {
            hrv: parse_float(&form.hrv),
            spo2: parse_float(&form.spo2),
            accelerometer: parse_float(&form.accelerometer),
            gyroscope: parse_float(&form.gyroscope),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }
}

/// Body of POST /upload: at most one file, no other fields.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadFile>,
}

impl UploadRequest {
    pub fn new(file: Option<UploadFile>) -> Self {
        Self { file }
    }

    pub fn empty() -> Self {
        Self { file: None }
    }
}

/// One risk field value as returned by the service.
///
/// `/predict` answers with scalars, `/upload` with one entry per uploaded row,
/// so the value is kept as raw JSON and only turned into text for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskValue(pub Value);

impl fmt::Display for RiskValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(&self.0, f)
    }
}

fn write_value(v: &Value, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match v {
        Value::String(s) => f.write_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_value(item, f)?;
            }
            Ok(())
        }
        // f64 Display drops the trailing ".0" of whole numbers
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(x) => write!(f, "{}", x),
            None => write!(f, "{}", n),
        },
        other => write!(f, "{}", other),
    }
}
