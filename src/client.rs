use reqwest::{multipart, Client, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::types::{PredictionRequest, UploadRequest};

/// Thin HTTP layer over the prediction service.
///
/// Bodies are decoded as JSON whatever the status code: the service answers
/// 400/500 with `{"error": ...}` and that message is meant for the user.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    config: ClientConfig,
}

impl PredictionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn predict(&self, request: &PredictionRequest) -> Result<Value, ClientError> {
        let url = self.config.predict_url();
        tracing::debug!(
            url = %url,
            hrv = request.hrv,
            spo2 = request.spo2,
            accelerometer = request.accelerometer,
            gyroscope = request.gyroscope,
            "sending prediction request"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        decode(url, response).await
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<Value, ClientError> {
        let url = self.config.upload_url();

        let mut form = multipart::Form::new();
        match request.file {
            Some(file) => {
                tracing::debug!(url = %url, file = %file.file_name, bytes = file.bytes.len(), "uploading file");
                let part = multipart::Part::bytes(file.bytes).file_name(file.file_name);
                form = form.part(self.config.upload_field.clone(), part);
            }
            None => {
                // the service answers with its own "No file part" error
                tracing::warn!(url = %url, "no file selected; sending empty upload form");
            }
        }

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.clone(), source })?;

        decode(url, response).await
    }
}

async fn decode(url: String, response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { url: url.clone(), source })?;
    tracing::debug!(url = %url, status = %status, len = body.len(), "response received");

    serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })
}
