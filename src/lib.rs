//! Client side of the stress / heart-alert prediction service.
//!
//! Two submitters feed the service: manual entry of four sensor readings
//! (`POST /predict`, JSON) and file upload (`POST /upload`, multipart). Each
//! response is classified into an [`Outcome`] and rendered as text into the
//! form's [`ResultContainer`].

pub mod client;
pub mod config;
pub mod error;
pub mod outcome;
pub mod parse;
pub mod render;
pub mod submitter;
pub mod types;

pub use client::PredictionClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use outcome::Outcome;
pub use render::{MemoryContainer, ResultContainer, TerminalContainer};
pub use submitter::{bind, ManualSubmitter, Submission, UploadSubmitter};
pub use types::{PredictionRequest, RiskValue, SensorForm, UploadFile, UploadRequest};
