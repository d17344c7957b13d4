//! Form submitters.
//!
//! One submitter is bound to one form and one result container. Starting a
//! submission aborts whatever the same submitter still has in flight, and only
//! the latest submission is allowed to write to the container.

use futures::future::{abortable, AbortHandle, Aborted};
use parking_lot::Mutex;
use serde_json::Value;

use crate::client::PredictionClient;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::outcome::Outcome;
use crate::render::{render_prediction, render_transport_error, render_upload, ResultContainer};
use crate::types::{PredictionRequest, SensorForm, UploadRequest};

/// How a single submission ended.
#[derive(Debug)]
pub enum Submission {
    /// The service answered with JSON and the classified outcome was rendered.
    Completed(Outcome),
    /// The request failed or the body was not JSON; `Error: ...` was rendered.
    TransportFailed(ClientError),
    /// A newer submission on the same form took over; nothing was rendered.
    Superseded,
}

impl Submission {
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Submission::Completed(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Submission::Superseded)
    }
}

#[derive(Default)]
struct Slot {
    generation: u64,
    handle: Option<AbortHandle>,
}

/// Tracks the latest submission of one form.
#[derive(Default)]
struct InFlight {
    slot: Mutex<Slot>,
}

impl InFlight {
    fn begin(&self, handle: AbortHandle) -> Ticket<'_> {
        let mut slot = self.slot.lock();
        if let Some(prev) = slot.handle.replace(handle) {
            tracing::debug!(generation = slot.generation, "aborting superseded submission");
            prev.abort();
        }
        slot.generation += 1;
        Ticket {
            in_flight: self,
            id: slot.generation,
        }
    }

    /// Runs `render` under the lock if `ticket` is still the latest submission.
    fn finish(&self, ticket: &Ticket<'_>, render: impl FnOnce()) -> bool {
        let mut slot = self.slot.lock();
        if slot.generation != ticket.id {
            return false;
        }
        slot.handle = None;
        render();
        true
    }

    fn is_busy(&self) -> bool {
        self.slot.lock().handle.is_some()
    }
}

/// One submission's claim on the slot. Dropping it (including when the
/// caller drops the `submit` future) releases the slot if still current.
struct Ticket<'a> {
    in_flight: &'a InFlight,
    id: u64,
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        let mut slot = self.in_flight.slot.lock();
        if slot.generation == self.id {
            slot.handle = None;
        }
    }
}

fn settle<C: ResultContainer>(
    form: &'static str,
    in_flight: &InFlight,
    ticket: Ticket<'_>,
    container: &C,
    result: Result<Result<Value, ClientError>, Aborted>,
    classify: fn(&Value) -> Outcome,
    render: fn(&Outcome) -> String,
) -> Submission {
    let result = match result {
        Ok(result) => result,
        Err(Aborted) => {
            tracing::debug!(form, ticket = ticket.id, "submission aborted");
            return Submission::Superseded;
        }
    };

    let (text, submission) = match result {
        Ok(body) => {
            let outcome = classify(&body);
            (render(&outcome), Submission::Completed(outcome))
        }
        Err(err) => (render_transport_error(&err), Submission::TransportFailed(err)),
    };

    if !in_flight.finish(&ticket, || container.show(&text)) {
        tracing::debug!(form, ticket = ticket.id, "stale response dropped");
        return Submission::Superseded;
    }

    match &submission {
        Submission::TransportFailed(err) => tracing::error!(form, error = %err, "submission failed"),
        Submission::Completed(Outcome::Failure { message }) => {
            tracing::warn!(form, message = %message, "service reported an error")
        }
        Submission::Completed(Outcome::Malformed) => {
            tracing::warn!(form, "response did not match a known shape")
        }
        _ => tracing::info!(form, "prediction rendered"),
    }
    submission
}

/// Sends the four sensor readings as JSON to `/predict`.
pub struct ManualSubmitter<C> {
    client: PredictionClient,
    container: C,
    in_flight: InFlight,
}

impl<C: ResultContainer> ManualSubmitter<C> {
    pub fn new(client: PredictionClient, container: C) -> Self {
        Self {
            client,
            container,
            in_flight: InFlight::default(),
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub async fn submit(&self, form: &SensorForm) -> Submission {
        let request = PredictionRequest::from_form(form);
        let (exchange, handle) = abortable(self.client.predict(&request));
        let ticket = self.in_flight.begin(handle);

        settle(
            "manual",
            &self.in_flight,
            ticket,
            &self.container,
            exchange.await,
            Outcome::from_prediction,
            render_prediction,
        )
    }
}

/// Sends one file as multipart form data to `/upload`.
pub struct UploadSubmitter<C> {
    client: PredictionClient,
    container: C,
    in_flight: InFlight,
}

impl<C: ResultContainer> UploadSubmitter<C> {
    pub fn new(client: PredictionClient, container: C) -> Self {
        Self {
            client,
            container,
            in_flight: InFlight::default(),
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub async fn submit(&self, request: UploadRequest) -> Submission {
        let (exchange, handle) = abortable(self.client.upload(request));
        let ticket = self.in_flight.begin(handle);

        settle(
            "upload",
            &self.in_flight,
            ticket,
            &self.container,
            exchange.await,
            Outcome::from_upload,
            render_upload,
        )
    }
}

/// Binds one submitter per form, sharing a single HTTP client.
pub fn bind<M, U>(
    config: &ClientConfig,
    manual: M,
    upload: U,
) -> Result<(ManualSubmitter<M>, UploadSubmitter<U>), ClientError>
where
    M: ResultContainer,
    U: ResultContainer,
{
    let client = PredictionClient::new(config.clone())?;
    Ok((
        ManualSubmitter::new(client.clone(), manual),
        UploadSubmitter::new(client, upload),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_aborts_previous() {
        let in_flight = InFlight::default();
        let (_f1, h1) = abortable(async {});
        let (_f2, h2) = abortable(async {});

        let first = in_flight.begin(h1.clone());
        let second = in_flight.begin(h2);

        assert!(h1.is_aborted());
        assert!(second.id > first.id);
        assert!(in_flight.is_busy());
    }

    #[test]
    fn test_dropped_ticket_releases_slot() {
        let in_flight = InFlight::default();
        let (_f, h) = abortable(async {});

        let ticket = in_flight.begin(h);
        assert!(in_flight.is_busy());

        drop(ticket);
        assert!(!in_flight.is_busy(), "abandoned submission must not stay busy");
    }

    #[test]
    fn test_stale_ticket_drop_keeps_newer_handle() {
        let in_flight = InFlight::default();
        let (_f1, h1) = abortable(async {});
        let (_f2, h2) = abortable(async {});

        let stale = in_flight.begin(h1);
        let _fresh = in_flight.begin(h2);

        drop(stale);
        assert!(in_flight.is_busy());
    }

    #[test]
    fn test_stale_ticket_does_not_render() {
        let in_flight = InFlight::default();
        let (_f1, h1) = abortable(async {});
        let (_f2, h2) = abortable(async {});

        let stale = in_flight.begin(h1);
        let fresh = in_flight.begin(h2);

        let mut rendered = Vec::new();
        assert!(!in_flight.finish(&stale, || rendered.push("stale")));
        assert!(in_flight.finish(&fresh, || rendered.push("fresh")));

        assert_eq!(rendered, vec!["fresh"]);
        assert!(!in_flight.is_busy());
    }
}
