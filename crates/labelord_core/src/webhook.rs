//! GitHub webhook handling, independent of any web framework.
//!
//! The HTTP layer turns an incoming request into a [`WebhookRequest`], calls
//! [`handle`] and writes the returned [`WebhookResponse`] back. The only state
//! carried between deliveries is the [`DeliveryGuard`], passed in explicitly.

use std::collections::HashMap;

use github_client::LabelClient;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info, instrument, warn};

use crate::event_adapter::{EventAdapter, LabelEvent};

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the event name.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the HMAC-SHA256 signature of the body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// A webhook delivery as received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl WebhookRequest {
    /// Creates a request. Header names are stored lower-cased.
    pub fn new<I, K, V>(headers: I, body: Vec<u8>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
            body,
        }
    }

    /// Looks a header up by name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// The reply to a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            body: "OK".to_string(),
        }
    }

    pub fn bad_request() -> Self {
        Self {
            status: 400,
            body: "BAD REQUEST".to_string(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: 401,
            body: "UNAUTHORIZED".to_string(),
        }
    }
}

/// Body of a GitHub `label` event; only the fields used for propagation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LabelWebhookPayload {
    pub action: String,
    pub label: PayloadLabel,
    pub repository: PayloadRepository,
    #[serde(default)]
    pub changes: Option<PayloadChanges>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadLabel {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadRepository {
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadChanges {
    #[serde(default)]
    pub name: Option<PayloadChange>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PayloadChange {
    pub from: String,
}

/// Computes the `sha256=<hex>` signature GitHub sends for `body`.
pub fn sign_payload(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Returns `true` when `header` is the HMAC-SHA256 signature of `body` under
/// `secret`. The comparison is constant-time. A missing or malformed header
/// fails.
pub fn verify_signature(secret: &str, body: &[u8], header: Option<&str>) -> bool {
    let Some(hex_part) = header.and_then(|h| h.strip_prefix(SIGNATURE_PREFIX)) else {
        return false;
    };

    let Ok(received) = hex::decode(hex_part) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&received).is_ok()
}

/// Remembers the last (action, label name) pair processed.
///
/// Propagating a change makes GitHub emit the same event from every target
/// repository; those echoes must not be propagated again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryGuard {
    last: Option<(String, String)>,
}

impl DeliveryGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the delivery repeats the previous one. Otherwise the
    /// pair is remembered and `false` is returned.
    pub fn observe(&mut self, action: &str, label_name: &str) -> bool {
        let redundant = matches!(
            &self.last,
            Some((a, n)) if a == action && n == label_name
        );
        if !redundant {
            self.last = Some((action.to_string(), label_name.to_string()));
        }
        redundant
    }
}

/// What a delivery is checked and propagated against.
pub struct WebhookContext<'a> {
    pub secret: &'a str,
    /// Enabled repositories from the configuration.
    pub repositories: &'a [String],
    pub client: &'a dyn LabelClient,
}

/// Handles one webhook delivery.
///
/// - `ping` events are acknowledged.
/// - Events other than `label` are rejected with 400.
/// - A `label` event must carry a valid signature (401 otherwise), parse, and
///   come from a configured repository (400 otherwise).
/// - A delivery repeating the previous (action, label) pair is acknowledged
///   without doing anything.
/// - Otherwise the change is replayed on every other configured repository and
///   the delivery is acknowledged, whatever the individual outcomes.
#[instrument(skip_all, fields(event = request.header(EVENT_HEADER).unwrap_or("")))]
pub async fn handle(
    ctx: &WebhookContext<'_>,
    guard: &mut DeliveryGuard,
    request: &WebhookRequest,
) -> WebhookResponse {
    match request.header(EVENT_HEADER) {
        Some("ping") => {
            debug!("Ping received");
            return WebhookResponse::ok();
        }
        Some("label") => {}
        other => {
            debug!(event = ?other, "Ignoring unsupported event");
            return WebhookResponse::bad_request();
        }
    }

    if !verify_signature(ctx.secret, &request.body, request.header(SIGNATURE_HEADER)) {
        warn!("Rejected delivery with invalid signature");
        return WebhookResponse::unauthorized();
    }

    let payload: LabelWebhookPayload = match serde_json::from_slice(&request.body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Malformed label event payload");
            return WebhookResponse::bad_request();
        }
    };

    let Some(event) = LabelEvent::from_payload(&payload) else {
        debug!(action = payload.action.as_str(), "Unsupported label action");
        return WebhookResponse::bad_request();
    };

    if !ctx.repositories.contains(&event.origin) {
        warn!(
            origin = event.origin.as_str(),
            "Label event from a repository that is not configured"
        );
        return WebhookResponse::bad_request();
    }

    if guard.observe(&payload.action, &event.label.name) {
        debug!(
            action = payload.action.as_str(),
            label = event.label.name.as_str(),
            "Skipping redundant delivery"
        );
        return WebhookResponse::ok();
    }

    let report = EventAdapter::new(ctx.client)
        .apply(&event, ctx.repositories)
        .await;

    info!(
        origin = event.origin.as_str(),
        label = event.label.name.as_str(),
        failures = report.failures(),
        "Label event handled"
    );

    WebhookResponse::ok()
}
