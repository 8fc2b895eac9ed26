//! Credential-aware authenticated retrieval.
//!
//! This module contains:
//! - The [`HttpTransport`] capability and its request/response envelopes
//! - [`Fetcher`], which composes request building, transient credential
//!   decryption, auth injection, dispatch, and audit reporting
//!
//! Decrypted credentials exist only inside one `get` call and are dropped
//! before it returns. Audit events carry the vendor tag, the caller's call
//! description, and the response status - never credential material.

mod transport;

pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

use std::sync::Arc;

use log::debug;
use serde_json::json;

use crate::auth::AuthScheme;
use crate::errors::TelemetryError;
use crate::events::{AuditEvent, AuditEventSink};
use crate::models::CredentialSet;
use crate::secrets::SecretStore;

/// The remote identity one fetch is issued against: who we are calling and
/// how to authenticate.
#[derive(Clone)]
pub struct FetchTarget<'a> {
    /// Vendor tag used in audit events, e.g. `SOLAR_EDGE`.
    pub vendor: &'a str,
    /// The vendor family's credential injection scheme.
    pub auth: &'a AuthScheme,
    /// Credentials at rest; decrypted transiently per call.
    pub credentials: &'a CredentialSet,
}

/// Authenticated fetch orchestration over the transport capability.
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn HttpTransport>,
    secrets: SecretStore,
    audit: Arc<dyn AuditEventSink>,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        secrets: SecretStore,
        audit: Arc<dyn AuditEventSink>,
    ) -> Self {
        Self {
            transport,
            secrets,
            audit,
        }
    }

    /// Issue one authenticated call and decode the response.
    ///
    /// Builds the base request, applies the target's auth scheme using a
    /// transient decrypted view of its credentials, dispatches through the
    /// transport, and hands a successful response to `decode`. Exactly one
    /// audit event is recorded per dispatched call, success or failure.
    ///
    /// A transport fault or non-2xx status becomes a
    /// [`TelemetryError::RemoteCall`] carrying the vendor tag, the
    /// description, and the status when one was received. Nothing is
    /// retried here; the caller's polling schedule owns retry timing.
    pub async fn get<T, B, D>(
        &self,
        description: &str,
        target: FetchTarget<'_>,
        build: B,
        decode: D,
    ) -> Result<T, TelemetryError>
    where
        B: FnOnce() -> Result<HttpRequest, TelemetryError>,
        D: FnOnce(&HttpResponse) -> Result<T, TelemetryError>,
    {
        let base = build()?;

        // The decrypted set lives exactly as long as this block.
        let authed = {
            let transient = self.secrets.decrypt(target.credentials)?;
            target.auth.apply(base, &transient)
        };

        debug!("{} {}: dispatching", target.vendor, description);
        match self.transport.send(authed).await {
            Ok(response) if response.is_success() => {
                self.record(target.vendor, description, Some(response.status), None);
                decode(&response)
            }
            Ok(response) => {
                self.record(
                    target.vendor,
                    description,
                    Some(response.status),
                    Some("vendor returned a non-success status"),
                );
                Err(TelemetryError::RemoteCall {
                    vendor: target.vendor.to_string(),
                    description: description.to_string(),
                    status: Some(response.status),
                    message: truncate_body(&response.body),
                })
            }
            Err(err) => {
                self.record(target.vendor, description, None, Some(&err.to_string()));
                Err(TelemetryError::RemoteCall {
                    vendor: target.vendor.to_string(),
                    description: description.to_string(),
                    status: None,
                    message: err.to_string(),
                })
            }
        }
    }

    fn record(&self, vendor: &str, description: &str, status: Option<u16>, error: Option<&str>) {
        let mut tags = vec![vendor.to_string()];
        if error.is_some() {
            tags.push("error".to_string());
        }
        let event = AuditEvent::new(tags, description).with_detail(json!({
            "status": status,
            "error": error,
        }));
        self.audit.record(event);
    }
}

/// Vendor error bodies can be arbitrarily large; keep the diagnostic short.
fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 256;
    if body.len() <= LIMIT {
        body.to_string()
    } else {
        let cut = body
            .char_indices()
            .take_while(|(i, _)| *i <= LIMIT)
            .last()
            .map_or(0, |(i, _)| i);
        format!("{}...", &body[..cut])
    }
}
