//! Vendor authentication schemes.
//!
//! One variant per scheme observed across the supported vendor families,
//! selected at configuration time. Credential injection is pure: `apply`
//! consumes the base request and returns a new one, so a caller's retained
//! request never grows a decrypted header behind its back.
//!
//! Every variant follows the same tie-break rule: inject only when the
//! decrypted credential set actually carries a non-empty value for the
//! declared key. Vendors whose auth is structural (a per-device hostname,
//! say) configure [`AuthScheme::None`] and pass through untouched.

use log::warn;
use url::Url;

use crate::fetch::HttpRequest;
use crate::models::CredentialSet;

/// A header name paired with the credential key that fills it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCredential {
    /// Header to set, e.g. `X-AE-ApiKey`.
    pub header: String,
    /// Credential key holding the value.
    pub credential: String,
}

impl HeaderCredential {
    pub fn new(header: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            credential: credential.into(),
        }
    }
}

/// Credential injection strategy for one vendor family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// Structural authentication; nothing to inject.
    None,

    /// API key carried as a URL query parameter.
    QueryParamKey {
        /// Query parameter name, e.g. `api_key`.
        param: String,
        /// Credential key holding the value.
        credential: String,
    },

    /// One or two custom headers, each optional on its own.
    HeaderPair {
        first: HeaderCredential,
        second: Option<HeaderCredential>,
    },

    /// Standard bearer authorization, plus a forced JSON accept header.
    BearerToken {
        /// Credential key holding the token.
        credential: String,
    },
}

impl AuthScheme {
    /// Inject credentials into an outgoing request.
    ///
    /// Re-applying a scheme is idempotent: a query parameter already present
    /// is not duplicated, and header insertion overwrites rather than stacks.
    pub fn apply(&self, request: HttpRequest, credentials: &CredentialSet) -> HttpRequest {
        match self {
            Self::None => request,
            Self::QueryParamKey { param, credential } => {
                match credentials.secret_value(credential) {
                    Some(value) => append_query_param(request, param, value),
                    None => request,
                }
            }
            Self::HeaderPair { first, second } => {
                let request = apply_header(request, first, credentials);
                match second {
                    Some(pair) => apply_header(request, pair, credentials),
                    None => request,
                }
            }
            Self::BearerToken { credential } => {
                // This vendor family rejects anything but JSON regardless of
                // whether a token is configured.
                let request = request.with_header("accept", "application/json");
                match credentials.secret_value(credential) {
                    Some(token) => request.with_header("authorization", format!("Bearer {token}")),
                    None => request,
                }
            }
        }
    }
}

/// Skip silently when the configured value is absent; a header pair where
/// only one side is configured is valid.
fn apply_header(
    request: HttpRequest,
    pair: &HeaderCredential,
    credentials: &CredentialSet,
) -> HttpRequest {
    match credentials.secret_value(&pair.credential) {
        Some(value) => request.with_header(&pair.header, value),
        None => request,
    }
}

fn append_query_param(mut request: HttpRequest, param: &str, value: &str) -> HttpRequest {
    let mut url = match Url::parse(&request.url) {
        Ok(url) => url,
        Err(e) => {
            // Leave an unparseable URL for the transport to reject.
            warn!("skipping credential injection, URL does not parse: {e}");
            return request;
        }
    };

    let already_present = url.query_pairs().any(|(name, _)| name == param);
    if !already_present {
        url.query_pairs_mut().append_pair(param, value);
        request.url = url.to_string();
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> CredentialSet {
        CredentialSet::new()
            .with_secret("apiKey", "k-123")
            .with_secret("accountKey", "a-456")
    }

    #[test]
    fn test_query_param_key_appends_parameter() {
        let scheme = AuthScheme::QueryParamKey {
            param: "api_key".to_string(),
            credential: "apiKey".to_string(),
        };
        let request = HttpRequest::get("https://portal.example.com/v2/site/1/energy?unit=WH");

        let authed = scheme.apply(request, &credentials());
        assert_eq!(
            authed.url,
            "https://portal.example.com/v2/site/1/energy?unit=WH&api_key=k-123"
        );
    }

    #[test]
    fn test_query_param_key_applied_twice_does_not_duplicate() {
        let scheme = AuthScheme::QueryParamKey {
            param: "api_key".to_string(),
            credential: "apiKey".to_string(),
        };
        let request = HttpRequest::get("https://portal.example.com/v2/site/1/energy");

        let once = scheme.apply(request, &credentials());
        let twice = scheme.apply(once.clone(), &credentials());

        assert_eq!(once, twice);
        assert_eq!(twice.url.matches("api_key").count(), 1);
    }

    #[test]
    fn test_query_param_key_without_declared_credential_passes_through() {
        let scheme = AuthScheme::QueryParamKey {
            param: "api_key".to_string(),
            credential: "apiKey".to_string(),
        };
        let request = HttpRequest::get("https://portal.example.com/v2/site/1/energy");

        let authed = scheme.apply(request.clone(), &CredentialSet::new());
        assert_eq!(authed, request);
    }

    #[test]
    fn test_header_pair_skips_missing_side() {
        let scheme = AuthScheme::HeaderPair {
            first: HeaderCredential::new("X-AE-AccountKey", "accountKey"),
            second: Some(HeaderCredential::new("X-AE-ApiKey", "missingKey")),
        };
        let request = HttpRequest::get("https://portal.example.com/data");

        let authed = scheme.apply(request, &credentials());
        assert_eq!(
            authed.headers.get("x-ae-accountkey").map(String::as_str),
            Some("a-456")
        );
        assert!(!authed.has_header("x-ae-apikey"));
    }

    #[test]
    fn test_bearer_token_sets_authorization_and_accept() {
        let scheme = AuthScheme::BearerToken {
            credential: "apiKey".to_string(),
        };
        let request = HttpRequest::get("https://portal.example.com/data");

        let authed = scheme.apply(request, &credentials());
        assert_eq!(
            authed.headers.get("authorization").map(String::as_str),
            Some("Bearer k-123")
        );
        assert_eq!(
            authed.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_bearer_token_without_key_still_forces_accept() {
        let scheme = AuthScheme::BearerToken {
            credential: "apiKey".to_string(),
        };
        let request = HttpRequest::get("https://portal.example.com/data");

        let authed = scheme.apply(request, &CredentialSet::new());
        assert!(!authed.has_header("authorization"));
        assert_eq!(
            authed.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_none_scheme_passes_through() {
        let request = HttpRequest::get("https://inverter-7.local/measurements");
        let authed = AuthScheme::None.apply(request.clone(), &credentials());
        assert_eq!(authed, request);
    }

    #[test]
    fn test_apply_does_not_mutate_the_base_request() {
        let scheme = AuthScheme::BearerToken {
            credential: "apiKey".to_string(),
        };
        let base = HttpRequest::get("https://portal.example.com/data");
        let retained = base.clone();

        let _ = scheme.apply(base, &credentials());
        assert!(!retained.has_header("authorization"));
    }
}
