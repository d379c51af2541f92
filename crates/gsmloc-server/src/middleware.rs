use std::{collections::HashSet, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gsmloc_core::{AppConfig, Environment};
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request, available as an extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer tokens accepted on the control routes. `None` leaves them open.
#[derive(Debug, Clone)]
pub struct ControlAuth {
    tokens: Option<Arc<HashSet<String>>>,
}

impl ControlAuth {
    /// Accepts any of `tokens`. With no usable token the routes are left
    /// open when `allow_open` is set, and construction fails otherwise.
    pub fn new<I>(tokens: I, allow_open: bool) -> anyhow::Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let tokens: HashSet<String> = tokens
            .into_iter()
            .filter_map(|t| {
                let t = t.as_ref().trim();
                (!t.is_empty()).then(|| t.to_owned())
            })
            .collect();

        match (tokens.is_empty(), allow_open) {
            (false, _) => Ok(Self {
                tokens: Some(Arc::new(tokens)),
            }),
            (true, true) => {
                tracing::warn!("no GSMLOC_API_KEYS configured; control routes are unauthenticated");
                Ok(Self { tokens: None })
            }
            (true, false) => anyhow::bail!(
                "GSMLOC_API_KEYS must list at least one bearer token outside development"
            ),
        }
    }

    /// Tokens from `GSMLOC_API_KEYS`; only development may run without them.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.api_keys,
            matches!(config.env, Environment::Development),
        )
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.tokens.is_some()
    }

    fn accepts(&self, token: &str) -> bool {
        self.tokens.as_ref().is_none_or(|t| t.contains(token))
    }
}

pub async fn assign_request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);
    let header = HeaderValue::from_str(&id).ok();

    req.extensions_mut().insert(RequestId(id));
    let mut res = next.run(req).await;
    if let Some(header) = header {
        res.headers_mut().insert(REQUEST_ID_HEADER, header);
    }
    res
}

/// Rejects control requests without an accepted bearer token.
pub async fn require_control_token(
    State(auth): State<ControlAuth>,
    req: Request,
    next: Next,
) -> Response {
    let presented = bearer_token(req.headers().get(AUTHORIZATION));
    if presented.is_some_and(|t| auth.accepts(t)) || !auth.is_enabled() {
        return next.run(req).await;
    }

    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    tracing::warn!(
        request_id = %request_id,
        uri = %req.uri(),
        token_present = presented.is_some(),
        "control request rejected"
    );
    ApiError::new(
        request_id,
        "unauthorized",
        "missing or invalid bearer token",
    )
    .into_response()
}

fn bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    let (scheme, token) = value?.to_str().ok()?.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
