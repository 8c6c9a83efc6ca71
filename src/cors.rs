use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header::ORIGIN},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

use crate::error::AppError;

/// Fixed allow-list of origins permitted to call the API cross-origin.
#[derive(Clone, Debug)]
pub struct OriginPolicy {
    allowed: Arc<[HeaderValue]>,
}

impl OriginPolicy {
    pub fn new(origins: &[String]) -> anyhow::Result<Self> {
        let allowed = origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid origin {o:?}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { allowed: allowed.into() })
    }

    /// Requests without an `Origin` header are same-origin or non-browser and always pass.
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        origin.is_none_or(|o| self.allowed.contains(o))
    }

    /// Response headers for origins that passed [`enforce`].
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers(Any)
    }
}

pub async fn enforce(
    State(policy): State<OriginPolicy>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let origin = req.headers().get(ORIGIN);
    if !policy.allows(origin) {
        warn!(origin = ?origin, method = %req.method(), path = %req.uri().path(), "origin rejected");
        return Err(AppError::CorsRejected);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALLOWED_ORIGINS;

    fn policy() -> OriginPolicy {
        let origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect();
        OriginPolicy::new(&origins).unwrap()
    }

    #[test]
    fn missing_origin_is_allowed() {
        assert!(policy().allows(None));
    }

    #[test]
    fn listed_origins_are_allowed_exactly() {
        let policy = policy();
        assert!(policy.allows(Some(&HeaderValue::from_static("https://midu.dev"))));
        assert!(policy.allows(Some(&HeaderValue::from_static("http://localhost:8000"))));
        assert!(!policy.allows(Some(&HeaderValue::from_static("https://midu.dev.evil.com"))));
        assert!(!policy.allows(Some(&HeaderValue::from_static("http://localhost:3000"))));
    }

    #[test]
    fn invalid_origin_fails_construction() {
        assert!(OriginPolicy::new(&["bad\norigin".to_string()]).is_err());
    }
}
