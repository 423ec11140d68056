use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Time a verified token is trusted for when the provider gives no `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60;

pub struct RealProviderVerifier {
    client: Arc<dyn IntrospectionClient>,
    endpoints: HashMap<Provider, Url>,
    default_ttl: Duration,
}

impl RealProviderVerifier {
    pub fn new(client: Arc<dyn IntrospectionClient>) -> anyhow::Result<Self> {
        let endpoints = Provider::ALL
            .into_iter()
            .map(|p| Url::parse(p.spec().endpoint).map(|url| (p, url)))
            .collect::<Result<HashMap<_, _>, _>>()?;

        Ok(Self {
            client,
            endpoints,
            default_ttl: Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
        })
    }

    pub fn with_endpoint(mut self, provider: Provider, endpoint: Url) -> Self {
        self.endpoints.insert(provider, endpoint);
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    fn request_for(&self, provider: Provider, token: &str) -> Option<IntrospectionRequest> {
        let endpoint = self.endpoints.get(&provider)?.clone();
        let query = provider
            .spec()
            .token_params
            .iter()
            .map(|param| (param.to_string(), token.to_string()))
            .collect();
        Some(IntrospectionRequest { endpoint, query })
    }
}

#[async_trait::async_trait]
impl ProviderVerifier for RealProviderVerifier {
    async fn verify(&self, token: &str, provider: &str) -> Result<VerifiedIdentity, VerifyError> {
        let provider: Provider = provider.parse()?;
        let request = self
            .request_for(provider, token)
            .ok_or_else(|| VerifyError::UnsupportedProvider(provider.to_string()))?;

        let body = self.client.introspect(&request).await?;
        let now = Utc::now();

        let user = extract_user(&body, provider.spec()).ok_or(VerifyError::MissingUserInfo)?;
        let expires_at = expires_in(&body)
            .and_then(Duration::try_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(now + self.default_ttl);

        Ok(VerifiedIdentity { user, expires_at })
    }
}

/// Some providers wrap their answer in a `data` object.
fn payload(body: &ProviderResponse) -> &ProviderResponse {
    match body.get("data") {
        Some(Value::Object(data)) => data,
        _ => body,
    }
}

fn string_field<'a>(map: &'a ProviderResponse, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

pub(crate) fn extract_user(body: &ProviderResponse, spec: &ProviderSpec) -> Option<CanonicalUser> {
    let data = payload(body);
    let id = spec
        .id_fields
        .iter()
        .find_map(|field| string_field(data, field))?;
    let email = string_field(data, "email")?;

    let user = CanonicalUser::new(id, email);
    Some(match string_field(data, "name") {
        Some(name) => user.with_name(name),
        None => user,
    })
}

/// Seconds until the token expires, looked up beside the identity first.
fn expires_in(body: &ProviderResponse) -> Option<i64> {
    let seconds = |map: &ProviderResponse| {
        let value = map.get("expires_in")?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    };
    seconds(payload(body)).or_else(|| seconds(body))
}
