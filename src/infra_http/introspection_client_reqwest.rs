use crate::domain_port::*;
use std::time::Duration;

pub struct ReqwestIntrospectionClient {
    http: reqwest::Client,
}

impl ReqwestIntrospectionClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl IntrospectionClient for ReqwestIntrospectionClient {
    async fn introspect(
        &self,
        request: &IntrospectionRequest,
    ) -> Result<ProviderResponse, IntrospectionError> {
        // without_url(): the url carries the token in its query string
        let resp = self
            .http
            .get(request.endpoint.clone())
            .query(&request.query)
            .send()
            .await
            .map_err(|e| IntrospectionError::Unreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(IntrospectionError::Rejected {
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| IntrospectionError::Unreachable(e.without_url().to_string()))?;

        serde_json::from_slice::<ProviderResponse>(&body)
            .map_err(|e| IntrospectionError::Decode(e.to_string()))
    }
}
