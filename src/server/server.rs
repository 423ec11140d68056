use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::Provider;
use crate::domain_port::*;
use crate::infra_http::*;
use crate::infra_memory::*;
use crate::logger::*;
use crate::server::*;
use crate::settings::Settings;
use nanoid::nanoid;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

pub struct Server {
    pub token_verification_service: Arc<dyn TokenVerificationService>,
    pub default_provider: String,
    sweeper_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    /// Must be called from within a tokio runtime when the cache sweeper is enabled.
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let alphabet: [char; 16] = [
            '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', 'a', 'b', 'c', 'd', 'e', 'f',
        ];
        let run_id = nanoid!(10, &alphabet);

        let default_provider: Provider = settings.verifier.default_provider.parse()?;

        let default_ttl = i64::try_from(settings.cache.default_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| anyhow::anyhow!("cache.default_ttl_secs out of range"))?;

        let provider_verifier: Arc<dyn ProviderVerifier> =
            match settings.verifier.backend.as_str() {
                "fake" => Arc::new(FakeProviderVerifier::new().with_ttl(default_ttl)),
                "real" => Arc::new(build_real_verifier(settings, default_ttl)?),
                other => return Err(anyhow::anyhow!("Unknown verifier backend: {}", other)),
            };

        // One cache per process, shared by every request.
        let token_cache: Arc<dyn TokenCache> = Arc::new(MemoryTokenCache::new());

        let token_verification_service: Arc<dyn TokenVerificationService> = Arc::new(
            RealTokenVerificationService::new(token_cache.clone(), provider_verifier),
        );

        let cancel = CancellationToken::new();
        let sweeper_handle = match settings.cache.sweep_interval_secs {
            0 => None,
            secs => {
                let sweeper = CacheSweeper::new(
                    token_cache.clone(),
                    Duration::from_secs(secs),
                    cancel.clone(),
                );
                Some(tokio::spawn(async move { sweeper.run().await }))
            }
        };

        info!(
            %run_id,
            backend = %settings.verifier.backend,
            default_provider = %default_provider,
            "server started"
        );

        Ok(Self {
            token_verification_service,
            default_provider: default_provider.to_string(),
            sweeper_handle: Mutex::new(sweeper_handle),
            cancel,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = match self.sweeper_handle.lock() {
            Ok(mut lock) => lock.take(),
            Err(_) => None,
        };
        if let Some(handle) = handle {
            let r = handle.await;
            info!("sweeper handle dropped: {:?}", r);
        }
    }
}

fn build_real_verifier(
    settings: &Settings,
    default_ttl: chrono::Duration,
) -> anyhow::Result<RealProviderVerifier> {
    let client: Arc<dyn IntrospectionClient> = Arc::new(ReqwestIntrospectionClient::new(
        Duration::from_secs(settings.verifier.request_timeout_secs),
    )?);

    let mut verifier = RealProviderVerifier::new(client)?.with_default_ttl(default_ttl);
    for (name, overrides) in &settings.providers {
        let provider: Provider = name.parse()?;
        let endpoint = Url::parse(&overrides.endpoint)
            .map_err(|e| anyhow::anyhow!("invalid endpoint for {}: {}", name, e))?;
        info!(%provider, %endpoint, "provider endpoint overridden");
        verifier = verifier.with_endpoint(provider, endpoint);
    }
    Ok(verifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::*;

    fn settings(backend: &str, providers: &str) -> Settings {
        parse_settings_str(&format!(
            r#"
            [http]
            address = "127.0.0.1:0"

            [log]
            filter = "info"

            [verifier]
            backend = "{backend}"

            {providers}
            "#
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn fake_backend_verifies_fake_tokens() {
        let server = Server::try_new(&settings("fake", "")).unwrap();
        let user = server
            .token_verification_service
            .verify("Bearer fake-token:a@b.com", &server.default_provider)
            .await
            .unwrap();
        assert_eq!(user.email, "a@b.com");
        server.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_backend_is_rejected() {
        assert!(Server::try_new(&settings("ldap", "")).is_err());
    }

    #[tokio::test]
    async fn override_for_unknown_provider_is_rejected() {
        let s = settings(
            "real",
            "[providers.myspace]\nendpoint = \"http://127.0.0.1/x\"",
        );
        assert!(Server::try_new(&s).is_err());
    }

    #[tokio::test]
    async fn real_backend_accepts_valid_override() {
        let s = settings(
            "real",
            "[providers.google]\nendpoint = \"http://127.0.0.1:8080/tokeninfo\"",
        );
        assert!(Server::try_new(&s).is_ok());
    }

    #[tokio::test]
    async fn oversized_default_ttl_is_rejected() {
        for backend in ["fake", "real"] {
            let mut s = settings(backend, "");
            s.cache.default_ttl_secs = u64::MAX;
            assert!(Server::try_new(&s).is_err());
        }
    }

    #[tokio::test]
    async fn sweeper_starts_and_stops() {
        let mut s = settings("fake", "");
        s.cache.sweep_interval_secs = 1;
        let server = Server::try_new(&s).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server.shutdown())
            .await
            .unwrap();
    }
}
