//! RDS IAM authentication for pooled connections.
//!
//! Each new connection signs a fresh auth token with the ambient AWS
//! credentials and uses it as the password over TLS. Tokens expire after
//! fifteen minutes, so they are never cached on the pool.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_rds::auth_token::{AuthTokenGenerator, Config as TokenConfig};
use diesel::ConnectionError;
use diesel::result::ConnectionResult;
use diesel_async::AsyncPgConnection;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::pem::PemObject;
use rustls::{ClientConfig, RootCertStore};
use tokio_postgres::config::SslMode;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::{debug, warn};
use url::Url;

use super::pool::PoolError;

const DEFAULT_PORT: u16 = 5432;

/// Connection factory signing an RDS auth token per connection.
#[derive(Clone)]
pub struct RdsIamAuth {
    host: String,
    generator: Arc<AuthTokenGenerator>,
    sdk_config: SdkConfig,
    tls: MakeRustlsConnect,
}

impl fmt::Debug for RdsIamAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RdsIamAuth")
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

impl RdsIamAuth {
    /// Prepare token signing for the host, port, and user in `database_url`,
    /// trusting only the certificates in `ca_bundle`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the URL lacks a host or user, or the
    /// CA bundle cannot be read or holds no certificates.
    pub fn new(
        database_url: &str,
        ca_bundle: &Path,
        sdk_config: SdkConfig,
    ) -> Result<Self, PoolError> {
        let url = Url::parse(database_url)
            .map_err(|err| PoolError::build(format!("invalid database url: {err}")))?;
        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| PoolError::build("IAM authentication needs a database host"))?
            .to_owned();
        if url.username().is_empty() {
            return Err(PoolError::build("IAM authentication needs a database user"));
        }
        let port = url.port().unwrap_or(DEFAULT_PORT);

        let tls = tls_connector(ca_bundle)?;
        let token_config = TokenConfig::builder()
            .hostname(host.as_str())
            .port(port.into())
            .username(url.username())
            .build()
            .map_err(|err| PoolError::build(format!("rds token config: {err}")))?;

        Ok(Self {
            host,
            generator: Arc::new(AuthTokenGenerator::new(token_config)),
            sdk_config,
            tls,
        })
    }

    /// Open one TLS connection authenticated with a freshly signed token.
    pub(super) fn connect(
        &self,
        database_url: &str,
    ) -> BoxFuture<'static, ConnectionResult<AsyncPgConnection>> {
        let generator = Arc::clone(&self.generator);
        let sdk_config = self.sdk_config.clone();
        let tls = self.tls.clone();
        let database_url = database_url.to_owned();
        async move {
            let token = generator
                .auth_token(&sdk_config)
                .await
                .map_err(|err| ConnectionError::BadConnection(format!("rds auth token: {err}")))?;
            let mut config: tokio_postgres::Config = database_url
                .parse()
                .map_err(|err: tokio_postgres::Error| {
                    ConnectionError::InvalidConnectionUrl(err.to_string())
                })?;
            config.password(token.as_str()).ssl_mode(SslMode::Require);
            let (client, connection) = config.connect(tls).await.map_err(|err| {
                debug!(error = %err, "rds iam connection failed");
                ConnectionError::BadConnection(err.to_string())
            })?;
            tokio::spawn(async move {
                if let Err(err) = connection.await {
                    warn!(error = %err, "rds iam connection closed with an error");
                }
            });
            AsyncPgConnection::try_from(client).await
        }
        .boxed()
    }
}

fn tls_connector(ca_bundle: &Path) -> Result<MakeRustlsConnect, PoolError> {
    let bundle_error =
        |err: &dyn fmt::Display| PoolError::build(format!("{}: {err}", ca_bundle.display()));

    let mut roots = RootCertStore::empty();
    for cert in CertificateDer::pem_file_iter(ca_bundle).map_err(|err| bundle_error(&err))? {
        let cert = cert.map_err(|err| bundle_error(&err))?;
        roots.add(cert).map_err(|err| bundle_error(&err))?;
    }
    if roots.is_empty() {
        return Err(bundle_error(&"contains no certificates"));
    }

    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|err| PoolError::build(format!("tls configuration: {err}")))?
    .with_root_certificates(roots)
    .with_no_client_auth();
    Ok(MakeRustlsConnect::new(config))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use aws_config::{BehaviorVersion, Region};
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn sdk_config() -> SdkConfig {
        SdkConfig::builder()
            .region(Region::new("eu-west-1"))
            .behavior_version(BehaviorVersion::latest())
            .build()
    }

    fn key_only_pem() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/outbound/jwks/test_rsa.pem")
    }

    fn build_message(result: Result<RdsIamAuth, PoolError>) -> String {
        match result {
            Ok(auth) => panic!("expected a build error, got {auth:?}"),
            Err(PoolError::Build { message }) => message,
            Err(other) => panic!("expected a build error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("postgres://db.internal:5432/symptoms", "needs a database user")]
    #[case("postgres:///symptoms", "needs a database host")]
    #[case("not a url", "invalid database url")]
    fn database_url_must_name_host_and_user(
        sdk_config: SdkConfig,
        #[case] url: &str,
        #[case] expected: &str,
    ) {
        let message = build_message(RdsIamAuth::new(url, &key_only_pem(), sdk_config));
        assert!(message.contains(expected), "unexpected message: {message}");
    }

    #[rstest]
    fn missing_ca_bundle_is_reported(sdk_config: SdkConfig) {
        let message = build_message(RdsIamAuth::new(
            "postgres://tracker@db.internal/symptoms",
            Path::new("/nonexistent/rds-bundle.pem"),
            sdk_config,
        ));
        assert!(message.starts_with("/nonexistent/rds-bundle.pem"));
    }

    #[rstest]
    fn bundle_without_certificates_is_rejected(sdk_config: SdkConfig) {
        let message = build_message(RdsIamAuth::new(
            "postgres://tracker@db.internal/symptoms",
            &key_only_pem(),
            sdk_config,
        ));
        assert!(message.ends_with("contains no certificates"));
    }
}
