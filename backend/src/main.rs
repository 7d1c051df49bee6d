//! Symptom tracker entry-point: reads settings, connects the database and
//! identity provider, then serves the REST API.

mod server;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use aws_config::BehaviorVersion;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use symptom_tracker::domain::ports::{DisabledSummariser, SymptomSummariser};
use symptom_tracker::inbound::http::health::HealthState;
use symptom_tracker::outbound::cognito::CognitoIdentityProvider;
use symptom_tracker::outbound::jwks::JwksTokenVerifier;
use symptom_tracker::outbound::openai::ChatCompletionSummariser;
use symptom_tracker::outbound::persistence::{DbPool, RdsIamAuth};
use symptom_tracker::settings::Settings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = Settings::from_env(&DefaultEnv::new()).map_err(io::Error::other)?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let mut database = settings.database;
    if let Some(ca_bundle) = &settings.database_iam_ca_bundle {
        let auth = RdsIamAuth::new(database.database_url(), ca_bundle, aws.clone())
            .map_err(io::Error::other)?;
        info!("database connections use RDS IAM authentication");
        database = database.with_iam_auth(auth);
    }
    let pool = DbPool::new(database).await.map_err(io::Error::other)?;
    pool.ping().await.map_err(io::Error::other)?;

    let identity = CognitoIdentityProvider::new(
        aws_sdk_cognitoidentityprovider::Client::new(&aws),
        settings.cognito,
    );
    let verifier = JwksTokenVerifier::new(
        settings.tokens.jwks_url,
        settings.tokens.issuer,
        settings.outbound_timeout,
    )
    .map_err(io::Error::other)?;

    let summariser: Arc<dyn SymptomSummariser> = match settings.summariser {
        Some(chat) => Arc::new(
            ChatCompletionSummariser::new(chat, settings.outbound_timeout)
                .map_err(io::Error::other)?,
        ),
        None => {
            warn!("OPENAI_API not set; insights endpoint disabled");
            Arc::new(DisabledSummariser)
        }
    };

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let config = ServerConfig::new(bind_addr, pool, identity, Arc::new(verifier))
        .with_summariser(summariser)
        .with_rate_limit(settings.rate_limit);

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}
