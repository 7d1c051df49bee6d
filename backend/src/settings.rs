//! Environment-driven process settings.
//!
//! Everything is read through [`mockable::Env`] so parsing can be exercised
//! with `MockEnv` in tests. Optional values fall back to documented
//! defaults; required values and malformed numbers are reported through
//! [`ConfigError`].

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use mockable::Env;
use url::Url;

use crate::middleware::RateLimitConfig;
use crate::outbound::cognito::{CognitoSettings, SecretHasher};
use crate::outbound::openai::{ChatCompletionSettings, DEFAULT_MODEL};
use crate::outbound::persistence::PoolConfig;

const PORT_ENV: &str = "PORT";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_HOST_ENV: &str = "DATABASE_HOST";
const RDS_ENDPOINT_ENV: &str = "RDS_ENDPOINT";
const DATABASE_PORT_ENV: &str = "DATABASE_PORT";
const DATABASE_NAME_ENV: &str = "DATABASE_NAME";
const DATABASE_USER_ENV: &str = "DATABASE_USER";
const DATABASE_PASSWORD_ENV: &str = "DATABASE_PASSWORD";
const DATABASE_MAX_CONNECTIONS_ENV: &str = "DATABASE_MAX_CONNECTIONS";
const DATABASE_IAM_AUTH_ENV: &str = "DATABASE_IAM_AUTH";
const DATABASE_CA_BUNDLE_ENV: &str = "DATABASE_CA_BUNDLE";
const CLIENT_ID_ENV: &str = "COGNITO_APP_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "COGNITO_CLIENT_SECRET";
const USER_POOL_ENV: &str = "COGNITO_USER_POOL_ID";
const SIGNING_KEY_ENV: &str = "AWS_TOKEN_SIGNING_KEY";
const ISSUER_ENV: &str = "AWS_TOKEN_ISSUER";
const OPENAI_KEY_ENV: &str = "OPENAI_API";
const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";
const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
const TIMEOUT_ENV: &str = "OUTBOUND_TIMEOUT_SECS";
const RATE_PER_SECOND_ENV: &str = "RATE_LIMIT_PER_SECOND";
const RATE_BURST_ENV: &str = "RATE_LIMIT_BURST";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_PORT: u16 = 5432;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Errors raised while reading settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but cannot be parsed.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Token verification settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSettings {
    pub jwks_url: Url,
    /// Expected `iss` claim; unchecked when absent.
    pub issuer: Option<String>,
}

/// Everything `main` needs to assemble the server.
pub struct Settings {
    pub port: u16,
    pub database: PoolConfig,
    /// CA bundle for RDS IAM authentication; `None` keeps password auth.
    pub database_iam_ca_bundle: Option<PathBuf>,
    pub cognito: CognitoSettings,
    pub tokens: TokenSettings,
    /// `None` disables the insights endpoint.
    pub summariser: Option<ChatCompletionSettings>,
    pub outbound_timeout: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Settings {
    /// Read settings from `env`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mockable::MockEnv;
    /// use symptom_tracker::settings::Settings;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| {
    ///     let value = match name {
    ///         "DATABASE_URL" => "postgres://tracker@localhost/symptoms",
    ///         "COGNITO_APP_CLIENT_ID" => "client",
    ///         "COGNITO_CLIENT_SECRET" => "secret",
    ///         "COGNITO_USER_POOL_ID" => "eu-west-1_pool",
    ///         "AWS_TOKEN_SIGNING_KEY" => "https://cognito-idp.example/jwks.json",
    ///         _ => return None,
    ///     };
    ///     Some(value.to_owned())
    /// });
    ///
    /// let settings = Settings::from_env(&env).expect("settings");
    /// assert_eq!(settings.port, 8080);
    /// assert!(settings.summariser.is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        Ok(Self {
            port: parse_or(env, PORT_ENV, DEFAULT_PORT, "a TCP port")?,
            database: database_from_env(env)?,
            database_iam_ca_bundle: iam_ca_bundle_from_env(env)?,
            cognito: CognitoSettings {
                user_pool_id: required(env, USER_POOL_ENV)?,
                hasher: SecretHasher::new(
                    required(env, CLIENT_ID_ENV)?,
                    required(env, CLIENT_SECRET_ENV)?,
                ),
            },
            tokens: TokenSettings {
                jwks_url: parse_url(SIGNING_KEY_ENV, required(env, SIGNING_KEY_ENV)?)?,
                issuer: optional(env, ISSUER_ENV),
            },
            summariser: summariser_from_env(env)?,
            outbound_timeout: Duration::from_secs(parse_or(
                env,
                TIMEOUT_ENV,
                DEFAULT_TIMEOUT_SECS,
                "a whole number of seconds",
            )?),
            rate_limit: rate_limit_from_env(env)?,
        })
    }
}

fn optional<E: Env>(env: &E, name: &'static str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<E: Env>(env: &E, name: &'static str) -> Result<String, ConfigError> {
    optional(env, name).ok_or(ConfigError::MissingEnv { name })
}

fn parse_or<E, T>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError>
where
    E: Env,
    T: FromStr,
{
    match optional(env, name) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
            name,
            value,
            expected,
        }),
        None => Ok(default),
    }
}

fn parse_url(name: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|_| ConfigError::InvalidEnv {
        name,
        value,
        expected: "an absolute URL",
    })
}

fn database_from_env<E: Env>(env: &E) -> Result<PoolConfig, ConfigError> {
    let url = match optional(env, DATABASE_URL_ENV) {
        Some(url) => url,
        None => database_url_from_parts(env)?,
    };
    let max_connections = parse_or(
        env,
        DATABASE_MAX_CONNECTIONS_ENV,
        DEFAULT_MAX_CONNECTIONS,
        "a positive integer",
    )?;
    if max_connections == 0 {
        return Err(ConfigError::InvalidEnv {
            name: DATABASE_MAX_CONNECTIONS_ENV,
            value: max_connections.to_string(),
            expected: "a positive integer",
        });
    }
    Ok(PoolConfig::new(url).with_max_size(max_connections))
}

fn iam_ca_bundle_from_env<E: Env>(env: &E) -> Result<Option<PathBuf>, ConfigError> {
    if !parse_or(env, DATABASE_IAM_AUTH_ENV, false, "true or false")? {
        return Ok(None);
    }
    required(env, DATABASE_CA_BUNDLE_ENV).map(|path| Some(PathBuf::from(path)))
}

/// Assemble a DSN from `DATABASE_*` parts when no `DATABASE_URL` is given.
fn database_url_from_parts<E: Env>(env: &E) -> Result<String, ConfigError> {
    let host = optional(env, DATABASE_HOST_ENV)
        .or_else(|| optional(env, RDS_ENDPOINT_ENV))
        .ok_or(ConfigError::MissingEnv {
            name: DATABASE_URL_ENV,
        })?;
    let port = parse_or(env, DATABASE_PORT_ENV, DEFAULT_DATABASE_PORT, "a TCP port")?;
    let name = required(env, DATABASE_NAME_ENV)?;
    let user = required(env, DATABASE_USER_ENV)?;
    let password = optional(env, DATABASE_PASSWORD_ENV);

    let invalid_host = |value: String| ConfigError::InvalidEnv {
        name: DATABASE_HOST_ENV,
        value,
        expected: "a host name",
    };
    let mut url = Url::parse(&format!("postgres://{host}:{port}"))
        .map_err(|_| invalid_host(host.clone()))?;
    url.set_username(&user)
        .map_err(|()| invalid_host(host.clone()))?;
    url.set_password(password.as_deref())
        .map_err(|()| invalid_host(host))?;
    url.set_path(&format!("/{name}"));
    Ok(url.into())
}

fn summariser_from_env<E: Env>(env: &E) -> Result<Option<ChatCompletionSettings>, ConfigError> {
    let Some(api_key) = optional(env, OPENAI_KEY_ENV) else {
        return Ok(None);
    };
    let base_url = optional(env, OPENAI_BASE_URL_ENV)
        .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_owned());
    Ok(Some(ChatCompletionSettings {
        base_url: parse_url(OPENAI_BASE_URL_ENV, base_url)?,
        api_key,
        model: optional(env, OPENAI_MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
    }))
}

fn rate_limit_from_env<E: Env>(env: &E) -> Result<RateLimitConfig, ConfigError> {
    let defaults = RateLimitConfig::default();
    let per_second: f64 = parse_or(
        env,
        RATE_PER_SECOND_ENV,
        defaults.per_second,
        "a positive number",
    )?;
    if !(per_second.is_finite() && per_second > 0.0) {
        return Err(ConfigError::InvalidEnv {
            name: RATE_PER_SECOND_ENV,
            value: per_second.to_string(),
            expected: "a positive number",
        });
    }
    let burst = parse_or(env, RATE_BURST_ENV, defaults.burst, "a positive integer")?;
    if burst == 0 {
        return Err(ConfigError::InvalidEnv {
            name: RATE_BURST_ENV,
            value: burst.to_string(),
            expected: "a positive integer",
        });
    }
    Ok(RateLimitConfig { per_second, burst })
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
