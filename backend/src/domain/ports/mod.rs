//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod identity_provider;
mod insights_query;
mod persistence_error;
mod symptom_log_repository;
mod symptom_repository;
mod symptom_summariser;
mod token_verifier;
mod tracker_repository;
mod tracking_command;
mod tracking_query;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, SignInOutcome};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use insights_query::MockInsightsQuery;
pub use insights_query::InsightsQuery;
pub use persistence_error::TrackingPersistenceError;
#[cfg(test)]
pub use symptom_log_repository::MockSymptomLogRepository;
pub use symptom_log_repository::SymptomLogRepository;
#[cfg(test)]
pub use symptom_repository::MockSymptomRepository;
pub use symptom_repository::SymptomRepository;
#[cfg(test)]
pub use symptom_summariser::MockSymptomSummariser;
pub use symptom_summariser::{DisabledSummariser, SummariserError, SymptomSummariser};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::{TokenVerificationError, TokenVerifier};
#[cfg(test)]
pub use tracker_repository::MockTrackerRepository;
pub use tracker_repository::TrackerRepository;
#[cfg(test)]
pub use tracking_command::MockTrackingCommand;
pub use tracking_command::{CreateUserRequest, NewTracker, TrackingCommand};
#[cfg(test)]
pub use tracking_query::MockTrackingQuery;
pub use tracking_query::{TrackingQuery, UserProfile};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
