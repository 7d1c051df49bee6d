//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel with a bb8 pool
//! - **cognito**: Cognito user pool calls via the AWS SDK
//! - **jwks**: bearer token verification against the published key set
//! - **openai**: chat-completion summariser over reqwest
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cognito;
pub mod jwks;
pub mod openai;
pub mod persistence;
