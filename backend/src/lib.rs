//! Symptom tracker backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, ports, and services;
//! [`inbound`] and [`outbound`] hold the actix-web, Diesel, Cognito, JWKS,
//! and chat-completion adapters; [`middleware`] holds the cross-cutting
//! request layers.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(test)]
mod test_support;
