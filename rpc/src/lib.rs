//! HTTP API for the Civis platform.
//!
//! Axum-based surface over `civis-service`: report listing and submission,
//! verification and undo, admin triage, statistics, and the inbound SMS
//! webhook. Authentication resolves a bearer credential through the
//! `IdentityProvider`; the service layer enforces the domain rules.

pub mod error;
pub mod handlers;
pub mod pagination;
pub mod server;

pub use error::RpcError;
pub use handlers::AppState;
pub use server::RpcServer;
