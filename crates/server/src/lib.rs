//! Server crate for the CineRecs recommendation engine.
//!
//! This crate contains the service that owns the live trained model,
//! coordinates training against the catalog, and answers
//! recommendation and similarity queries. A transport façade (HTTP,
//! gRPC) sits on top of [`RecommendService`] and maps
//! [`engine::EngineError`] values to status codes.

pub mod service;

pub use service::RecommendService;
