//! Domain core for the job-board portal.
//!
//! The crate is layered leaf-first: [`validation`] is pure input checking,
//! [`repository`] owns per-entity CRUD against the [`store`], [`service`]
//! composes repositories into the cross-entity rules (cascades, referential
//! checks, the application workflow), and [`dispatch`] routes incoming
//! events through a declarative authorization table into those services.
//! Everything transport-shaped stays in the api service crate.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod media;
pub mod repository;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod validation;

pub use error::PortalError;
