//! CERT client library
//!
//! - [`CertClient`]: reqwest client for a running `certd`.
//! - [`AgentObserver`]: per-agent rolling windows and handoff baselines that
//!   turn an agent's outputs into consistency and coordination measurements.

pub mod client;
pub mod error;
pub mod observer;

pub use client::{CertClient, HealthStatus, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use observer::{AgentObserver, LocalMeasurer, Measurer, ObserverConfig};
