//! Stakeholder enrichment engine
//!
//! Resolves a (company, person) pair against the ProConnect relationship
//! API: company search and account fetch, a tiered person cascade over key
//! buyers / executives / department org-chart pages, best-effort endpoint
//! probes, and assembly of a provenance-tagged stakeholder payload.
//!
//! The engine is transport-agnostic: anything implementing
//! [`proconnect_client::ProConnectApi`] can drive it, which is also how the
//! test suite scripts entire scenarios without a network.

pub mod assembler;
pub mod config;
pub mod dedupe;
pub mod departments;
pub mod engine;
pub mod error;
pub mod extract;
pub mod matching;
pub mod probes;
pub mod records;
pub mod resolver;
pub mod types;
pub mod value_util;

pub use config::EnrichConfig;
pub use engine::StakeholderEngine;
pub use error::{EnrichError, Result};
pub use types::{CaseRequest, CaseResult, CheckStatus, MatchStatus};
