//! Entity resolution
//!
//! Two resolvers, run in order: `CompanyResolver` turns the company query
//! into an account, `PersonResolver` searches that account's people for the
//! target person through cascading tiers.

pub mod company;
pub mod person;

pub use company::CompanyResolver;
pub use person::{PersonResolver, PersonSearchReport};
