//! Stakeholder payload assembly
//!
//! Builds each payload section from the resolved account, the person match,
//! and the probe harvest, then tags the whole payload with field-level
//! provenance.

pub mod profile;
pub mod provenance;
pub mod sections;

pub use profile::build_person_profile;
pub use provenance::build_provenance;
pub use sections::{
    build_account_context, build_account_summary, build_key_buyers_section,
    build_opportunities_section, build_org_chart_section, build_projects_section,
    build_research_inputs, build_technologies_section,
};
