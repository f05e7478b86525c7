//! Department to job-function lookup table
//!
//! The org-chart endpoint is scoped by (department, sfdcJobFunction) pairs;
//! this table fixes which job functions are swept for each department, in
//! priority order. The mapping is static upstream data, so it is a constant
//! table rather than anything dynamic.

/// Ordered (department, job functions) table. Sweep order follows the table.
pub const DEPARTMENT_JOB_FUNCTIONS: &[(&str, &[&str])] = &[
    (
        "C-Suite",
        &[
            "Executive",
            "Marketing & Sales",
            "Accounting and Finance",
            "Human Resource Management",
            "IT - Systems and Applications",
            "Legal / General Counsel",
            "Innovation & Digital",
            "Operations",
            "Strategy and Corporate Development",
        ],
    ),
    (
        "Finance",
        &[
            "Accounting and Finance",
            "Compliance",
            "Risk Management",
            "IT - Systems and Applications",
            "Purchasing and Procurement",
            "Strategy and Corporate Development",
            "Customer Service / Support",
        ],
    ),
    (
        "Human Resources",
        &["Human Resource Management", "IT - Systems and Applications"],
    ),
    (
        "Sales",
        &[
            "Marketing & Sales",
            "Customer Service / Support",
            "Operations",
            "Accounting and Finance",
            "Strategy and Corporate Development",
        ],
    ),
    (
        "Operations",
        &[
            "Customer Service / Support",
            "Purchasing and Procurement",
            "Operations",
            "Strategy and Corporate Development",
            "Legal / General Counsel",
            "Risk Management",
        ],
    ),
    (
        "Information Technology",
        &[
            "IT - Systems and Applications",
            "Customer Service / Support",
            "Data and Analytics",
            "Innovation & Digital",
            "Security and Privacy",
            "Purchasing and Procurement",
        ],
    ),
    (
        "Engineering & Technical",
        &[
            "Data and Analytics",
            "IT - Systems and Applications",
            "Innovation & Digital",
            "Research and Development (R&D)",
        ],
    ),
    (
        "Marketing",
        &[
            "Marketing & Sales",
            "Innovation & Digital",
            "Strategy and Corporate Development",
            "Customer Service / Support",
        ],
    ),
    (
        "Legal",
        &[
            "Compliance",
            "Security and Privacy",
            "Legal / General Counsel",
            "Research and Development (R&D)",
            "Strategy and Corporate Development",
        ],
    ),
    (
        "Medical & Health",
        &[
            "Research and Development (R&D)",
            "Operations",
            "IT - Systems and Applications",
        ],
    ),
    ("Other", &["All"]),
];

/// Department and job function used for the executive-team tier.
pub const EXECUTIVE_DEPARTMENT: &str = "C-Suite";
pub const EXECUTIVE_JOB_FUNCTION: &str = "Executive";

/// All department names, in sweep order.
pub fn department_names() -> impl Iterator<Item = &'static str> {
    DEPARTMENT_JOB_FUNCTIONS.iter().map(|(name, _)| *name)
}

/// Job functions registered for a department, when the department is known.
pub fn job_functions_for(department: &str) -> Option<&'static [&'static str]> {
    DEPARTMENT_JOB_FUNCTIONS
        .iter()
        .find(|(name, _)| *name == department)
        .map(|(_, functions)| *functions)
}

/// True when the hint names a department this table recognizes.
pub fn is_known_department(department: &str) -> bool {
    job_functions_for(department).is_some()
}
