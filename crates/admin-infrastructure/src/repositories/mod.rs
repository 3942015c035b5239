//! Repository adapters backed by [`BackendClient`](crate::BackendClient)

pub mod profile_repo_impl;
pub mod role_repo_impl;
pub mod report_repo_impl;
pub mod audit_repo_impl;

pub use profile_repo_impl::BackendProfileRepository;
pub use role_repo_impl::BackendRoleRepository;
pub use report_repo_impl::BackendReportRepository;
pub use audit_repo_impl::BackendAuditRepository;
