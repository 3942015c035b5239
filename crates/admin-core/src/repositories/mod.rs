//! Repository traits (ports)

pub mod profile_repository;
pub mod role_repository;
pub mod report_repository;
pub mod audit_repository;

pub use profile_repository::ProfileRepository;
pub use role_repository::RoleRepository;
pub use report_repository::ReportRepository;
pub use audit_repository::AuditRepository;

#[cfg(test)]
pub use audit_repository::MockAuditRepository;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
#[cfg(test)]
pub use report_repository::MockReportRepository;
#[cfg(test)]
pub use role_repository::MockRoleRepository;
