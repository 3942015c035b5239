//! # Admin Core - Domain Module
//!
//! Records consumed from the backend and the rules applied to them.

pub mod permission;
pub mod role;
pub mod profile;
pub mod report;
pub mod audit;

pub use permission::{parse_permission_list, permission_catalog, Permission, PermissionGroup, PermissionGroupView};
pub use role::{is_protected_name, NewRole, Role, RoleUpdate};
pub use profile::{validation_messages, NewUser, Profile, ProfileUpdate, RoleRef};
pub use report::{to_feature_collection, BoundingBox, GeoPoint, Report, ReportPriority, ReportStats, ReportStatus};
pub use audit::{
    diff_rows, display_value, ActivityEntry, ChangeKind, ChangeRecord, ChangeView, FieldChange, NewActivity,
    Operation,
};
