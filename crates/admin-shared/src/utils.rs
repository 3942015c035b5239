//! Utility functions

use uuid::Uuid;

pub fn is_valid_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

/// Masks the local part of an email for log output.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() => {
            let keep: String = local.chars().take(if local.chars().count() <= 2 { 1 } else { 2 }).collect();
            format!("{}***@{}", keep, domain)
        }
        _ => "***".to_string(),
    }
}

/// Lowercases and trims a free-text search term; empty terms become `None`.
pub fn normalize_search(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}
