//! Email address parsing for user registration.
//!
//! Accepts a bare `local@domain` or the display form
//! `Display Name <local@domain>`; both normalize to the bare address.

use warden_core::error::{WardenError, WardenResult};

/// Parse and normalize an email address.
pub fn normalize(raw: &str) -> WardenResult<String> {
    let trimmed = raw.trim();
    let addr = match (trimmed.rfind('<'), trimmed.ends_with('>')) {
        (Some(open), true) => &trimmed[open + 1..trimmed.len() - 1],
        (None, false) => trimmed,
        _ => return Err(invalid(raw, "unbalanced angle brackets")),
    };

    let (local, domain) = addr
        .split_once('@')
        .ok_or_else(|| invalid(raw, "missing '@'"))?;

    if local.is_empty() || domain.is_empty() {
        return Err(invalid(raw, "empty local part or domain"));
    }
    if domain.contains('@') {
        return Err(invalid(raw, "more than one '@'"));
    }
    if addr.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
        return Err(invalid(raw, "illegal character"));
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return Err(invalid(raw, "malformed domain"));
    }

    Ok(addr.to_string())
}

fn invalid(raw: &str, reason: &str) -> WardenError {
    WardenError::validation(format!("invalid email address {raw:?}: {reason}"))
}
