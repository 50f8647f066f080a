//! Input validation helpers
//!
//! Centralized text length constants and field checks. Checks push into a
//! `Vec<FieldIssue>` so a rejected request reports every problem at once,
//! not just the first one. SQLite TEXT has no built-in length enforcement.

use crate::error::FieldIssue;

// ── Text length limits ──────────────────────────────────────────────

/// Plan names, admin display names
pub const MAX_NAME_LEN: usize = 200;

/// Free-form detail lines shown on pricing cards
pub const MAX_TEXT_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// The only currency plans are sold in
pub const PLAN_CURRENCY: &str = "RON";

// ── Field checks ────────────────────────────────────────────────────

/// Require a non-empty string within the length limit.
pub fn check_required_text(issues: &mut Vec<FieldIssue>, value: &str, field: &str, max_len: usize) {
    if value.trim().is_empty() {
        issues.push(FieldIssue::new(field, format!("{field} must not be empty")));
    } else if value.len() > max_len {
        issues.push(FieldIssue::new(
            field,
            format!("{field} is too long ({} chars, max {max_len})", value.len()),
        ));
    }
}

/// Require a finite, non-negative price. Zero is a valid price (free tier).
pub fn check_price(issues: &mut Vec<FieldIssue>, value: f64, field: &str) {
    if !value.is_finite() || value < 0.0 {
        issues.push(FieldIssue::new(
            field,
            format!("{field} must be a non-negative number"),
        ));
    }
}

/// Require the single supported currency code.
pub fn check_currency(issues: &mut Vec<FieldIssue>, value: &str, field: &str) {
    if value != PLAN_CURRENCY {
        issues.push(FieldIssue::new(
            field,
            format!("{field} must be {PLAN_CURRENCY}"),
        ));
    }
}

/// Require every detail line to be non-empty and within the limit.
pub fn check_details(issues: &mut Vec<FieldIssue>, details: &[String], field: &str) {
    for (i, line) in details.iter().enumerate() {
        check_required_text(issues, line, &format!("{field}[{i}]"), MAX_TEXT_LEN);
    }
}

/// Minimal shape check for email addresses. Full RFC parsing is not the goal,
/// this catches the inputs a login form can realistically produce.
pub fn check_email(issues: &mut Vec<FieldIssue>, value: &str, field: &str) {
    check_required_text(issues, value, field, MAX_EMAIL_LEN);
    if !value.trim().is_empty() {
        let Some((local, domain)) = value.split_once('@') else {
            issues.push(FieldIssue::new(
                field,
                format!("{field} must be a valid email address"),
            ));
            return;
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            issues.push(FieldIssue::new(
                field,
                format!("{field} must be a valid email address"),
            ));
        }
    }
}

/// Require a password within the accepted length band.
pub fn check_password(issues: &mut Vec<FieldIssue>, value: &str, field: &str) {
    if value.len() < MIN_PASSWORD_LEN {
        issues.push(FieldIssue::new(
            field,
            format!("{field} must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    } else if value.len() > MAX_PASSWORD_LEN {
        issues.push(FieldIssue::new(
            field,
            format!("{field} is too long ({} chars, max {MAX_PASSWORD_LEN})", value.len()),
        ));
    }
}
