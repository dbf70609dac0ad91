//! Reusable field hooks
//!
//! A hook receives a field value after coercion and constraints have passed,
//! and returns the value to store or a [`FieldIssue`].

use crate::core::error::{FieldIssue, IssueKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Transform/validate hook attached to a field descriptor
pub type FieldHook = Arc<dyn Fn(Value) -> Result<Value, FieldIssue> + Send + Sync>;

/// What the email hook keeps once the domain is accepted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStorage {
    /// Store only the domain part (`sam@hdfc.com` becomes `hdfc.com`)
    #[default]
    Domain,
    /// Store the full address with its domain lowercased
    Full,
}

/// Hook: email domain must belong to the allow-list (case-insensitive)
pub fn email_domain_allowlist<I, S>(domains: I, storage: EmailStorage) -> FieldHook
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let allowed: Vec<String> = domains
        .into_iter()
        .map(|d| d.as_ref().trim().to_lowercase())
        .collect();

    Arc::new(move |value: Value| {
        let Some(email) = value.as_str() else {
            return Err(FieldIssue::new(IssueKind::Type, "value must be a string"));
        };

        let (local, domain) = match email.rsplit_once('@') {
            Some((local, domain)) => (Some(local), domain.to_lowercase()),
            None => (None, email.to_lowercase()),
        };
        if !allowed.contains(&domain) {
            return Err(FieldIssue::new(IssueKind::DomainRejected, "Not a valid domain"));
        }

        match (storage, local) {
            (EmailStorage::Full, Some(local)) => Ok(Value::String(format!("{local}@{domain}"))),
            _ => Ok(Value::String(domain)),
        }
    })
}

/// Hook: store a URL in its parsed, normalized form
pub fn normalize_url() -> FieldHook {
    Arc::new(|value: Value| {
        let Some(raw) = value.as_str() else {
            return Err(FieldIssue::new(IssueKind::Type, "value must be a string"));
        };
        Url::parse(raw)
            .map(|url| Value::String(url.to_string()))
            .map_err(|e| FieldIssue::new(IssueKind::Format, format!("value must be a URL: {e}")))
    })
}
