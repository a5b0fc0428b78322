//! Detection of missing or placeholder API credentials.
//!
//! A gateway whose key is absent runs the agent in demo mode instead of
//! failing, so the check has to recognise the values people leave in sample
//! configuration files.

const PLACEHOLDER_VALUES: &[&str] = &["demo", "placeholder", "changeme", "none", "null", "xxx"];

const PLACEHOLDER_PREFIXES: &[&str] = &["your-", "your_"];

/// Whether a configured credential can be used against a live endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialState {
    Present,
    Absent,
}

impl CredentialState {
    pub fn of(key: Option<&str>) -> Self {
        match key {
            Some(key) if !is_placeholder(key) => CredentialState::Present,
            _ => CredentialState::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, CredentialState::Present)
    }
}

/// Returns true if `key` is empty or one of the reserved placeholder values.
pub fn is_placeholder(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return true;
    }

    let lower = key.to_lowercase();
    PLACEHOLDER_VALUES.contains(&lower.as_str())
        || PLACEHOLDER_PREFIXES
            .iter()
            .any(|prefix| lower.starts_with(prefix))
        || (lower.starts_with('<') && lower.ends_with('>'))
}
