//! User references embedded in worklog payloads.

use serde::Deserialize;

/// Represents the author of a worklog. Cloud (v3) exposes `accountId` and usually hides `emailAddress`; Server (v2) exposes `name`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    pub account_id: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub email_address: Option<String>,
}

impl WorklogAuthor {
    /// Non-empty identity fields in lookup order: accountId, name, displayName, emailAddress.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        [
            self.account_id.as_deref(),
            self.name.as_deref(),
            self.display_name.as_deref(),
            self.email_address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|value| !value.trim().is_empty())
    }

    /// Returns the best human-readable label: displayName, then name, then accountId.
    pub fn label(&self) -> Option<&str> {
        [
            self.display_name.as_deref(),
            self.name.as_deref(),
            self.account_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
    }
}
