use serde::{Deserialize, Serialize};
use std::fmt;

/// E-mail address value object.
///
/// The address is lowercased on construction, so two instances that differ
/// only in case compare equal. Format checks belong to request validation,
/// not to this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Email(String);

impl Email {
    #[must_use]
    pub fn new(address: &str) -> Self {
        Self(address.to_lowercase())
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Email {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Email {
    fn from(address: String) -> Self {
        Self::new(&address)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
