use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity provider a user can sign in with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityProvider {
    GitHub,
    Microsoft,
}

impl IdentityProvider {
    /// Parse the provider name the channel puts in `oauthProvider`
    pub fn from_channel_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "github" => Some(Self::GitHub),
            "microsoft" => Some(Self::Microsoft),
            _ => None,
        }
    }

    pub fn channel_name(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Microsoft => "microsoft",
        }
    }

    /// Human-readable label used when binding an identity
    pub fn label(&self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::Microsoft => "Azure AD",
        }
    }
}

impl fmt::Display for IdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Profile resolved from an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_names_map_to_providers() {
        assert_eq!(IdentityProvider::from_channel_name("github"), Some(IdentityProvider::GitHub));
        assert_eq!(IdentityProvider::from_channel_name("Microsoft"), Some(IdentityProvider::Microsoft));
        assert_eq!(IdentityProvider::from_channel_name("gitlab"), None);
    }

    #[test]
    fn labels_match_binding_convention() {
        assert_eq!(IdentityProvider::GitHub.label(), "GitHub");
        assert_eq!(IdentityProvider::Microsoft.label(), "Azure AD");
    }
}
