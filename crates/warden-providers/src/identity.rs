//! Normalized identity claims.
//!
//! Every adapter turns its userinfo payload into a list of [`AuthIdentity`]
//! values. Each carries a claim that knows how to apply itself to a
//! [`UserProfile`], so callers never branch on the provider.

use serde::{Deserialize, Serialize};
use warden_core::UserProfile;

/// Capability shared by every claim payload.
pub trait ApplyClaim {
    /// Write this claim into `profile`.
    fn apply_to(&self, profile: &mut UserProfile);
}

/// Type tag of an identity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityType {
    Email,
    Name,
    ProfilePic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailClaim {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameClaim {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePicClaim {
    pub url: String,
}

// Empty values never overwrite what the profile already holds.
fn set_if_present(field: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *field = Some(value.to_string());
    }
}

impl ApplyClaim for EmailClaim {
    fn apply_to(&self, profile: &mut UserProfile) {
        set_if_present(&mut profile.email, &self.email);
    }
}

impl ApplyClaim for NameClaim {
    fn apply_to(&self, profile: &mut UserProfile) {
        set_if_present(&mut profile.name, &self.name);
    }
}

impl ApplyClaim for ProfilePicClaim {
    fn apply_to(&self, profile: &mut UserProfile) {
        set_if_present(&mut profile.profile_pic, &self.url);
    }
}

/// Claim payload of an [`AuthIdentity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityClaim {
    Email(EmailClaim),
    Name(NameClaim),
    ProfilePic(ProfilePicClaim),
}

impl ApplyClaim for IdentityClaim {
    fn apply_to(&self, profile: &mut UserProfile) {
        match self {
            IdentityClaim::Email(c) => c.apply_to(profile),
            IdentityClaim::Name(c) => c.apply_to(profile),
            IdentityClaim::ProfilePic(c) => c.apply_to(profile),
        }
    }
}

/// One asserted attribute of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthIdentity {
    #[serde(rename = "type")]
    pub identity_type: IdentityType,
    pub metadata: IdentityClaim,
}

impl AuthIdentity {
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            identity_type: IdentityType::Email,
            metadata: IdentityClaim::Email(EmailClaim {
                email: email.into(),
            }),
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            identity_type: IdentityType::Name,
            metadata: IdentityClaim::Name(NameClaim { name: name.into() }),
        }
    }

    pub fn profile_pic(url: impl Into<String>) -> Self {
        Self {
            identity_type: IdentityType::ProfilePic,
            metadata: IdentityClaim::ProfilePic(ProfilePicClaim { url: url.into() }),
        }
    }

    /// Apply the claim payload to `profile`.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        self.metadata.apply_to(profile);
    }
}

/// Apply every identity in order; later entries win.
pub fn apply_identities(identities: &[AuthIdentity], profile: &mut UserProfile) {
    for identity in identities {
        identity.apply_to(profile);
    }
}
