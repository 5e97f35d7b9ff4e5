//! Participant identity as handed over by the identity collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{UserId, ValidationError};

use super::address::is_valid_address_id;

/// Role of a participant in the business app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Employee,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Owner => "owner",
            Role::Employee => "employee",
        };
        write!(f, "{}", s)
    }
}

/// A trusted identity. The messaging core never checks credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: UserId,
    display_name: String,
    logical_address: String,
    role: Role,
}

impl Participant {
    /// Creates a participant from fully specified parts.
    ///
    /// Employee logical addresses end up inside room names, so they must be
    /// non-empty and made of address-safe characters.
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        logical_address: impl Into<String>,
        role: Role,
    ) -> Result<Self, ValidationError> {
        let logical_address = logical_address.into();
        if role == Role::Employee && !is_valid_address_id(&logical_address) {
            return Err(ValidationError::invalid_format(
                "logical_address",
                "expected ASCII letters, digits, '-', '_', '.' or '+'",
            ));
        }
        Ok(Self {
            id,
            display_name: display_name.into(),
            logical_address,
            role,
        })
    }

    /// Creates the owner participant, addressed by its user id.
    pub fn owner(id: UserId, display_name: impl Into<String>) -> Self {
        let logical_address = id.as_str().to_string();
        Self {
            id,
            display_name: display_name.into(),
            logical_address,
            role: Role::Owner,
        }
    }

    /// Creates an employee whose logical address is the canonical employee id.
    pub fn employee(id: UserId, display_name: impl Into<String>) -> Result<Self, ValidationError> {
        let logical_address = id.as_str().to_string();
        Self::new(id, display_name, logical_address, Role::Employee)
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn logical_address(&self) -> &str {
        &self.logical_address
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Label placed in the `from` field of outgoing messages.
    ///
    /// The owner always signs as `owner`; employees use their display name,
    /// falling back to the logical address.
    pub fn sender_label(&self) -> String {
        match self.role {
            Role::Owner => "owner".to_string(),
            Role::Employee if !self.display_name.trim().is_empty() => self.display_name.clone(),
            Role::Employee => self.logical_address.clone(),
        }
    }
}
