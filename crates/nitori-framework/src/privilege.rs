//! Privilege tiers.
//!
//! Two identities sit above platform permissions: one administrator with
//! every override, and any number of operators with a secondary tier. The
//! administrator is always an operator too. There is no further inheritance.

use nitori_core::UserId;

/// Administrator and operator identities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Privileges {
    administrator: Option<UserId>,
    operators: Vec<UserId>,
}

impl Privileges {
    /// Creates privileges with the given administrator and no operators.
    pub fn new(administrator: Option<UserId>) -> Self {
        Self {
            administrator,
            operators: Vec::new(),
        }
    }

    /// Adds an operator. Duplicates are ignored.
    pub fn add_operator(&mut self, id: UserId) {
        if !self.operators.contains(&id) {
            self.operators.push(id);
        }
    }

    /// Replaces the administrator.
    pub fn set_administrator(&mut self, id: Option<UserId>) {
        self.administrator = id;
    }

    pub fn administrator(&self) -> Option<UserId> {
        self.administrator
    }

    pub fn operators(&self) -> &[UserId] {
        &self.operators
    }

    /// Whether `id` is the system administrator.
    pub fn is_administrator(&self, id: UserId) -> bool {
        self.administrator == Some(id)
    }

    /// Whether `id` holds operator rank. The administrator always does.
    pub fn is_operator(&self, id: UserId) -> bool {
        self.is_administrator(id) || self.operators.contains(&id)
    }
}
