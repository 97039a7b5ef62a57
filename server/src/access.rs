use std::collections::HashMap;

use msgs::server_client_msg::AccessLevel;
use serde::Deserialize;

use crate::context::SessionId;

/// Username/password tables for ordinary and admin users, loaded from a
/// JSON file at startup.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct AccountBook {
    pub users: HashMap<String, String>,
    pub admins: HashMap<String, String>,
}

impl AccountBook {
    pub fn new() -> AccountBook {
        AccountBook::default()
    }

    pub fn load(path: &str) -> anyhow::Result<AccountBook> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn level_for(&self, username: &str, password: &str) -> Option<AccessLevel> {
        if self.users.get(username).is_some_and(|stored| stored == password) {
            return Some(AccessLevel::Ordinary);
        }
        if self.admins.get(username).is_some_and(|stored| stored == password) {
            return Some(AccessLevel::Admin);
        }
        None
    }
}

/// Who currently holds the cooperative exclusive-access lock. At most one
/// ordinary and one admin grant exist at a time; an admin login displaces
/// whoever holds either.
#[derive(Debug, Default)]
pub struct AccessTable {
    pub ordinary: Option<SessionId>,
    pub admin: Option<SessionId>,
}

impl AccessTable {
    pub fn new() -> AccessTable {
        AccessTable::default()
    }

    /// Drops any grant held by the session.
    pub fn release(&mut self, session_id: SessionId) {
        if self.ordinary == Some(session_id) {
            self.ordinary = None;
        }
        if self.admin == Some(session_id) {
            self.admin = None;
        }
    }

    /// Takes every current grant, returning the displaced sessions.
    pub fn displace_all(&mut self) -> Vec<SessionId> {
        [self.ordinary.take(), self.admin.take()]
            .into_iter()
            .flatten()
            .collect()
    }
}
