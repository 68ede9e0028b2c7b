//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Data required to create a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Unique email address
    pub email: String,
    /// Name shown to other users
    pub display_name: String,
}

/// Flat, storage-shaped view of a user.
///
/// Roles travel as their serialized JSON text. Converting a snapshot into a
/// [`User`] decodes that text once; [`User::to_snapshot`] copies the text
/// kept in sync by every role mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub full_name: String,
    pub biography: String,
    pub gender: String,
    pub active: bool,
    pub blocked: bool,
    pub language: String,
    pub confirm_email: String,
    pub accept_terms: bool,
    pub birthdate: String,
    pub phone: String,
    pub roles_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: u64,
    username: String,
    email: String,
    display_name: String,
    full_name: String,
    biography: String,
    gender: String,
    active: bool,
    blocked: bool,
    language: String,
    confirm_email: String,
    accept_terms: bool,
    birthdate: String,
    phone: String,
    roles: Vec<String>,
    /// JSON array mirroring `roles`, rewritten on every role mutation
    roles_text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create an unsaved user. The identifier stays 0 until the first save.
    pub fn new(data: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: data.username,
            email: data.email,
            display_name: data.display_name,
            full_name: String::new(),
            biography: String::new(),
            gender: String::new(),
            active: false,
            blocked: false,
            language: String::new(),
            confirm_email: String::new(),
            accept_terms: false,
            birthdate: String::new(),
            phone: String::new(),
            roles: Vec::new(),
            roles_text: encode_roles(&[]),
            created_at: now,
            updated_at: now,
        }
    }

    /// Storage view of this user, roles already serialized.
    pub fn to_snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            full_name: self.full_name.clone(),
            biography: self.biography.clone(),
            gender: self.gender.clone(),
            active: self.active,
            blocked: self.blocked,
            language: self.language.clone(),
            confirm_email: self.confirm_email.clone(),
            accept_terms: self.accept_terms,
            birthdate: self.birthdate.clone(),
            phone: self.phone.clone(),
            roles_text: self.roles_text.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identifier rendered as decimal text
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }

    /// Parse and assign a textual identifier.
    ///
    /// Fails with [`DomainError::Format`] when the text is not a non-negative
    /// integer, and with [`DomainError::Validation`] when a different
    /// identifier was already assigned.
    pub fn set_id(&mut self, id: &str) -> DomainResult<()> {
        let parsed = parse_id(id)?;
        if self.id != 0 && self.id != parsed {
            return Err(DomainError::validation("identifier cannot change once assigned"));
        }
        self.id = parsed;
        Ok(())
    }

    /// Whether the record has never been saved
    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into();
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn set_full_name(&mut self, name: impl Into<String>) {
        self.full_name = name.into();
    }

    pub fn biography(&self) -> &str {
        &self.biography
    }

    pub fn set_biography(&mut self, biography: impl Into<String>) {
        self.biography = biography.into();
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn set_gender(&mut self, gender: impl Into<String>) {
        self.gender = gender.into();
    }

    pub fn birthdate(&self) -> &str {
        &self.birthdate
    }

    pub fn set_birthdate(&mut self, birthdate: impl Into<String>) {
        self.birthdate = birthdate.into();
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    // =========================================================================
    // Status flags
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn active_string(&self) -> String {
        self.active.to_string()
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn blocked_string(&self) -> String {
        self.blocked.to_string()
    }

    pub fn accept_terms(&self) -> bool {
        self.accept_terms
    }

    pub fn set_accept_terms(&mut self, accept: bool) {
        self.accept_terms = accept;
    }

    pub fn accept_terms_string(&self) -> String {
        self.accept_terms.to_string()
    }

    /// Pending email-confirmation value
    pub fn confirm_email(&self) -> &str {
        &self.confirm_email
    }

    pub fn set_confirm_email(&mut self, value: impl Into<String>) {
        self.confirm_email = value.into();
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Serialized form of the roles, as persisted
    pub fn roles_text(&self) -> &str {
        &self.roles_text
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Replace the role list
    pub fn set_roles(&mut self, roles: Vec<String>) {
        self.roles = roles;
        self.sync_roles_text();
    }

    /// Append a role. Duplicates are kept.
    pub fn add_role(&mut self, role: impl Into<String>) {
        self.roles.push(role.into());
        self.sync_roles_text();
    }

    /// Remove the first occurrence of `role`. Returns whether one was removed.
    pub fn remove_role(&mut self, role: &str) -> bool {
        let Some(pos) = self.roles.iter().position(|r| r == role) else {
            return false;
        };
        self.roles.remove(pos);
        self.sync_roles_text();
        true
    }

    fn sync_roles_text(&mut self) {
        self.roles_text = encode_roles(&self.roles);
    }

    // =========================================================================
    // Timestamps
    // =========================================================================

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn created_at_string(&self) -> String {
        self.created_at.to_rfc3339()
    }

    pub fn updated_at_string(&self) -> String {
        self.updated_at.to_rfc3339()
    }
}

impl From<UserSnapshot> for User {
    fn from(s: UserSnapshot) -> Self {
        let roles = decode_roles(&s.roles_text);
        Self {
            id: s.id,
            username: s.username,
            email: s.email,
            display_name: s.display_name,
            full_name: s.full_name,
            biography: s.biography,
            gender: s.gender,
            active: s.active,
            blocked: s.blocked,
            language: s.language,
            confirm_email: s.confirm_email,
            accept_terms: s.accept_terms,
            birthdate: s.birthdate,
            phone: s.phone,
            roles_text: encode_roles(&roles),
            roles,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Parse a textual identifier into its numeric form.
pub fn parse_id(id: &str) -> DomainResult<u64> {
    id.trim()
        .parse::<u64>()
        .map_err(|e| DomainError::format(format!("invalid identifier '{}': {}", id, e)))
}

fn encode_roles(roles: &[String]) -> String {
    // A list of strings always encodes.
    serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string())
}

fn decode_roles(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<String>>(text) {
        Ok(roles) => roles,
        Err(e) => {
            tracing::warn!(error = %e, roles = text, "Ignoring malformed stored roles");
            Vec::new()
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub full_name: String,
    pub biography: String,
    pub gender: String,
    pub active: bool,
    pub blocked: bool,
    pub language: String,
    pub confirm_email: String,
    pub accept_terms: bool,
    pub birthdate: String,
    pub phone: String,
    /// Materialized role list, never the serialized text
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            full_name: user.full_name,
            biography: user.biography,
            gender: user.gender,
            active: user.active,
            blocked: user.blocked,
            language: user.language,
            confirm_email: user.confirm_email,
            accept_terms: user.accept_terms,
            birthdate: user.birthdate,
            phone: user.phone,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}
