//! People known to the knowledge network

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned to a person by the knowledge backend
pub type UserId = i64;

/// Organisational role of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    KnowledgeChampion,
    Consultant,
    Manager,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::KnowledgeChampion => "KNOWLEDGE_CHAMPION",
            Role::Consultant => "CONSULTANT",
            Role::Manager => "MANAGER",
            Role::User => "USER",
        }
    }

    /// Parse a role name, accepting the lower-case spellings the web client uses
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "KNOWLEDGE_CHAMPION" => Some(Role::KnowledgeChampion),
            "CONSULTANT" => Some(Role::Consultant),
            "MANAGER" => Some(Role::Manager),
            "USER" => Some(Role::User),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seniority of a person, used for graph sizing and search metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpertiseLevel {
    Junior,
    #[default]
    Intermediate,
    Senior,
    Lead,
}

/// A person record as stored by the knowledge backend.
///
/// The password hash is accepted when deserializing backend payloads but is
/// never written back out, so a `Person` can be returned to clients as is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: UserId,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub expertise_level: ExpertiseLevel,
    #[serde(default)]
    pub profile_completion: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "Utc::now")]
    pub last_activity: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Initials shown next to activity entries ("JD" for John Doe)
    pub fn initials(&self) -> String {
        let initials: String = [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(|c| c.to_uppercase())
            .collect();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }

    /// Percentage of the eight profile fields that are filled in
    pub fn compute_profile_completion(&self) -> u8 {
        let completed = [
            !self.first_name.is_empty(),
            !self.last_name.is_empty(),
            !self.email.is_empty(),
            !self.region.is_empty(),
            !self.department.is_empty(),
            !self.skills.is_empty(),
            true, // expertise level always has a value
            self.profile_completion > 0,
        ]
        .iter()
        .filter(|filled| **filled)
        .count();
        ((completed * 100) / 8) as u8
    }
}

/// Payload used to create a person in the knowledge backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPerson {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub employee_id: String,
    pub role: Role,
    pub is_active: bool,
}

/// Partial update of a person's profile.
///
/// Only the fields a person may edit on their own profile are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise_level: Option<ExpertiseLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_completion: Option<u8>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ProfileUpdate::default()
    }

    /// Apply the update to a person in place
    pub fn apply(&self, person: &mut Person) {
        if let Some(v) = &self.first_name {
            person.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            person.last_name = v.clone();
        }
        if let Some(v) = &self.department {
            person.department = v.clone();
        }
        if let Some(v) = &self.region {
            person.region = v.clone();
        }
        if let Some(v) = &self.skills {
            person.skills = v.clone();
        }
        if let Some(v) = self.expertise_level {
            person.expertise_level = v;
        }
        if let Some(v) = self.profile_completion {
            person.profile_completion = v;
        }
        person.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Person {
        serde_json::from_value(json!({
            "id": 7,
            "email": "jane@velion.app",
            "password": "$argon2id$secret",
            "first_name": "Jane",
            "last_name": "Doe",
            "employee_id": "EMP007",
            "role": "CONSULTANT"
        }))
        .unwrap()
    }

    #[test]
    fn test_password_never_serialized() {
        let p = person();
        assert_eq!(p.password.as_deref(), Some("$argon2id$secret"));
        let out = serde_json::to_value(&p).unwrap();
        assert!(out.get("password").is_none());
        assert_eq!(out["role"], "CONSULTANT");
        assert_eq!(out["expertise_level"], "INTERMEDIATE");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("knowledge_champion"), Some(Role::KnowledgeChampion));
        assert_eq!(Role::parse(" admin "), Some(Role::Admin));
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_initials_and_name() {
        let p = person();
        assert_eq!(p.full_name(), "Jane Doe");
        assert_eq!(p.initials(), "JD");
    }

    #[test]
    fn test_profile_completion() {
        let mut p = person();
        // first, last, email, expertise
        assert_eq!(p.compute_profile_completion(), 50);

        ProfileUpdate {
            department: Some("AI Research".into()),
            region: Some("Europe".into()),
            skills: Some(vec!["Rust".into()]),
            ..Default::default()
        }
        .apply(&mut p);
        assert_eq!(p.compute_profile_completion(), 87);
    }
}
