//! User record entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel stored in `profile_picture` when the user has not chosen a picture
pub const NO_PROFILE_PICTURE: i32 = -1;

/// Age assigned to every freshly registered account
pub const DEFAULT_AGE: i32 = 18;

/// User identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity fields of an account, already normalized for storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
}

impl UserIdentity {
    /// Normalize raw submitted values
    ///
    /// - name: trimmed, title-cased
    /// - surname: trimmed, upper-cased
    /// - login: trimmed
    /// - email: kept as submitted
    pub fn normalized(name: &str, surname: &str, login: &str, email: &str) -> Self {
        Self {
            name: title_case(name.trim()),
            surname: surname.trim().to_uppercase(),
            login: login.trim().to_string(),
            email: email.to_string(),
        }
    }
}

/// Salted password hash as persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCredential {
    #[serde(rename = "password")]
    pub hash: String,
    #[serde(rename = "passwordSalt")]
    pub salt: String,
}

impl PasswordCredential {
    pub fn new(hash: impl Into<String>, salt: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            salt: salt.into(),
        }
    }
}

/// Profile fields populated with defaults at registration time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub age: i32,
    pub sex: String,
    pub orientation: String,
    pub geolocation: String,
    pub tags: Vec<String>,
    pub winks: Vec<String>,
    pub winked_by: Vec<String>,
    pub profile_picture: i32,
    pub pictures: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: DEFAULT_AGE,
            sex: String::new(),
            orientation: String::new(),
            geolocation: String::new(),
            tags: Vec::new(),
            winks: Vec::new(),
            winked_by: Vec::new(),
            profile_picture: NO_PROFILE_PICTURE,
            pictures: Vec::new(),
        }
    }
}

/// Persisted user record (write model)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    id: UserId,
    #[serde(flatten)]
    identity: UserIdentity,
    /// Never exposed by the HTTP layer, only persisted
    #[serde(flatten)]
    credential: PasswordCredential,
    #[serde(flatten)]
    profile: UserProfile,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create the record for a new registration with default profile values
    pub fn register(identity: UserIdentity, credential: PasswordCredential) -> Self {
        Self {
            id: UserId::generate(),
            identity,
            credential,
            profile: UserProfile::default(),
            created_at: Utc::now(),
        }
    }

    /// Rebuild a record loaded from storage
    pub fn restore(
        id: UserId,
        identity: UserIdentity,
        credential: PasswordCredential,
        profile: UserProfile,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            identity,
            credential,
            profile,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn surname(&self) -> &str {
        &self.identity.surname
    }

    pub fn login(&self) -> &str {
        &self.identity.login
    }

    pub fn email(&self) -> &str {
        &self.identity.email
    }

    pub fn credential(&self) -> &PasswordCredential {
        &self.credential
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Upper-case the first letter of every word and lower-case the rest
fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            result.push(c);
        } else if at_word_start {
            result.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> PasswordCredential {
        PasswordCredential::new("hashed_password", "0123456789abcdef")
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("jane"), "Jane");
        assert_eq!(title_case("mARY aNNE"), "Mary Anne");
        assert_eq!(title_case("éLODIE"), "Élodie");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_identity_normalization() {
        let identity = UserIdentity::normalized("  jane  ", " doe ", " jdoe1234 ", "Jane@X.com");

        assert_eq!(identity.name, "Jane");
        assert_eq!(identity.surname, "DOE");
        assert_eq!(identity.login, "jdoe1234");
        assert_eq!(identity.email, "Jane@X.com");
    }

    #[test]
    fn test_register_applies_profile_defaults() {
        let identity = UserIdentity::normalized("Jane", "Doe", "jdoe1234", "jane@x.com");
        let user = UserRecord::register(identity, credential());

        assert_eq!(user.profile().age, 18);
        assert_eq!(user.profile().profile_picture, NO_PROFILE_PICTURE);
        assert!(user.profile().pictures.is_empty());
        assert!(user.profile().tags.is_empty());
        assert!(user.profile().winks.is_empty());
        assert!(user.profile().winked_by.is_empty());
        assert_eq!(user.profile().sex, "");
        assert_eq!(user.login(), "jdoe1234");
    }

    #[test]
    fn test_register_generates_distinct_ids() {
        let identity = UserIdentity::normalized("Jane", "Doe", "jdoe1234", "jane@x.com");
        let first = UserRecord::register(identity.clone(), credential());
        let second = UserRecord::register(identity, credential());

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_serialized_layout() {
        let identity = UserIdentity::normalized("Jane", "Doe", "jdoe1234", "jane@x.com");
        let user = UserRecord::register(identity, credential());

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["name"], "Jane");
        assert_eq!(json["surname"], "DOE");
        assert_eq!(json["password"], "hashed_password");
        assert_eq!(json["passwordSalt"], "0123456789abcdef");
        assert_eq!(json["profilePicture"], -1);
        assert_eq!(json["winkedBy"], serde_json::json!([]));
        assert_eq!(json["age"], 18);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_restore_round_trip() {
        let identity = UserIdentity::normalized("Jane", "Doe", "jdoe1234", "jane@x.com");
        let user = UserRecord::register(identity, credential());

        let restored = UserRecord::restore(
            *user.id(),
            user.identity().clone(),
            user.credential().clone(),
            user.profile().clone(),
            user.created_at(),
        );

        assert_eq!(restored, user);
    }
}
