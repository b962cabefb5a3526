//! Registration field validation
//!
//! Every field is inspected in a single pass and all violations are reported
//! together, so the caller can flag each offending input at once.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::request::RegistrationRequest;

/// Minimum login length
pub const MIN_LOGIN_LENGTH: usize = 8;

/// Maximum login length
pub const MAX_LOGIN_LENGTH: usize = 12;

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Letters of any script and spaces, with at least one letter
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} ]*\p{L}[\p{L} ]*$").unwrap());

static LOGIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^[a-z0-9]{{{},{}}}$",
        MIN_LOGIN_LENGTH, MAX_LOGIN_LENGTH
    ))
    .unwrap()
});

/// `local@domain` where the domain has at least one dot
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

/// Submitted fields subject to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    Name,
    Surname,
    Login,
    Email,
    Password,
    PasswordConfirmation,
}

impl RegistrationField {
    pub const ALL: [RegistrationField; 6] = [
        Self::Name,
        Self::Surname,
        Self::Login,
        Self::Email,
        Self::Password,
        Self::PasswordConfirmation,
    ];

    /// Field name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Login => "login",
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirmation => "password_confirmation",
        }
    }

    fn message(&self, violation: Violation) -> &'static str {
        match (self, violation) {
            (Self::Name, Violation::Missing) => "Name is required",
            (Self::Name, Violation::Malformed) => {
                "Invalid name, allowed characters : letters and spaces"
            }
            (Self::Surname, Violation::Missing) => "Surname is required",
            (Self::Surname, Violation::Malformed) => {
                "Invalid surname, allowed characters : letters and spaces"
            }
            (Self::Login, Violation::Missing) => "Login is required",
            (Self::Login, Violation::Malformed) => {
                "Invalid login, allowed : lowercase letters and digits between 8 and 12 characters"
            }
            (Self::Email, Violation::Missing) => "Email is required",
            (Self::Email, Violation::Malformed) => {
                "Invalid email, please enter a valid email address"
            }
            (Self::Password, Violation::Missing) => "Password is required",
            (Self::Password, Violation::Malformed) => {
                "Invalid password, must 8 characters long and contain 1 uppercase letter, 1 lowercase letter and 1 number"
            }
            (Self::PasswordConfirmation, Violation::Missing) => "Please confirm your password",
            (Self::PasswordConfirmation, Violation::Malformed) => "Passwords do not match",
        }
    }
}

impl std::fmt::Display for RegistrationField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of problem found on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Empty or absent
    Missing,
    /// Present but invalid
    Malformed,
}

/// Per-field flags, `true` when the field was rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlags {
    pub name: bool,
    pub surname: bool,
    pub login: bool,
    pub email: bool,
    pub password: bool,
    pub password_confirmation: bool,
}

impl FieldFlags {
    pub fn is_set(&self, field: RegistrationField) -> bool {
        match field {
            RegistrationField::Name => self.name,
            RegistrationField::Surname => self.surname,
            RegistrationField::Login => self.login,
            RegistrationField::Email => self.email,
            RegistrationField::Password => self.password,
            RegistrationField::PasswordConfirmation => self.password_confirmation,
        }
    }

    /// Number of flagged fields
    pub fn count(&self) -> usize {
        RegistrationField::ALL
            .iter()
            .filter(|field| self.is_set(**field))
            .count()
    }

    fn set(&mut self, field: RegistrationField) {
        let flag = match field {
            RegistrationField::Name => &mut self.name,
            RegistrationField::Surname => &mut self.surname,
            RegistrationField::Login => &mut self.login,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Password => &mut self.password,
            RegistrationField::PasswordConfirmation => &mut self.password_confirmation,
        };
        *flag = true;
    }
}

/// Every violation found on a registration request
///
/// A field flag is only ever raised together with its message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    messages: Vec<String>,
    fields: FieldFlags,
}

impl ValidationFailure {
    /// Overall message reported with the field list
    pub const MESSAGE: &'static str = "Incorrect values";

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn fields(&self) -> &FieldFlags {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Record a violation on a field
    pub fn reject(&mut self, field: RegistrationField, violation: Violation) {
        self.fields.set(field);
        self.messages.push(field.message(violation).to_string());
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Validate every field of a registration request
pub fn validate_registration(request: &RegistrationRequest) -> Result<(), ValidationFailure> {
    let mut failure = ValidationFailure::default();

    let checks = [
        (RegistrationField::Name, check_name(&request.name)),
        (RegistrationField::Surname, check_name(&request.surname)),
        (RegistrationField::Login, check_login(&request.login)),
        (RegistrationField::Email, check_email(&request.email)),
        (RegistrationField::Password, check_password(&request.password)),
        (
            RegistrationField::PasswordConfirmation,
            check_confirmation(&request.password, &request.password_confirmation),
        ),
    ];

    for (field, outcome) in checks {
        let outcome = if request.mistyped().contains(&field) {
            Err(Violation::Malformed)
        } else {
            outcome
        };

        if let Err(violation) = outcome {
            failure.reject(field, violation);
        }
    }

    failure.into_result()
}

fn require(value: &str) -> Result<&str, Violation> {
    if value.is_empty() {
        Err(Violation::Missing)
    } else {
        Ok(value)
    }
}

fn matching(pattern: &Regex, value: &str) -> Result<(), Violation> {
    if pattern.is_match(require(value)?) {
        Ok(())
    } else {
        Err(Violation::Malformed)
    }
}

/// Letters and spaces only
pub fn check_name(name: &str) -> Result<(), Violation> {
    matching(&NAME_PATTERN, name)
}

/// Lowercase letters and digits, 8 to 12 characters
pub fn check_login(login: &str) -> Result<(), Violation> {
    matching(&LOGIN_PATTERN, login)
}

pub fn check_email(email: &str) -> Result<(), Violation> {
    matching(&EMAIL_PATTERN, email)
}

/// At least 8 characters with one uppercase letter, one lowercase letter and one digit
pub fn check_password(password: &str) -> Result<(), Violation> {
    let password = require(password)?;

    let long_enough = password.chars().count() >= MIN_PASSWORD_LENGTH;
    let has_upper = password.chars().any(char::is_uppercase);
    let has_lower = password.chars().any(char::is_lowercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(Violation::Malformed)
    }
}

/// Confirmation must be present and equal to the password byte-for-byte
pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), Violation> {
    if require(confirmation)? == password {
        Ok(())
    } else {
        Err(Violation::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> RegistrationRequest {
        RegistrationRequest::new("Jane", "Doe", "jdoe1234", "jane@x.com", "Abcdefg1", "Abcdefg1")
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_registration(&valid_request()).is_ok());
    }

    #[test]
    fn test_valid_names() {
        assert!(check_name("Jane").is_ok());
        assert!(check_name("Mary Anne").is_ok());
        assert!(check_name(" jane ").is_ok());
        assert!(check_name("Élodie").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(check_name(""), Err(Violation::Missing));
        assert_eq!(check_name("Jane2"), Err(Violation::Malformed));
        assert_eq!(check_name("Jane-Doe"), Err(Violation::Malformed));
        assert_eq!(check_name("   "), Err(Violation::Malformed));
    }

    #[test]
    fn test_login_rules() {
        assert!(check_login("abcdefgh").is_ok());
        assert!(check_login("abcdefghijkl").is_ok());
        assert!(check_login("jdoe1234").is_ok());

        assert_eq!(check_login(""), Err(Violation::Missing));
        assert_eq!(check_login("short"), Err(Violation::Malformed));
        assert_eq!(check_login("abcdefghijklm"), Err(Violation::Malformed));
        assert_eq!(check_login("Abcdefgh"), Err(Violation::Malformed));
        assert_eq!(check_login("abcd efgh"), Err(Violation::Malformed));
        assert_eq!(check_login("abcd_efgh"), Err(Violation::Malformed));
    }

    #[test]
    fn test_email_rules() {
        assert!(check_email("jane@x.com").is_ok());
        assert!(check_email("jane.doe+tag@mail.example.org").is_ok());

        assert_eq!(check_email(""), Err(Violation::Missing));
        assert_eq!(check_email("jane"), Err(Violation::Malformed));
        assert_eq!(check_email("jane@localhost"), Err(Violation::Malformed));
        assert_eq!(check_email("@x.com"), Err(Violation::Malformed));
        assert_eq!(check_email("jane@-x.com"), Err(Violation::Malformed));
        assert_eq!(check_email("jane doe@x.com"), Err(Violation::Malformed));
    }

    #[test]
    fn test_password_rules() {
        assert!(check_password("Abcdefg1").is_ok());
        assert!(check_password("P4ssword with spaces").is_ok());

        assert_eq!(check_password(""), Err(Violation::Missing));
        assert_eq!(check_password("Abcdef1"), Err(Violation::Malformed));
        assert_eq!(check_password("abcdefg1"), Err(Violation::Malformed));
        assert_eq!(check_password("ABCDEFG1"), Err(Violation::Malformed));
        assert_eq!(check_password("Abcdefgh"), Err(Violation::Malformed));
    }

    #[test]
    fn test_confirmation_rules() {
        assert!(check_confirmation("Abcdefg1", "Abcdefg1").is_ok());
        assert_eq!(check_confirmation("Abcdefg1", ""), Err(Violation::Missing));
        assert_eq!(check_confirmation("", ""), Err(Violation::Missing));
        assert_eq!(
            check_confirmation("Abcdefg1", "abcdefg1"),
            Err(Violation::Malformed)
        );
    }

    #[test]
    fn test_empty_fields_report_required_messages() {
        for field in RegistrationField::ALL {
            let mut request = valid_request();
            match field {
                RegistrationField::Name => request.name.clear(),
                RegistrationField::Surname => request.surname.clear(),
                RegistrationField::Login => request.login.clear(),
                RegistrationField::Email => request.email.clear(),
                RegistrationField::Password => request.password.clear(),
                RegistrationField::PasswordConfirmation => request.password_confirmation.clear(),
            }

            let failure = validate_registration(&request).unwrap_err();
            assert!(failure.fields().is_set(field), "{} should be flagged", field);

            let required = field.message(Violation::Missing);
            let malformed = field.message(Violation::Malformed);
            assert!(failure.messages().iter().any(|m| m == required));
            assert!(!failure.messages().iter().any(|m| m == malformed));
        }
    }

    #[test]
    fn test_mismatched_confirmation_only_flags_confirmation() {
        let mut request = valid_request();
        request.password_confirmation = "Abcdefg2".to_string();

        let failure = validate_registration(&request).unwrap_err();
        assert_eq!(failure.messages(), ["Passwords do not match"]);
        assert_eq!(
            *failure.fields(),
            FieldFlags {
                password_confirmation: true,
                ..FieldFlags::default()
            }
        );
    }

    #[test]
    fn test_weak_password_with_matching_confirmation_only_flags_password() {
        let mut request = valid_request();
        request.password = "weakpass".to_string();
        request.password_confirmation = "weakpass".to_string();

        let failure = validate_registration(&request).unwrap_err();
        assert!(failure.fields().password);
        assert!(!failure.fields().password_confirmation);
        assert_eq!(failure.messages().len(), 1);
    }

    #[test]
    fn test_all_violations_reported_in_one_pass() {
        let request = RegistrationRequest::new("J4ne", "", "UPPERCASE", "jane@x.com", "Abcdefg1", "Abcdefg1");

        let failure = validate_registration(&request).unwrap_err();
        assert_eq!(failure.messages().len(), 3);
        assert_eq!(failure.fields().count(), 3);
        assert!(failure.fields().name);
        assert!(failure.fields().surname);
        assert!(failure.fields().login);
    }

    #[test]
    fn test_short_login_and_weak_password() {
        let request = RegistrationRequest::new("Jane", "Doe", "short", "jane@x.com", "weak", "weak");

        let failure = validate_registration(&request).unwrap_err();
        assert_eq!(
            failure.messages(),
            [
                "Invalid login, allowed : lowercase letters and digits between 8 and 12 characters",
                "Invalid password, must 8 characters long and contain 1 uppercase letter, 1 lowercase letter and 1 number",
            ]
        );
        assert_eq!(
            *failure.fields(),
            FieldFlags {
                login: true,
                password: true,
                ..FieldFlags::default()
            }
        );
    }

    #[test]
    fn test_messages_follow_field_order() {
        let failure = validate_registration(&RegistrationRequest::default()).unwrap_err();

        assert_eq!(
            failure.messages(),
            [
                "Name is required",
                "Surname is required",
                "Login is required",
                "Email is required",
                "Password is required",
                "Please confirm your password",
            ]
        );
        assert_eq!(failure.fields().count(), 6);
    }

    #[test]
    fn test_field_flags_serialization() {
        let flags = FieldFlags {
            email: true,
            ..FieldFlags::default()
        };

        let json = serde_json::to_value(flags).unwrap();
        assert_eq!(json["email"], true);
        assert_eq!(json["password_confirmation"], false);
    }

    #[test]
    fn test_mistyped_field_is_malformed_even_if_text_would_pass() {
        let json = r#"{"name": "Jane", "surname": "Doe", "login": 12345678,
            "email": "jane@x.com", "password": "Abcdefg1", "password_confirmation": "Abcdefg1"}"#;
        let request: RegistrationRequest = serde_json::from_str(json).unwrap();

        let failure = validate_registration(&request).unwrap_err();

        assert_eq!(
            failure.messages(),
            &["Invalid login, allowed : lowercase letters and digits between 8 and 12 characters"]
        );
        assert!(failure.fields().login);
        assert_eq!(failure.fields().count(), 1);
    }
}
