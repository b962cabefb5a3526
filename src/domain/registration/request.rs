//! Registration request as submitted by the caller

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::validation::RegistrationField;

/// Raw, untrusted registration fields
///
/// Only a JSON object is accepted. Absent or `null` fields become empty
/// strings, which the validator reports as missing. Numbers, booleans and
/// nested values are kept in their JSON text form and remembered as
/// mistyped, so the validator reports them as malformed.
#[derive(Clone, Default)]
pub struct RegistrationRequest {
    pub name: String,
    pub surname: String,
    pub login: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    mistyped: Vec<RegistrationField>,
}

impl RegistrationRequest {
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        login: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            surname: surname.into(),
            login: login.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
            mistyped: Vec::new(),
        }
    }

    /// Fields submitted with a JSON type other than string or `null`
    pub fn mistyped(&self) -> &[RegistrationField] {
        &self.mistyped
    }

    fn field_mut(&mut self, field: RegistrationField) -> &mut String {
        match field {
            RegistrationField::Name => &mut self.name,
            RegistrationField::Surname => &mut self.surname,
            RegistrationField::Login => &mut self.login,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Password => &mut self.password,
            RegistrationField::PasswordConfirmation => &mut self.password_confirmation,
        }
    }
}

impl<'de> Deserialize<'de> for RegistrationRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        let mut request = Self::default();

        for field in RegistrationField::ALL {
            let (text, is_text) = match body.remove(field.as_str()) {
                None | Some(Value::Null) => (String::new(), true),
                Some(Value::String(text)) => (text, true),
                Some(other) => (other.to_string(), false),
            };

            *request.field_mut(field) = text;
            if !is_text {
                request.mistyped.push(field);
            }
        }

        Ok(request)
    }
}

// Passwords stay out of logs
impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("login", &self.login)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .finish()
    }
}
