use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use super::level::Level;

pub const USERNAME_MAX_LEN: usize = 50;
pub const EMAIL_MAX_LEN: usize = 255;

/// Registered learner as stored by the backend.
/// `password_hash` is an argon2 PHC string and never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub level: Level,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// The only user shape returned by auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// `GET /api/auth/me` response.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: PublicUser,
    pub level: Level,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Level arrives as text so that `"b2"` is accepted as well as `"B2"`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub level: String,
}

/// Registration input after validation and normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login input after validation and normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            level: Level::A1,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    pub fn to_profile(&self) -> Profile {
        Profile {
            user: self.to_public(),
            level: self.level,
            last_login: self.last_login,
        }
    }
}

impl RegisterRequest {
    /// Checks the form and returns trimmed values, with the email lower-cased.
    /// The password is kept verbatim.
    pub fn validate(self) -> Result<NewUser, String> {
        let username = required(self.username.as_deref());
        let email = required(self.email.as_deref());
        let password = self.password.filter(|p| !p.trim().is_empty());

        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err("All fields are required".to_string());
        };

        if username.chars().count() > USERNAME_MAX_LEN {
            return Err(format!("Username cannot exceed {} characters", USERNAME_MAX_LEN));
        }

        let email = normalize_email(&email);
        if email.len() > EMAIL_MAX_LEN {
            return Err(format!("Email cannot exceed {} characters", EMAIL_MAX_LEN));
        }

        if !is_valid_email(&email) {
            return Err("Invalid email format".to_string());
        }

        Ok(NewUser {
            username,
            email,
            password,
        })
    }
}

impl LoginRequest {
    pub fn validate(self) -> Result<Credentials, String> {
        let email = required(self.email.as_deref());
        let password = self.password.filter(|p| !p.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(Credentials {
                email: normalize_email(&email),
                password,
            }),
            _ => Err("All fields are required".to_string()),
        }
    }
}

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Minimal structural check: one `@`, a dotted domain, no exotic characters.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 {
        return false;
    }

    if domain.is_empty() || domain.len() > 253 || !domain.contains('.') {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    local.chars().all(|c| c.is_alphanumeric() || ".-_+".contains(c))
        && domain.chars().all(|c| c.is_alphanumeric() || ".-".contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_request_normalization() {
        let new_user = register("  anna  ", "  Anna@Example.COM ", " pass word ")
            .validate()
            .unwrap();

        assert_eq!(new_user.username, "anna");
        assert_eq!(new_user.email, "anna@example.com");
        assert_eq!(new_user.password, " pass word ");
    }

    #[test]
    fn test_register_request_missing_fields() {
        let missing = RegisterRequest {
            username: Some("anna".to_string()),
            email: None,
            password: Some("secret".to_string()),
        };
        assert_eq!(missing.validate().unwrap_err(), "All fields are required");

        let blank = register("anna", "anna@example.com", "   ");
        assert_eq!(blank.validate().unwrap_err(), "All fields are required");

        let blank_name = register(" ", "anna@example.com", "secret");
        assert_eq!(blank_name.validate().unwrap_err(), "All fields are required");
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        assert_eq!(
            register("anna", "not-an-email", "secret").validate().unwrap_err(),
            "Invalid email format"
        );
    }

    #[test]
    fn test_register_request_rejects_long_username() {
        let long_name = "a".repeat(USERNAME_MAX_LEN + 1);
        assert!(register(&long_name, "anna@example.com", "secret").validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let credentials = LoginRequest {
            email: Some(" Tom@Example.com".to_string()),
            password: Some("secret".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(credentials.email, "tom@example.com");

        let missing = LoginRequest {
            email: Some("tom@example.com".to_string()),
            password: Some(String::new()),
        };
        assert_eq!(missing.validate().unwrap_err(), "All fields are required");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("user+tag@example.org"));

        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@domain"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("anna".into(), "anna@example.com".into(), "hash".into());

        assert_ne!(user.id, Uuid::nil());
        assert_eq!(user.level, Level::A1);
        assert!(user.last_login.is_none());
    }

    #[test]
    fn test_profile_serialization_flattens_user() {
        let mut user = User::new("anna".into(), "anna@example.com".into(), "hash".into());
        user.id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();

        let json = serde_json::to_value(user.to_profile()).unwrap();
        assert_eq!(json["id"], "123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(json["username"], "anna");
        assert_eq!(json["level"], "A1");
        assert!(json.get("password_hash").is_none());
    }
}
