use serde::{Deserialize, Serialize};

/// Age shown when a profile has never been filled in.
pub const DEFAULT_AGE: i64 = 18;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for the self-service password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub username: String,
    pub new_password: String,
}

/// Request body for a profile update. All three fields are overwritten.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub age: i64,
    pub gender: Gender,
    pub language: Language,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}

/// Plain confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Profile view with display defaults applied for unset or invalid stored
/// values.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub age: i64,
    pub gender: Gender,
    pub language: Language,
    pub account_created: Option<String>,
    pub last_login: Option<String>,
    pub last_profile_update: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }

    /// Stored values outside the known set yield `None`; callers fall back
    /// to the default.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Others" => Some(Gender::Others),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "English" => Some(Language::English),
            "Hindi" => Some(Language::Hindi),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stored_values_fall_back_to_defaults() {
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("female"), None);
        assert_eq!(Gender::parse("x").unwrap_or_default(), Gender::Male);

        assert_eq!(Language::parse("Hindi"), Some(Language::Hindi));
        assert_eq!(
            Language::parse("Spanish").unwrap_or_default(),
            Language::English
        );
    }

    #[test]
    fn profile_response_serializes_enums_as_labels() {
        let response = ProfileResponse {
            username: "alice".to_string(),
            age: 25,
            gender: Gender::Female,
            language: Language::Hindi,
            account_created: Some("2026-08-07 10:00:00".to_string()),
            last_login: None,
            last_profile_update: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"Female\""));
        assert!(json.contains("\"Hindi\""));
        assert!(json.contains("alice"));
    }
}
