use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

/// Entry of the fixed user catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    /// Catalog key, also the value of the identity cookie
    #[serde(default)]
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "UserRecord::default_lang")]
    pub lang: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl UserRecord {
    pub fn new(key: &str, display_name: &str, theme: Theme, is_admin: bool) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            theme,
            lang: Self::default_lang(),
            is_admin,
        }
    }

    fn default_lang() -> String {
        "de".to_string()
    }
}

/// The resolved caller of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    pub key: String,
    pub display_name: String,
    pub theme: Theme,
    pub lang: String,
    pub is_admin: bool,
}

impl From<UserRecord> for Identity {
    fn from(user: UserRecord) -> Self {
        Self {
            key: user.key,
            display_name: user.display_name,
            theme: user.theme,
            lang: user.lang,
            is_admin: user.is_admin,
        }
    }
}

/// Request body for logging in
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Catalog key to log in as
    pub user: String,
}

/// Request body for renaming a user
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RenameUserRequest {
    pub display_name: String,
}
