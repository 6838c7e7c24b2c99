use serde::{Deserialize, Serialize};

/// The signed-in user, passed explicitly to everything that reads or writes
/// that user's transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name to greet the user with; falls back to the user id.
    pub fn greeting_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}
