use gasto_domain::OwnerId;

use crate::CoreError;

/// The authenticated user on whose behalf services run.
///
/// Built by the caller once authentication succeeds and passed explicitly to
/// every service, so nothing reaches for a global "current user".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    owner: OwnerId,
    email: Option<String>,
}

impl Session {
    pub fn new(owner: OwnerId) -> Result<Self, CoreError> {
        if owner.is_empty() {
            return Err(CoreError::Validation("user id is required".into()));
        }
        Ok(Self { owner, email: None })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into().trim().to_string();
        self.email = (!email.is_empty()).then_some(email);
        self
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}
