use blackbox_core::UserId;

/// Caller identity for a request.
///
/// Installed by the identity middleware; present on every route except the
/// public health probe. All storage access is scoped to this user.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}
