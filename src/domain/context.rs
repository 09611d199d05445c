//! Operation Context
//!
//! The authenticated caller and correlation id a service operation runs under.

use uuid::Uuid;

/// Who a request acts for, carried from the auth middleware into services
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    /// Authenticated user the request acts for
    pub user_id: Uuid,

    /// Correlation ID for request tracing
    pub correlation_id: Uuid,
}

impl OperationContext {
    /// Context for `user_id`, reusing the caller's correlation id when given
    pub fn for_user(user_id: Uuid, correlation_id: Option<Uuid>) -> Self {
        Self {
            user_id,
            correlation_id: correlation_id.unwrap_or_else(Uuid::new_v4),
        }
    }

    /// Whether this context may act on `user_id`'s data
    pub fn acts_for(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
