//! Services module
//!
//! Application services that coordinate the aggregates, the catalog and
//! the repositories. Handlers in `api` call into these and nothing else.

mod cart;
mod commands;
mod profile;


pub use cart::CartService;
pub use commands::*;
pub use profile::UserProfileService;

use uuid::Uuid;

use crate::domain::OperationContext;
use crate::error::{AppError, AppResult};

/// Reject an operation on data that belongs to someone other than the caller
fn authorize(context: &OperationContext, user_id: Uuid) -> AppResult<()> {
    if context.acts_for(user_id) {
        Ok(())
    } else {
        tracing::warn!(
            acting_user = %context.user_id,
            target_user = %user_id,
            correlation_id = %context.correlation_id,
            "Rejected operation on another user's data"
        );
        Err(AppError::Unauthorized)
    }
}
