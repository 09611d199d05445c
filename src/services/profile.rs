//! User Profile Service
//!
//! Profile reads and whitelisted updates, plus the per-user list of
//! recently viewed products.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DomainError, OperationContext, Product, ProfileChanges, UserProfile};
use crate::error::AppResult;
use crate::repository::{ProductCatalog, RepositoryError, UserRepository};

use super::{authorize, ProductSummary, UpdateProfileCommand};

/// Profile and browsing-history operations
#[derive(Clone)]
pub struct UserProfileService {
    users: Arc<dyn UserRepository>,
    catalog: Arc<dyn ProductCatalog>,
}

impl UserProfileService {
    pub fn new(users: Arc<dyn UserRepository>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { users, catalog }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        Ok(self
            .users
            .find(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?)
    }

    /// Apply whitelisted changes to the caller's profile
    pub async fn update_profile(
        &self,
        command: UpdateProfileCommand,
        context: &OperationContext,
    ) -> AppResult<UserProfile> {
        authorize(context, command.user_id)?;
        let changes = normalize_changes(command.changes)?;

        let current = self.get_profile(command.user_id).await?;
        if changes.is_empty() {
            return Ok(current);
        }

        if let Some(email) = &changes.email {
            if !email.eq_ignore_ascii_case(&current.email) {
                let holder = self.users.find_by_email(email).await?;
                if holder.is_some_and(|u| u.id != command.user_id) {
                    return Err(DomainError::EmailAlreadyInUse.into());
                }
            }
        }

        let updated = match self.users.update_profile(command.user_id, &changes).await {
            Ok(updated) => updated,
            // Another request claimed the address between the check and the write
            Err(RepositoryError::UniqueViolation(_)) => {
                return Err(DomainError::EmailAlreadyInUse.into())
            }
            Err(e) => return Err(e.into()),
        };
        let updated = updated.ok_or(DomainError::UserNotFound(command.user_id))?;

        tracing::info!(
            user_id = %command.user_id,
            correlation_id = %context.correlation_id,
            "Profile updated"
        );

        Ok(updated)
    }

    // =========================================================================
    // Recently viewed
    // =========================================================================

    /// Record a product view at the head of the user's list
    pub async fn record_view(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        context: &OperationContext,
    ) -> AppResult<Product> {
        authorize(context, user_id)?;
        let product = self
            .catalog
            .resolve(product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(product_id))?;

        let mut list = self.users.load_recently_viewed(user_id).await?;
        list.record(product.id, Utc::now());
        self.users.save_recently_viewed(user_id, &list).await?;

        tracing::debug!(
            user_id = %user_id,
            product_id = %product_id,
            correlation_id = %context.correlation_id,
            "Product view recorded"
        );

        Ok(product)
    }

    /// Recently viewed products, newest first. Products that have left the
    /// catalog are skipped.
    pub async fn recently_viewed(&self, user_id: Uuid) -> AppResult<Vec<ProductSummary>> {
        let list = self.users.load_recently_viewed(user_id).await?;
        if list.is_empty() {
            return Ok(Vec::new());
        }

        let ids = list.product_ids();
        let mut products = self.catalog.resolve_many(&ids).await?;

        Ok(ids
            .iter()
            .filter_map(|id| products.remove(id))
            .map(ProductSummary::from)
            .collect())
    }

    pub async fn clear_recently_viewed(
        &self,
        user_id: Uuid,
        context: &OperationContext,
    ) -> AppResult<()> {
        authorize(context, user_id)?;
        let mut list = self.users.load_recently_viewed(user_id).await?;
        list.clear();
        self.users.save_recently_viewed(user_id, &list).await?;

        tracing::info!(
            user_id = %user_id,
            correlation_id = %context.correlation_id,
            "Recently viewed cleared"
        );
        Ok(())
    }
}

/// Trim names, validate and lowercase the email
fn normalize_changes(changes: ProfileChanges) -> Result<ProfileChanges, DomainError> {
    let first_name = required("First name", changes.first_name)?;
    let last_name = required("Last name", changes.last_name)?;

    let email = match changes.email {
        Some(email) => {
            let email = email.trim().to_lowercase();
            if !validator::validate_email(email.as_str()) {
                return Err(DomainError::Validation(
                    "Please enter a valid email".to_string(),
                ));
            }
            Some(email)
        }
        None => None,
    };

    Ok(ProfileChanges {
        first_name,
        last_name,
        email,
        phone: optional(changes.phone),
        address: optional(changes.address),
        city: optional(changes.city),
        state: optional(changes.state),
        zip_code: optional(changes.zip_code),
        country: optional(changes.country),
    })
}

fn required(label: &str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if v.is_empty() => Err(DomainError::Validation(format!(
            "{label} cannot be empty"
        ))),
        other => Ok(other),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        let changes = ProfileChanges {
            first_name: Some("  Ada ".to_string()),
            email: Some(" Ada@Example.COM ".to_string()),
            city: Some(" Paris".to_string()),
            ..Default::default()
        };
        let normalized = normalize_changes(changes).unwrap();
        assert_eq!(normalized.first_name.as_deref(), Some("Ada"));
        assert_eq!(normalized.email.as_deref(), Some("ada@example.com"));
        assert_eq!(normalized.city.as_deref(), Some("Paris"));
        assert!(normalized.last_name.is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        let changes = ProfileChanges {
            last_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            normalize_changes(changes),
            Err(DomainError::Validation(msg)) if msg == "Last name cannot be empty"
        ));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let changes = ProfileChanges {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            normalize_changes(changes),
            Err(DomainError::Validation(_))
        ));
    }
}
