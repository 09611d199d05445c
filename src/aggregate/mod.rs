//! Aggregate module
//!
//! Consistency units owned by a single user.

pub mod cart;
pub mod recently_viewed;

pub use cart::{Cart, CartLine, CartTotals};
pub use recently_viewed::{RecentlyViewed, ViewedEntry, RECENTLY_VIEWED_CAPACITY};
