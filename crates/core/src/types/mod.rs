//! Newtype wrappers shared across the workspace.

mod credential;
mod id;
mod price;
mod role;

pub use credential::BearerToken;
pub use id::{CartId, CartItemId, ProductId, UserId};
pub use price::Price;
pub use role::AdvisoryRole;
