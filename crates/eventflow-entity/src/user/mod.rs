//! User entities read from the identity provider.

pub mod model;
pub mod role;

pub use model::UserSummary;
pub use role::ActorRole;
