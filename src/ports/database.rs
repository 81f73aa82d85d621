use crate::domain::{Member, NewMember, Product};

#[mockall::automock]
#[async_trait::async_trait]
pub trait DatabasePort {
    /// Look up a member by card id.
    async fn get_member(&self, card_id: i64) -> Result<Option<Member>, Error>;

    /// Look up a member by the phone number attached to their card.
    async fn get_member_by_phone(&self, phone_number: i64) -> Result<Option<Member>, Error>;

    /// Insert a new member with default point balances.
    async fn add_member(&self, member: NewMember) -> Result<(), Error>;

    /// Add fuel points to a member's current-month balance.
    async fn give_fuel_points(&self, card_id: i64, points: u32) -> Result<(), Error>;

    /// Withdraw up to `points` from a member's current-month balance.
    ///
    /// Takes `min(points, balance)` and returns the amount actually withdrawn,
    /// so a request larger than the balance drains it instead of failing.
    async fn withdraw_fuel_points(&self, card_id: i64, points: u32) -> Result<u32, Error>;

    /// Look up a product by id, with its department and optional sale resolved.
    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A point operation addressed a member that does not exist
    ///
    /// Lookups represent absence as `Ok(None)` instead; this variant is for
    /// operations that need an existing row to act on.
    #[error("member {0} does not exist")]
    MemberNotFound(i64),

    /// The store rejected a write
    ///
    /// Carries the store's own error text, which is surfaced to the caller
    /// verbatim (e.g. the duplicate-key message for a reused phone number).
    #[error("{0}")]
    Constraint(String),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
