use crate::{
    domain::{clamp_withdrawal, Member, NewMember, Product},
    ports::database::{DatabasePort, Error},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

/// In-memory store with the same observable behavior as the MySQL adapter.
///
/// Backs the handler and adapter tests; nothing in the serving path uses it.
#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    members: HashMap<i64, Member>,
    products: HashMap<i64, Product>,
    next_card_id: i64,
}

impl MemoryDatabase {
    /// Seed a product (and its references) directly into the store.
    ///
    /// The HTTP surface has no product insert; rows come from store tooling.
    pub fn insert_product(&self, product: Product) -> Result<(), Error> {
        self.inner.lock()?.products.insert(product.id, product);
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabasePort for MemoryDatabase {
    async fn get_member(&self, card_id: i64) -> Result<Option<Member>, Error> {
        Ok(self.inner.lock()?.members.get(&card_id).cloned())
    }

    async fn get_member_by_phone(&self, phone_number: i64) -> Result<Option<Member>, Error> {
        Ok(self
            .inner
            .lock()?
            .members
            .values()
            .find(|member| member.phone_number == phone_number)
            .cloned())
    }

    async fn add_member(&self, member: NewMember) -> Result<(), Error> {
        let mut inner = self.inner.lock()?;
        // Same uniqueness rejection the MySQL schema produces, message included
        if inner
            .members
            .values()
            .any(|existing| existing.phone_number == member.phone_number)
        {
            return Err(Error::Constraint(format!(
                "Duplicate entry '{}' for key 'member.phone_number'",
                member.phone_number
            )));
        }

        inner.next_card_id += 1;
        let card_id = inner.next_card_id;
        inner.members.insert(card_id, member.into_member(card_id));
        Ok(())
    }

    async fn give_fuel_points(&self, card_id: i64, points: u32) -> Result<(), Error> {
        match self.inner.lock()?.members.get_mut(&card_id) {
            Some(member) => {
                member.current_month_fuel_points += points;
                Ok(())
            }
            None => Err(Error::MemberNotFound(card_id)),
        }
    }

    async fn withdraw_fuel_points(&self, card_id: i64, points: u32) -> Result<u32, Error> {
        match self.inner.lock()?.members.get_mut(&card_id) {
            Some(member) => {
                let withdrawn = clamp_withdrawal(member.current_month_fuel_points, points);
                member.current_month_fuel_points -= withdrawn;
                Ok(withdrawn)
            }
            None => Err(Error::MemberNotFound(card_id)),
        }
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, Error> {
        Ok(self.inner.lock()?.products.get(&product_id).cloned())
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

/// We need to create a custom `From` implementation here for an error that's specific to this
/// adapter.
impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Department, MemberSale};
    use rust_decimal::Decimal;
    use speculoos::prelude::*;

    fn new_member(phone_number: i64) -> NewMember {
        NewMember {
            phone_number,
            first_name: "Pat".to_string(),
            middle_initial: Some("J".to_string()),
            last_name: "Davis".to_string(),
            address: Some("12 Main St".to_string()),
            apartment_number: None,
            city: Some("Burlington".to_string()),
            state: Some("VT".to_string()),
            zip: Some(5401),
            email: Some("pat@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_retrieve() {
        let database = MemoryDatabase::default();

        let res = database.add_member(new_member(5550001111)).await;
        assert_that!(res).is_ok();

        // First insert gets the first card id
        let res = database.get_member(1).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|member| member.phone_number == 5550001111);

        let res = database.get_member_by_phone(5550001111).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|member| member.card_id == 1);
    }

    #[tokio::test]
    async fn test_get_member_unknown() {
        let database = MemoryDatabase::default();

        let res = database.get_member(42).await;
        assert_that!(res).is_ok().is_none();

        let res = database.get_member_by_phone(5550001111).await;
        assert_that!(res).is_ok().is_none();
    }

    #[tokio::test]
    async fn test_duplicate_phone_rejected() {
        let database = MemoryDatabase::default();
        let res = database.add_member(new_member(5550001111)).await;
        assert_that!(res).is_ok();

        // Second member with the same phone number is rejected with the
        // store's own message
        let res = database.add_member(new_member(5550001111)).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::Constraint(msg) if msg.contains("5550001111")));

        // The first member is untouched
        let res = database.get_member(1).await;
        assert_that!(res).is_ok().is_some();
    }

    #[tokio::test]
    async fn test_give_points() {
        let database = MemoryDatabase::default();
        database.add_member(new_member(5550001111)).await.unwrap();

        let res = database.give_fuel_points(1, 50).await;
        assert_that!(res).is_ok();
        let res = database.give_fuel_points(1, 25).await;
        assert_that!(res).is_ok();

        let res = database.get_member(1).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|member| member.current_month_fuel_points == 75);
    }

    #[tokio::test]
    async fn test_give_points_unknown_member() {
        let database = MemoryDatabase::default();

        let res = database.give_fuel_points(42, 50).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::MemberNotFound(42)));
    }

    #[tokio::test]
    async fn test_withdraw_within_balance() {
        let database = MemoryDatabase::default();
        database.add_member(new_member(5550001111)).await.unwrap();
        database.give_fuel_points(1, 50).await.unwrap();

        let res = database.withdraw_fuel_points(1, 30).await;
        assert_that!(res).is_ok().is_equal_to(30);

        let res = database.get_member(1).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|member| member.current_month_fuel_points == 20);
    }

    #[tokio::test]
    async fn test_withdraw_clamped_to_balance() {
        let database = MemoryDatabase::default();
        database.add_member(new_member(5550001111)).await.unwrap();
        database.give_fuel_points(1, 50).await.unwrap();

        // Asking for more than the balance drains it
        let res = database.withdraw_fuel_points(1, 80).await;
        assert_that!(res).is_ok().is_equal_to(50);

        let res = database.get_member(1).await;
        assert_that!(res)
            .is_ok()
            .is_some()
            .matches(|member| member.current_month_fuel_points == 0);
    }

    #[tokio::test]
    async fn test_withdraw_unknown_member() {
        let database = MemoryDatabase::default();

        let res = database.withdraw_fuel_points(42, 10).await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::MemberNotFound(42)));
    }

    #[tokio::test]
    async fn test_get_product() {
        let database = MemoryDatabase::default();
        let product = Product {
            id: 9000,
            name: "Orange juice".to_string(),
            price: Decimal::new(349, 2),
            department: Department {
                department_name: "Dairy".to_string(),
                min_age: 0,
                wic_approved: true,
            },
            min_age: 0,
            priced_by_weight: false,
            member_sale: Some(MemberSale {
                sale_id: 1,
                price_modifier: 0.5,
                required_amount: 2,
                sale_name: Some("2 for 1".to_string()),
            }),
        };
        database.insert_product(product.clone()).unwrap();

        let res = database.get_product(9000).await;
        assert_that!(res).is_ok().is_some().is_equal_to(product);

        let res = database.get_product(9001).await;
        assert_that!(res).is_ok().is_none();
    }
}
