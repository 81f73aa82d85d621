use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A loyalty-program account holder.
///
/// Serialized field names match the wire format consumed by the storefront
/// clients (camelCase); the row mapping follows the column names as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier for the `Member`
    ///
    /// Assigned by the store on insert; this is the number printed on the
    /// physical loyalty card.
    pub card_id: i64,
    /// Unique across all members
    pub phone_number: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub address: Option<String>,
    pub apartment_number: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<i32>,
    pub email: Option<String>,
    /// Fuel points accrued this month
    pub current_month_fuel_points: u32,
    /// Fuel points carried from the previous month
    pub last_month_fuel_points: u32,
}

/// The writable fields of a member, as submitted on creation.
///
/// The card id and the point balances are store-assigned and start at their
/// defaults; callers never provide them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub phone_number: i64,
    pub first_name: String,
    pub middle_initial: Option<String>,
    pub last_name: String,
    pub address: Option<String>,
    pub apartment_number: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<i32>,
    pub email: Option<String>,
}

impl NewMember {
    /// A full member record as it exists right after insertion.
    pub fn into_member(self, card_id: i64) -> Member {
        Member {
            card_id,
            phone_number: self.phone_number,
            first_name: self.first_name,
            middle_initial: self.middle_initial,
            last_name: self.last_name,
            address: self.address,
            apartment_number: self.apartment_number,
            city: self.city,
            state: self.state,
            zip: self.zip,
            email: self.email,
            current_month_fuel_points: 0,
            last_month_fuel_points: 0,
        }
    }
}

/// A product category carrying the purchase restrictions shared by its products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_name: String,
    /// Minimum purchaser age for anything in this department
    pub min_age: u8,
    pub wic_approved: bool,
}

/// A store product with its department and optional member sale resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub department: Department,
    pub min_age: u8,
    /// Priced per unit of weight rather than per item
    pub priced_by_weight: bool,
    pub member_sale: Option<MemberSale>,
}

/// A member-only price modifier attached to at most one product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSale {
    pub sale_id: i64,
    /// Multiplicative factor applied to the product price
    pub price_modifier: f32,
    /// Quantity the member must buy for the modifier to apply
    pub required_amount: u32,
    pub sale_name: Option<String>,
}

/// Number of fuel points actually withdrawn for a requested amount.
///
/// A withdrawal takes at most what the member has; asking for more than the
/// available balance drains it rather than failing.
pub fn clamp_withdrawal(available: u32, requested: u32) -> u32 {
    available.min(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use speculoos::prelude::*;

    #[rstest]
    #[case(50, 30, 30)]
    #[case(50, 80, 50)]
    #[case(50, 50, 50)]
    #[case(0, 10, 0)]
    #[case(10, 0, 0)]
    fn test_clamp_withdrawal(
        #[case] available: u32,
        #[case] requested: u32,
        #[case] expected: u32,
    ) {
        // GIVEN an available balance and a requested amount

        // WHEN clamping the withdrawal
        let res = clamp_withdrawal(available, requested);

        // THEN it withdraws the lesser of the two
        assert_that!(res).is_equal_to(expected);
    }

    #[test]
    fn test_into_member_defaults() {
        let new_member = NewMember {
            phone_number: 5554443333,
            first_name: "Ada".to_string(),
            middle_initial: None,
            last_name: "Byron".to_string(),
            address: None,
            apartment_number: None,
            city: None,
            state: None,
            zip: None,
            email: None,
        };

        let member = new_member.into_member(7);

        assert_that!(member.card_id).is_equal_to(7);
        assert_that!(member.current_month_fuel_points).is_equal_to(0);
        assert_that!(member.last_month_fuel_points).is_equal_to(0);
    }
}
