use crate::{
    domain::{clamp_withdrawal, Department, Member, MemberSale, NewMember, Product},
    ports::database::{DatabasePort, Error},
};
use rust_decimal::Decimal;
use sqlx::{mysql::MySqlPool, FromRow};

/// Adapter for the store's MySQL database.
///
/// The original deployment drove these operations through stored procedures;
/// they are plain parameterized statements here, with the withdrawal running
/// in an explicit transaction so the clamp stays atomic under concurrent
/// requests for the same member.
#[derive(Clone, Debug)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DatabasePort for MySqlDatabase {
    async fn get_member(&self, card_id: i64) -> Result<Option<Member>, Error> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM member WHERE card_id = ?")
            .bind(card_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(member)
    }

    async fn get_member_by_phone(&self, phone_number: i64) -> Result<Option<Member>, Error> {
        let member = sqlx::query_as::<_, Member>("SELECT * FROM member WHERE phone_number = ?")
            .bind(phone_number)
            .fetch_optional(&self.pool)
            .await?;

        Ok(member)
    }

    async fn add_member(&self, member: NewMember) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO member ( \
                phone_number, first_name, middle_initial, last_name, \
                address, apartment_number, city, state, zip, email \
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(member.phone_number)
        .bind(&member.first_name)
        .bind(&member.middle_initial)
        .bind(&member.last_name)
        .bind(&member.address)
        .bind(member.apartment_number)
        .bind(&member.city)
        .bind(&member.state)
        .bind(member.zip)
        .bind(&member.email)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn give_fuel_points(&self, card_id: i64, points: u32) -> Result<(), Error> {
        let res = sqlx::query(
            "UPDATE member \
             SET current_month_fuel_points = current_month_fuel_points + ? \
             WHERE card_id = ?",
        )
        .bind(points)
        .bind(card_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Err(Error::MemberNotFound(card_id));
        }

        Ok(())
    }

    async fn withdraw_fuel_points(&self, card_id: i64, points: u32) -> Result<u32, Error> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so the balance cannot move between the read and the
        // clamped write.
        let available: Option<u32> = sqlx::query_scalar(
            "SELECT current_month_fuel_points FROM member WHERE card_id = ? FOR UPDATE",
        )
        .bind(card_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(available) = available else {
            return Err(Error::MemberNotFound(card_id));
        };
        let withdrawn = clamp_withdrawal(available, points);

        sqlx::query(
            "UPDATE member \
             SET current_month_fuel_points = current_month_fuel_points - ? \
             WHERE card_id = ?",
        )
        .bind(withdrawn)
        .bind(card_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(withdrawn)
    }

    async fn get_product(&self, product_id: i64) -> Result<Option<Product>, Error> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT p.id, p.name, p.price, p.min_age, p.priced_by_weight, \
                    d.department_name, d.min_age AS department_min_age, d.wic_approved, \
                    s.sale_id, s.price_modifier, s.required_amount, s.sale_name \
             FROM product p \
             JOIN department d ON d.department_name = p.department_name \
             LEFT JOIN member_sale s ON s.sale_id = p.sale_id \
             WHERE p.id = ?",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}

/// Flat result of the product read; the foreign keys are resolved by the
/// query itself, so the sale columns are all nullable together.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: Decimal,
    min_age: u8,
    priced_by_weight: bool,
    department_name: String,
    department_min_age: u8,
    wic_approved: bool,
    sale_id: Option<i64>,
    price_modifier: Option<f32>,
    required_amount: Option<u32>,
    sale_name: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let member_sale = match (row.sale_id, row.price_modifier, row.required_amount) {
            (Some(sale_id), Some(price_modifier), Some(required_amount)) => Some(MemberSale {
                sale_id,
                price_modifier,
                required_amount,
                sale_name: row.sale_name,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            department: Department {
                department_name: row.department_name,
                min_age: row.department_min_age,
                wic_approved: row.wic_approved,
            },
            min_age: row.min_age,
            priced_by_weight: row.priced_by_weight,
            member_sale,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            // Constraint rejections carry the database's own message, which is
            // surfaced to the caller as-is.
            sqlx::Error::Database(db_err) => Self::Constraint(db_err.message().to_string()),
            other => Self::Adapter(Box::new(other)),
        }
    }
}
