use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{City, Equipment, EquipmentRentalPrice, ReservationEvent, ReservationKind},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Cities
    // ---

    pub async fn create_city<'e, E>(&self, executor: E, name: &str) -> Result<City, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, City>("INSERT INTO cities (name) VALUES ($1) RETURNING *")
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict(format!("City '{}' already exists.", name));
                    }
                }
                e.into()
            })
    }

    pub async fn find_city_by_name<'e, E>(
        &self,
        executor: E,
        name: &str,
    ) -> Result<Option<City>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Case-insensitive: lead forms carry free-text city names.
        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE lower(name) = lower($1)")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(city)
    }

    pub async fn find_city<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<City>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let city = sqlx::query_as::<_, City>("SELECT * FROM cities WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(city)
    }

    pub async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        let cities = sqlx::query_as::<_, City>("SELECT * FROM cities ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    // ---
    // Equipment
    // ---

    pub async fn create_equipment<'e, E>(
        &self,
        executor: E,
        name: &str,
        model_number: Option<&str>,
        equipment_type: Option<&str>,
        description: Option<&str>,
    ) -> Result<Equipment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            INSERT INTO equipment (name, model_number, equipment_type, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(model_number)
        .bind(equipment_type)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(equipment)
    }

    pub async fn find_equipment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Equipment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let equipment = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(equipment)
    }

    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, AppError> {
        let equipment = sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(equipment)
    }

    // ---
    // Pricing rows (the availability pool)
    // ---

    pub async fn create_rental_price<'e, E>(
        &self,
        executor: E,
        equipment_id: Uuid,
        city_id: Uuid,
        price_per_day: Decimal,
        quantity: i32,
    ) -> Result<EquipmentRentalPrice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EquipmentRentalPrice>(
            r#"
            INSERT INTO equipment_rental_prices (equipment_id, city_id, price_per_day, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .bind(city_id)
        .bind(price_per_day)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "A rental price already exists for this equipment in this city.".to_string(),
                    );
                }
            }
            e.into()
        })
    }

    pub async fn list_rental_prices<'e, E>(
        &self,
        executor: E,
        equipment_id: Uuid,
    ) -> Result<Vec<EquipmentRentalPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let prices = sqlx::query_as::<_, EquipmentRentalPrice>(
            "SELECT * FROM equipment_rental_prices WHERE equipment_id = $1",
        )
        .bind(equipment_id)
        .fetch_all(executor)
        .await?;
        Ok(prices)
    }

    pub async fn find_price<'e, E>(
        &self,
        executor: E,
        equipment_id: Uuid,
        city_id: Uuid,
    ) -> Result<Option<EquipmentRentalPrice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let price = sqlx::query_as::<_, EquipmentRentalPrice>(
            "SELECT * FROM equipment_rental_prices WHERE equipment_id = $1 AND city_id = $2",
        )
        .bind(equipment_id)
        .bind(city_id)
        .fetch_optional(executor)
        .await?;
        Ok(price)
    }

    /// Conditional increment: claims one unit only while a free unit exists.
    /// Returns the number of rows updated (0 means the pool is exhausted);
    /// concurrent claims on the last unit serialize on the row lock.
    pub async fn try_reserve_unit<'e, E>(
        &self,
        executor: E,
        equipment_id: Uuid,
        city_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE equipment_rental_prices
            SET quantity_in_use = quantity_in_use + 1, updated_at = now()
            WHERE equipment_id = $1 AND city_id = $2 AND quantity_in_use < quantity
            "#,
        )
        .bind(equipment_id)
        .bind(city_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Decrement floored at zero; never drives the counter negative.
    pub async fn release_unit<'e, E>(
        &self,
        executor: E,
        equipment_id: Uuid,
        city_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE equipment_rental_prices
            SET quantity_in_use = quantity_in_use - 1, updated_at = now()
            WHERE equipment_id = $1 AND city_id = $2 AND quantity_in_use > 0
            "#,
        )
        .bind(equipment_id)
        .bind(city_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn record_reservation_event<'e, E>(
        &self,
        executor: E,
        lead_id: Uuid,
        equipment_id: Uuid,
        city_id: Uuid,
        kind: ReservationKind,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO reservation_events (lead_id, equipment_id, city_id, kind)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(lead_id)
        .bind(equipment_id)
        .bind(city_id)
        .bind(kind)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_reservation_events(
        &self,
        lead_id: Uuid,
    ) -> Result<Vec<ReservationEvent>, AppError> {
        let events = sqlx::query_as::<_, ReservationEvent>(
            "SELECT * FROM reservation_events WHERE lead_id = $1 ORDER BY created_at ASC",
        )
        .bind(lead_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}
