// Inventory reservation against the per-(equipment, city) counters.
// Every counter mutation runs inside the caller's transaction and leaves a
// row in the reservation ledger.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::{catalog::ReservationKind, lead::Lead},
};

#[derive(Clone)]
pub struct ReservationService {
    catalog_repo: CatalogRepository,
}

impl ReservationService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    /// Reserves one unit of `equipment_id` in the lead's city and releases
    /// the previously assigned unit, if any. Re-assigning the same equipment
    /// is a no-op. The caller persists the lead's `assigned_equipment_id`.
    pub async fn assign(
        &self,
        conn: &mut PgConnection,
        lead: &Lead,
        equipment_id: Uuid,
    ) -> Result<(), AppError> {
        // A closed lead has already released its unit at settlement; a new
        // reservation on it would never be given back.
        if !lead.status.accepts_equipment() {
            return Err(AppError::InvalidInput(
                "Cannot assign equipment to a completed or closed lead.".to_string(),
            ));
        }

        if lead.assigned_equipment_id == Some(equipment_id) {
            return Ok(());
        }

        self.catalog_repo
            .find_equipment(&mut *conn, equipment_id)
            .await?
            .ok_or(AppError::NotFound("equipment"))?;

        // The pricing row doubles as the availability pool; no row means the
        // equipment is simply not offered in that city.
        self.catalog_repo
            .find_price(&mut *conn, equipment_id, lead.city_id)
            .await?
            .ok_or(AppError::EquipmentNotOffered)?;

        // Conditional increment; whoever commits first gets the last unit.
        let reserved = self
            .catalog_repo
            .try_reserve_unit(&mut *conn, equipment_id, lead.city_id)
            .await?;
        if reserved == 0 {
            return Err(AppError::NoUnitsAvailable);
        }

        // Swap: give back the unit held by the previous assignment.
        if let Some(old_equipment_id) = lead.assigned_equipment_id {
            self.release(&mut *conn, lead.id, old_equipment_id, lead.city_id)
                .await?;
        }

        self.catalog_repo
            .record_reservation_event(
                &mut *conn,
                lead.id,
                equipment_id,
                lead.city_id,
                ReservationKind::Reserved,
            )
            .await?;

        tracing::info!(lead_id = %lead.id, equipment_id = %equipment_id, "equipment reserved");
        Ok(())
    }

    /// Gives one unit back to the pool, floored at zero. The ledger row is
    /// written only when a counter actually moved.
    pub async fn release(
        &self,
        conn: &mut PgConnection,
        lead_id: Uuid,
        equipment_id: Uuid,
        city_id: Uuid,
    ) -> Result<(), AppError> {
        let released = self
            .catalog_repo
            .release_unit(&mut *conn, equipment_id, city_id)
            .await?;

        if released > 0 {
            self.catalog_repo
                .record_reservation_event(
                    &mut *conn,
                    lead_id,
                    equipment_id,
                    city_id,
                    ReservationKind::Released,
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // In-memory mirror of the two conditional updates the repository issues
    // against a pricing row, so counter sequences can be checked without a
    // database. `try_reserve` matches `quantity_in_use < quantity`;
    // `release` matches `quantity_in_use > 0`.
    struct Pool {
        quantity: i32,
        in_use: i32,
    }

    impl Pool {
        fn new(quantity: i32) -> Self {
            Self { quantity, in_use: 0 }
        }

        fn try_reserve(&mut self) -> bool {
            if self.in_use < self.quantity {
                self.in_use += 1;
                true
            } else {
                false
            }
        }

        fn release(&mut self) -> bool {
            if self.in_use > 0 {
                self.in_use -= 1;
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn pool_never_hands_out_more_than_quantity() {
        let mut pool = Pool::new(2);
        assert!(pool.try_reserve());
        assert!(pool.try_reserve());
        assert!(!pool.try_reserve());
        assert_eq!(pool.in_use, 2);
    }

    #[test]
    fn release_floors_at_zero() {
        let mut pool = Pool::new(2);
        assert!(pool.try_reserve());
        assert!(pool.release());
        assert!(!pool.release());
        assert_eq!(pool.in_use, 0);
    }

    #[test]
    fn swapping_equipment_keeps_net_usage_constant() {
        // assign() reserves on the new row before releasing the old one.
        let mut old_row = Pool::new(1);
        let mut new_row = Pool::new(1);
        assert!(old_row.try_reserve());

        assert!(new_row.try_reserve());
        assert!(old_row.release());

        assert_eq!(old_row.in_use, 0);
        assert_eq!(new_row.in_use, 1);
    }

    #[test]
    fn counter_stays_within_bounds_across_sequences() {
        let mut pool = Pool::new(3);
        for op in [true, true, false, true, false, false, false, true, true] {
            if op {
                pool.try_reserve();
            } else {
                pool.release();
            }
            assert!(pool.in_use >= 0 && pool.in_use <= pool.quantity);
        }
    }
}
