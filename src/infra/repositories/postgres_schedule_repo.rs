use crate::domain::models::schedule::{
    BusinessHours, DaySources, HourRange, OffDay, ScheduledClass, ServiceScheduleRange, SlotBlock,
};
use crate::domain::ports::ScheduleRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

pub struct PostgresScheduleRepo {
    pool: PgPool,
}

impl PostgresScheduleRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn hours_for_scope(&self, business_id: &str, location_id: Option<&str>, day_of_week: i32) -> Result<Option<BusinessHours>, AppError> {
        match location_id {
            Some(loc) => sqlx::query_as::<_, BusinessHours>(
                "SELECT * FROM business_hours WHERE business_id = $1 AND location_id = $2 AND day_of_week = $3"
            ).bind(business_id).bind(loc).bind(day_of_week).fetch_optional(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, BusinessHours>(
                "SELECT * FROM business_hours WHERE business_id = $1 AND location_id IS NULL AND day_of_week = $2"
            ).bind(business_id).bind(day_of_week).fetch_optional(&self.pool).await.map_err(AppError::Database),
        }
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepo {
    async fn upsert_business_hours(&self, hours: &BusinessHours, ranges: &[HourRange]) -> Result<BusinessHours, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM business_hours WHERE business_id = $1 AND COALESCE(location_id, '') = COALESCE($2, '') AND day_of_week = $3"
        )
            .bind(&hours.business_id).bind(&hours.location_id).bind(hours.day_of_week)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        if let Some((old_id,)) = existing {
            sqlx::query("DELETE FROM hour_ranges WHERE business_hours_id = $1").bind(&old_id).execute(&mut *tx).await.map_err(AppError::Database)?;
            sqlx::query("DELETE FROM business_hours WHERE id = $1").bind(&old_id).execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        let created = sqlx::query_as::<_, BusinessHours>(
            "INSERT INTO business_hours (id, business_id, location_id, day_of_week, open_time, close_time, is_closed, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&hours.id).bind(&hours.business_id).bind(&hours.location_id).bind(hours.day_of_week)
            .bind(hours.open_time).bind(hours.close_time).bind(hours.is_closed).bind(hours.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for range in ranges {
            sqlx::query(
                "INSERT INTO hour_ranges (id, business_hours_id, start_time, end_time, display_order, created_at) VALUES ($1, $2, $3, $4, $5, $6)"
            )
                .bind(&range.id).bind(&created.id).bind(range.start_time).bind(range.end_time)
                .bind(range.display_order).bind(range.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn list_business_hours(&self, business_id: &str) -> Result<Vec<BusinessHours>, AppError> {
        sqlx::query_as::<_, BusinessHours>(
            "SELECT * FROM business_hours WHERE business_id = $1 ORDER BY COALESCE(location_id, ''), day_of_week"
        ).bind(business_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_hour_ranges(&self, business_hours_id: &str) -> Result<Vec<HourRange>, AppError> {
        sqlx::query_as::<_, HourRange>(
            "SELECT * FROM hour_ranges WHERE business_hours_id = $1 ORDER BY display_order, start_time"
        ).bind(business_hours_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn replace_service_ranges(&self, service_id: &str, day_of_week: i32, ranges: &[ServiceScheduleRange]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM service_schedule_ranges WHERE service_id = $1 AND day_of_week = $2")
            .bind(service_id).bind(day_of_week)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        for range in ranges {
            sqlx::query(
                "INSERT INTO service_schedule_ranges (id, service_id, day_of_week, start_time, end_time, display_order, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)"
            )
                .bind(&range.id).bind(service_id).bind(day_of_week).bind(range.start_time)
                .bind(range.end_time).bind(range.display_order).bind(range.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn list_service_ranges(&self, service_id: &str) -> Result<Vec<ServiceScheduleRange>, AppError> {
        sqlx::query_as::<_, ServiceScheduleRange>(
            "SELECT * FROM service_schedule_ranges WHERE service_id = $1 ORDER BY day_of_week, display_order"
        ).bind(service_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn create_off_day(&self, off_day: &OffDay) -> Result<OffDay, AppError> {
        sqlx::query_as::<_, OffDay>(
            "INSERT INTO off_days (id, business_id, location_id, date, reason, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&off_day.id).bind(&off_day.business_id).bind(&off_day.location_id)
            .bind(off_day.date).bind(&off_day.reason).bind(off_day.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_off_days(&self, business_id: &str) -> Result<Vec<OffDay>, AppError> {
        sqlx::query_as::<_, OffDay>("SELECT * FROM off_days WHERE business_id = $1 ORDER BY date").bind(business_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_off_day(&self, business_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM off_days WHERE id = $1 AND business_id = $2").bind(id).bind(business_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Off-day not found".into())); }
        Ok(())
    }

    async fn create_slot_block(&self, block: &SlotBlock) -> Result<SlotBlock, AppError> {
        sqlx::query_as::<_, SlotBlock>(
            "INSERT INTO slot_blocks (id, business_id, service_id, date, start_time, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&block.id).bind(&block.business_id).bind(&block.service_id)
            .bind(block.date).bind(block.start_time).bind(block.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_slot_blocks(&self, service_id: &str) -> Result<Vec<SlotBlock>, AppError> {
        sqlx::query_as::<_, SlotBlock>("SELECT * FROM slot_blocks WHERE service_id = $1 ORDER BY date, start_time").bind(service_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_slot_block(&self, business_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM slot_blocks WHERE id = $1 AND business_id = $2").bind(id).bind(business_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Slot block not found".into())); }
        Ok(())
    }

    async fn create_class(&self, class: &ScheduledClass) -> Result<ScheduledClass, AppError> {
        sqlx::query_as::<_, ScheduledClass>(
            "INSERT INTO scheduled_classes (id, business_id, location_id, facility, day_of_week, start_time, service_id, staff_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&class.id).bind(&class.business_id).bind(&class.location_id).bind(&class.facility)
            .bind(class.day_of_week).bind(class.start_time).bind(&class.service_id).bind(&class.staff_id)
            .bind(class.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_classes(&self, business_id: &str) -> Result<Vec<ScheduledClass>, AppError> {
        sqlx::query_as::<_, ScheduledClass>(
            "SELECT * FROM scheduled_classes WHERE business_id = $1 ORDER BY day_of_week, start_time"
        ).bind(business_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_class(&self, business_id: &str, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM scheduled_classes WHERE id = $1 AND business_id = $2").bind(id).bind(business_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Class not found".into())); }
        Ok(())
    }

    async fn load_day_sources(
        &self,
        business_id: &str,
        location_id: Option<&str>,
        service_id: Option<&str>,
        date: NaiveDate,
        day_of_week: i32,
    ) -> Result<DaySources, AppError> {
        // A NULL-location off-day closes every location; location_id = NULL
        // in the comparison never matches, so the location clause only fires
        // when a concrete location is queried.
        let off_day = sqlx::query_as::<_, OffDay>(
            "SELECT * FROM off_days WHERE business_id = $1 AND date = $2 AND (location_id IS NULL OR location_id = $3) LIMIT 1"
        )
            .bind(business_id).bind(date).bind(location_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        let location_hours = match location_id {
            Some(loc) => self.hours_for_scope(business_id, Some(loc), day_of_week).await?,
            None => None,
        };
        let location_ranges = match &location_hours {
            Some(hours) => self.list_hour_ranges(&hours.id).await?,
            None => Vec::new(),
        };

        let default_hours = self.hours_for_scope(business_id, None, day_of_week).await?;
        let default_ranges = match &default_hours {
            Some(hours) => self.list_hour_ranges(&hours.id).await?,
            None => Vec::new(),
        };

        let service_ranges = match service_id {
            Some(svc) => sqlx::query_as::<_, ServiceScheduleRange>(
                "SELECT * FROM service_schedule_ranges WHERE service_id = $1 AND day_of_week = $2 ORDER BY display_order, start_time"
            ).bind(svc).bind(day_of_week).fetch_all(&self.pool).await.map_err(AppError::Database)?,
            None => Vec::new(),
        };

        let slot_blocks = match service_id {
            Some(svc) => sqlx::query_as::<_, SlotBlock>(
                "SELECT * FROM slot_blocks WHERE service_id = $1 AND date = $2 ORDER BY start_time"
            ).bind(svc).bind(date).fetch_all(&self.pool).await.map_err(AppError::Database)?,
            None => Vec::new(),
        };

        let classes = match location_id {
            Some(loc) => sqlx::query_as::<_, ScheduledClass>(
                "SELECT * FROM scheduled_classes WHERE location_id = $1 AND day_of_week = $2 ORDER BY start_time"
            ).bind(loc).bind(day_of_week).fetch_all(&self.pool).await.map_err(AppError::Database)?,
            None => sqlx::query_as::<_, ScheduledClass>(
                "SELECT * FROM scheduled_classes WHERE business_id = $1 AND day_of_week = $2 ORDER BY start_time"
            ).bind(business_id).bind(day_of_week).fetch_all(&self.pool).await.map_err(AppError::Database)?,
        };

        Ok(DaySources {
            off_day,
            location_hours,
            location_ranges,
            default_hours,
            default_ranges,
            service_ranges,
            slot_blocks,
            classes,
        })
    }
}
