use crate::domain::{models::{appointment::Appointment, job::Job}, ports::AppointmentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use chrono::{DateTime, Utc};

pub struct SqliteAppointmentRepo {
    pool: SqlitePool,
}

impl SqliteAppointmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentRepository for SqliteAppointmentRepo {
    async fn create(&self, appointment: &Appointment, slot_capacity: i32, jobs: Vec<Job>) -> Result<Appointment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // capacity is re-checked at write time; the slot list the caller saw
        // may be stale under concurrent bookings
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM appointments WHERE service_id = ? AND start_time < ? AND end_time > ? AND status != 'CANCELLED'"
        )
            .bind(&appointment.service_id).bind(appointment.end_time).bind(appointment.start_time)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        let occupied: i64 = row.get("count");
        if occupied >= slot_capacity as i64 {
            return Err(AppError::Conflict("Slot is fully booked".to_string()));
        }

        let created = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (id, business_id, service_id, location_id, staff_id, customer_name, customer_email, customer_note, start_time, end_time, status, attendance_status, cancellation_reason, management_token, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&appointment.id).bind(&appointment.business_id).bind(&appointment.service_id)
            .bind(&appointment.location_id).bind(&appointment.staff_id).bind(&appointment.customer_name)
            .bind(&appointment.customer_email).bind(&appointment.customer_note)
            .bind(appointment.start_time).bind(appointment.end_time).bind(&appointment.status)
            .bind(&appointment.attendance_status).bind(&appointment.cancellation_reason)
            .bind(&appointment.management_token).bind(appointment.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for job in jobs {
            sqlx::query("INSERT INTO jobs (id, job_type, payload, execute_at, status, error_message, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
                .bind(&job.id).bind(&job.job_type).bind(&job.payload).bind(job.execute_at)
                .bind(&job.status).bind(&job.error_message).bind(job.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, business_id: &str, id: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = ? AND id = ?").bind(business_id).bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE management_token = ?").bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_service(&self, business_id: &str, service_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = ? AND service_id = ? ORDER BY start_time ASC").bind(business_id).bind(service_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_business(&self, business_id: &str) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE business_id = ? ORDER BY start_time ASC").bind(business_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_range(&self, service_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>, AppError> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE service_id = ? AND start_time < ? AND end_time > ? AND status != 'CANCELLED'").bind(service_id).bind(end).bind(start).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_status(&self, business_id: &str, id: &str, status: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>("UPDATE appointments SET status = ? WHERE id = ? AND business_id = ? RETURNING *")
            .bind(status).bind(id).bind(business_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }

    async fn mark_attendance(&self, business_id: &str, id: &str, attendance_status: &str) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>("UPDATE appointments SET attendance_status = ? WHERE id = ? AND business_id = ? RETURNING *")
            .bind(attendance_status).bind(id).bind(business_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Appointment not found".into()))
    }

    async fn cancel(&self, appointment: &Appointment, reason: Option<&str>) -> Result<Appointment, AppError> {
        sqlx::query_as::<_, Appointment>("UPDATE appointments SET status = 'CANCELLED', cancellation_reason = ? WHERE id = ? RETURNING *")
            .bind(reason).bind(&appointment.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn cancel_future_for_service(&self, service_id: &str, from: DateTime<Utc>, reason: Option<&str>) -> Result<Vec<Appointment>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let affected = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments WHERE service_id = ? AND start_time >= ? AND status IN ('PENDING', 'CONFIRMED') ORDER BY start_time ASC"
        )
            .bind(service_id).bind(from)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        sqlx::query(
            "UPDATE appointments SET status = 'CANCELLED', cancellation_reason = ? WHERE service_id = ? AND start_time >= ? AND status IN ('PENDING', 'CONFIRMED')"
        )
            .bind(reason).bind(service_id).bind(from)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(affected)
    }
}
