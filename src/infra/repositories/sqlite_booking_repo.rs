use crate::domain::{models::booking::{Booking, BookingFilter}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BookingFilter) {
    let (start, end) = filter.instant_bounds();
    if let Some(start) = start {
        qb.push(" AND booking_date >= ").push_bind(start);
    }
    if let Some(end) = end {
        qb.push(" AND booking_date <= ").push_bind(end);
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if filter.exclude_cancelled {
        qb.push(" AND status != 'cancelled'");
    }
    if let Some(ref time) = filter.time {
        qb.push(" AND time = ").push_bind(time.clone());
    }
    if let Some(ref id) = filter.exclude_id {
        qb.push(" AND id != ").push_bind(id.clone());
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM bookings WHERE 1 = 1");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY booking_date ASC, time ASC");
        qb.build_query_as::<Booking>().fetch_all(&self.pool).await.map_err(AppError::Store)
    }

    async fn find_one(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Store)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, booking_date, time, end_time, service, customer_name, customer_email, customer_phone, customer_company, status, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.id).bind(booking.date).bind(&booking.time).bind(&booking.end_time)
            .bind(&booking.service).bind(&booking.customer.name).bind(&booking.customer.email)
            .bind(&booking.customer.phone).bind(&booking.customer.company).bind(booking.status.as_str())
            .bind(&booking.notes).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::from_write)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET booking_date=?, time=?, end_time=?, service=?, customer_name=?, customer_email=?, customer_phone=?, customer_company=?, status=?, notes=?, updated_at=?
             WHERE id=?
             RETURNING *"
        )
            .bind(booking.date).bind(&booking.time).bind(&booking.end_time).bind(&booking.service)
            .bind(&booking.customer.name).bind(&booking.customer.email).bind(&booking.customer.phone)
            .bind(&booking.customer.company).bind(booking.status.as_str()).bind(&booking.notes)
            .bind(booking.updated_at).bind(&booking.id)
            .fetch_optional(&self.pool).await.map_err(AppError::from_write)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?").bind(id).execute(&self.pool).await.map_err(AppError::Store)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }
}
