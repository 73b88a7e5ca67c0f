use crate::domain::{models::booking::{Booking, BookingFilter}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookingFilter) {
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
        qb.push(" AND status <> 'cancelled'");
    }
    if let Some(ref time) = filter.time {
        qb.push(" AND time = ").push_bind(time.clone());
    }
    if let Some(ref id) = filter.exclude_id {
        qb.push(" AND id <> ").push_bind(id.clone());
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn find(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM bookings WHERE TRUE");
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY booking_date ASC, time ASC");
        qb.build_query_as::<Booking>().fetch_all(&self.pool).await.map_err(AppError::Store)
    }

    async fn find_one(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Store)
    }

    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("INSERT INTO bookings (id, booking_date, time, end_time, service, customer_name, customer_email, customer_phone, customer_company, status, notes, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) RETURNING *")
            .bind(&booking.id).bind(booking.date).bind(&booking.time).bind(&booking.end_time).bind(&booking.service)
            .bind(&booking.customer.name).bind(&booking.customer.email).bind(&booking.customer.phone).bind(&booking.customer.company)
            .bind(booking.status.as_str()).bind(&booking.notes).bind(booking.created_at).bind(booking.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::from_write)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET booking_date=$1, time=$2, end_time=$3, service=$4, customer_name=$5, customer_email=$6, customer_phone=$7, customer_company=$8, status=$9, notes=$10, updated_at=$11 WHERE id=$12 RETURNING *")
            .bind(booking.date).bind(&booking.time).bind(&booking.end_time).bind(&booking.service)
            .bind(&booking.customer.name).bind(&booking.customer.email).bind(&booking.customer.phone).bind(&booking.customer.company)
            .bind(booking.status.as_str()).bind(&booking.notes).bind(booking.updated_at).bind(&booking.id)
            .fetch_optional(&self.pool).await.map_err(AppError::from_write)?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1").bind(id).execute(&self.pool).await.map_err(AppError::Store)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Booking not found".into())); }
        Ok(())
    }
}
