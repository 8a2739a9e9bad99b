use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Shipper {
    pub id: i32,
    pub name: String,
    pub phone: String,
}
