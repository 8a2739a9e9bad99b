use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}
