pub mod category;
pub mod order;
pub mod product;
pub mod shipper;
pub mod supplier;
pub mod user;

pub use category::Category;
pub use order::{Order, OrderDetail, OrderStatus};
pub use product::Product;
pub use shipper::Shipper;
pub use supplier::Supplier;
pub use user::{User, ROLE_ADMIN, ROLE_USER};
