pub mod category_service;
pub mod order_service;
pub mod product_service;
pub mod shipper_service;
pub mod supplier_service;
pub mod user_service;

pub use category_service::CategoryService;
pub use order_service::OrderService;
pub use product_service::ProductService;
pub use shipper_service::ShipperService;
pub use supplier_service::SupplierService;
pub use user_service::UserService;
