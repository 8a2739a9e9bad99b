// Persistence gateway: one repository per entity, the only layer that
// touches the store. Absent rows come back as None; services decide whether
// absence is an error.
pub mod category;
pub mod order;
pub mod product;
pub mod shipper;
pub mod supplier;
pub mod user;

pub use category::CategoryRepository;
pub use order::{NewOrder, NewOrderLine, OrderRepository};
pub use product::{NewProduct, ProductChanges, ProductFilter, ProductRepository};
pub use shipper::ShipperRepository;
pub use supplier::SupplierRepository;
pub use user::{NewUser, UserRepository};
