pub mod guard;
pub mod kinds;
pub mod resource;
pub mod store_service;

pub use guard::authorize_store_owner;
pub use resource::{ResourceKind, ResourceService, ServiceError};
pub use store_service::StoreService;
