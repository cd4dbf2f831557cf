pub mod billboard;
pub mod category;
pub mod color;
pub mod order;
pub mod product;
pub mod size;
pub mod store;

pub use billboard::Billboard;
pub use category::Category;
pub use color::Color;
pub use order::{Order, OrderItem, OrderWithItems};
pub use product::{Product, ProductImage, ProductWithImages};
pub use size::Size;
pub use store::Store;
