pub mod billboard;
pub mod category;
pub mod color;
pub mod product;
pub mod size;

pub use billboard::Billboards;
pub use category::Categories;
pub use color::Colors;
pub use product::Products;
pub use size::Sizes;
