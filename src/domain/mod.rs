pub mod category;
pub mod filter;
pub mod pagination;
pub mod product;
