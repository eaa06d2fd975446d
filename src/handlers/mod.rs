pub mod catalog;
pub mod product;
pub mod submission;
pub mod user;
