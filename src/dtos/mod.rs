pub mod product;
pub mod search;
pub mod submission;
pub mod user;
