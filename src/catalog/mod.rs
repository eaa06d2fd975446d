//! In-memory catalog logic over already-loaded products: search, autocomplete,
//! pagination, home page picks and health scoring. Nothing here touches the database.

pub mod autocomplete;
pub mod health;
pub mod insights;
pub mod pagination;
pub mod recent;
pub mod search;
