pub mod catalog;
pub mod projection;
pub mod report;
pub mod sales;
pub mod stock;
pub mod user;
