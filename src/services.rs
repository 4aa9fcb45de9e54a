// src/services.rs

pub mod catalog_service;
pub mod report_service;
pub mod sales_service;
pub mod seed_service;
pub mod stock_service;
pub mod user_service;
