pub mod controller;
pub mod dashboard_service;
pub mod expense_store;
pub mod settings_store;
