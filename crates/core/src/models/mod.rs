pub mod dashboard;
pub mod expense;
pub mod settings;
