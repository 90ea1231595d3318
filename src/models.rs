pub mod auth;
pub mod dashboard;
pub mod fleet;
pub mod notifications;
pub mod projects;
pub mod reports;
pub mod tenancy;
pub mod timesheet;
