pub mod auth;
pub mod authz;
pub mod billing;
pub mod fleet_service;
pub use fleet_service::FleetService;
pub mod report_service;
pub use report_service::ReportService;
pub mod timesheet_service;
pub use timesheet_service::TimesheetService;
