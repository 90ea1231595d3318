pub mod user_repo;
pub use user_repo::UserRepository;
pub mod tenancy_repo;
pub use tenancy_repo::OrganizationRepository;
pub mod fleet_repo;
pub use fleet_repo::FleetRepository;
pub mod projects_repo;
pub use projects_repo::ProjectRepository;
pub mod timesheet_repo;
pub use timesheet_repo::TimesheetRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;

#[cfg(test)]
pub mod fixtures;
