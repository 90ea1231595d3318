// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,

        // --- Tenancy ---
        handlers::tenancy::list_organizations,
        handlers::tenancy::create_organization,

        // --- Fleet ---
        handlers::fleet::list_suppliers,
        handlers::fleet::create_supplier,
        handlers::fleet::list_vehicles,
        handlers::fleet::create_vehicle,
        handlers::fleet::list_drivers,
        handlers::fleet::create_driver,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::create_project,
        handlers::projects::list_routes,
        handlers::projects::create_route,
        handlers::projects::update_factory_price,

        // --- Timesheets ---
        handlers::timesheets::list_timesheets,
        handlers::timesheets::create_timesheet,
        handlers::timesheets::get_timesheet,
        handlers::timesheets::upsert_entry,
        handlers::timesheets::approve_timesheet,

        // --- Reports ---
        handlers::reports::factory_report,
        handlers::reports::factory_report_pdf,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_read,

        // --- Portal ---
        handlers::portal::list_my_timesheets,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Principal,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::CreateUserPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::Organization,
            models::tenancy::CreateOrganizationPayload,

            // --- Fleet ---
            models::fleet::Supplier,
            models::fleet::Vehicle,
            models::fleet::Driver,
            models::fleet::CreateSupplierPayload,
            models::fleet::CreateVehiclePayload,
            models::fleet::CreateDriverPayload,

            // --- Projects ---
            models::projects::Project,
            models::projects::Route,
            models::projects::CreateProjectPayload,
            models::projects::CreateRoutePayload,
            models::projects::UpdateFactoryPricePayload,

            // --- Timesheets ---
            models::timesheet::TimesheetStatus,
            models::timesheet::Timesheet,
            models::timesheet::TimesheetEntry,
            models::timesheet::TimesheetCalculation,
            models::timesheet::TimesheetDetail,
            models::timesheet::TimesheetSummary,
            models::timesheet::CreateTimesheetPayload,
            models::timesheet::UpsertEntryPayload,

            // --- Reports ---
            models::reports::FactoryReport,
            models::reports::FactoryReportLine,

            // --- Dashboard / Notifications ---
            models::dashboard::DashboardSummary,
            models::notifications::NotificationType,
            models::notifications::Notification,
        )
    ),
    tags(
        (name = "Auth", description = "Login e sessão"),
        (name = "Users", description = "Cadastro de usuários (ADMIN)"),
        (name = "Tenancy", description = "Organizações"),
        (name = "Fleet", description = "Fornecedores, veículos e motoristas"),
        (name = "Projects", description = "Projetos e rotas (preço de fornecedor e de fábrica)"),
        (name = "Timesheets", description = "Puantaj mensal e cálculo de fatura"),
        (name = "Reports", description = "Relatório de fábrica"),
        (name = "Dashboard", description = "Indicadores do back office"),
        (name = "Notifications", description = "Avisos do usuário"),
        (name = "Portal", description = "Portal do fornecedor")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_the_guarded_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/routes/{id}/factory-price"));
        assert!(doc.paths.paths.contains_key("/api/reports/factory"));
        assert!(doc.components.unwrap().security_schemes.contains_key("api_jwt"));
    }
}
