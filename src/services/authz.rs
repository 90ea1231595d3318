// src/services/authz.rs

//! Portão de autorização (tenant + papel).
//!
//! Tudo aqui é puro: o Principal chega por parâmetro, nada é lido de estado
//! global, e nenhuma função entra em pânico. Todo caminho que lista, lê ou
//! altera dados de um tenant passa por `derive_tenant_filter` e aplica o
//! filtro retornado na consulta.

use thiserror::Error;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Principal, Role},
        tenancy::TenantFilter,
    },
};

/// Motivo de uma recusa (403). Cada variante tem uma chave de tradução.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    AdminOnly,
    FactoryPriceEdit,
    FactoryReport,
    TimesheetApproval,
    BackOfficeOnly,
    SupplierOnly,
    SupplierScopeMissing,
    CrossTenant,
}

impl ForbiddenReason {
    pub fn message_key(&self) -> &'static str {
        match self {
            ForbiddenReason::AdminOnly => "forbidden_admin_only",
            ForbiddenReason::FactoryPriceEdit => "forbidden_factory_price",
            ForbiddenReason::FactoryReport => "forbidden_factory_report",
            ForbiddenReason::TimesheetApproval => "forbidden_timesheet_approval",
            ForbiddenReason::BackOfficeOnly => "forbidden_back_office",
            ForbiddenReason::SupplierOnly => "forbidden_supplier_only",
            ForbiddenReason::SupplierScopeMissing => "forbidden_supplier_scope",
            ForbiddenReason::CrossTenant => "forbidden_cross_tenant",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("não autenticado")]
    Unauthenticated,

    #[error("acesso negado: {0:?}")]
    Forbidden(ForbiddenReason),
}

// ---
// 1. Filtro de tenant
// ---

pub fn derive_tenant_filter(principal: &Principal) -> TenantFilter {
    match principal.organization_id {
        Some(org) => TenantFilter::organization(org),
        None => TenantFilter::unrestricted(),
    }
}

/// Restrição extra do portal do fornecedor: só vale para SUPPLIER.
pub fn derive_supplier_scope(principal: &Principal) -> Option<Uuid> {
    match principal.role {
        Role::Supplier => principal.supplier_id,
        _ => None,
    }
}

/// Em qual organização uma escrita deve cair.
///
/// Principal restrito: sempre a própria organização; pedir outra é 403.
/// Principal sem restrição: a organização pedida, que passa a ser obrigatória.
pub fn resolve_organization(
    filter: &TenantFilter,
    requested: Option<Uuid>,
) -> Result<Uuid, AppError> {
    match (filter.organization_id(), requested) {
        (Some(own), None) => Ok(own),
        (Some(own), Some(req)) if own == req => Ok(own),
        (Some(_), Some(_)) => Err(AuthzError::Forbidden(ForbiddenReason::CrossTenant).into()),
        (None, Some(req)) => Ok(req),
        (None, None) => Err(AppError::OrganizationRequired),
    }
}

// ---
// 2. Predicados de permissão (tabela fixa, nega por padrão)
// ---

pub fn can_edit_factory_price(role: Role) -> bool {
    matches!(role, Role::Admin)
}

pub fn can_manage_users(role: Role) -> bool {
    matches!(role, Role::Admin)
}

pub fn can_generate_factory_report(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

pub fn can_approve_timesheets(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

pub fn can_access_back_office(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager | Role::User)
}

// ---
// 3. Guardas (autenticação + predicado)
// ---

pub fn require_authenticated(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    principal.ok_or(AuthzError::Unauthenticated)
}

fn require_role(
    principal: Option<&Principal>,
    allowed: fn(Role) -> bool,
    reason: ForbiddenReason,
) -> Result<&Principal, AuthzError> {
    let principal = require_authenticated(principal)?;
    if allowed(principal.role) {
        Ok(principal)
    } else {
        Err(AuthzError::Forbidden(reason))
    }
}

pub fn require_admin(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    require_role(principal, can_manage_users, ForbiddenReason::AdminOnly)
}

pub fn require_factory_price_edit(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    require_role(principal, can_edit_factory_price, ForbiddenReason::FactoryPriceEdit)
}

pub fn require_factory_report(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    require_role(principal, can_generate_factory_report, ForbiddenReason::FactoryReport)
}

pub fn require_timesheet_approval(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    require_role(principal, can_approve_timesheets, ForbiddenReason::TimesheetApproval)
}

pub fn require_back_office(principal: Option<&Principal>) -> Result<&Principal, AuthzError> {
    require_role(principal, can_access_back_office, ForbiddenReason::BackOfficeOnly)
}

/// Portal do fornecedor: devolve o principal e o fornecedor ao qual ele está preso.
pub fn require_supplier(principal: Option<&Principal>) -> Result<(&Principal, Uuid), AuthzError> {
    let principal = require_authenticated(principal)?;
    if principal.role != Role::Supplier {
        return Err(AuthzError::Forbidden(ForbiddenReason::SupplierOnly));
    }
    let supplier_id = derive_supplier_scope(principal)
        .ok_or(AuthzError::Forbidden(ForbiddenReason::SupplierScopeMissing))?;
    Ok((principal, supplier_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role, org: Option<Uuid>) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            organization_id: org,
            supplier_id: None,
        }
    }

    #[test]
    fn filter_restricts_to_the_principal_organization() {
        let org = Uuid::new_v4();
        for role in Role::ALL {
            let filter = derive_tenant_filter(&principal(role, Some(org)));
            assert_eq!(filter.organization_id(), Some(org));
            assert!(!filter.is_unrestricted());
        }
    }

    #[test]
    fn filter_is_unrestricted_without_organization() {
        let filter = derive_tenant_filter(&principal(Role::Admin, None));
        assert!(filter.is_unrestricted());
        assert_eq!(filter.organization_id(), None);
    }

    #[test]
    fn permission_table() {
        let cases = [
            // role, factory price, manage users, factory report
            (Role::Admin, true, true, true),
            (Role::Manager, false, false, true),
            (Role::User, false, false, false),
            (Role::Supplier, false, false, false),
            (Role::Unknown, false, false, false),
        ];

        for (role, price, users, report) in cases {
            assert_eq!(can_edit_factory_price(role), price, "{role}");
            assert_eq!(can_manage_users(role), users, "{role}");
            assert_eq!(can_generate_factory_report(role), report, "{role}");
        }
    }

    #[test]
    fn unknown_role_is_denied_everywhere() {
        let p = principal(Role::parse("AUDITOR"), Some(Uuid::new_v4()));
        assert_eq!(p.role, Role::Unknown);
        assert!(!can_approve_timesheets(p.role));
        assert!(!can_access_back_office(p.role));
        assert_eq!(
            require_back_office(Some(&p)),
            Err(AuthzError::Forbidden(ForbiddenReason::BackOfficeOnly))
        );
        assert_eq!(
            require_supplier(Some(&p)),
            Err(AuthzError::Forbidden(ForbiddenReason::SupplierOnly))
        );
    }

    #[test]
    fn guards_reject_missing_principal() {
        assert_eq!(require_authenticated(None), Err(AuthzError::Unauthenticated));
        assert_eq!(require_admin(None), Err(AuthzError::Unauthenticated));
        assert_eq!(require_factory_price_edit(None), Err(AuthzError::Unauthenticated));
        assert_eq!(require_factory_report(None), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn guards_compose_with_predicates() {
        let admin = principal(Role::Admin, None);
        let manager = principal(Role::Manager, Some(Uuid::new_v4()));
        let user = principal(Role::User, Some(Uuid::new_v4()));

        assert!(require_admin(Some(&admin)).is_ok());
        assert_eq!(
            require_admin(Some(&manager)),
            Err(AuthzError::Forbidden(ForbiddenReason::AdminOnly))
        );
        assert_eq!(
            require_factory_price_edit(Some(&manager)),
            Err(AuthzError::Forbidden(ForbiddenReason::FactoryPriceEdit))
        );
        assert!(require_factory_report(Some(&manager)).is_ok());
        assert_eq!(
            require_factory_report(Some(&user)),
            Err(AuthzError::Forbidden(ForbiddenReason::FactoryReport))
        );
        assert_eq!(require_back_office(Some(&user)).map(|p| p.role), Ok(Role::User));
    }

    #[test]
    fn supplier_guard_needs_a_supplier_id() {
        let supplier_id = Uuid::new_v4();
        let mut p = principal(Role::Supplier, Some(Uuid::new_v4()));

        assert_eq!(
            require_supplier(Some(&p)),
            Err(AuthzError::Forbidden(ForbiddenReason::SupplierScopeMissing))
        );
        assert_eq!(derive_supplier_scope(&p), None);

        p.supplier_id = Some(supplier_id);
        assert_eq!(require_supplier(Some(&p)).map(|(_, id)| id), Ok(supplier_id));
        assert_eq!(derive_supplier_scope(&p), Some(supplier_id));

        // Papel de back office com supplier_id não ganha escopo de fornecedor
        let mut user = principal(Role::User, None);
        user.supplier_id = Some(supplier_id);
        assert_eq!(derive_supplier_scope(&user), None);
    }

    #[test]
    fn writes_never_cross_organizations() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let restricted = TenantFilter::organization(own);

        assert_eq!(resolve_organization(&restricted, None).unwrap(), own);
        assert_eq!(resolve_organization(&restricted, Some(own)).unwrap(), own);
        assert!(matches!(
            resolve_organization(&restricted, Some(other)),
            Err(AppError::Access(AuthzError::Forbidden(ForbiddenReason::CrossTenant)))
        ));

        let unrestricted = TenantFilter::unrestricted();
        assert_eq!(resolve_organization(&unrestricted, Some(other)).unwrap(), other);
        assert!(matches!(
            resolve_organization(&unrestricted, None),
            Err(AppError::OrganizationRequired)
        ));
    }
}
