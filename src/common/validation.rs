// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::models::auth::Role;

// Validadores customizados para campos Decimal (o `range` do validator não cobre Decimal).
// A mensagem é uma chave do I18nStore, igual às mensagens dos `#[validate]`.

// Teto das colunas NUMERIC(14, 2)
pub const MAX_MONEY: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

pub fn non_negative_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("range").with_message("must_be_non_negative".into()));
    }
    if *value > MAX_MONEY {
        return Err(ValidationError::new("range").with_message("money_too_large".into()));
    }
    Ok(())
}

pub fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("range").with_message("percentage_out_of_range".into()));
    }
    Ok(())
}

// Na leitura (token, banco) um papel desconhecido vira `Unknown`; na escrita é entrada inválida
pub fn known_role(role: &Role) -> Result<(), ValidationError> {
    if *role == Role::Unknown {
        return Err(ValidationError::new("role").with_message("unknown_role".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_rejects_negative_values() {
        assert!(non_negative_money(&Decimal::new(-1, 2)).is_err());
        assert!(non_negative_money(&Decimal::ZERO).is_ok());
        assert!(non_negative_money(&Decimal::new(15050, 2)).is_ok());
    }

    #[test]
    fn money_fits_the_numeric_column() {
        assert_eq!(MAX_MONEY, Decimal::from_str("999999999999.99").unwrap());
        assert!(non_negative_money(&MAX_MONEY).is_ok());

        let err = non_negative_money(&Decimal::from_str("10000000000000").unwrap()).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("money_too_large"));
        assert!(non_negative_money(&Decimal::from_str("1000000000000.00").unwrap()).is_err());
    }

    #[test]
    fn percentage_is_bounded() {
        assert!(percentage(&Decimal::from(20)).is_ok());
        assert!(percentage(&Decimal::ZERO).is_ok());
        assert!(percentage(&Decimal::ONE_HUNDRED).is_ok());
        assert!(percentage(&Decimal::from(101)).is_err());
        assert!(percentage(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn only_known_roles_are_accepted() {
        for role in Role::ALL {
            assert!(known_role(&role).is_ok());
        }
        let err = known_role(&Role::Unknown).unwrap_err();
        assert_eq!(err.message.as_deref(), Some("unknown_role"));
    }
}
