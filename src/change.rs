// 🧮 Change calculation
// received - total, exact in cents

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::CalcError;

/// Compute the change to hand back
pub fn calculate_change(total: Amount, received: Amount) -> Result<Amount, CalcError> {
    if total.is_negative() || received.is_negative() {
        return Err(CalcError::NegativeAmount { total, received });
    }

    if received < total {
        return Err(CalcError::InsufficientFunds { total, received });
    }

    received.checked_sub(total).ok_or(CalcError::Overflow)
}

/// One completed sale: what the history store persists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub total: Amount,
    pub received: Amount,
    pub change: Amount,
}

impl Sale {
    pub fn settle(total: Amount, received: Amount) -> Result<Self, CalcError> {
        let change = calculate_change(total, received)?;
        Ok(Sale {
            total,
            received,
            change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur(cents: i64) -> Amount {
        Amount::from_cents(cents)
    }

    #[test]
    fn test_basic_change() {
        assert_eq!(calculate_change(eur(750), eur(1000)), Ok(eur(250)));
        assert_eq!(calculate_change(eur(1000), eur(1000)), Ok(Amount::ZERO));
        // no float drift
        assert_eq!(calculate_change(eur(10), eur(30)), Ok(eur(20)));
    }

    #[test]
    fn test_insufficient_funds() {
        let err = calculate_change(eur(1000), eur(500)).unwrap_err();
        assert!(matches!(err, CalcError::InsufficientFunds { .. }));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let err = calculate_change(eur(-100), eur(500)).unwrap_err();
        assert!(matches!(err, CalcError::NegativeAmount { .. }));
    }

    #[test]
    fn test_settle_sale() {
        let sale = Sale::settle(eur(1999), eur(2000)).unwrap();
        assert_eq!(sale.change, eur(1));
    }
}
