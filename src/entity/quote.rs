use rust_decimal::Decimal;

use std::fmt;

use crate::error::FetchError;

/// Price of one native unit in the reporting currency, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    unit_price: Decimal,
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "${:.2}", self.unit_price)
    }
}

impl Quote {
    pub fn new(unit_price: Decimal) -> Result<Self, FetchError> {
        if unit_price > Decimal::ZERO {
            Ok(Self { unit_price })
        } else {
            Err(FetchError::service(format!(
                "Price quote must be positive, got {}",
                unit_price
            )))
        }
    }

    pub fn convert(&self, native: Decimal) -> Decimal {
        native * self.unit_price
    }
}
