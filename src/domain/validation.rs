//! Product-registration rules enforced by the `agri-supply-chain` contract.
//!
//! The contract stores these fields as `string-ascii` with fixed maximum lengths,
//! so a payload that breaks any rule would be rejected on-chain. Checking here
//! fails the registration before anything is submitted.

use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PRODUCT_TYPE_LEN: usize = 50;
pub const MAX_FARM_LOCATION_LEN: usize = 200;
pub const MAX_CERTIFICATION_LEN: usize = 50;
pub const MAX_CERTIFICATIONS: usize = 10;

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductRegistration {
    pub name: String,
    pub product_type: String,
    pub quantity: i64,
    pub farm_location: String,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    /// Owner recorded on the persisted product. Not part of the contract call.
    #[serde(default)]
    pub farmer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{field} contains non-ASCII characters. Use only basic letters, numbers, and symbols.")]
    NonAscii { field: &'static str },
    #[error("Quantity must be greater than 0")]
    Quantity,
    #[error("Maximum {max} certifications allowed")]
    TooManyCertifications { max: usize },
}

fn check_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    // Lengths are counted in UTF-16 code units, as the dashboard form counts them.
    let len = value.encode_utf16().count();
    if len < min || len > max {
        return Err(ValidationError::Length { field, min, max });
    }
    if !value.is_ascii() {
        return Err(ValidationError::NonAscii { field });
    }
    Ok(())
}

impl ProductRegistration {
    /// Checks every rule in contract order and stops at the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("Product name", &self.name, 1, MAX_NAME_LEN)?;
        check_text("Product type", &self.product_type, 1, MAX_PRODUCT_TYPE_LEN)?;
        if self.quantity <= 0 {
            return Err(ValidationError::Quantity);
        }
        check_text("Farm location", &self.farm_location, 1, MAX_FARM_LOCATION_LEN)?;

        if let Some(certs) = &self.certifications {
            for cert in certs {
                check_text("Certification", cert, 0, MAX_CERTIFICATION_LEN)?;
            }
            if certs.len() > MAX_CERTIFICATIONS {
                return Err(ValidationError::TooManyCertifications {
                    max: MAX_CERTIFICATIONS,
                });
            }
        }
        Ok(())
    }
}
