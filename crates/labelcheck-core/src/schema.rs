use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::LabelError;

/// Fixed count of mandatory fields. This is the scoring denominator and
/// never changes at runtime.
pub const MANDATORY_FIELD_COUNT: usize = 6;

/// The closed set of recognized label fields.
///
/// Unknown field names are a validation-time error (`from_name`), never a
/// silently absent entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Manufacturer,
    NetQuantity,
    Mrp,
    ConsumerCare,
    DateOfManufacture,
    CountryOfOrigin,
    ProductName,
}

impl FieldId {
    pub const ALL: [FieldId; 7] = [
        FieldId::Manufacturer,
        FieldId::NetQuantity,
        FieldId::Mrp,
        FieldId::ConsumerCare,
        FieldId::DateOfManufacture,
        FieldId::CountryOfOrigin,
        FieldId::ProductName,
    ];

    pub const MANDATORY: [FieldId; MANDATORY_FIELD_COUNT] = [
        FieldId::Manufacturer,
        FieldId::NetQuantity,
        FieldId::Mrp,
        FieldId::ConsumerCare,
        FieldId::DateOfManufacture,
        FieldId::CountryOfOrigin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FieldId::Manufacturer => "manufacturer",
            FieldId::NetQuantity => "net_quantity",
            FieldId::Mrp => "mrp",
            FieldId::ConsumerCare => "consumer_care",
            FieldId::DateOfManufacture => "date_of_manufacture",
            FieldId::CountryOfOrigin => "country_of_origin",
            FieldId::ProductName => "product_name",
        }
    }

    /// Resolve a field name. Accepts the canonical snake_case names
    /// case-insensitively, so "MRP" works.
    pub fn from_name(s: &str) -> Result<FieldId, LabelError> {
        match s.trim().to_lowercase().as_str() {
            "manufacturer" => Ok(FieldId::Manufacturer),
            "net_quantity" => Ok(FieldId::NetQuantity),
            "mrp" => Ok(FieldId::Mrp),
            "consumer_care" => Ok(FieldId::ConsumerCare),
            "date_of_manufacture" => Ok(FieldId::DateOfManufacture),
            "country_of_origin" => Ok(FieldId::CountryOfOrigin),
            "product_name" => Ok(FieldId::ProductName),
            _ => Err(LabelError::UnknownField(s.to_string())),
        }
    }

    pub fn is_mandatory(self) -> bool {
        !matches!(self, FieldId::ProductName)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validation rules and descriptive text for one field.
#[derive(Debug)]
pub struct FieldSchema {
    pub id: FieldId,
    pub mandatory: bool,
    pub max_length: usize,
    pub description: &'static str,
    /// Tested against sanitized values; a failed test is a format violation,
    /// not an absence.
    pub validation: Regex,
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static validation pattern")
}

static REGISTRY: LazyLock<Vec<FieldSchema>> = LazyLock::new(|| {
    vec![
        FieldSchema {
            id: FieldId::Manufacturer,
            mandatory: true,
            max_length: 120,
            description: "Name and address of the manufacturer, packer or importer",
            validation: re(r"(?i)^[a-z0-9][a-z0-9 .,&'()/\-]{2,}$"),
        },
        FieldSchema {
            id: FieldId::NetQuantity,
            mandatory: true,
            max_length: 50,
            description: "Net quantity in standard units of weight, volume or count",
            validation: re(
                r"(?i)\d+(?:[.,]\d+)?\s*(?:kg|kgs|g|gm|gms|gram|grams|mg|ml|l|ltr|litre|litres|liter|liters|pc|pcs|piece|pieces|unit|units|n)\b",
            ),
        },
        FieldSchema {
            id: FieldId::Mrp,
            mandatory: true,
            max_length: 50,
            description: "Maximum retail price inclusive of all taxes",
            validation: re(r"\d+(?:[.,]\d{1,2})?"),
        },
        FieldSchema {
            id: FieldId::ConsumerCare,
            mandatory: true,
            max_length: 150,
            description: "Consumer care contact: phone number, email or address",
            validation: re(r"(?i)[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}|\+?\d[\d\s\-]{7,}"),
        },
        FieldSchema {
            id: FieldId::DateOfManufacture,
            mandatory: true,
            max_length: 50,
            description: "Month and year of manufacture, packing or import",
            validation: re(
                r"(?i)\d{1,2}\s*[/.\-]\s*\d{1,2}\s*[/.\-]\s*\d{2,4}|\d{1,2}\s*[/.\-]\s*\d{4}|[a-z]{3,9}\.?,?\s*\d{4}",
            ),
        },
        FieldSchema {
            id: FieldId::CountryOfOrigin,
            mandatory: true,
            max_length: 60,
            description: "Country of origin for imported or locally made goods",
            validation: re(r"(?i)^[a-z][a-z .\-]{2,}$"),
        },
        FieldSchema {
            id: FieldId::ProductName,
            mandatory: false,
            max_length: 200,
            description: "Common or generic name of the product",
            validation: re(r"\S{2,}"),
        },
    ]
});

/// The full field registry, mandatory entries first. Read-only after
/// initialization and safe for concurrent reads.
pub fn registry() -> &'static [FieldSchema] {
    &REGISTRY
}

pub fn field_schema(id: FieldId) -> &'static FieldSchema {
    REGISTRY
        .iter()
        .find(|s| s.id == id)
        .expect("every FieldId has a registry entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_all_fields() {
        assert_eq!(registry().len(), FieldId::ALL.len());
        for id in FieldId::ALL {
            assert_eq!(field_schema(id).id, id);
        }
    }

    #[test]
    fn test_mandatory_count_is_fixed() {
        let mandatory = registry().iter().filter(|s| s.mandatory).count();
        assert_eq!(mandatory, MANDATORY_FIELD_COUNT);
        assert_eq!(FieldId::MANDATORY.len(), MANDATORY_FIELD_COUNT);
    }

    #[test]
    fn test_from_name_accepts_uppercase_mrp() {
        assert_eq!(FieldId::from_name("MRP").unwrap(), FieldId::Mrp);
        assert_eq!(
            FieldId::from_name("Country_Of_Origin").unwrap(),
            FieldId::CountryOfOrigin
        );
    }

    #[test]
    fn test_from_name_rejects_unknown() {
        assert!(matches!(
            FieldId::from_name("batch_number"),
            Err(LabelError::UnknownField(_))
        ));
    }

    #[test]
    fn test_net_quantity_validation() {
        let schema = field_schema(FieldId::NetQuantity);
        assert!(schema.validation.is_match("200 g"));
        assert!(schema.validation.is_match("1.5 kg"));
        assert!(schema.validation.is_match("500ml"));
        assert!(!schema.validation.is_match("two hundred grams"));
    }

    #[test]
    fn test_mrp_validation() {
        let schema = field_schema(FieldId::Mrp);
        assert!(schema.validation.is_match("Rs. 245.00"));
        assert!(schema.validation.is_match("₹99"));
        assert!(!schema.validation.is_match("abc"));
    }

    #[test]
    fn test_date_validation() {
        let schema = field_schema(FieldId::DateOfManufacture);
        assert!(schema.validation.is_match("12/2024"));
        assert!(schema.validation.is_match("01-03-2024"));
        assert!(schema.validation.is_match("Mar 2024"));
        assert!(!schema.validation.is_match("sometime"));
    }

    #[test]
    fn test_country_validation_rejects_digits() {
        let schema = field_schema(FieldId::CountryOfOrigin);
        assert!(schema.validation.is_match("India"));
        assert!(schema.validation.is_match("South Korea"));
        assert!(!schema.validation.is_match("12345"));
    }
}
