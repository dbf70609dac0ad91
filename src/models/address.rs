//! Address record, nested inside [`Patient`](super::Patient)

use crate::core::record::Record;
use crate::core::validation::{FieldDescriptor, RecordSchema};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: String,
    pub pin_code: String,
}

/// Build the address schema
pub fn address_schema() -> RecordSchema {
    RecordSchema::new("Address")
        .field(FieldDescriptor::string("street").optional())
        .field(FieldDescriptor::string("city"))
        .field(FieldDescriptor::string("pin_code"))
}

impl Record for Address {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(address_schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::IssueKind;
    use serde_json::json;

    #[test]
    fn test_street_is_optional() {
        let address = Address::construct(&json!({ "city": "Springfield", "pin_code": "12345" }))
            .unwrap();
        assert_eq!(address.street, None);
        assert_eq!(address.city, "Springfield");
    }

    #[test]
    fn test_pin_code_must_be_string() {
        let err = Address::construct(&json!({ "city": "Springfield", "pin_code": 12345 }))
            .unwrap_err();
        assert_eq!(err.for_field("pin_code").unwrap().kind, IssueKind::Type);
    }

    #[test]
    fn test_city_required() {
        let err = Address::construct(&json!({ "street": "123 Main St", "pin_code": "12345" }))
            .unwrap_err();
        assert_eq!(err.for_field("city").unwrap().kind, IssueKind::Missing);
    }
}
