use super::{ConversionFailure, Interpolator};
use crate::core::types::FieldType;
use serde_json::Value;

/// Accepts only the literals `true` and `false`, in any letter case.
pub struct BooleanInterpolator;

impl Interpolator for BooleanInterpolator {
    fn field_type(&self) -> FieldType {
        FieldType::Boolean
    }

    fn convert_value(&self, raw: &str) -> Result<Value, ConversionFailure> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(Value::Bool(true))
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(Value::Bool(false))
        } else {
            Err(ConversionFailure::new(format!(
                "'{}' is not a boolean, expected true or false",
                raw
            )))
        }
    }
}
