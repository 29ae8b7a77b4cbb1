use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// A fleet sizing value as callers send it: a JSON integer or a numeric
/// string. Validation happens when the value is used, not when it is parsed.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sizing(Value);

impl Sizing {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(Value::from(value))
    }

    pub fn resolve(&self, field: &'static str) -> Result<u32, ValidationError> {
        let parsed = match &self.0 {
            Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(text) => text.trim().parse::<u32>().ok(),
            _ => None,
        };

        parsed.ok_or_else(|| ValidationError::InvalidSizing {
            field,
            value: self.0.to_string(),
        })
    }
}

impl From<u32> for Sizing {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Sizing {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}
