//! Schema types for the plot route.

use serde::Deserialize;

use crate::error::ApiError;

/// A number the frontend may send either as JSON number or as string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    /// Numeric value, or a 400 naming `field` when the string is not a number.
    pub fn value(&self, field: &str) -> Result<f64, ApiError> {
        match self {
            NumberInput::Number(n) => Ok(*n),
            NumberInput::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                ApiError::BadRequest(format!("{} must be a number, got '{}'", field, s))
            }),
        }
    }
}

/// Request for `POST /api/plot`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlotRequest {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "xMin", default)]
    pub x_min: Option<NumberInput>,
    #[serde(rename = "xMax", default)]
    pub x_max: Option<NumberInput>,
}

impl PlotRequest {
    pub const DEFAULT_X_MIN: f64 = 0.0;
    pub const DEFAULT_X_MAX: f64 = 1.0;

    /// The requested domain, with defaults for missing bounds.
    pub fn domain(&self) -> Result<(f64, f64), ApiError> {
        let x_min = match &self.x_min {
            Some(v) => v.value("xMin")?,
            None => Self::DEFAULT_X_MIN,
        };
        let x_max = match &self.x_max {
            Some(v) => v.value("xMax")?,
            None => Self::DEFAULT_X_MAX,
        };
        Ok((x_min, x_max))
    }
}
