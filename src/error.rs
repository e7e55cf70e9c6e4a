use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised while configuring a board or accepting input from JS.
/// The layout operations themselves are best-effort and never fail.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error("difficulty must be between 1 and 4, got {0}")]
    InvalidDifficulty(u8),
    #[error("unknown game mode '{0}'")]
    InvalidMode(String),
    #[cfg(feature = "serde_json")]
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing element '{0}'")]
    MissingElement(String),
    #[error("dom call failed: {0}")]
    Dom(String),
}

impl From<JsValue> for LayoutError {
    fn from(value: JsValue) -> Self {
        LayoutError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<LayoutError> for JsValue {
    fn from(err: LayoutError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
