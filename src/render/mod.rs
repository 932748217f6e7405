//! Outbound payload rendering.
//!
//! # Data Flow
//! ```text
//! body-template string (from the template-body lookup)
//!     → Handlebars render, inbound JSON body as context
//!     → rendered string parsed as a JSON object
//!     → outbound payload mapping
//! ```
//!
//! # Design Decisions
//! - HTML escaping is off; templates produce JSON, not markup
//! - The rendered output must be a JSON object, anything else is an error
//! - Helpers mirror the original template func set (time, string case, default)

pub mod helpers;

use handlebars::Handlebars;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors produced while materializing an outbound payload.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template render error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("rendered template is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rendered template is not a JSON object")]
    NotAnObject,
}

/// Renders body templates against the inbound JSON body.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        helpers::register_helpers(&mut registry);
        Self { registry }
    }

    /// Render `template` with `data` as context and parse the result as a
    /// JSON object.
    pub fn render_to_map(
        &self,
        template: &str,
        data: &Value,
    ) -> Result<Map<String, Value>, RenderError> {
        let rendered = self.registry.render_template(template, data)?;
        match serde_json::from_str(&rendered)? {
            Value::Object(map) => Ok(map),
            _ => Err(RenderError::NotAnObject),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
