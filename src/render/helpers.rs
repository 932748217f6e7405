//! Template helpers available to body templates.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, JsonRender, Output, RenderContext, RenderError,
};

/// Register every helper on the renderer's registry.
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("now", Box::new(now_helper));
    handlebars.register_helper("format", Box::new(format_helper));
    handlebars.register_helper("parseTime", Box::new(parse_time_helper));
    handlebars.register_helper("pastTense", Box::new(past_tense_helper));
    handlebars.register_helper("lower", Box::new(lower_helper));
    handlebars.register_helper("upper", Box::new(upper_helper));
    handlebars.register_helper("title", Box::new(title_helper));
    handlebars.register_helper("trim", Box::new(trim_helper));
    handlebars.register_helper("contains", Box::new(contains_helper));
    handlebars.register_helper("replace", Box::new(replace_helper));
    handlebars.register_helper("default", Box::new(default_helper));
}

/// Current UTC time as RFC 3339: `{{now}}`
fn now_helper(
    _: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&Utc::now().to_rfc3339())?;
    Ok(())
}

/// Reformat an RFC 3339 timestamp: `{{format created_at "%Y-%m-%d"}}`
fn format_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let time = h.param(0).ok_or_else(|| RenderError::new("format requires 2 parameters"))?;
    let layout = h.param(1).ok_or_else(|| RenderError::new("format requires 2 parameters"))?;

    let parsed = DateTime::parse_from_rfc3339(&time.value().render())
        .map_err(|e| RenderError::new(format!("format: {e}")))?;

    // An invalid strftime specifier only surfaces when the formatter is
    // displayed; buffer it so the failure becomes an error, not a panic.
    let mut formatted = String::new();
    write!(formatted, "{}", parsed.format(&layout.value().render()))
        .map_err(|_| RenderError::new("format: invalid layout"))?;
    out.write(&formatted)?;
    Ok(())
}

/// Parse a timestamp with an explicit layout into RFC 3339:
/// `{{parseTime pushed_at "%Y-%m-%d %H:%M:%S"}}`
/// An unparseable value renders as an empty string rather than failing the
/// whole payload.
fn parse_time_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let time = h.param(0).ok_or_else(|| RenderError::new("parseTime requires 2 parameters"))?;
    let layout = h.param(1).ok_or_else(|| RenderError::new("parseTime requires 2 parameters"))?;

    let raw = time.value().render();
    match NaiveDateTime::parse_from_str(&raw, &layout.value().render()) {
        Ok(parsed) => out.write(&parsed.and_utc().to_rfc3339())?,
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "parseTime failed");
        }
    }
    Ok(())
}

/// Naive English past tense: `{{pastTense action}}` → `close` becomes `closed`.
fn past_tense_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let word = h
        .param(0)
        .ok_or_else(|| RenderError::new("pastTense requires 1 parameter"))?
        .value()
        .render();

    if word.ends_with('e') {
        out.write(&format!("{word}d"))?;
    } else {
        out.write(&format!("{word}ed"))?;
    }
    Ok(())
}

/// `{{lower s}}`
fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).ok_or_else(|| RenderError::new("lower requires 1 parameter"))?;
    out.write(&param.value().render().to_lowercase())?;
    Ok(())
}

/// `{{upper s}}`
fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).ok_or_else(|| RenderError::new("upper requires 1 parameter"))?;
    out.write(&param.value().render().to_uppercase())?;
    Ok(())
}

/// `{{title s}}`: per-character title case, which is upper case for ASCII.
fn title_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).ok_or_else(|| RenderError::new("title requires 1 parameter"))?;
    out.write(&param.value().render().to_uppercase())?;
    Ok(())
}

/// Substring test: `{{#if (contains s "needle")}}`
fn contains_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let s = h.param(0).ok_or_else(|| RenderError::new("contains requires 2 parameters"))?;
    let needle = h.param(1).ok_or_else(|| RenderError::new("contains requires 2 parameters"))?;

    let result = s.value().render().contains(&needle.value().render());
    out.write(&result.to_string())?;
    Ok(())
}

/// `{{trim s}}`
fn trim_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let param = h.param(0).ok_or_else(|| RenderError::new("trim requires 1 parameter"))?;
    out.write(param.value().render().trim())?;
    Ok(())
}

/// `{{replace s "from" "to"}}`
fn replace_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let s = h.param(0).ok_or_else(|| RenderError::new("replace requires 3 parameters"))?;
    let from = h.param(1).ok_or_else(|| RenderError::new("replace requires 3 parameters"))?;
    let to = h.param(2).ok_or_else(|| RenderError::new("replace requires 3 parameters"))?;

    out.write(
        &s.value()
            .render()
            .replace(&from.value().render(), &to.value().render()),
    )?;
    Ok(())
}

/// `{{default value fallback}}`: fallback when the value is null or empty.
fn default_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h.param(0).ok_or_else(|| RenderError::new("default requires 2 parameters"))?;
    let fallback = h.param(1).ok_or_else(|| RenderError::new("default requires 2 parameters"))?;

    let chosen = match value.value() {
        serde_json::Value::Null => fallback.value(),
        serde_json::Value::String(s) if s.is_empty() => fallback.value(),
        other => other,
    };
    out.write(&chosen.render())?;
    Ok(())
}
