//! SKU format rendering
//!
//! Bundle types carry an object template like `BNDL-{typeHandle}-{id}`
//! rendered against a bundle when the bundle's own SKU is blank.

use shared::models::{Bundle, BundleType};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkuFormatError {
    #[error("Unknown token '{{{0}}}' in SKU format")]
    UnknownToken(String),

    #[error("Unclosed token in SKU format")]
    UnclosedToken,

    #[error("Bundle has no id yet")]
    MissingId,
}

/// Render a bundle type's SKU format against a bundle
///
/// Supported tokens: `{id}`, `{typeHandle}`, `{typeName}`, `{title}`,
/// `{slug}`. The id token renders the bare record key, not the
/// `table:key` form.
pub fn render_sku_format(
    bundle_type: &BundleType,
    bundle: &Bundle,
) -> Result<String, SkuFormatError> {
    let format = &bundle_type.sku_format;
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '{' {
            out.push(c);
            continue;
        }

        let mut token = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(t) => token.push(t),
                None => return Err(SkuFormatError::UnclosedToken),
            }
        }

        match token.as_str() {
            "id" => {
                let id = bundle.id.as_deref().ok_or(SkuFormatError::MissingId)?;
                let key = id.rsplit(':').next().unwrap_or(id);
                out.push_str(key);
            }
            "typeHandle" => out.push_str(&bundle_type.handle),
            "typeName" => out.push_str(&bundle_type.name),
            "title" => out.push_str(&bundle.title),
            "slug" => out.push_str(&bundle.slug),
            other => return Err(SkuFormatError::UnknownToken(other.to_string())),
        }
    }

    Ok(out)
}
