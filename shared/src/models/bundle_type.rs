//! Bundle Type Model

use crate::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};

/// Handles that collide with built-in element attributes
pub const RESERVED_HANDLES: &[&str] = &["id", "dateCreated", "dateUpdated", "uid", "title"];

/// Per-site settings for a bundle type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTypeSite {
    pub site_id: String,
    /// Whether bundles of this type have their own URLs on this site
    pub has_urls: bool,
    pub uri_format: Option<String>,
    pub template: Option<String>,
}

/// Bundle type entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleType {
    pub id: Option<String>,
    pub name: String,
    /// Unique identifier-safe token
    pub handle: String,
    /// Token format rendered against the bundle when its SKU is blank,
    /// e.g. `"BNDL-{typeHandle}-{id}"`
    pub sku_format: String,
    #[serde(default)]
    pub site_settings: Vec<BundleTypeSite>,
}

impl BundleType {
    /// Settings for a specific site, if the type is enabled there
    pub fn site(&self, site_id: &str) -> Option<&BundleTypeSite> {
        self.site_settings.iter().find(|s| s.site_id == site_id)
    }

    /// URI format for a site
    ///
    /// A type that is not configured for the site is a hard
    /// configuration error. A configured site with URLs disabled
    /// yields `None`.
    pub fn uri_format(&self, site_id: &str) -> AppResult<Option<String>> {
        let site = self.site(site_id).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::SiteNotConfigured,
                format!(
                    "Bundle type '{}' is not enabled for site {}",
                    self.handle, site_id
                ),
            )
        })?;

        if !site.has_urls {
            return Ok(None);
        }

        Ok(site.uri_format.clone())
    }
}

/// Validate a bundle type handle: identifier-safe and not a reserved word
pub fn validate_handle(handle: &str) -> AppResult<()> {
    let mut chars = handle.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::with_message(
            ErrorCode::BundleTypeHandleInvalid,
            format!("'{}' is not a valid handle", handle),
        )
        .with_detail("handle", handle));
    }

    if RESERVED_HANDLES.contains(&handle) {
        return Err(AppError::with_message(
            ErrorCode::BundleTypeHandleReserved,
            format!("'{}' is a reserved word", handle),
        )
        .with_detail("handle", handle));
    }

    Ok(())
}

/// Create bundle type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTypeCreate {
    pub name: String,
    pub handle: String,
    pub sku_format: Option<String>,
    pub site_settings: Option<Vec<BundleTypeSite>>,
}

/// Update bundle type payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTypeUpdate {
    pub name: Option<String>,
    pub handle: Option<String>,
    pub sku_format: Option<String>,
    pub site_settings: Option<Vec<BundleTypeSite>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle_type() -> BundleType {
        BundleType {
            id: Some("bundle_type:box".to_string()),
            name: "Box".to_string(),
            handle: "box".to_string(),
            sku_format: "BNDL-{typeHandle}-{id}".to_string(),
            site_settings: vec![
                BundleTypeSite {
                    site_id: "site:default".to_string(),
                    has_urls: true,
                    uri_format: Some("bundles/{slug}".to_string()),
                    template: Some("bundles/_entry".to_string()),
                },
                BundleTypeSite {
                    site_id: "site:headless".to_string(),
                    has_urls: false,
                    uri_format: None,
                    template: None,
                },
            ],
        }
    }

    #[test]
    fn test_uri_format_for_configured_site() {
        let t = bundle_type();
        assert_eq!(
            t.uri_format("site:default").unwrap(),
            Some("bundles/{slug}".to_string())
        );
    }

    #[test]
    fn test_uri_format_urls_disabled() {
        let t = bundle_type();
        assert_eq!(t.uri_format("site:headless").unwrap(), None);
    }

    #[test]
    fn test_uri_format_unconfigured_site_is_config_error() {
        let t = bundle_type();
        let err = t.uri_format("site:missing").unwrap_err();
        assert_eq!(err.code, ErrorCode::SiteNotConfigured);
    }

    #[test]
    fn test_validate_handle_accepts_identifiers() {
        assert!(validate_handle("box").is_ok());
        assert!(validate_handle("gift_box2").is_ok());
        assert!(validate_handle("_internal").is_ok());
    }

    #[test]
    fn test_validate_handle_rejects_bad_charset() {
        assert!(validate_handle("").is_err());
        assert!(validate_handle("2boxes").is_err());
        assert!(validate_handle("gift-box").is_err());
        assert!(validate_handle("gift box").is_err());
    }

    #[test]
    fn test_validate_handle_rejects_reserved_words() {
        for reserved in RESERVED_HANDLES {
            let err = validate_handle(reserved).unwrap_err();
            assert_eq!(err.code, ErrorCode::BundleTypeHandleReserved);
        }
    }
}
