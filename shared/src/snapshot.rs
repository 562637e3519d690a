//! Line item snapshot capture
//!
//! Orders keep a point-in-time copy of each bundle so later edits to
//! the catalog never rewrite history.

use crate::events::BundleHooks;
use crate::models::Bundle;
use serde_json::{Map, Value};

/// Capture the bundle snapshot stored on a cart line item
///
/// Subscribers get two interception points: field selection before the
/// custom field data is read, and the captured data afterwards. The
/// default selection is empty; only fields a subscriber opts in are
/// captured. The result merges the bundle's own attributes with the
/// field data under a `fields` key and tags the element kind.
pub fn capture_snapshot(bundle: &Bundle, hooks: &BundleHooks) -> Map<String, Value> {
    let mut fields: Vec<String> = Vec::new();
    hooks.fire_before_snapshot(bundle, &mut fields);

    let mut field_data = Map::new();
    for handle in &fields {
        if let Some(value) = bundle.custom_fields.get(handle) {
            field_data.insert(handle.clone(), value.clone());
        }
    }
    hooks.fire_after_snapshot(bundle, &mut field_data);

    let mut snapshot = match serde_json::to_value(bundle) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    snapshot.remove("custom_fields");
    snapshot.insert("fields".to_string(), Value::Object(field_data));
    snapshot.insert("type".to_string(), Value::String("bundle".to_string()));

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::collections::HashMap;

    fn bundle() -> Bundle {
        let mut custom_fields = HashMap::new();
        custom_fields.insert("color".to_string(), json!("red"));
        custom_fields.insert("weight".to_string(), json!(12));

        Bundle {
            id: Some("bundle:starter".to_string()),
            type_id: "bundle_type:box".to_string(),
            title: "Starter Box".to_string(),
            slug: "starter-box".to_string(),
            enabled: true,
            sku: "STARTER".to_string(),
            price: Decimal::new(4999, 2),
            tax_category_id: None,
            shipping_category_id: None,
            post_date: None,
            expiry_date: None,
            purchasable_ids: Vec::new(),
            qtys: HashMap::new(),
            custom_fields,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_snapshot_merges_attributes_with_empty_default_selection() {
        let snapshot = capture_snapshot(&bundle(), &BundleHooks::new());

        assert_eq!(snapshot["title"], json!("Starter Box"));
        assert_eq!(snapshot["sku"], json!("STARTER"));
        assert_eq!(snapshot["type"], json!("bundle"));
        assert!(snapshot["fields"].as_object().unwrap().is_empty());
        assert!(!snapshot.contains_key("custom_fields"));
    }

    #[test]
    fn test_before_hook_selects_fields() {
        let mut hooks = BundleHooks::new();
        hooks.on_before_snapshot(|_, fields| fields.push("color".to_string()));

        let snapshot = capture_snapshot(&bundle(), &hooks);
        let fields = snapshot["fields"].as_object().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["color"], json!("red"));
    }

    #[test]
    fn test_after_hook_amends_field_data() {
        let mut hooks = BundleHooks::new();
        hooks.on_after_snapshot(|b, data| {
            data.insert("displayName".to_string(), json!(b.description()));
        });

        let snapshot = capture_snapshot(&bundle(), &hooks);
        assert_eq!(
            snapshot["fields"]["displayName"],
            json!("Bundle: Starter Box")
        );
    }

    #[test]
    fn test_unknown_selected_fields_are_skipped() {
        let mut hooks = BundleHooks::new();
        hooks.on_before_snapshot(|_, fields| fields.push("missing".to_string()));

        let snapshot = capture_snapshot(&bundle(), &hooks);
        assert!(!snapshot["fields"].as_object().unwrap().contains_key("missing"));
    }
}
