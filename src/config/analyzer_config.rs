//! Free-form per-analyzer configuration and its three precedence tiers.
//!
//! Configuration reaches a plugin from the analyzer catalog, the service and
//! the request. Tiers are merged per analyzer and per key; a later tier's
//! key replaces the same key from an earlier tier. Values are not merged
//! recursively, so a request-level `score_config` replaces the whole entry.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::template::render_name_template;
use crate::core::Service;

/// Key/value configuration of one analyzer.
pub type AnalyzerConfig = serde_json::Map<String, Value>;

/// Analyzer name -> configuration.
pub type AnalyzerConfigMap = BTreeMap<String, AnalyzerConfig>;

/// Weighting entry, deserialized as [`super::ScoreConfig`].
pub const SCORE_CONFIG_KEY: &str = "score_config";
/// Literal name used when correlating with external systems.
pub const SERVICE_NAME_ID_KEY: &str = "service_name_id";
/// Template applied to the service's base name when no literal is set.
pub const SERVICE_NAME_ID_TEMPLATE_KEY: &str = "service_name_id_template";

/// Overlay `overlay` onto `base`, key by key.
pub fn merge_into(base: &mut AnalyzerConfig, overlay: &AnalyzerConfig) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

/// Merge tiers given lowest precedence first.
pub fn merge_config_maps<'a, I>(tiers: I) -> AnalyzerConfigMap
where
    I: IntoIterator<Item = &'a AnalyzerConfigMap>,
{
    tiers
        .into_iter()
        .fold(AnalyzerConfigMap::new(), |mut merged, tier| {
            for (analyzer, config) in tier {
                merge_into(merged.entry(analyzer.clone()).or_default(), config);
            }
            merged
        })
}

fn non_empty_str<'a>(config: &'a AnalyzerConfig, key: &str) -> Option<&'a str> {
    config
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Name a plugin should use for the service when talking to external systems.
///
/// Explicit `service_name_id`, else `service_name_id_template` rendered with
/// the service's base name, else the service's own name. A broken template
/// is logged and skipped.
pub fn resolve_service_name_id(config: &AnalyzerConfig, service: &Service) -> String {
    if let Some(name) = non_empty_str(config, SERVICE_NAME_ID_KEY) {
        return name.to_string();
    }

    if let Some(template) = non_empty_str(config, SERVICE_NAME_ID_TEMPLATE_KEY) {
        match render_name_template(template, service.base_name()) {
            Ok(name) => return name,
            Err(e) => warn!(
                service = %service.name_id,
                error = %e,
                "Falling back to the service name"
            ),
        }
    }

    service.name_id.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> AnalyzerConfig {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    fn tier(entries: &[(&str, Value)]) -> AnalyzerConfigMap {
        entries
            .iter()
            .map(|(name, value)| (name.to_string(), config(value.clone())))
            .collect()
    }

    #[test]
    fn test_later_tier_wins_per_key() {
        let catalog = tier(&[("lint", json!({"ruleset": "default", "timeout": 30}))]);
        let service = tier(&[("lint", json!({"ruleset": "strict"}))]);
        let request = tier(&[("lint", json!({"timeout": 5}))]);

        let merged = merge_config_maps([&catalog, &service, &request]);
        assert_eq!(merged["lint"]["ruleset"], "strict");
        assert_eq!(merged["lint"]["timeout"], 5);
    }

    #[test]
    fn test_merge_is_shallow() {
        let catalog = tier(&[(
            "lint",
            json!({"score_config": {"analyzer_weight": 0.5, "severity_weights": {"error": 9}}}),
        )]);
        let request = tier(&[("lint", json!({"score_config": {"analyzer_weight": 0.2}}))]);

        let merged = merge_config_maps([&catalog, &request]);
        assert_eq!(
            merged["lint"][SCORE_CONFIG_KEY],
            json!({"analyzer_weight": 0.2})
        );
    }

    #[test]
    fn test_merge_keeps_analyzers_from_every_tier() {
        let catalog = tier(&[("lint", json!({}))]);
        let request = tier(&[("drift", json!({"window": "7d"}))]);
        let merged = merge_config_maps([&catalog, &request]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_service_name_literal_wins() {
        let mut service = Service::new("petstore");
        service.base_name = Some("pets".to_string());
        let cfg = config(json!({
            "service_name_id": "petstore-external",
            "service_name_id_template": "{{.nameID}}-prod"
        }));
        assert_eq!(resolve_service_name_id(&cfg, &service), "petstore-external");
    }

    #[test]
    fn test_service_name_from_template() {
        let mut service = Service::new("petstore-v2");
        service.base_name = Some("petstore".to_string());
        let cfg = config(json!({"service_name_id_template": "{{.nameID}}-prod"}));
        assert_eq!(resolve_service_name_id(&cfg, &service), "petstore-prod");
    }

    #[test]
    fn test_service_name_fallbacks() {
        let service = Service::new("petstore");
        assert_eq!(
            resolve_service_name_id(&AnalyzerConfig::new(), &service),
            "petstore"
        );

        let broken = config(json!({"service_name_id_template": "{{.region}}"}));
        assert_eq!(resolve_service_name_id(&broken, &service), "petstore");

        let blank = config(json!({"service_name_id": "  "}));
        assert_eq!(resolve_service_name_id(&blank, &service), "petstore");
    }
}
