// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use chart_stencil::domain::labels::merge_labels_with_sources;
use chart_stencil::*;
use std::collections::BTreeMap;

const ENABLED: &str = r#"
webserver:
  enabled: true
  podDisruptionBudget:
    enabled: true
"#;

fn labels(pairs: &[(&str, &str)]) -> LabelSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn emitter() -> ResourceEmitter {
    ResourceEmitter::new(ReleaseInfo::new("prod"), "webserver")
}

fn at_version(version: &str) -> EmitContext {
    EmitContext::new().with_current_version(version)
}

#[test]
fn test_emit_gated_on_version() {
    let tree = ConfigTree::from_yaml_str(ENABLED).unwrap();
    assert!(emitter().should_emit(&tree, &at_version("2.9.0")).unwrap());
    assert!(!emitter().should_emit(&tree, &at_version("3.0.0")).unwrap());
}

#[test]
fn test_any_closed_gate_suppresses() {
    let gate = VersionGate::parse("<3.0.0").unwrap();
    let cases: [(&[(&str, bool)], &str); 4] = [
        (&[("webserver.enabled", false), ("pdb.enabled", true)], "2.9.0"),
        (&[("webserver.enabled", true), ("pdb.enabled", false)], "2.9.0"),
        (&[("webserver.enabled", false), ("pdb.enabled", false)], "2.9.0"),
        (&[("webserver.enabled", true), ("pdb.enabled", true)], "3.2.1"),
    ];
    for (flags, version) in cases {
        assert!(!should_emit(flags, &gate, version), "{:?} {}", flags, version);
    }
    assert!(should_emit(
        &[("webserver.enabled", true), ("pdb.enabled", true)],
        &gate,
        "2.10.3"
    ));
}

#[test]
fn test_unparseable_version_closes_gate() {
    let gate = VersionGate::parse("<3.0.0").unwrap();
    assert!(!should_emit(&[], &gate, "not-a-version"));
}

#[test]
fn test_malformed_constraint_is_gate_error() {
    let err = VersionGate::parse("less than three").unwrap_err();
    assert!(matches!(err, StencilError::GateEvaluation { .. }));
}

#[test]
fn test_no_body_when_suppressed() {
    let tree = ConfigTree::from_yaml_str("webserver:\n  enabled: true\n").unwrap();
    assert!(emitter().render(&tree, &at_version("2.9.0")).unwrap().is_none());
}

#[test]
fn test_merge_labels_scenario() {
    let identity = labels(&[("tier", "airflow"), ("component", "webserver")]);
    let global = labels(&[("team", "x")]);
    let component = labels(&[("team", "y"), ("tier", "ignored")]);

    let merged = merge_labels(&identity, Some(&global), Some(&component));
    assert_eq!(
        merged,
        labels(&[("tier", "airflow"), ("component", "webserver"), ("team", "y")])
    );
}

#[test]
fn test_empty_overrides_are_identity() {
    let identity = labels(&[("tier", "airflow"), ("release", "prod")]);
    assert_eq!(merge_labels(&identity, None, None), identity);
    assert_eq!(
        merge_labels(&identity, Some(&LabelSet::new()), Some(&LabelSet::new())),
        identity
    );
}

#[test]
fn test_component_beats_global() {
    let identity = labels(&[("tier", "airflow")]);
    let global = labels(&[("team", "x"), ("cost", "shared")]);
    let component = labels(&[("team", "y")]);

    let traced = merge_labels_with_sources(&identity, Some(&global), Some(&component));
    assert_eq!(traced.source_of("team"), Some(LabelSource::Component));
    assert_eq!(traced.source_of("cost"), Some(LabelSource::Global));
    assert_eq!(traced.source_of("tier"), Some(LabelSource::Identity));
}

#[test]
fn test_nested_label_override_is_config_error() {
    let yaml = format!("{}labels:\n  team:\n    name: x\n", ENABLED);
    let tree = ConfigTree::from_yaml_str(&yaml).unwrap();
    let err = emitter().render(&tree, &at_version("2.9.0")).unwrap_err();
    assert!(matches!(err, StencilError::ConfigError(_)));
}

#[test]
fn test_selector_ignores_overrides() {
    let yaml = r#"
labels:
  release: hijacked
  team: x
webserver:
  enabled: true
  labels:
    component: other
    tier: other
  podDisruptionBudget:
    enabled: true
"#;
    let tree = ConfigTree::from_yaml_str(yaml).unwrap();
    let body = emitter().render(&tree, &at_version("2.9.0")).unwrap().unwrap();

    let expected: BTreeMap<String, String> = labels(&[
        ("tier", "airflow"),
        ("component", "webserver"),
        ("release", "prod"),
    ]);
    assert_eq!(body.selector_labels(), Some(expected));
    assert_eq!(body.metadata.labels.get("team").map(String::as_str), Some("x"));
    assert_eq!(
        body.metadata.labels.get("release").map(String::as_str),
        Some("prod")
    );
}

#[test]
fn test_passthrough_copied_verbatim() {
    let yaml = format!(
        "{}    config:\n      minAvailable: 50%\n      unhealthyPodEvictionPolicy: AlwaysAllow\n",
        ENABLED
    );
    let tree = ConfigTree::from_yaml_str(&yaml).unwrap();
    let body = emitter().render(&tree, &at_version("2.9.0")).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();

    assert_eq!(json["spec"]["minAvailable"], "50%");
    assert_eq!(json["spec"]["unhealthyPodEvictionPolicy"], "AlwaysAllow");
    assert!(json["spec"].get("maxUnavailable").is_none());
}

#[test]
fn test_default_policy_and_shape() {
    let tree = ConfigTree::from_yaml_str(ENABLED).unwrap();
    let ctx = at_version("2.9.0").with_namespace("airflow");
    let body = emitter().render(&tree, &ctx).unwrap().unwrap();

    assert_eq!(body.api_version, "policy/v1");
    assert_eq!(body.kind, "PodDisruptionBudget");
    assert_eq!(body.metadata.name, "prod-webserver-pdb");
    assert_eq!(body.metadata.namespace.as_deref(), Some("airflow"));

    let json: serde_json::Value = serde_json::from_str(&body.to_json().unwrap()).unwrap();
    assert_eq!(json["spec"]["maxUnavailable"], 1);
    assert_eq!(json["metadata"]["labels"]["chart"], "airflow-1.16.0");
    assert_eq!(json["metadata"]["labels"]["heritage"], "Helm");
}

#[test]
fn test_legacy_api_for_old_clusters() {
    let tree = ConfigTree::from_yaml_str(ENABLED).unwrap();
    let ctx = at_version("2.9.0").with_kube_version("1.20.4");
    let body = emitter().render(&tree, &ctx).unwrap().unwrap();
    assert_eq!(body.api_version, "policy/v1beta1");
}

#[test]
fn test_dynamic_overrides_open_gates() {
    let tree = ConfigTree::default();
    let overrides = parse_dynamic_configs(&[
        "webserver.enabled=true".to_string(),
        "webserver.podDisruptionBudget.enabled=true".to_string(),
        "airflowVersion=2.8.1".to_string(),
    ])
    .unwrap();
    let tree = apply_overrides(&tree, &overrides).unwrap();
    assert!(emitter().should_emit(&tree, &EmitContext::new()).unwrap());
}

#[test]
fn test_render_does_not_mutate_tree() {
    let tree = ConfigTree::from_yaml_str(ENABLED).unwrap();
    let before = tree.clone();
    let first = emitter().render(&tree, &at_version("2.9.0")).unwrap();
    let second = emitter().render(&tree, &at_version("2.9.0")).unwrap();
    assert_eq!(tree, before);
    assert_eq!(first, second);
}

#[test]
fn test_two_digit_minor_override_reaches_gate() {
    let overrides = parse_dynamic_configs(&[
        "webserver.enabled=true".to_string(),
        "webserver.podDisruptionBudget.enabled=true".to_string(),
        "airflowVersion=2.10".to_string(),
    ])
    .unwrap();
    let tree = apply_overrides(&ConfigTree::default(), &overrides).unwrap();

    let emitter = emitter().with_version_constraint(">=2.10.0, <3.0.0");
    assert!(emitter.should_emit(&tree, &EmitContext::new()).unwrap());
}
