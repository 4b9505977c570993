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

use crate::domain::config::{ConfigTree, ReleaseInfo};
use crate::domain::gate::parse_lenient_version;
use crate::domain::labels::{merge_annotations, merge_labels, LabelSet};
use crate::infrastructure::constants::{
    FEATURE_POD_DISRUPTION_BUDGET, KEY_ANNOTATIONS, KEY_CONFIG, KEY_LABELS, PDB_API_VERSION,
    PDB_API_VERSION_LEGACY, PDB_DEFAULT_MAX_UNAVAILABLE, PDB_KIND, PDB_NAME_SUFFIX,
    PDB_V1_MIN_KUBE_MINOR, SPEC_KEY_SELECTOR,
};
use crate::infrastructure::kubernetes::resources::traits::LabeledResourceBuilder;
use crate::shared::error::{Result, StencilError};
use k8s_openapi::api::policy::v1::PodDisruptionBudget;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Resource document handed to whatever applies manifests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBody {
    pub api_version: String,
    pub kind: String,
    pub metadata: ResourceMetadata,
    pub spec: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceMetadata {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub labels: LabelSet,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: LabelSet,
}

impl ResourceBody {
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// `spec.selector.matchLabels`
    pub fn selector_labels(&self) -> Option<LabelSet> {
        let match_labels = self
            .spec
            .get(SPEC_KEY_SELECTOR)?
            .as_mapping()?
            .get("matchLabels")?
            .as_mapping()?;
        match_labels
            .iter()
            .map(|(k, v)| Some((k.as_str()?.to_string(), v.as_str()?.to_string())))
            .collect()
    }

    /// Typed view for consumers that apply through the Kubernetes API.
    /// Only `policy/v1` bodies convert.
    pub fn to_pod_disruption_budget(&self) -> Result<PodDisruptionBudget> {
        if self.api_version != PDB_API_VERSION || self.kind != PDB_KIND {
            return Err(StencilError::ValidationError(format!(
                "{}/{} cannot be converted to a policy/v1 PodDisruptionBudget",
                self.api_version, self.kind
            )));
        }
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }
}

pub struct PodDisruptionBudgetBuilder {
    release: ReleaseInfo,
    component: String,
    feature_key: String,
    fullname: String,
    namespace: Option<String>,
    api_version: &'static str,
}

impl PodDisruptionBudgetBuilder {
    pub fn new(release: ReleaseInfo, component: impl Into<String>) -> Self {
        let fullname = release.name.clone();
        Self {
            release,
            component: component.into(),
            feature_key: FEATURE_POD_DISRUPTION_BUDGET.to_string(),
            fullname,
            namespace: None,
            api_version: PDB_API_VERSION,
        }
    }

    /// Key under the component holding `config` and `annotations`.
    pub fn with_feature_key(mut self, feature_key: impl Into<String>) -> Self {
        self.feature_key = feature_key.into();
        self
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = fullname.into();
        self
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Clusters older than 1.21 only serve `policy/v1beta1`.
    pub fn with_kube_version(mut self, kube_version: Option<&str>) -> Self {
        self.api_version = match kube_version.and_then(parse_lenient_version) {
            Some(v) if v.major == 1 && v.minor < PDB_V1_MIN_KUBE_MINOR => PDB_API_VERSION_LEGACY,
            _ => PDB_API_VERSION,
        };
        self
    }

    pub fn name(&self) -> String {
        format!("{}-{}{}", self.fullname, self.component, PDB_NAME_SUFFIX)
    }

    /// Reads label, annotation and policy overrides for this component from
    /// the tree and builds the body. Malformed override shapes fail before
    /// anything is built.
    pub fn build(&self, tree: &ConfigTree) -> Result<ResourceBody> {
        let feature_path = format!("{}.{}", self.component, self.feature_key);

        let global_labels = tree.string_map(KEY_LABELS)?;
        let component_labels = tree.string_map(&format!("{}.{}", self.component, KEY_LABELS))?;
        let global_annotations = tree.string_map(KEY_ANNOTATIONS)?;
        let component_annotations =
            tree.string_map(&format!("{}.{}", feature_path, KEY_ANNOTATIONS))?;
        let passthrough = tree
            .mapping(&format!("{}.{}", feature_path, KEY_CONFIG))?
            .unwrap_or_else(default_policy);

        let labels = merge_labels(
            &self.get_labels(),
            global_labels.as_ref(),
            component_labels.as_ref(),
        );
        let annotations =
            merge_annotations(global_annotations.as_ref(), component_annotations.as_ref());

        Ok(self.build_body(labels, annotations, &passthrough))
    }

    /// Selector labels always come from the release identity; passthrough
    /// entries are copied into `spec` as given.
    pub fn build_body(
        &self,
        labels: LabelSet,
        annotations: LabelSet,
        passthrough: &BTreeMap<String, Value>,
    ) -> ResourceBody {
        let mut match_labels = Mapping::new();
        for (k, v) in self.get_selector_labels() {
            match_labels.insert(Value::String(k), Value::String(v));
        }
        let mut selector = Mapping::new();
        selector.insert(
            Value::String("matchLabels".to_string()),
            Value::Mapping(match_labels),
        );

        let mut spec = Mapping::new();
        spec.insert(
            Value::String(SPEC_KEY_SELECTOR.to_string()),
            Value::Mapping(selector),
        );
        for (key, value) in passthrough {
            if key == SPEC_KEY_SELECTOR {
                tracing::warn!(
                    resource = %self.name(),
                    "ignoring selector in passthrough config"
                );
                continue;
            }
            spec.insert(Value::String(key.clone()), value.clone());
        }

        ResourceBody {
            api_version: self.api_version.to_string(),
            kind: PDB_KIND.to_string(),
            metadata: ResourceMetadata {
                name: self.name(),
                namespace: self.namespace.clone(),
                labels,
                annotations,
            },
            spec,
        }
    }
}

impl LabeledResourceBuilder for PodDisruptionBudgetBuilder {
    fn release(&self) -> &ReleaseInfo {
        &self.release
    }

    fn component_name(&self) -> &str {
        &self.component
    }
}

fn default_policy() -> BTreeMap<String, Value> {
    let mut policy = BTreeMap::new();
    policy.insert(
        "maxUnavailable".to_string(),
        Value::Number(PDB_DEFAULT_MAX_UNAVAILABLE.into()),
    );
    policy
}
