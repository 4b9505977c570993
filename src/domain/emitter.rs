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

//! Gate-then-build pipeline for a single declarative resource

use crate::domain::config::{ConfigTree, EmitContext, ReleaseInfo};
use crate::domain::gate::{should_emit, VersionGate};
use crate::domain::labels::{merge_labels_with_sources, TracedLabels};
use crate::infrastructure::constants::{
    DEFAULT_VERSION_CONSTRAINT, FEATURE_POD_DISRUPTION_BUDGET, KEY_APP_VERSION, KEY_ENABLED,
    KEY_FULLNAME_OVERRIDE, KEY_LABELS,
};
use crate::infrastructure::kubernetes::resources::{
    LabeledResourceBuilder, PodDisruptionBudgetBuilder, ResourceBody,
};
use crate::shared::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateCheck {
    pub name: String,
    pub detail: String,
    pub passed: bool,
}

/// Emits a component's PodDisruptionBudget when the component is enabled,
/// the budget feature is enabled and the application version is in range.
pub struct ResourceEmitter {
    release: ReleaseInfo,
    component: String,
    feature_key: String,
    version_constraint: String,
}

impl ResourceEmitter {
    pub fn new(release: ReleaseInfo, component: impl Into<String>) -> Self {
        Self {
            release,
            component: component.into(),
            feature_key: FEATURE_POD_DISRUPTION_BUDGET.to_string(),
            version_constraint: DEFAULT_VERSION_CONSTRAINT.to_string(),
        }
    }

    pub fn with_feature_key(mut self, feature_key: impl Into<String>) -> Self {
        self.feature_key = feature_key.into();
        self
    }

    pub fn with_version_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.version_constraint = constraint.into();
        self
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    /// `(path, value)` for every flag the resource is gated on.
    pub fn gate_flags(&self, tree: &ConfigTree) -> Vec<(String, bool)> {
        let component_flag = format!("{}.{}", self.component, KEY_ENABLED);
        let feature_flag = format!("{}.{}.{}", self.component, self.feature_key, KEY_ENABLED);
        vec![
            (component_flag.clone(), tree.flag(&component_flag)),
            (feature_flag.clone(), tree.flag(&feature_flag)),
        ]
    }

    /// Version checked by the gate: the context wins over the tree.
    pub fn current_version(&self, tree: &ConfigTree, ctx: &EmitContext) -> Option<String> {
        ctx.current_version
            .clone()
            .or_else(|| tree.string(KEY_APP_VERSION))
    }

    /// Evaluates every gate. Fails only when the constraint itself is malformed.
    pub fn should_emit(&self, tree: &ConfigTree, ctx: &EmitContext) -> Result<bool> {
        let gate = VersionGate::parse(&self.version_constraint)?;
        let flags = self.gate_flags(tree);
        let borrowed: Vec<(&str, bool)> = flags.iter().map(|(k, v)| (k.as_str(), *v)).collect();

        let open = match self.current_version(tree, ctx) {
            Some(version) => should_emit(&borrowed, &gate, &version),
            None => {
                tracing::debug!(
                    component = %self.component,
                    "no application version supplied, gate does not hold"
                );
                false
            }
        };
        Ok(open)
    }

    /// Returns `None` when any gate is closed.
    pub fn render(&self, tree: &ConfigTree, ctx: &EmitContext) -> Result<Option<ResourceBody>> {
        if !self.should_emit(tree, ctx)? {
            tracing::info!(component = %self.component, feature = %self.feature_key, "resource suppressed");
            return Ok(None);
        }

        let body = self.builder(tree, ctx).build(tree)?;
        tracing::info!(resource = %body.metadata.name, "resource rendered");
        Ok(Some(body))
    }

    /// One entry per gate, in evaluation order. `should_emit` holds exactly
    /// when every check passed.
    pub fn gate_checks(&self, tree: &ConfigTree, ctx: &EmitContext) -> Result<Vec<GateCheck>> {
        let gate = VersionGate::parse(&self.version_constraint)?;
        let mut checks: Vec<GateCheck> = self
            .gate_flags(tree)
            .into_iter()
            .map(|(path, enabled)| GateCheck {
                name: path,
                detail: enabled.to_string(),
                passed: enabled,
            })
            .collect();

        let version = self.current_version(tree, ctx);
        checks.push(GateCheck {
            name: format!("version {}", gate.expression()),
            passed: version.as_deref().is_some_and(|v| gate.matches(v)),
            detail: version.unwrap_or_else(|| "<unset>".to_string()),
        });
        Ok(checks)
    }

    /// Merged metadata labels with the layer each value came from.
    pub fn traced_labels(&self, tree: &ConfigTree) -> Result<TracedLabels> {
        let global = tree.string_map(KEY_LABELS)?;
        let component = tree.string_map(&format!("{}.{}", self.component, KEY_LABELS))?;
        let identity = self.builder(tree, &EmitContext::default()).get_labels();
        Ok(merge_labels_with_sources(
            &identity,
            global.as_ref(),
            component.as_ref(),
        ))
    }

    fn builder(&self, tree: &ConfigTree, ctx: &EmitContext) -> PodDisruptionBudgetBuilder {
        let mut builder = PodDisruptionBudgetBuilder::new(self.release.clone(), &self.component)
            .with_feature_key(&self.feature_key)
            .with_namespace(ctx.namespace.clone())
            .with_kube_version(ctx.kube_version.as_deref());
        if let Some(fullname) = tree.string(KEY_FULLNAME_OVERRIDE) {
            builder = builder.with_fullname(fullname);
        }
        builder
    }
}
