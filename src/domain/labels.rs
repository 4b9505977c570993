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

//! Layered label and annotation merging

use std::collections::BTreeMap;
use std::fmt;

pub type LabelSet = BTreeMap<String, String>;

/// Which layer supplied a merged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LabelSource {
    Identity,
    Global,
    Component,
}

impl LabelSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::Identity => "identity",
            LabelSource::Global => "global",
            LabelSource::Component => "component",
        }
    }
}

impl fmt::Display for LabelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge result that remembers the winning layer for every key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracedLabels {
    entries: BTreeMap<String, (String, LabelSource)>,
}

impl TracedLabels {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, LabelSource)> {
        self.entries
            .iter()
            .map(|(k, (v, source))| (k.as_str(), v.as_str(), *source))
    }

    pub fn source_of(&self, key: &str) -> Option<LabelSource> {
        self.entries.get(key).map(|(_, source)| *source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_labels(self) -> LabelSet {
        self.entries.into_iter().map(|(k, (v, _))| (k, v)).collect()
    }
}

/// Merges global then component overrides onto the identity labels.
///
/// Keys already present in `identity` are reserved and keep their identity
/// value; every other key is last-writer-wins, so component overrides beat
/// global ones.
pub fn merge_labels(
    identity: &LabelSet,
    global: Option<&LabelSet>,
    component: Option<&LabelSet>,
) -> LabelSet {
    merge_labels_with_sources(identity, global, component).into_labels()
}

pub fn merge_labels_with_sources(
    identity: &LabelSet,
    global: Option<&LabelSet>,
    component: Option<&LabelSet>,
) -> TracedLabels {
    let mut entries: BTreeMap<String, (String, LabelSource)> = identity
        .iter()
        .map(|(k, v)| (k.clone(), (v.clone(), LabelSource::Identity)))
        .collect();

    let layers = [
        (global, LabelSource::Global),
        (component, LabelSource::Component),
    ];
    for (layer, source) in layers {
        let Some(layer) = layer else { continue };
        for (key, value) in layer {
            if let Some(reserved) = identity.get(key) {
                if reserved != value {
                    tracing::warn!(
                        label = %key,
                        source = %source,
                        "ignoring override of identity label"
                    );
                }
                continue;
            }
            entries.insert(key.clone(), (value.clone(), source));
        }
    }

    TracedLabels { entries }
}

/// Component annotations win over global ones; there are no reserved keys.
pub fn merge_annotations(global: Option<&LabelSet>, component: Option<&LabelSet>) -> LabelSet {
    let mut merged = global.cloned().unwrap_or_default();
    if let Some(component) = component {
        for (k, v) in component {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}
