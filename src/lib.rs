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

// Core modules
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export commonly used types
pub use domain::config::{
    apply_overrides, parse_dynamic_configs, ConfigTree, EmitContext, ReleaseInfo, RenderContext,
};
pub use domain::emitter::{GateCheck, ResourceEmitter};
pub use domain::gate::{should_emit, VersionGate};
pub use domain::labels::{merge_annotations, merge_labels, LabelSet, LabelSource, TracedLabels};
pub use domain::template::{
    build_asset_list, render_messages, resolve_block, substitute, AssetPredicate, AssetRef,
    BlockMode, FlashMessage, MessageBlock, PageComposer, TemplateSet,
};
pub use infrastructure::template::load_template_set;
pub use shared::{Result, StencilError};

#[doc(hidden)]
pub use infrastructure::kubernetes::resources::{
    LabeledResourceBuilder, PodDisruptionBudgetBuilder, ResourceBody,
};
