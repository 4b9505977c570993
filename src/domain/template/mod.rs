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

//! Layered page template composition

pub mod assets;
pub mod block;
pub mod composer;
pub mod html;
pub mod inheritance;
pub mod messages;
pub mod substitute;

pub use self::assets::{
    build_asset_list, AssetDeclarations, AssetKind, AssetPredicate, AssetRef, ConditionalAsset,
};
pub use self::block::{resolve_block, BlockMode, BlockOverride, Layout};
pub use self::composer::{PageComposer, RenderPass, ResolvedDocument};
pub use self::inheritance::{LeafTemplate, ResolvedTemplate, TemplateSet, TemplateSource};
pub use self::messages::{render_messages, FlashMessage, MessageBlock};
pub use self::substitute::{substitute, Placeholder, Substitutor};
