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

use crate::domain::config::ReleaseInfo;
use crate::domain::labels::LabelSet;
use crate::infrastructure::constants::{
    LABEL_CHART, LABEL_COMPONENT, LABEL_HERITAGE, LABEL_RELEASE, LABEL_TIER,
};

pub trait LabeledResourceBuilder {
    fn release(&self) -> &ReleaseInfo;

    fn component_name(&self) -> &str;

    fn get_labels(&self) -> LabelSet {
        let release = self.release();
        let mut labels = self.get_selector_labels();
        labels.insert(LABEL_CHART.to_string(), release.chart_label());
        labels.insert(LABEL_HERITAGE.to_string(), release.heritage.clone());
        labels
    }

    /// Never carries user overrides, so a resource always selects its own pods.
    fn get_selector_labels(&self) -> LabelSet {
        let release = self.release();
        let mut labels = LabelSet::new();
        labels.insert(LABEL_TIER.to_string(), release.tier.clone());
        labels.insert(
            LABEL_COMPONENT.to_string(),
            self.component_name().to_string(),
        );
        labels.insert(LABEL_RELEASE.to_string(), release.name.clone());
        labels
    }
}
