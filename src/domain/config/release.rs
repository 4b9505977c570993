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

use crate::infrastructure::constants::{
    DEFAULT_CHART_NAME, DEFAULT_CHART_VERSION, HERITAGE_VALUE, TIER_VALUE,
};

/// Release identity stamped onto every emitted resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub name: String,
    pub chart_name: String,
    pub chart_version: String,
    pub heritage: String,
    pub tier: String,
}

impl ReleaseInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chart_name: DEFAULT_CHART_NAME.to_string(),
            chart_version: DEFAULT_CHART_VERSION.to_string(),
            heritage: HERITAGE_VALUE.to_string(),
            tier: TIER_VALUE.to_string(),
        }
    }

    pub fn with_chart(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.chart_name = name.into();
        self.chart_version = version.into();
        self
    }

    pub fn with_heritage(mut self, heritage: impl Into<String>) -> Self {
        self.heritage = heritage.into();
        self
    }

    /// `<chart-name>-<chart-version>`
    pub fn chart_label(&self) -> String {
        format!("{}-{}", self.chart_name, self.chart_version)
    }
}
