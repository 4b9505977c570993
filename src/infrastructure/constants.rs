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

/// Identity label keys
pub const LABEL_TIER: &str = "tier";
pub const LABEL_COMPONENT: &str = "component";
pub const LABEL_RELEASE: &str = "release";
pub const LABEL_CHART: &str = "chart";
pub const LABEL_HERITAGE: &str = "heritage";

/// Identity label defaults
pub const TIER_VALUE: &str = "airflow";
pub const HERITAGE_VALUE: &str = "Helm";
pub const DEFAULT_CHART_NAME: &str = "airflow";
pub const DEFAULT_CHART_VERSION: &str = "1.16.0";

/// Components
pub const COMPONENT_WEBSERVER: &str = "webserver";

/// Configuration tree keys
pub const KEY_ENABLED: &str = "enabled";
pub const KEY_LABELS: &str = "labels";
pub const KEY_ANNOTATIONS: &str = "annotations";
pub const KEY_CONFIG: &str = "config";
pub const KEY_FULLNAME_OVERRIDE: &str = "fullnameOverride";
pub const KEY_APP_VERSION: &str = "airflowVersion";
pub const FEATURE_POD_DISRUPTION_BUDGET: &str = "podDisruptionBudget";

/// Version gates
pub const DEFAULT_VERSION_CONSTRAINT: &str = "<3.0.0";

/// PodDisruptionBudget
pub const PDB_KIND: &str = "PodDisruptionBudget";
pub const PDB_API_VERSION: &str = "policy/v1";
pub const PDB_API_VERSION_LEGACY: &str = "policy/v1beta1";
pub const PDB_NAME_SUFFIX: &str = "-pdb";
pub const PDB_DEFAULT_MAX_UNAVAILABLE: i64 = 1;
pub const SPEC_KEY_SELECTOR: &str = "selector";

/// First Kubernetes minor (1.x) serving policy/v1 PodDisruptionBudgets
pub const PDB_V1_MIN_KUBE_MINOR: u64 = 21;

/// Message categories
pub const MESSAGE_CATEGORY_WARNING: &str = "warning";
pub const MESSAGE_CATEGORY_INFO: &str = "info";

/// Shown once per page when legacy web UI plugins are installed
pub const PLUGIN_DEPRECATION_MESSAGE: &str = "Plugins that register Flask blueprints, \
AppBuilder views or AppBuilder menu items are deprecated and will not be supported \
in Airflow 3.0. Please migrate these plugins to the new plugin interface.";
