//! Offline render commands

use crate::cli::display::{GateRow, TableRenderer};
use crate::domain::config::{
    apply_overrides, parse_dynamic_configs, ConfigTree, EmitContext, ReleaseInfo, RenderContext,
};
use crate::domain::emitter::ResourceEmitter;
use crate::domain::template::{FlashMessage, PageComposer};
use crate::infrastructure::constants::{
    COMPONENT_WEBSERVER, DEFAULT_CHART_NAME, DEFAULT_CHART_VERSION, DEFAULT_VERSION_CONSTRAINT,
    FEATURE_POD_DISRUPTION_BUDGET,
};
use crate::infrastructure::template::load_template_set;
use anyhow::Context;
use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Values tree and release identity shared by the chart commands.
#[derive(clap::Args, Debug, Clone)]
pub struct ValuesSource {
    /// Values file (YAML)
    #[arg(long, short = 'f', value_name = "PATH")]
    pub values: Option<String>,

    /// Dynamic overrides applied on top of the values file (-D key=value)
    ///
    /// Keys are dotted paths into the values tree; values are parsed as YAML scalars.
    ///
    /// Example: -Dwebserver.enabled=true -Dwebserver.podDisruptionBudget.config.minAvailable=1
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Release name
    #[arg(long, default_value = "release-name")]
    pub release: String,

    /// Component whose resource is rendered
    #[arg(long, short = 'c', default_value = COMPONENT_WEBSERVER)]
    pub component: String,

    #[arg(long, default_value = DEFAULT_CHART_NAME)]
    pub chart_name: String,

    #[arg(long, default_value = DEFAULT_CHART_VERSION)]
    pub chart_version: String,
}

impl ValuesSource {
    pub fn load_tree(&self) -> anyhow::Result<ConfigTree> {
        let tree = match self.values {
            Some(ref path) => ConfigTree::from_file(path)
                .with_context(|| format!("Failed to load values from {}", path))?,
            None => ConfigTree::default(),
        };

        if self.properties.is_empty() {
            return Ok(tree);
        }

        let dynamic_configs = parse_dynamic_configs(&self.properties)
            .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
        Ok(apply_overrides(&tree, &dynamic_configs)?)
    }

    pub fn release_info(&self) -> ReleaseInfo {
        ReleaseInfo::new(&self.release).with_chart(&self.chart_name, &self.chart_version)
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RenderPdbCommand {
    #[command(flatten)]
    pub source: ValuesSource,

    /// Application version checked by the version gate (defaults to airflowVersion in values)
    #[arg(long)]
    pub app_version: Option<String>,

    /// Target Kubernetes version; below 1.21 the legacy policy/v1beta1 API is emitted
    #[arg(long)]
    pub kube_version: Option<String>,

    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Version range the resource is emitted for
    #[arg(long, default_value = DEFAULT_VERSION_CONSTRAINT)]
    pub version_constraint: String,

    /// Feature key under the component that toggles the resource
    #[arg(long, default_value = FEATURE_POD_DISRUPTION_BUDGET)]
    pub feature: String,

    #[arg(long, short = 'o', value_enum, default_value = "yaml")]
    pub output: OutputFormat,
}

impl RenderPdbCommand {
    pub fn emitter(&self) -> ResourceEmitter {
        ResourceEmitter::new(self.source.release_info(), &self.source.component)
            .with_feature_key(&self.feature)
            .with_version_constraint(&self.version_constraint)
    }

    pub fn emit_context(&self) -> EmitContext {
        let mut ctx = EmitContext::new();
        if let Some(ref version) = self.app_version {
            ctx = ctx.with_current_version(version);
        }
        if let Some(ref version) = self.kube_version {
            ctx = ctx.with_kube_version(version);
        }
        if let Some(ref namespace) = self.namespace {
            ctx = ctx.with_namespace(namespace);
        }
        ctx
    }

    /// The rendered document, or `None` when a gate is closed.
    pub fn render(&self) -> anyhow::Result<Option<String>> {
        let tree = self.source.load_tree()?;
        self.render_tree(&tree)
    }

    pub fn render_tree(&self, tree: &ConfigTree) -> anyhow::Result<Option<String>> {
        let body = self.emitter().render(tree, &self.emit_context())?;
        let Some(body) = body else {
            return Ok(None);
        };
        let text = match self.output {
            OutputFormat::Yaml => body.to_yaml()?,
            OutputFormat::Json => body.to_json()?,
        };
        Ok(Some(text))
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let tree = self.source.load_tree()?;
        match self.render_tree(&tree)? {
            Some(text) => print!("{}", text),
            None => {
                let checks = self.emitter().gate_checks(&tree, &self.emit_context())?;
                let rows: Vec<GateRow> = checks.into_iter().map(GateRow::from).collect();
                eprintln!("{}", TableRenderer::new().render_gate_status(&rows));
                eprintln!("No resource emitted for component {}", self.source.component);
            }
        }
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct LabelsCommand {
    #[command(flatten)]
    pub source: ValuesSource,
}

impl LabelsCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        let tree = self.source.load_tree()?;
        let emitter = ResourceEmitter::new(self.source.release_info(), &self.source.component);
        let labels = emitter.traced_labels(&tree)?;
        println!(
            "{}",
            TableRenderer::new().render_labels(&self.source.component, &labels)
        );
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RenderPageCommand {
    /// Directory holding layouts and leaf templates
    #[arg(long, short = 't', value_name = "DIR")]
    pub templates: String,

    /// Template to render, by file name
    #[arg(long)]
    pub template: String,

    /// Render context file (TOML, or YAML with a .yaml/.yml extension)
    #[arg(long, value_name = "PATH")]
    pub context: Option<String>,

    #[arg(long)]
    pub hostname: Option<String>,

    #[arg(long)]
    pub custom_theme: Option<String>,

    /// Feature flag, as NAME or NAME=true|false (repeatable)
    #[arg(long = "flag", value_name = "NAME[=BOOL]")]
    pub flags: Vec<String>,

    /// Append the plugin deprecation warning to the messages
    #[arg(long)]
    pub plugin_deprecation: bool,

    /// Flash message, as CATEGORY:TEXT or TEXT (repeatable)
    #[arg(long, value_name = "MESSAGE")]
    pub flash: Vec<String>,

    /// Extra context values for placeholders (-D key=value)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub vars: Vec<String>,
}

impl RenderPageCommand {
    pub fn render_context(&self) -> anyhow::Result<RenderContext> {
        let mut ctx = match self.context {
            Some(ref path) => RenderContext::from_file(path)
                .with_context(|| format!("Failed to load render context from {}", path))?,
            None => RenderContext::new(),
        };

        if let Some(ref hostname) = self.hostname {
            ctx = ctx.with_hostname(hostname);
        }
        if let Some(ref theme) = self.custom_theme {
            ctx = ctx.with_custom_theme(theme);
        }
        if self.plugin_deprecation {
            ctx = ctx.with_plugin_deprecation(true);
        }
        for raw in &self.flags {
            let (name, enabled) = parse_flag(raw)?;
            ctx = ctx.with_flag(name, enabled);
        }
        if !self.vars.is_empty() {
            let vars = parse_dynamic_configs(&self.vars)
                .map_err(|e| anyhow::anyhow!("Failed to parse context values: {}", e))?;
            for (key, value) in vars {
                ctx = ctx.with_var(key, value);
            }
        }
        Ok(ctx)
    }

    pub fn messages(&self) -> anyhow::Result<Vec<FlashMessage>> {
        self.flash
            .iter()
            .map(|raw| raw.parse::<FlashMessage>().map_err(anyhow::Error::from))
            .collect()
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let templates = load_template_set(&self.templates)
            .with_context(|| format!("Failed to load templates from {}", self.templates))?;
        let ctx = self.render_context()?;
        let messages = self.messages()?;
        let composer = PageComposer::new(templates);
        composer
            .render(&self.template, &messages, &ctx)
            .with_context(|| format!("Failed to render {}", self.template))
    }

    pub fn execute(&self) -> anyhow::Result<()> {
        let page = self.render()?;
        println!("{}", page);
        Ok(())
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<(String, bool)> {
    match raw.split_once('=') {
        None => Ok((raw.trim().to_string(), true)),
        Some((name, value)) => {
            let enabled = value.trim().parse::<bool>().map_err(|_| {
                anyhow::anyhow!("Invalid flag value '{}', expected true or false", raw)
            })?;
            Ok((name.trim().to_string(), enabled))
        }
    }
}
