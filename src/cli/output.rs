//! Formatting of the `--debug` build report

use crate::build::{feature_path, OutputUnit};
use crate::catalog::BuildRequest;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Human,
}

/// A confirmed feature as shown in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedFeature {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub property: Vec<String>,
    pub feature_path: String,
}

/// What was detected and what was asked of the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub output: PathBuf,
    pub bytes: usize,
    pub features: Vec<ReportedFeature>,
    pub request: BuildRequest,
}

impl BuildReport {
    /// Builds a report from an output carrying diagnostics
    pub fn from_output(output: &OutputUnit) -> Option<Self> {
        let diagnostics = output.diagnostics.as_ref()?;
        let features = diagnostics
            .features
            .iter()
            .map(|f| ReportedFeature {
                name: f.name.clone(),
                property: f.property.clone(),
                feature_path: feature_path(&f.path),
            })
            .collect();

        Some(Self {
            output: output.path.clone(),
            bytes: output.len(),
            features,
            request: diagnostics.request.clone(),
        })
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, report: &BuildReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report)
                .context("Failed to serialize build report to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(report).context("Failed to serialize build report to YAML")
            }
            OutputFormat::Human => Ok(self.format_human(report)),
        }
    }

    fn format_human(&self, report: &BuildReport) -> String {
        let mut output = String::new();

        output.push_str("\u{2713} Modernizr Build\n");
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        output.push_str(&format!("Output:  {}\n", report.output.display()));
        output.push_str(&format!("Size:    {} bytes\n\n", report.bytes));

        if report.features.is_empty() {
            output.push_str("Detected Features: (none)\n");
        } else {
            output.push_str("Detected Features:\n");
            for (i, feature) in report.features.iter().enumerate() {
                let connector = if i == report.features.len() - 1 {
                    "\u{2514}"
                } else {
                    "\u{251C}"
                };
                output.push_str(&format!(
                    "{}\u{2500} {:<24} {}\n",
                    connector,
                    feature.feature_path,
                    feature.property.join(", ")
                ));
            }
        }
        output.push('\n');

        let options: Vec<&str> = report.request.options.iter().map(|o| o.as_str()).collect();
        output.push_str("Build Request:\n");
        output.push_str(&format!(
            "\u{251C}\u{2500} Class prefix:    {}\n",
            report.request.class_prefix.as_deref().unwrap_or("(none)")
        ));
        output.push_str(&format!(
            "\u{251C}\u{2500} Options:         {}\n",
            if options.is_empty() {
                "(none)".to_string()
            } else {
                options.join(", ")
            }
        ));
        output.push_str(&format!(
            "\u{2514}\u{2500} Feature-detects: {}\n",
            if report.request.feature_detects.is_empty() {
                "(none)".to_string()
            } else {
                report.request.feature_detects.join(", ")
            }
        ));

        output
    }
}
