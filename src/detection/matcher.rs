//! Textual feature-usage matching
//!
//! Scripts are searched for property access on the `Modernizr` object:
//!
//! ```text
//! Modernizr.touchevents;  Modernizr['indexeddb'];  Modernizr["json"];
//! ```
//!
//! Stylesheets are searched for classes set on the `html` element, with or
//! without the `no-` negation and the configured class prefix:
//!
//! ```text
//! html.flexbox .nav {}  html.no-flexbox .nav {}  html.mz-no-flexbox .nav {}
//! ```
//!
//! This is a heuristic over raw text. Comments and strings count as usage and
//! aliased access (`const M = Modernizr; M.json`) does not.

use super::accumulator::DetectionState;
use super::source::SourceKind;
use crate::catalog::FeatureDescriptor;
use crate::config::BuildConfig;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Global object every feature-detect hangs off
pub const NAMESPACE: &str = "Modernizr";

/// Decides which catalog features a source text references
#[derive(Debug, Clone, Default)]
pub struct FeatureMatcher {
    css_prefix: Option<String>,
}

impl FeatureMatcher {
    pub fn new(css_prefix: Option<String>) -> Self {
        Self { css_prefix }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(config.css_prefix.clone())
    }

    /// Returns the features newly confirmed by `text`
    ///
    /// Features already in `state` are skipped. Nothing matches for
    /// [`SourceKind::Other`].
    pub fn evaluate(
        &self,
        kind: SourceKind,
        text: &str,
        known: &[FeatureDescriptor],
        state: &DetectionState,
    ) -> Vec<FeatureDescriptor> {
        if !kind.is_recognized() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut matched = Vec::new();

        for feature in known {
            if state.is_confirmed(feature) || seen.contains(&feature.key()) {
                continue;
            }
            if self.uses_feature(kind, text, feature) {
                debug!(feature = %feature.key(), ?kind, "Feature usage found");
                seen.insert(feature.key());
                matched.push(feature.clone());
            }
        }

        matched
    }

    /// Whether `text` references any candidate name of `feature`
    pub fn uses_feature(&self, kind: SourceKind, text: &str, feature: &FeatureDescriptor) -> bool {
        match kind {
            SourceKind::Script => feature
                .property
                .iter()
                .filter(|name| !name.is_empty())
                .any(|name| is_match(script_pattern(name), text)),
            SourceKind::Style => feature
                .cssclass
                .iter()
                .filter(|class| !class.is_empty())
                .any(|class| is_match(style_pattern(class, self.css_prefix.as_deref()), text)),
            SourceKind::Other => false,
        }
    }
}

fn is_match(pattern: Result<Regex, regex::Error>, text: &str) -> bool {
    match pattern {
        Ok(regex) => regex.is_match(text),
        Err(e) => {
            warn!(error = %e, "Skipping feature pattern that failed to compile");
            false
        }
    }
}

/// `Modernizr.name`, `Modernizr['name']` or `Modernizr["name"]`, then a character
/// outside `[0-9A-Za-z_]`
fn script_pattern(property: &str) -> Result<Regex, regex::Error> {
    let pattern = format!(
        r#"{}(?:\.|\[['"]){}(?:['"]\])?[^0-9A-Za-z_]"#,
        NAMESPACE,
        regex::escape(property)
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}

/// `html.` then the optional prefix, then optional `no-`, then the class
fn style_pattern(class: &str, prefix: Option<&str>) -> Result<Regex, regex::Error> {
    let prefix = match prefix {
        Some(prefix) if !prefix.is_empty() => format!("(?:{})?", regex::escape(prefix)),
        _ => String::new(),
    };
    let pattern = format!(r"html\.{}(?:no-)?{}", prefix, regex::escape(class));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
}
