//! Catalog metadata and build request types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metadata record for one feature-detect in the catalog
///
/// Modernizr publishes `property` and `cssclass` either as a single string or
/// as an array; both are normalized to a list here. A `null` or missing
/// `cssclass` becomes an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDescriptor {
    /// Property name(s) exposed on the `Modernizr` object
    #[serde(default, deserialize_with = "deserialize_names")]
    pub property: Vec<String>,

    /// Class name(s) set on the `html` element
    #[serde(default, deserialize_with = "deserialize_names")]
    pub cssclass: Vec<String>,

    /// Catalog-relative path of the test module
    #[serde(default)]
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl FeatureDescriptor {
    pub fn new(property: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            property: vec![property.into()],
            cssclass: Vec::new(),
            path: path.into(),
            name: None,
            tags: Vec::new(),
        }
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.property = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_css_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cssclass = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Identifier used for detection bookkeeping (comma-joined properties)
    pub fn key(&self) -> String {
        self.property.join(",")
    }
}

fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct NamesVisitor;

    impl<'de> Visitor<'de> for NamesVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, an array of strings or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            // Nested arrays and nulls show up in some catalog releases; they never match.
            let mut names = Vec::new();
            while let Some(elem) = seq.next_element::<serde_json::Value>()? {
                if let serde_json::Value::String(name) = elem {
                    names.push(name);
                }
            }
            Ok(names)
        }
    }

    deserializer.deserialize_any(NamesVisitor)
}

/// Optional runtime helpers the catalog can bundle into a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum BuildOption {
    #[serde(rename = "addTest")]
    #[value(name = "addTest")]
    AddTest,
    #[serde(rename = "atRule")]
    #[value(name = "atRule")]
    AtRule,
    #[serde(rename = "domPrefixes")]
    #[value(name = "domPrefixes")]
    DomPrefixes,
    #[serde(rename = "hasEvent")]
    #[value(name = "hasEvent")]
    HasEvent,
    #[serde(rename = "html5shiv")]
    #[value(name = "html5shiv")]
    Html5Shiv,
    #[serde(rename = "html5printshiv")]
    #[value(name = "html5printshiv")]
    Html5PrintShiv,
    #[serde(rename = "load")]
    #[value(name = "load")]
    Load,
    #[serde(rename = "mq")]
    #[value(name = "mq")]
    Mq,
    #[serde(rename = "prefixed")]
    #[value(name = "prefixed")]
    Prefixed,
    #[serde(rename = "prefixes")]
    #[value(name = "prefixes")]
    Prefixes,
    #[serde(rename = "prefixedCSS")]
    #[value(name = "prefixedCSS")]
    PrefixedCss,
    #[serde(rename = "setClasses")]
    #[value(name = "setClasses")]
    SetClasses,
    #[serde(rename = "testAllProps")]
    #[value(name = "testAllProps")]
    TestAllProps,
    #[serde(rename = "testProp")]
    #[value(name = "testProp")]
    TestProp,
    #[serde(rename = "testStyles")]
    #[value(name = "testStyles")]
    TestStyles,
}

impl BuildOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildOption::AddTest => "addTest",
            BuildOption::AtRule => "atRule",
            BuildOption::DomPrefixes => "domPrefixes",
            BuildOption::HasEvent => "hasEvent",
            BuildOption::Html5Shiv => "html5shiv",
            BuildOption::Html5PrintShiv => "html5printshiv",
            BuildOption::Load => "load",
            BuildOption::Mq => "mq",
            BuildOption::Prefixed => "prefixed",
            BuildOption::Prefixes => "prefixes",
            BuildOption::PrefixedCss => "prefixedCSS",
            BuildOption::SetClasses => "setClasses",
            BuildOption::TestAllProps => "testAllProps",
            BuildOption::TestProp => "testProp",
            BuildOption::TestStyles => "testStyles",
        }
    }
}

impl fmt::Display for BuildOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request handed to the catalog build service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    #[serde(rename = "classPrefix")]
    pub class_prefix: Option<String>,

    pub options: Vec<BuildOption>,

    #[serde(rename = "feature-detects")]
    pub feature_detects: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_accepts_string_fields() {
        let feature: FeatureDescriptor = serde_json::from_value(json!({
            "name": "JSON",
            "property": "json",
            "cssclass": "json",
            "path": "./feature-detects/json.js",
            "tags": ["json"]
        }))
        .unwrap();

        assert_eq!(feature.property, vec!["json"]);
        assert_eq!(feature.cssclass, vec!["json"]);
        assert_eq!(feature.name.as_deref(), Some("JSON"));
        assert_eq!(feature.key(), "json");
    }

    #[test]
    fn test_descriptor_accepts_arrays_and_null() {
        let feature: FeatureDescriptor = serde_json::from_value(json!({
            "property": ["audio", "audioloop"],
            "cssclass": null,
            "path": "./feature-detects/audio.js",
            "amdPath": "test/audio"
        }))
        .unwrap();

        assert_eq!(feature.property, vec!["audio", "audioloop"]);
        assert!(feature.cssclass.is_empty());
        assert_eq!(feature.key(), "audio,audioloop");
    }

    #[test]
    fn test_descriptor_drops_malformed_class_entries() {
        let feature: FeatureDescriptor = serde_json::from_value(json!({
            "property": "flexbox",
            "cssclass": ["flexbox", null, ["nested"], 3],
            "path": "./feature-detects/css/flexbox.js"
        }))
        .unwrap();

        assert_eq!(feature.cssclass, vec!["flexbox"]);
    }

    #[test]
    fn test_descriptor_missing_cssclass() {
        let feature: FeatureDescriptor = serde_json::from_value(json!({
            "property": "geolocation",
            "path": "./feature-detects/geolocation.js"
        }))
        .unwrap();

        assert!(feature.cssclass.is_empty());
    }

    #[test]
    fn test_build_option_names() {
        assert_eq!(
            serde_json::to_value(BuildOption::PrefixedCss).unwrap(),
            json!("prefixedCSS")
        );
        assert_eq!(
            serde_json::from_value::<BuildOption>(json!("html5printshiv")).unwrap(),
            BuildOption::Html5PrintShiv
        );
        assert_eq!(BuildOption::SetClasses.to_string(), "setClasses");
    }

    #[test]
    fn test_build_request_wire_shape() {
        let request = BuildRequest {
            class_prefix: None,
            options: vec![BuildOption::SetClasses],
            feature_detects: vec!["css/flexbox".to_string()],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "classPrefix": null,
                "options": ["setClasses"],
                "feature-detects": ["css/flexbox"]
            })
        );
    }
}
