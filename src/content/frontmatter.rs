//! Front-matter parsing

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::date::parse_date;
use super::error::ContentError;

/// A scalar read as text; numbers and booleans keep their written form
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor).map(Scalar)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value.to_string())
    }
}

/// Optional text field that also accepts numbers and booleans
fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| s.0))
}

/// Custom deserializer that handles both a single scalar and a list of scalars
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
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

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            ScalarVisitor.visit_bool(value).map(|s| vec![s])
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            ScalarVisitor.visit_i64(value).map(|s| vec![s])
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            ScalarVisitor.visit_u64(value).map(|s| vec![s])
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            ScalarVisitor.visit_f64(value).map(|s| vec![s])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(Scalar(item)) = seq.next_element::<Scalar>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Fence marking the start and end of a front-matter block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    /// `---`, YAML body
    Yaml,
    /// `+++`, TOML body
    Toml,
}

impl Fence {
    pub fn marker(self) -> &'static str {
        match self {
            Fence::Yaml => "---",
            Fence::Toml => "+++",
        }
    }

    fn from_line(line: &str) -> Option<Self> {
        match line.trim_end() {
            "---" => Some(Fence::Yaml),
            "+++" => Some(Fence::Toml),
            _ => None,
        }
    }
}

/// Cover image settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cover {
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt: Option<String>,
    #[serde(
        deserialize_with = "optional_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub caption: Option<String>,
    /// Image path is relative to the page bundle
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub relative: bool,
}

/// Front-matter as written, before required fields are checked
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFrontMatter {
    #[serde(deserialize_with = "optional_scalar")]
    title: Option<String>,
    #[serde(deserialize_with = "optional_scalar")]
    date: Option<String>,
    draft: bool,
    #[serde(deserialize_with = "string_or_vec")]
    tags: Vec<String>,
    #[serde(deserialize_with = "string_or_vec")]
    categories: Vec<String>,
    #[serde(deserialize_with = "optional_scalar")]
    author: Option<String>,
    #[serde(rename = "showToc", alias = "showtoc")]
    show_toc: Option<bool>,
    #[serde(rename = "TocOpen", alias = "tocopen", alias = "tocOpen")]
    toc_open: Option<bool>,
    #[serde(deserialize_with = "optional_scalar")]
    description: Option<String>,
    cover: Option<Cover>,

    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

/// Front-matter of a content file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrontMatter {
    pub title: String,
    /// Date as written; see [`FrontMatter::parse_date`]
    pub date: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub draft: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "showToc", skip_serializing_if = "Option::is_none")]
    pub show_toc: Option<bool>,
    #[serde(rename = "TocOpen", skip_serializing_if = "Option::is_none")]
    pub toc_open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Cover>,

    /// Unrecognized keys in source order. Non-string values are kept as JSON text.
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl FrontMatter {
    /// Create front-matter with only the required fields set
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            draft: false,
            tags: Vec::new(),
            categories: Vec::new(),
            author: None,
            show_toc: None,
            toc_open: None,
            description: None,
            cover: None,
            extra: IndexMap::new(),
        }
    }

    /// Parse front-matter from content string
    /// Returns (front_matter, body)
    pub fn parse(content: &str) -> Result<(Self, &str), ContentError> {
        let (fence, block, body) = split(content)?;
        let raw = decode(fence, block)?;
        Ok((Self::validate(raw)?, body))
    }

    fn validate(raw: RawFrontMatter) -> Result<Self, ContentError> {
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(ContentError::MissingRequiredField { field: "title" })?;
        let date = raw
            .date
            .filter(|d| !d.trim().is_empty())
            .ok_or(ContentError::MissingRequiredField { field: "date" })?;

        let extra = raw
            .extra
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Ok(Self {
            title,
            date,
            draft: raw.draft,
            tags: raw.tags,
            categories: raw.categories,
            author: raw.author,
            show_toc: raw.show_toc,
            toc_open: raw.toc_open,
            description: raw.description,
            cover: raw.cover,
            extra,
        })
    }

    /// Parse the date string, placing naive values in `tz`
    pub fn parse_date(&self, tz: &Tz) -> Option<DateTime<FixedOffset>> {
        parse_date(&self.date, tz)
    }

    /// Serialize back to a YAML block (without fences)
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Split content into (fence, metadata block, body).
///
/// The opening fence must be the first line. The body is everything after the
/// closing fence line, untouched.
fn split(content: &str) -> Result<(Fence, &str, &str), ContentError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let (first, rest) = match content.find('\n') {
        Some(pos) => (&content[..pos], &content[pos + 1..]),
        None => (content, ""),
    };

    let fence = Fence::from_line(first).ok_or_else(|| {
        ContentError::malformed("content must start with a `---` or `+++` fence line")
    })?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == fence.marker() {
            return Ok((fence, &rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(ContentError::malformed(format!(
        "missing closing `{}` fence",
        fence.marker()
    )))
}

fn decode(fence: Fence, block: &str) -> Result<RawFrontMatter, ContentError> {
    if block.trim().is_empty() {
        return Ok(RawFrontMatter::default());
    }

    let value = match fence {
        Fence::Yaml => serde_yaml::from_str::<serde_json::Value>(block)
            .map_err(|e| ContentError::malformed(format!("invalid YAML: {}", e)))?,
        Fence::Toml => {
            let table: toml::Table = toml::from_str(block)
                .map_err(|e| ContentError::malformed(format!("invalid TOML: {}", e)))?;
            toml_to_json(toml::Value::Table(table))
        }
    };

    let value = match value {
        serde_json::Value::Object(_) => value,
        serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
        _ => return Err(ContentError::malformed("front-matter is not a mapping")),
    };

    serde_json::from_value(value).map_err(|e| ContentError::malformed(e.to_string()))
}

/// TOML datetimes become their string form so they read like YAML dates
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15 10:30:00
tags:
  - rust
  - hexo
categories:
  - programming
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Hello World");
        assert_eq!(fm.date, "2024-01-15 10:30:00");
        assert_eq!(fm.tags, vec!["rust", "hexo"]);
        assert_eq!(fm.categories, vec!["programming"]);
        assert!(!fm.draft);
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_parse_papermod_fields() {
        let content = r#"---
title: "Docker Best Practices"
date: 2025-09-01
draft: true
author: "Me"
showToc: true
TocOpen: false
description: "Smaller images, faster builds"
cover:
  image: "https://example.com/docker.png"
  alt: "whale"
  caption: "Containers"
  relative: false
---
Body
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(fm.draft);
        assert_eq!(fm.author.as_deref(), Some("Me"));
        assert_eq!(fm.show_toc, Some(true));
        assert_eq!(fm.toc_open, Some(false));
        assert_eq!(fm.description.as_deref(), Some("Smaller images, faster builds"));

        let cover = fm.cover.unwrap();
        assert_eq!(cover.image.as_deref(), Some("https://example.com/docker.png"));
        assert_eq!(cover.alt.as_deref(), Some("whale"));
        assert_eq!(cover.caption.as_deref(), Some("Containers"));
        assert!(!cover.relative);
        assert!(fm.extra.is_empty());
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content = r#"+++
title = "Go Architecture"
date = 2025-11-28
tags = ["Go", "Architecture"]

[cover]
image = "go.png"
relative = true
+++
Body
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Go Architecture");
        assert_eq!(fm.date, "2025-11-28");
        assert_eq!(fm.tags, vec!["Go", "Architecture"]);
        assert!(fm.cover.unwrap().relative);
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = r#"---
title: Single Tag Post
date: 2024-01-15
tags: Notes
categories: Blog
---

Content here.
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
        assert_eq!(fm.categories, vec!["Blog"]);
    }

    #[test]
    fn test_numeric_scalars_read_as_text() {
        let content = "---\ntitle: 404\ndate: 2025-01-01\ntags: [2024, Go, 1.5, true]\ncategories: 2025\ndescription: 42\n---\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "404");
        assert_eq!(fm.tags, vec!["2024", "Go", "1.5", "true"]);
        assert_eq!(fm.categories, vec!["2025"]);
        assert_eq!(fm.description.as_deref(), Some("42"));
    }

    #[test]
    fn test_nested_tag_rejected() {
        let content = "---\ntitle: Nested\ndate: 2025-01-01\ntags: [{name: Go}]\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_unknown_keys_kept_in_order() {
        let content = r#"---
title: Extras
weight: 3
date: 2024-01-15
slug: custom-slug
aliases: [/old, /older]
---
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["weight", "slug", "aliases"]);
        assert_eq!(fm.extra["weight"], "3");
        assert_eq!(fm.extra["slug"], "custom-slug");
        assert_eq!(fm.extra["aliases"], r#"["/old","/older"]"#);
        assert_eq!(body, "");
    }

    #[test]
    fn test_missing_closing_fence() {
        let content = "---\ntitle: Open\ndate: 2024-01-15\n\nNo closing fence here.\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_missing_opening_fence() {
        let content = "\n---\ntitle: Late\ndate: 2024-01-15\n---\nBody\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));

        let err = FrontMatter::parse("Just prose").unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_bad_indentation() {
        let content = "---\ntitle: Broken\n  date: 2024-01-15\n tags:\n- a\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_wrong_field_type() {
        let content = "---\ntitle: Typed\ndate: 2024-01-15\ndraft: maybe\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_not_a_mapping() {
        let content = "---\n- one\n- two\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedFrontMatter { .. }));
    }

    #[test]
    fn test_missing_required_fields() {
        let content = "---\ndate: 2024-01-15\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingRequiredField { field: "title" }
        ));

        let content = "---\ntitle: Undated\n---\n";
        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MissingRequiredField { field: "date" }));

        let err = FrontMatter::parse("---\n---\nBody\n").unwrap_err();
        assert!(matches!(
            err,
            ContentError::MissingRequiredField { field: "title" }
        ));
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\ndate: 2024-01-15\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, "Windows");
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_body_separator_not_closing_early() {
        // only the first closing fence ends the block
        let content = "---\ntitle: Rules\ndate: 2024-01-15\n---\nIntro\n\n---\n\nMore\n";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "Intro\n\n---\n\nMore\n");
    }

    #[test]
    fn test_yaml_round_trip() {
        let content = r#"---
title: "React Patterns: Compound Components"
date: 2025-11-28T09:00:00+08:00
draft: true
tags: [React, "Design Patterns"]
categories: [Frontend]
author: Someone
showToc: true
TocOpen: true
description: "yes: a colon"
cover:
  image: cover.png
  alt: "true"
  caption: A caption
  relative: true
series: "patterns"
weight: 10
---
Body
"#;

        let (fm, _) = FrontMatter::parse(content).unwrap();
        let yaml = fm.to_yaml().unwrap();
        let reparsed = format!("---\n{}---\n", yaml);
        let (again, _) = FrontMatter::parse(&reparsed).unwrap();
        assert_eq!(fm, again);
        assert_eq!(again.cover.unwrap().alt.as_deref(), Some("true"));
        assert_eq!(again.extra["weight"], "10");
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter::new("Dated", "2024-01-15 10:30:00");
        let dt = fm.parse_date(&Tz::UTC).unwrap();
        assert_eq!(dt.format("%Y-%m-%d").to_string(), "2024-01-15");
    }
}
