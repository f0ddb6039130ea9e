//! Named values collected from injection sites, and their substitution
//!
//! Values are declared as extra properties on `INJECT_TEMPLATE` tags and
//! consumed by two kinds of value points:
//!
//! ```text
//! <!-- INJECT_TEMPLATE_VALUE valueId='title' -->
//! {{{title}}}
//! ```

use std::collections::HashMap;

use log::trace;

use crate::error::InjectError;
use crate::tag::extract_tags;

pub const INJECT_VALUE_TAG: &str = "INJECT_TEMPLATE_VALUE";
pub const VALUE_ID_PROPERTY: &str = "valueId";

const CURLY_OPEN: &str = "{{{";
const CURLY_CLOSE: &str = "}}}";

/// Per-page value map that remembers declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value; returns `false` and leaves the map unchanged if the key exists
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueMap {
    /// Later duplicates are ignored
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Substitute values into fully spliced text
///
/// Runs, in order: tag value points, curly value points, then removal of
/// every curly placeholder still left.
pub fn resolve_values(html: &str, values: &ValueMap) -> Result<String, InjectError> {
    let html = inject_tag_values(html, values)?;
    let html = inject_curly_values(html, values);
    Ok(remove_unused_placeholders(&html))
}

/// Replace each `INJECT_TEMPLATE_VALUE` tag with its value, or with nothing
fn inject_tag_values(html: &str, values: &ValueMap) -> Result<String, InjectError> {
    let tags = extract_tags(html, INJECT_VALUE_TAG, false)?;
    if tags.is_empty() {
        return Ok(html.to_string());
    }

    let mut output = String::with_capacity(html.len());
    let mut end_of_last_tag = 0;

    for tag in &tags {
        output.push_str(&html[end_of_last_tag..tag.start_span().start]);

        let value_id = tag.property(VALUE_ID_PROPERTY).ok_or_else(|| {
            InjectError::missing_property(INJECT_VALUE_TAG, VALUE_ID_PROPERTY, tag.outer_span())
        })?;
        match values.get(value_id) {
            Some(value) => output.push_str(value),
            None => trace!("no value declared for {}", value_id),
        }

        end_of_last_tag = tag.end_offset();
    }

    output.push_str(&html[end_of_last_tag..]);
    Ok(output)
}

/// Plain substring replacement of `{{{key}}}`, one key at a time in declaration order
fn inject_curly_values(mut html: String, values: &ValueMap) -> String {
    for (key, value) in values.iter() {
        let placeholder = format!("{}{}{}", CURLY_OPEN, key, CURLY_CLOSE);
        if html.contains(&placeholder) {
            html = html.replace(&placeholder, value);
        }
    }
    html
}

/// Delete every `{{{...}}}` span, whatever it contains
///
/// An opening `{{{` without a later `}}}` is left as is and ends the scan.
pub fn remove_unused_placeholders(html: &str) -> String {
    let mut output = html.to_string();
    let mut position = 0;

    while let Some(open) = output[position..].find(CURLY_OPEN).map(|i| position + i) {
        let Some(close) = output[open..].find(CURLY_CLOSE).map(|i| open + i) else {
            break;
        };
        trace!("removing unused placeholder {}", &output[open..close + CURLY_CLOSE.len()]);
        output.replace_range(open..close + CURLY_CLOSE.len(), "");
        position = open;
    }

    output
}
