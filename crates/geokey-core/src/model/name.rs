// crates/geokey-core/src/model/name.rs

use serde::{Deserialize, Serialize};

/// A place name in one language: the current name plus an optional
/// former one. Immutable once parsed; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub name: String,
    pub old_name: Option<String>,
}

impl Name {
    pub fn new(name: impl Into<String>, old_name: Option<&str>) -> Self {
        Self {
            name: name.into(),
            old_name: old_name.map(str::to_string),
        }
    }

    /// Parse one level segment: `"Дніпро (Дніпропетровськ)"` carries the
    /// former name in a trailing parenthesized tail.
    pub fn parse(segment: &str) -> Self {
        let segment = collapse_spaces(segment);
        if let Some(stripped) = segment.strip_suffix(')') {
            if let Some((name, old)) = stripped.rsplit_once(" (") {
                return Self {
                    name: name.to_string(),
                    old_name: Some(old.to_string()),
                };
            }
        }
        Self {
            name: segment,
            old_name: None,
        }
    }

    /// `"name (old_name)"` when a former name exists, else `"name"`.
    pub fn render(&self) -> String {
        match &self.old_name {
            Some(old) => format!("{} ({})", self.name, old),
            None => self.name.clone(),
        }
    }

    /// The sub-names that enter the index: current, then former.
    pub fn sub_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.old_name.as_deref())
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.old_name {
            Some(old) => write!(f, "{} ({})", self.name, old),
            None => f.write_str(&self.name),
        }
    }
}

fn collapse_spaces(s: &str) -> String {
    let mut out = s.trim().to_string();
    while out.contains("  ") {
        out = out.replace("  ", " ");
    }
    out
}
