//! Ordered set of metric names selected for timeline display.
//!
//! The set round-trips through a single query parameter. Encoding (treated as
//! a versioned contract): names joined with `,`, with `%` escaped as `%25`
//! and `,` escaped as `%2C` inside a name. Order is display order and is
//! preserved exactly; duplicates are dropped keeping the first occurrence;
//! empty segments are dropped.

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MetricTimelines {
    names: Vec<String>,
}

impl MetricTimelines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut timelines = Self::new();
        for name in names {
            let name = name.into();
            if !name.is_empty() && !timelines.contains(&name) {
                timelines.names.push(name);
            }
        }
        timelines
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|existing| existing == name)
    }

    /// Removes `name` if present, otherwise appends it at the end.
    pub fn toggle(&self, name: &str) -> Self {
        if self.contains(name) {
            self.remove(name)
        } else {
            let mut names = self.names.clone();
            names.push(name.to_string());
            Self { names }
        }
    }

    /// Removes `name` if present; a no-op otherwise.
    pub fn remove(&self, name: &str) -> Self {
        Self {
            names: self
                .names
                .iter()
                .filter(|existing| existing.as_str() != name)
                .cloned()
                .collect(),
        }
    }

    pub fn to_query_param(&self) -> String {
        self.names
            .iter()
            .map(|name| escape_name(name))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn from_query_param(param: &str) -> Self {
        if param.is_empty() {
            return Self::new();
        }

        Self::from_names(param.split(',').map(unescape_name))
    }
}

fn escape_name(name: &str) -> String {
    name.replace('%', "%25").replace(',', "%2C")
}

fn unescape_name(escaped: &str) -> String {
    // `%2C` before `%25`: escaping leaves no raw `%` outside those two
    // sequences, so neither replacement can match across a boundary.
    escaped.replace("%2C", ",").replace("%25", "%")
}
