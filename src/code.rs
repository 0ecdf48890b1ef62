//! Code builder
//!
//! The accumulators rules write into. A [`Fragment`] is the value threaded
//! through the fragment-tier fold; a [`SourceFile`] is the mutable builder the
//! file tier shares between rules and finally writes to disk.

use crate::engine::paths;
use crate::error::GenError;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Ordered code items plus named build-context slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    items: Vec<String>,
    bindings: BTreeMap<String, String>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty fragment that can read the slots bound in `other`
    pub fn inheriting(other: &Fragment) -> Self {
        Self {
            items: Vec::new(),
            bindings: other.bindings.clone(),
        }
    }

    pub fn push(mut self, item: impl Into<String>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn extend<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    /// Append the items of another fragment, keeping this fragment's slots
    pub fn append(mut self, other: Fragment) -> Self {
        self.items.extend(other.items);
        self
    }

    /// Bind a named slot for rules later in the same fold
    pub fn bind(mut self, slot: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(slot.into(), value.into());
        self
    }

    pub fn binding(&self, slot: &str) -> Result<&str, GenError> {
        self.bindings
            .get(slot)
            .map(String::as_str)
            .ok_or_else(|| GenError::UnboundSlot {
                slot: slot.to_string(),
            })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render each item on its own line with `indent` spaces and `terminator`
    /// appended (`";"` for trait methods, `","` for struct fields).
    pub fn render(&self, indent: usize, terminator: &str) -> String {
        let pad = " ".repeat(indent);
        self.items
            .iter()
            .map(|item| indent_block(item, &pad) + terminator)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub(crate) fn indent_block(block: &str, pad: &str) -> String {
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    module: String,
    header: Option<String>,
    imports: BTreeSet<String>,
    items: Vec<String>,
}

impl SourceFile {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            header: None,
            imports: BTreeSet::new(),
            items: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.header = Some(header.into());
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn import(&mut self, path: impl Into<String>) -> &mut Self {
        self.imports.insert(path.into());
        self
    }

    pub fn add(&mut self, item: impl Into<String>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(header) = &self.header {
            out.push_str(header);
            out.push('\n');
        }
        out.push_str(&format!("// module: {}\n", self.module));
        if !self.imports.is_empty() {
            out.push('\n');
            for import in &self.imports {
                out.push_str(&format!("use {import};\n"));
            }
        }
        for item in &self.items {
            out.push('\n');
            out.push_str(item);
            out.push('\n');
        }
        out
    }

    /// Truncate and rewrite `path` with the rendered file
    pub fn write_to(&self, path: &Path) -> Result<(), GenError> {
        paths::write_file(path, &self.render())
    }
}
