//! Source name attribute parsing and encoding
//!
//! Every entry in the source tree carries its attributes in its own name, so
//! the tree stays portable and diffable as plain files. This module maps a
//! physical source name to a logical target name plus [`Attributes`] and back.
//!
//! # Attribute Encoding
//!
//! Prefixes are parsed in a fixed order, each at most once:
//!
//! | kind      | grammar                                                      |
//! |-----------|--------------------------------------------------------------|
//! | file      | `[private_][empty_][executable_]` stem `[.tmpl \| .literal]` |
//! | directory | `[private_]` stem                                            |
//! | symlink   | `symlink_` stem `[.tmpl \| .literal]`                        |
//!
//! The stem is `[dot_][literal_]name`:
//!
//! - `dot_` stands for a leading `.` in the target name
//! - `literal_` stops prefix parsing, for target names that start with a
//!   reserved prefix (`literal_private_key` → `private_key`)
//! - `.tmpl` marks a template; `.literal` protects a target name that itself
//!   ends in `.tmpl` or `.literal`
//!
//! # Examples
//!
//! ```
//! use mirra_engine::attr::Attributes;
//! use mirra_engine::entry::EntryKind;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (attrs, name) = Attributes::parse_from_source("private_executable_dot_profile.tmpl", EntryKind::File)?;
//! assert!(attrs.is_private() && attrs.is_executable() && attrs.is_template());
//! assert_eq!(name, ".profile");
//!
//! assert_eq!(attrs.encode_source_name(".profile", EntryKind::File), "private_executable_dot_profile.tmpl");
//! # Ok(())
//! # }
//! ```

use crate::entry::EntryKind;
use crate::error::{Error, Result};
use std::fmt;

const PRIVATE_PREFIX: &str = "private_";
const EMPTY_PREFIX: &str = "empty_";
const EXECUTABLE_PREFIX: &str = "executable_";
const SYMLINK_PREFIX: &str = "symlink_";
const DOT_PREFIX: &str = "dot_";
const LITERAL_PREFIX: &str = "literal_";
const TEMPLATE_SUFFIX: &str = ".tmpl";
const LITERAL_SUFFIX: &str = ".literal";

// Unix permission constants
const DEFAULT_FILE_MODE: u32 = 0o666;
const DEFAULT_DIR_MODE: u32 = 0o777;
const EXECUTE_BITS: u32 = 0o111;
const OWNER_ONLY: u32 = 0o700;

/// Prefixes that cannot start a stem without a `literal_` escape
const FILE_RESERVED: &[&str] = &[
    PRIVATE_PREFIX,
    EMPTY_PREFIX,
    EXECUTABLE_PREFIX,
    SYMLINK_PREFIX,
    DOT_PREFIX,
    LITERAL_PREFIX,
];
const DIR_RESERVED: &[&str] = &[PRIVATE_PREFIX, DOT_PREFIX, LITERAL_PREFIX];
const SYMLINK_RESERVED: &[&str] = &[DOT_PREFIX, LITERAL_PREFIX];

bitflags::bitflags! {
    /// Attributes that can be encoded in a source name
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        /// Should the target have owner-only permissions?
        const PRIVATE = 1 << 0;
        /// Should the target be kept even when its content is empty?
        const EMPTY = 1 << 1;
        /// Should the target be executable?
        const EXECUTABLE = 1 << 2;
        /// Should the source be rendered as a template?
        const TEMPLATE = 1 << 3;
    }
}

impl Attributes {
    /// Create attributes with all flags set to false
    pub fn new() -> Self {
        Self::empty()
    }

    /// Attributes that a given kind of entry can carry
    pub const fn legal_for(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => Self::PRIVATE,
            EntryKind::File => Self::all(),
            EntryKind::Symlink => Self::TEMPLATE,
        }
    }

    /// Check if the target should have restrictive permissions
    #[inline]
    pub fn is_private(&self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Check if an empty target file should be kept rather than removed
    #[inline]
    pub fn keeps_empty(&self) -> bool {
        self.contains(Self::EMPTY)
    }

    /// Check if the target should be executable
    #[inline]
    pub fn is_executable(&self) -> bool {
        self.contains(Self::EXECUTABLE)
    }

    /// Check if the source should be processed as a template
    #[inline]
    pub fn is_template(&self) -> bool {
        self.contains(Self::TEMPLATE)
    }

    /// Set whether the target should have restrictive permissions
    #[inline]
    pub fn set_private(&mut self, value: bool) {
        self.set(Self::PRIVATE, value);
    }

    /// Set whether an empty target file should be kept
    #[inline]
    pub fn set_keeps_empty(&mut self, value: bool) {
        self.set(Self::EMPTY, value);
    }

    /// Set whether the target should be executable
    #[inline]
    pub fn set_executable(&mut self, value: bool) {
        self.set(Self::EXECUTABLE, value);
    }

    /// Set whether the source should be processed as a template
    #[inline]
    pub fn set_template(&mut self, value: bool) {
        self.set(Self::TEMPLATE, value);
    }

    /// Parse attributes from a single source name component
    ///
    /// Returns the parsed attributes and the logical target name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedName`] when the name breaks the grammar for
    /// `kind`: attribute prefixes out of order or repeated, a symlink name
    /// without `symlink_`, a file name starting with `symlink_`, or an empty
    /// target name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirra_engine::attr::Attributes;
    /// use mirra_engine::entry::EntryKind;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let (attrs, name) = Attributes::parse_from_source("private_dot_ssh", EntryKind::Directory)?;
    /// assert!(attrs.is_private());
    /// assert_eq!(name, ".ssh");
    ///
    /// let (attrs, name) = Attributes::parse_from_source("symlink_dot_vimrc.tmpl", EntryKind::Symlink)?;
    /// assert!(attrs.is_template());
    /// assert_eq!(name, ".vimrc");
    ///
    /// assert!(Attributes::parse_from_source("executable_private_foo", EntryKind::File).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse_from_source(source_name: &str, kind: EntryKind) -> Result<(Self, String)> {
        if source_name.is_empty() {
            return Err(Error::malformed(source_name, "empty name"));
        }
        if source_name.contains('/') || source_name.contains(std::path::MAIN_SEPARATOR) {
            return Err(Error::malformed(source_name, "contains a path separator"));
        }

        let mut attrs = Self::new();
        let mut rest = source_name;

        match kind {
            EntryKind::File => {
                if rest.starts_with(SYMLINK_PREFIX) {
                    return Err(Error::malformed(
                        source_name,
                        "regular files cannot start with symlink_",
                    ));
                }
                for (prefix, flag) in [
                    (PRIVATE_PREFIX, Self::PRIVATE),
                    (EMPTY_PREFIX, Self::EMPTY),
                    (EXECUTABLE_PREFIX, Self::EXECUTABLE),
                ] {
                    if let Some(stripped) = rest.strip_prefix(prefix) {
                        attrs.insert(flag);
                        rest = stripped;
                    }
                }
            }
            EntryKind::Directory => {
                if let Some(stripped) = rest.strip_prefix(PRIVATE_PREFIX) {
                    attrs.insert(Self::PRIVATE);
                    rest = stripped;
                }
            }
            EntryKind::Symlink => {
                rest = rest.strip_prefix(SYMLINK_PREFIX).ok_or_else(|| {
                    Error::malformed(source_name, "symlink names must start with symlink_")
                })?;
            }
        }

        let dot = if let Some(stripped) = rest.strip_prefix(DOT_PREFIX) {
            rest = stripped;
            true
        } else {
            false
        };

        if let Some(stripped) = rest.strip_prefix(LITERAL_PREFIX) {
            rest = stripped;
        } else if let Some(prefix) = reserved_prefix(rest, kind) {
            return Err(Error::malformed(
                source_name,
                format!(
                    "unexpected '{prefix}' (attributes must appear once, in order: {})",
                    prefix_order(kind)
                ),
            ));
        }

        if kind != EntryKind::Directory {
            if let Some(stripped) = rest.strip_suffix(LITERAL_SUFFIX) {
                rest = stripped;
            } else if let Some(stripped) = rest.strip_suffix(TEMPLATE_SUFFIX) {
                attrs.insert(Self::TEMPLATE);
                rest = stripped;
            }
        }

        if rest.is_empty() {
            return Err(Error::malformed(source_name, "target name is empty"));
        }

        let target_name = if dot {
            format!(".{rest}")
        } else {
            rest.to_string()
        };

        if target_name == "." || target_name == ".." {
            return Err(Error::malformed(
                source_name,
                format!("'{target_name}' is not a valid target name"),
            ));
        }

        Ok((attrs, target_name))
    }

    /// Encode a logical target name and these attributes as a source name
    ///
    /// Attributes the kind cannot carry are dropped. The result always parses
    /// back to `(target_name, self & legal_for(kind))`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mirra_engine::attr::Attributes;
    /// use mirra_engine::entry::EntryKind;
    ///
    /// let attrs = Attributes::PRIVATE | Attributes::EXECUTABLE;
    /// assert_eq!(attrs.encode_source_name("deploy", EntryKind::File), "private_executable_deploy");
    ///
    /// // Directories only carry `private`
    /// assert_eq!(attrs.encode_source_name(".ssh", EntryKind::Directory), "private_dot_ssh");
    ///
    /// // Names that look like attributes are escaped
    /// assert_eq!(Attributes::new().encode_source_name("empty_trash", EntryKind::File), "literal_empty_trash");
    /// ```
    pub fn encode_source_name(&self, target_name: &str, kind: EntryKind) -> String {
        let attrs = *self & Self::legal_for(kind);
        let mut name = String::with_capacity(target_name.len() + 16);

        match kind {
            EntryKind::File => {
                if attrs.is_private() {
                    name.push_str(PRIVATE_PREFIX);
                }
                if attrs.keeps_empty() {
                    name.push_str(EMPTY_PREFIX);
                }
                if attrs.is_executable() {
                    name.push_str(EXECUTABLE_PREFIX);
                }
            }
            EntryKind::Directory => {
                if attrs.is_private() {
                    name.push_str(PRIVATE_PREFIX);
                }
            }
            EntryKind::Symlink => name.push_str(SYMLINK_PREFIX),
        }

        let rest = if let Some(stripped) = target_name.strip_prefix('.') {
            name.push_str(DOT_PREFIX);
            stripped
        } else {
            target_name
        };

        if reserved_prefix(rest, kind).is_some() {
            name.push_str(LITERAL_PREFIX);
        }
        name.push_str(rest);

        if kind != EntryKind::Directory {
            if attrs.is_template() {
                name.push_str(TEMPLATE_SUFFIX);
            } else if rest.ends_with(TEMPLATE_SUFFIX) || rest.ends_with(LITERAL_SUFFIX) {
                name.push_str(LITERAL_SUFFIX);
            }
        }

        name
    }

    /// Unix permission mode implied by these attributes
    ///
    /// Files start from `0o666` and directories from `0o777`. `executable`
    /// adds the execute bits before `private` masks the result down to the
    /// owner, so a private executable file is `0o700`. Symlinks have no mode.
    ///
    /// ```
    /// use mirra_engine::attr::Attributes;
    /// use mirra_engine::entry::EntryKind;
    ///
    /// let attrs = Attributes::PRIVATE | Attributes::EXECUTABLE;
    /// assert_eq!(attrs.mode(EntryKind::File), Some(0o700));
    /// assert_eq!(Attributes::EXECUTABLE.mode(EntryKind::File), Some(0o777));
    /// assert_eq!(Attributes::PRIVATE.mode(EntryKind::File), Some(0o600));
    /// assert_eq!(attrs.mode(EntryKind::Symlink), None);
    /// ```
    pub fn mode(&self, kind: EntryKind) -> Option<u32> {
        let mut mode = match kind {
            EntryKind::File => DEFAULT_FILE_MODE,
            EntryKind::Directory => DEFAULT_DIR_MODE,
            EntryKind::Symlink => return None,
        };
        if kind == EntryKind::File && self.is_executable() {
            mode |= EXECUTE_BITS;
        }
        if self.is_private() {
            mode &= OWNER_ONLY;
        }
        Some(mode)
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::PRIVATE, "private"),
            (Self::EMPTY, "empty"),
            (Self::EXECUTABLE, "executable"),
            (Self::TEMPLATE, "template"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(","))
        }
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new()
    }
}

fn reserved_prefix(stem: &str, kind: EntryKind) -> Option<&'static str> {
    let reserved = match kind {
        EntryKind::File => FILE_RESERVED,
        EntryKind::Directory => DIR_RESERVED,
        EntryKind::Symlink => SYMLINK_RESERVED,
    };
    reserved.iter().copied().find(|prefix| stem.starts_with(prefix))
}

fn prefix_order(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "private_, empty_, executable_, dot_",
        EntryKind::Directory => "private_, dot_",
        EntryKind::Symlink => "symlink_, dot_",
    }
}
