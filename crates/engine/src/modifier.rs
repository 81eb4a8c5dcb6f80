//! Attribute modifier expressions
//!
//! A modifier expression describes a partial attribute change, such as
//! `+private,-t` ("make private, stop templating, leave the rest alone").
//!
//! Tokens are comma separated and trimmed; empty tokens are skipped. Each
//! token is an attribute name or alias with an optional `+` (set, the
//! default) or `-` (clear) prefix:
//!
//! | attribute    | alias |
//! |--------------|-------|
//! | `empty`      | `e`   |
//! | `executable` | `x`   |
//! | `private`    | `p`   |
//! | `template`   | `t`   |
//!
//! ```
//! use mirra_engine::attr::Attributes;
//! use mirra_engine::modifier::ModifierSet;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let modifiers: ModifierSet = "+private, -t".parse()?;
//! let attrs = modifiers.apply(Attributes::TEMPLATE | Attributes::EXECUTABLE);
//! assert_eq!(attrs, Attributes::PRIVATE | Attributes::EXECUTABLE);
//! # Ok(())
//! # }
//! ```

use crate::attr::Attributes;
use crate::error::{Error, Result};
use std::str::FromStr;

/// What to do with a single attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modifier {
    /// Keep the current value
    #[default]
    Unchanged,
    /// Force the attribute on
    Set,
    /// Force the attribute off
    Clear,
}

impl Modifier {
    /// Apply this modifier to a current value
    #[inline]
    pub fn modify(self, current: bool) -> bool {
        match self {
            Modifier::Unchanged => current,
            Modifier::Set => true,
            Modifier::Clear => false,
        }
    }
}

/// One modifier per attribute, parsed from a modifier expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModifierSet {
    /// Modifier for `empty`
    pub empty: Modifier,
    /// Modifier for `executable`
    pub executable: Modifier,
    /// Modifier for `private`
    pub private: Modifier,
    /// Modifier for `template`
    pub template: Modifier,
}

impl ModifierSet {
    /// Parse a modifier expression
    ///
    /// Fails on the first unknown attribute; nothing is returned for the
    /// tokens before it.
    pub fn parse(expression: &str) -> Result<Self> {
        let mut modifiers = Self::default();

        for token in expression.split(',').map(str::trim) {
            if token.is_empty() {
                continue;
            }

            let (modifier, attribute) = if let Some(attribute) = token.strip_prefix('-') {
                (Modifier::Clear, attribute)
            } else if let Some(attribute) = token.strip_prefix('+') {
                (Modifier::Set, attribute)
            } else {
                (Modifier::Set, token)
            };

            let slot = match attribute {
                "empty" | "e" => &mut modifiers.empty,
                "executable" | "x" => &mut modifiers.executable,
                "private" | "p" => &mut modifiers.private,
                "template" | "t" => &mut modifiers.template,
                _ => {
                    return Err(Error::UnknownAttribute {
                        attribute: attribute.to_string(),
                    });
                }
            };
            *slot = modifier;
        }

        Ok(modifiers)
    }

    /// Apply the modifiers to a set of attributes
    ///
    /// Each attribute is modified independently of the others.
    pub fn apply(&self, attrs: Attributes) -> Attributes {
        let mut result = attrs;
        result.set_keeps_empty(self.empty.modify(attrs.keeps_empty()));
        result.set_executable(self.executable.modify(attrs.is_executable()));
        result.set_private(self.private.modify(attrs.is_private()));
        result.set_template(self.template.modify(attrs.is_template()));
        result
    }
}

impl FromStr for ModifierSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
