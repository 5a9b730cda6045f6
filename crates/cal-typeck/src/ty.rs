//! Semantic type representation.
//!
//! [`SemanticType`] is the closed set of types the resolver can produce.
//! Every value carries exactly one of the seven tags; walkers match
//! exhaustively. Factory constructors keep call sites terse.

use std::fmt;

use serde::Serialize;

/// A resolved C/AL type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum SemanticType {
    /// Built-in scalar: `Integer`, `Decimal`, `Boolean`, `Date`, `Time`,
    /// `DateTime`, `Char`, `Byte`, `GUID`, `Duration`, `BigInteger`.
    Primitive { name: String },
    /// `Text` or `Code`, optionally length-bounded.
    Text {
        max_length: Option<u32>,
        is_code: bool,
    },
    /// `Record [id]`, possibly temporary.
    Record {
        table_id: Option<u32>,
        table_name: String,
        is_temporary: bool,
    },
    /// `Codeunit [id]`.
    Codeunit {
        codeunit_id: Option<u32>,
        codeunit_name: String,
    },
    /// `Option` with its trimmed, non-empty value list.
    Option { values: Vec<String> },
    /// `ARRAY [...] OF ...`. Element types are not yet sub-resolved; the
    /// element slot holds `Unknown` and `dimensions` stays empty.
    Array {
        element_type: Box<SemanticType>,
        dimensions: Vec<u32>,
    },
    /// Anything the resolver could not place.
    Unknown { reason: String },
}

impl SemanticType {
    pub fn primitive(name: impl Into<String>) -> SemanticType {
        SemanticType::Primitive { name: name.into() }
    }

    /// Shorthand for `Primitive("Integer")`.
    pub fn integer() -> SemanticType {
        SemanticType::primitive("Integer")
    }

    /// Shorthand for `Primitive("Decimal")`.
    pub fn decimal() -> SemanticType {
        SemanticType::primitive("Decimal")
    }

    /// Shorthand for `Primitive("Boolean")`.
    pub fn boolean() -> SemanticType {
        SemanticType::primitive("Boolean")
    }

    pub fn text(max_length: Option<u32>) -> SemanticType {
        SemanticType::Text {
            max_length,
            is_code: false,
        }
    }

    pub fn code(max_length: Option<u32>) -> SemanticType {
        SemanticType::Text {
            max_length,
            is_code: true,
        }
    }

    pub fn record(table_id: Option<u32>, is_temporary: bool) -> SemanticType {
        SemanticType::Record {
            table_id,
            table_name: String::new(),
            is_temporary,
        }
    }

    pub fn codeunit(codeunit_id: Option<u32>) -> SemanticType {
        SemanticType::Codeunit {
            codeunit_id,
            codeunit_name: String::new(),
        }
    }

    pub fn option(values: Vec<String>) -> SemanticType {
        SemanticType::Option { values }
    }

    /// An array with the placeholder element type.
    pub fn array() -> SemanticType {
        SemanticType::Array {
            element_type: Box::new(SemanticType::unknown("Array element type not resolved")),
            dimensions: Vec::new(),
        }
    }

    pub fn unknown(reason: impl Into<String>) -> SemanticType {
        SemanticType::Unknown {
            reason: reason.into(),
        }
    }

    /// The discriminator tag as a string.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SemanticType::Primitive { .. } => "Primitive",
            SemanticType::Text { .. } => "Text",
            SemanticType::Record { .. } => "Record",
            SemanticType::Codeunit { .. } => "Codeunit",
            SemanticType::Option { .. } => "Option",
            SemanticType::Array { .. } => "Array",
            SemanticType::Unknown { .. } => "Unknown",
        }
    }
}

/// Display options for [`type_to_string`].
#[derive(Debug, Clone, Copy)]
pub struct TypeDisplayOptions {
    /// Include temporary markers, object names, and unknown reasons.
    pub verbose: bool,
    /// Option values shown before truncating with `...`.
    pub max_option_values: usize,
}

impl Default for TypeDisplayOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            max_option_values: 3,
        }
    }
}

/// Format a semantic type for hovers and lenses.
pub fn type_to_string(ty: &SemanticType, opts: &TypeDisplayOptions) -> String {
    match ty {
        SemanticType::Primitive { name } => name.clone(),
        SemanticType::Text {
            max_length,
            is_code,
        } => {
            let base = if *is_code { "Code" } else { "Text" };
            match max_length {
                Some(len) => format!("{base}[{len}]"),
                None => base.to_string(),
            }
        }
        SemanticType::Record {
            table_id,
            table_name,
            is_temporary,
        } => {
            let mut out = String::from("Record");
            if let Some(id) = table_id {
                out.push_str(&format!(" {id}"));
            }
            if opts.verbose {
                if !table_name.is_empty() {
                    out.push_str(&format!(" \"{table_name}\""));
                }
                if *is_temporary {
                    out.push_str(" TEMPORARY");
                }
            }
            out
        }
        SemanticType::Codeunit {
            codeunit_id,
            codeunit_name,
        } => {
            let mut out = String::from("Codeunit");
            if let Some(id) = codeunit_id {
                out.push_str(&format!(" {id}"));
            }
            if opts.verbose && !codeunit_name.is_empty() {
                out.push_str(&format!(" \"{codeunit_name}\""));
            }
            out
        }
        SemanticType::Option { values } => {
            if values.is_empty() {
                return String::from("Option");
            }
            let shown = values.len().min(opts.max_option_values.max(1));
            let mut list = values[..shown].join(",");
            if shown < values.len() {
                list.push_str(",...");
            }
            format!("Option [{list}]")
        }
        SemanticType::Array {
            element_type,
            dimensions,
        } => {
            let elem = type_to_string(element_type, opts);
            if dimensions.is_empty() {
                format!("Array of {elem}")
            } else {
                let dims = dimensions
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("Array[{dims}] of {elem}")
            }
        }
        SemanticType::Unknown { reason } => {
            if opts.verbose {
                format!("Unknown ({reason})")
            } else {
                String::from("Unknown")
            }
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_to_string(self, &TypeDisplayOptions::default()))
    }
}
