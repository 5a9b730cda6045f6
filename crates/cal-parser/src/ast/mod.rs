//! Typed AST for C/AL object definitions.
//!
//! The tree is a closed set of owned node types: children are owned
//! exclusively by their parents, there are no cycles, and nothing holds a
//! reference into the source text. Every node carries its `start` and
//! `end` tokens so ranges can be reconstructed without the source.
//!
//! Statements and expressions live in [`expr`]; the CODE-section
//! declaration shapes live in [`code`].

pub mod code;
pub mod expr;

pub use code::{
    CodeSection, DataType, ParameterDecl, ProcedureDecl, TriggerDecl, VariableDecl,
};
pub use expr::{
    BinaryOp, CaseArm, CompoundOp, Expression, ExpressionKind, Statement, StatementKind, UnaryOp,
};

use cal_common::Token;

use crate::indent::IndentNode;

/// Root of every parse. `object` is `None` when no `OBJECT` declaration
/// could be recognized at all; partial objects are still populated.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub object: Option<ObjectDecl>,
    pub start: Token,
    pub end: Token,
}

/// The six recognized object kinds. The kind determines which sections
/// the parser will populate; a section keyword outside its kind is
/// reported and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Table,
    Page,
    Report,
    Codeunit,
    XmlPort,
    Query,
}

impl ObjectKind {
    /// Case-insensitive lookup from the header lexeme.
    pub fn from_str(s: &str) -> Option<ObjectKind> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "table" => Some(ObjectKind::Table),
            "page" => Some(ObjectKind::Page),
            "report" => Some(ObjectKind::Report),
            "codeunit" => Some(ObjectKind::Codeunit),
            "xmlport" => Some(ObjectKind::XmlPort),
            "query" => Some(ObjectKind::Query),
            _ => None,
        }
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            ObjectKind::Table => "Table",
            ObjectKind::Page => "Page",
            ObjectKind::Report => "Report",
            ObjectKind::Codeunit => "Codeunit",
            ObjectKind::XmlPort => "XMLport",
            ObjectKind::Query => "Query",
        }
    }
}

/// A parsed `OBJECT <Kind> <Id> <Name> { ... }` declaration.
///
/// Only the section fields compatible with `kind` are ever populated:
/// FIELDS/KEYS/FIELDGROUPS for tables, CONTROLS/ACTIONS for pages,
/// ELEMENTS for XMLports, PROPERTIES/OBJECT-PROPERTIES/CODE for all.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDecl {
    pub kind: ObjectKind,
    pub id: u32,
    pub name: String,
    pub object_properties: Option<PropertyList>,
    pub properties: Option<PropertyList>,
    pub fields: Option<Vec<FieldDecl>>,
    pub keys: Option<Vec<KeyDecl>>,
    pub field_groups: Option<Vec<FieldGroupDecl>>,
    pub controls: Option<Vec<ControlDecl>>,
    pub actions: Option<Vec<ActionDecl>>,
    pub elements: Option<Vec<ElementDecl>>,
    pub code: Option<CodeSection>,
    pub start: Token,
    pub end: Token,
}

/// An ordered property collection. Properties whose value is an inline
/// trigger body (`OnValidate=BEGIN ... END`) are parsed with the real
/// statement parser and collected in `triggers` instead of `properties`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyList {
    pub properties: Vec<Property>,
    pub triggers: Vec<TriggerDecl>,
    pub start: Token,
    pub end: Token,
}

impl PropertyList {
    /// Look up a property value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_str())
    }
}

/// A single `Name=Value` property. The value is the raw text up to the
/// closing `;` (bracket-aware, so `CaptionML=[ENU=x;ESP=y]` is one value).
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub start: Token,
    pub end: Token,
}

/// A FIELDS-section entry: `{ id ; ; name ; datatype [; properties] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub id: u32,
    pub name: String,
    pub data_type: DataType,
    pub properties: Option<PropertyList>,
    pub start: Token,
    pub end: Token,
}

impl FieldDecl {
    /// Field triggers (`OnValidate`, `OnLookup`, ...) parsed out of the
    /// property tail.
    pub fn triggers(&self) -> &[TriggerDecl] {
        self.properties.as_ref().map_or(&[], |p| p.triggers.as_slice())
    }
}

/// A KEYS-section entry: `{ ; field,field ; properties }`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyDecl {
    pub fields: Vec<String>,
    pub properties: Option<PropertyList>,
    pub start: Token,
    pub end: Token,
}

/// A FIELDGROUPS-section entry: `{ id ; name ; field,field }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGroupDecl {
    pub id: u32,
    pub name: String,
    pub fields: Vec<String>,
    pub start: Token,
    pub end: Token,
}

/// Page control kinds. Unrecognized kinds fall back to `Field` with the
/// original lexeme preserved in `ControlDecl::raw_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Container,
    Group,
    Field,
    Part,
}

impl ControlKind {
    pub fn from_str(s: &str) -> Option<ControlKind> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "container" => Some(ControlKind::Container),
            "group" => Some(ControlKind::Group),
            "field" => Some(ControlKind::Field),
            "part" => Some(ControlKind::Part),
            _ => None,
        }
    }
}

/// A CONTROLS-section entry, positioned in the control forest by its
/// indent level.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDecl {
    pub id: u32,
    pub indent_level: u32,
    pub kind: ControlKind,
    /// Original lexeme when `kind` was not recognized.
    pub raw_kind: Option<String>,
    pub children: Vec<ControlDecl>,
    pub properties: Option<PropertyList>,
    pub start: Token,
    pub end: Token,
}

impl ControlDecl {
    pub fn triggers(&self) -> &[TriggerDecl] {
        self.properties.as_ref().map_or(&[], |p| p.triggers.as_slice())
    }
}

/// Page action kinds. Unrecognized kinds fall back to `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ActionContainer,
    ActionGroup,
    Action,
    Separator,
}

impl ActionKind {
    pub fn from_str(s: &str) -> Option<ActionKind> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "actioncontainer" => Some(ActionKind::ActionContainer),
            "actiongroup" => Some(ActionKind::ActionGroup),
            "action" => Some(ActionKind::Action),
            "separator" => Some(ActionKind::Separator),
            _ => None,
        }
    }
}

/// An ACTIONS-section entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDecl {
    pub id: u32,
    pub indent_level: u32,
    pub kind: ActionKind,
    pub raw_kind: Option<String>,
    pub children: Vec<ActionDecl>,
    pub properties: Option<PropertyList>,
    pub start: Token,
    pub end: Token,
}

impl ActionDecl {
    pub fn triggers(&self) -> &[TriggerDecl] {
        self.properties.as_ref().map_or(&[], |p| p.triggers.as_slice())
    }
}

/// XMLport node types. Unrecognized values fall back to `Element`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementNodeType {
    Element,
    Attribute,
}

impl ElementNodeType {
    pub fn from_str(s: &str) -> Option<ElementNodeType> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "element" => Some(ElementNodeType::Element),
            "attribute" => Some(ElementNodeType::Attribute),
            _ => None,
        }
    }
}

/// XMLport source types. Unrecognized values fall back to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementSourceType {
    Text,
    Table,
    Field,
}

impl ElementSourceType {
    pub fn from_str(s: &str) -> Option<ElementSourceType> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "text" => Some(ElementSourceType::Text),
            "table" => Some(ElementSourceType::Table),
            "field" => Some(ElementSourceType::Field),
            _ => None,
        }
    }
}

/// An XMLport ELEMENTS-section entry:
/// `{ [{guid}] ; indent ; name ; nodetype ; sourcetype [; properties] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDecl {
    pub guid: Option<String>,
    pub indent_level: u32,
    pub name: String,
    pub node_type: ElementNodeType,
    pub raw_node_type: Option<String>,
    pub source_type: ElementSourceType,
    pub raw_source_type: Option<String>,
    pub children: Vec<ElementDecl>,
    pub properties: Option<PropertyList>,
    pub start: Token,
    pub end: Token,
}

impl ElementDecl {
    pub fn triggers(&self) -> &[TriggerDecl] {
        self.properties.as_ref().map_or(&[], |p| p.triggers.as_slice())
    }
}

impl IndentNode for ControlDecl {
    fn indent_level(&self) -> u32 {
        self.indent_level
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl IndentNode for ActionDecl {
    fn indent_level(&self) -> u32 {
        self.indent_level
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}

impl IndentNode for ElementDecl {
    fn indent_level(&self) -> u32 {
        self.indent_level
    }

    fn children_mut(&mut self) -> &mut Vec<Self> {
        &mut self.children
    }
}
