//! CODE-section declaration nodes: variables, procedures, triggers, and
//! syntactic data types.

use cal_common::Token;

use super::expr::Statement;

/// The CODE section of an object: global variables, procedures, object
/// triggers, and the optional object-level `BEGIN ... END.` body.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSection {
    pub variables: Vec<VariableDecl>,
    pub procedures: Vec<ProcedureDecl>,
    pub triggers: Vec<TriggerDecl>,
    pub body: Option<Vec<Statement>>,
    pub start: Token,
    pub end: Token,
}

/// A variable declaration: `Name[@n] : [TEMPORARY] Type [SECURITYFILTERING(...)] ;`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub name: String,
    pub data_type: DataType,
    pub is_temporary: bool,
    pub security_filtering: Option<String>,
    /// Array dimensions, mirrored from `data_type.dimensions`.
    pub dimensions: Option<Vec<u32>>,
    pub start: Token,
    pub end: Token,
}

/// A `PROCEDURE` or `LOCAL PROCEDURE` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureDecl {
    pub name: String,
    pub is_local: bool,
    /// `[Bracketed]` attribute lines preceding the declaration, inner text.
    pub attributes: Vec<String>,
    pub parameters: Vec<ParameterDecl>,
    pub return_type: Option<DataType>,
    pub variables: Vec<VariableDecl>,
    pub body: Vec<Statement>,
    pub start: Token,
    pub end: Token,
}

/// A procedure parameter. `by_ref` is the leading `VAR` marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDecl {
    pub by_ref: bool,
    pub name: String,
    pub data_type: DataType,
    pub start: Token,
    pub end: Token,
}

/// A trigger: either an object-level `TRIGGER Name@n();` declaration in
/// CODE or a property-position trigger body (`OnValidate=BEGIN ... END`),
/// in which case `name` is the property name.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerDecl {
    pub name: String,
    pub variables: Vec<VariableDecl>,
    pub body: Vec<Statement>,
    pub start: Token,
    pub end: Token,
}

/// A syntactic data type as written in source. `type_name` holds the raw
/// lexeme text (`"Text50"`, `"Record 2000000001"`, `"ARRAY [10] OF
/// Integer"`); the structured components are set only when the lexeme
/// carries them (`Text[50]` sets `length`, `Record 18` sets `table_id`).
/// Compound names like `Text50` are decomposed by the semantic resolver,
/// not here.
#[derive(Debug, Clone, PartialEq)]
pub struct DataType {
    pub type_name: String,
    pub length: Option<u32>,
    pub table_id: Option<u32>,
    pub option_string: Option<String>,
    pub dimensions: Option<Vec<u32>>,
    pub start: Token,
    pub end: Token,
}
