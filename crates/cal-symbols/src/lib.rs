//! Symbol and reference harvesting for C/AL documents.
//!
//! [`harvest`] walks a parsed [`Document`] once and produces a
//! [`SymbolTable`]: declaration entries (procedures, parameters, global
//! and local variables, object triggers, fields) with source ranges, plus
//! per-declaration reference counts. References are textual: every
//! case-insensitive name occurrence inside procedure bodies, trigger
//! bodies, the object-level body, and property-trigger bodies counts,
//! resolved shadowing-aware (a local absorbs occurrences of its name
//! inside its own procedure). Declaration sites live outside bodies and
//! never self-count; recursive calls inside bodies count normally.

mod walk;

use cal_common::Token;
use cal_parser::ast::{
    ActionDecl, ControlDecl, Document, ElementDecl, PropertyList, TriggerDecl, VariableDecl,
};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// What kind of thing a declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SymbolKind {
    Procedure,
    Parameter,
    GlobalVariable,
    LocalVariable,
    Trigger,
    Field,
}

/// A 1-based source range, derived from the declaration's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceRange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl SourceRange {
    fn from_tokens(start: &Token, end: &Token) -> Self {
        Self {
            start_line: start.line,
            start_column: start.column,
            end_line: end.line,
            end_column: end.column + end.text.chars().count() as u32,
        }
    }
}

/// One harvested declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: SymbolKind,
    pub range: SourceRange,
    /// Enclosing procedure or trigger name for parameters and locals;
    /// `None` for object-scoped declarations.
    pub scope: Option<String>,
    /// Textual reference count within the declaration's visibility.
    pub references: usize,
}

/// The harvested symbol table for one document.
#[derive(Debug, Default)]
pub struct SymbolTable {
    declarations: Vec<Declaration>,
    /// Lowercased name -> declaration indices, in insertion order.
    by_name: FxHashMap<String, Vec<usize>>,
}

impl SymbolTable {
    /// All declarations, in harvest order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Find a declaration by case-insensitive name. With a scope, locals
    /// and parameters of that scope shadow object-scoped declarations.
    pub fn find_declaration(&self, name: &str, scope: Option<&str>) -> Option<&Declaration> {
        let indices = self.by_name.get(&name.to_ascii_lowercase())?;
        if let Some(scope) = scope {
            if let Some(&index) = indices.iter().find(|&&i| {
                self.declarations[i]
                    .scope
                    .as_deref()
                    .is_some_and(|s| s.eq_ignore_ascii_case(scope))
            }) {
                return Some(&self.declarations[index]);
            }
        }
        indices
            .iter()
            .find(|&&i| self.declarations[i].scope.is_none())
            .map(|&i| &self.declarations[i])
    }

    /// Reference count for a harvested declaration.
    pub fn count_references(&self, declaration: &Declaration) -> usize {
        declaration.references
    }

    fn push(&mut self, name: String, kind: SymbolKind, range: SourceRange, scope: Option<String>) {
        let index = self.declarations.len();
        self.by_name
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(index);
        self.declarations.push(Declaration {
            name,
            kind,
            range,
            scope,
            references: 0,
        });
    }

    /// Resolve one occurrence to a declaration index. Shadow names are
    /// the parameter/local names of the enclosing body; an occurrence
    /// they capture resolves inside `scope` only (or is absorbed when the
    /// body's locals were not harvested, as in property triggers).
    fn resolve(&self, name: &str, scope: Option<&str>, shadow_names: &[String]) -> Option<usize> {
        let key = name.to_ascii_lowercase();
        let shadowed = shadow_names.iter().any(|s| s.eq_ignore_ascii_case(name));
        let indices = self.by_name.get(&key)?;
        if shadowed {
            let scope = scope?;
            return indices
                .iter()
                .copied()
                .find(|&i| {
                    self.declarations[i]
                        .scope
                        .as_deref()
                        .is_some_and(|s| s.eq_ignore_ascii_case(scope))
                });
        }
        // Object scope, by priority: variables, fields, procedures,
        // triggers.
        indices
            .iter()
            .copied()
            .filter(|&i| self.declarations[i].scope.is_none())
            .min_by_key(|&i| match self.declarations[i].kind {
                SymbolKind::GlobalVariable => 0u8,
                SymbolKind::Field => 1,
                SymbolKind::Procedure => 2,
                SymbolKind::Trigger => 3,
                _ => 4,
            })
    }

    fn count_body(
        &mut self,
        scope: Option<&str>,
        locals: &[VariableDecl],
        params: &[String],
        statements: &[cal_parser::ast::Statement],
    ) {
        let mut shadow_names: Vec<String> = params.to_vec();
        shadow_names.extend(locals.iter().map(|v| v.name.clone()));
        let mut names = Vec::new();
        walk::names_in_statements(statements, &mut names);
        for name in names {
            if let Some(index) = self.resolve(&name, scope, &shadow_names) {
                self.declarations[index].references += 1;
            }
        }
    }
}

/// The code-lens label for a reference count: `"0 references"`,
/// `"1 reference"`, `"N references"`.
pub fn reference_label(count: usize) -> String {
    if count == 1 {
        String::from("1 reference")
    } else {
        format!("{count} references")
    }
}

/// Harvest declarations and reference counts from a parsed document.
/// Partial ASTs are fine; missing sections contribute nothing.
pub fn harvest(document: &Document) -> SymbolTable {
    let mut table = SymbolTable::default();
    let Some(object) = &document.object else {
        return table;
    };

    // ── Declarations ───────────────────────────────────────────────────
    if let Some(fields) = &object.fields {
        for field in fields {
            table.push(
                field.name.clone(),
                SymbolKind::Field,
                SourceRange::from_tokens(&field.start, &field.end),
                None,
            );
        }
    }
    if let Some(code) = &object.code {
        for variable in &code.variables {
            table.push(
                variable.name.clone(),
                SymbolKind::GlobalVariable,
                SourceRange::from_tokens(&variable.start, &variable.end),
                None,
            );
        }
        for procedure in &code.procedures {
            table.push(
                procedure.name.clone(),
                SymbolKind::Procedure,
                SourceRange::from_tokens(&procedure.start, &procedure.end),
                None,
            );
            for parameter in &procedure.parameters {
                table.push(
                    parameter.name.clone(),
                    SymbolKind::Parameter,
                    SourceRange::from_tokens(&parameter.start, &parameter.end),
                    Some(procedure.name.clone()),
                );
            }
            for variable in &procedure.variables {
                table.push(
                    variable.name.clone(),
                    SymbolKind::LocalVariable,
                    SourceRange::from_tokens(&variable.start, &variable.end),
                    Some(procedure.name.clone()),
                );
            }
        }
        for trigger in &code.triggers {
            table.push(
                trigger.name.clone(),
                SymbolKind::Trigger,
                SourceRange::from_tokens(&trigger.start, &trigger.end),
                None,
            );
            for variable in &trigger.variables {
                table.push(
                    variable.name.clone(),
                    SymbolKind::LocalVariable,
                    SourceRange::from_tokens(&variable.start, &variable.end),
                    Some(trigger.name.clone()),
                );
            }
        }
    }

    // ── References ─────────────────────────────────────────────────────
    if let Some(code) = &object.code {
        for procedure in &code.procedures {
            let params: Vec<String> = procedure
                .parameters
                .iter()
                .map(|p| p.name.clone())
                .collect();
            table.count_body(
                Some(procedure.name.as_str()),
                &procedure.variables,
                &params,
                &procedure.body,
            );
        }
        for trigger in &code.triggers {
            table.count_body(
                Some(trigger.name.as_str()),
                &trigger.variables,
                &[],
                &trigger.body,
            );
        }
        if let Some(body) = &code.body {
            table.count_body(None, &[], &[], body);
        }
    }
    count_property_triggers(&mut table, object.properties.as_ref());
    count_property_triggers(&mut table, object.object_properties.as_ref());
    if let Some(fields) = &object.fields {
        for field in fields {
            count_property_triggers(&mut table, field.properties.as_ref());
        }
    }
    if let Some(keys) = &object.keys {
        for key in keys {
            count_property_triggers(&mut table, key.properties.as_ref());
        }
    }
    if let Some(controls) = &object.controls {
        for control in controls {
            count_control_triggers(&mut table, control);
        }
    }
    if let Some(actions) = &object.actions {
        for action in actions {
            count_action_triggers(&mut table, action);
        }
    }
    if let Some(elements) = &object.elements {
        for element in elements {
            count_element_triggers(&mut table, element);
        }
    }

    table
}

/// Property-trigger bodies count against object scope; the trigger's own
/// locals shadow without being harvested as declarations.
fn count_property_triggers(table: &mut SymbolTable, properties: Option<&PropertyList>) {
    let Some(properties) = properties else {
        return;
    };
    for trigger in &properties.triggers {
        count_inline_trigger(table, trigger);
    }
}

fn count_inline_trigger(table: &mut SymbolTable, trigger: &TriggerDecl) {
    table.count_body(None, &trigger.variables, &[], &trigger.body);
}

fn count_control_triggers(table: &mut SymbolTable, control: &ControlDecl) {
    count_property_triggers(table, control.properties.as_ref());
    for child in &control.children {
        count_control_triggers(table, child);
    }
}

fn count_action_triggers(table: &mut SymbolTable, action: &ActionDecl) {
    count_property_triggers(table, action.properties.as_ref());
    for child in &action.children {
        count_action_triggers(table, child);
    }
}

fn count_element_triggers(table: &mut SymbolTable, element: &ElementDecl) {
    count_property_triggers(table, element.properties.as_ref());
    for child in &element.children {
        count_element_triggers(table, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_label_pluralizes() {
        assert_eq!(reference_label(0), "0 references");
        assert_eq!(reference_label(1), "1 reference");
        assert_eq!(reference_label(2), "2 references");
        assert_eq!(reference_label(17), "17 references");
    }

    #[test]
    fn empty_document_harvests_nothing() {
        let result = cal_parser::parse("");
        let table = harvest(&result.document);
        assert!(table.is_empty());
    }
}
