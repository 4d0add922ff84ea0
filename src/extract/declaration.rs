//! Declaration model for stub sources
//!
//! The syntax tree is lowered once into a closed set of [`Declaration`]
//! variants; the registry builder then dispatches on them with an exhaustive
//! `match`. Rendering failures are kept as `Err` values on the declaration so
//! the builder decides how to degrade.

use tree_sitter::Node;

use super::render::{docstring, render_annotation, render_default};
use crate::error::RecoverableError;
use crate::parsing::node_text;

/// A rendered field: `None` when not declared, `Some(Err)` when rendering failed
pub type Rendered = Option<Result<String, RecoverableError>>;

/// One declaration found in a stub module or type body
#[derive(Debug, Clone)]
pub enum Declaration {
    Callable(CallableDecl),
    Type(TypeDecl),
    AnnotatedName(AnnotatedNameDecl),
    ReExport(ReExportDecl),
}

impl Declaration {
    /// Simple name bound by this declaration, if it binds exactly one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Callable(c) => Some(&c.name),
            Self::Type(t) => Some(&t.name),
            Self::AnnotatedName(a) => Some(&a.name),
            Self::ReExport(_) => None,
        }
    }
}

/// `def name(params): ...`
#[derive(Debug, Clone)]
pub struct CallableDecl {
    pub name: String,
    pub docstring: Rendered,
    pub params: Vec<DeclaredParam>,
    /// Parameters that could not be classified
    pub rejected: Vec<RecoverableError>,
}

/// How a parameter may be passed, as written in the declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSlot {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Debug, Clone)]
pub struct DeclaredParam {
    pub name: String,
    pub slot: ParamSlot,
    pub annotation: Rendered,
    pub default: Rendered,
}

/// `class Name(Base, ...): body`
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub docstring: Rendered,
    /// Base types written as a plain identifier; other base expressions are dropped
    pub bases: Vec<String>,
    pub body: Vec<Declaration>,
}

/// `name: Annotation` (with or without a value)
#[derive(Debug, Clone)]
pub struct AnnotatedNameDecl {
    pub name: String,
    /// Set when the annotation is a bare identifier
    pub simple_type: Option<String>,
}

/// `from <source> import a as b, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReExportDecl {
    pub source: ReExportSource,
    pub names: Vec<ImportedName>,
    /// `from x import *`
    pub wildcard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReExportSource {
    /// `from a.b import ...`
    Absolute(String),
    /// `from .a import ...` (level 1) or `from .. import ...` (level 2, no module)
    Relative { level: usize, module: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedName {
    pub name: String,
    pub alias: Option<String>,
}

impl ImportedName {
    /// Name the import binds in the importing namespace
    pub fn bound_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

// ============================================================================
// Lowering
// ============================================================================

/// Lower the statements of a `module` or `block` node
pub fn lower_block(block: &Node, source: &str) -> Vec<Declaration> {
    let mut out = Vec::new();
    let mut cursor = block.walk();
    for statement in block.named_children(&mut cursor) {
        lower_statement(&statement, source, &mut out);
    }
    out
}

fn lower_statement(node: &Node, source: &str, out: &mut Vec<Declaration>) {
    match node.kind() {
        "function_definition" => {
            if let Some(callable) = lower_callable(node, source) {
                out.push(Declaration::Callable(callable));
            }
        }
        "class_definition" => {
            if let Some(ty) = lower_type(node, source) {
                out.push(Declaration::Type(ty));
            }
        }
        "decorated_definition" => {
            if let Some(definition) = node.child_by_field_name("definition") {
                lower_statement(&definition, source, out);
            }
        }
        "expression_statement" => {
            if let Some(annotated) = lower_annotated_name(node, source) {
                out.push(Declaration::AnnotatedName(annotated));
            }
        }
        "import_from_statement" => {
            if let Some(re_export) = lower_re_export(node, source) {
                out.push(Declaration::ReExport(re_export));
            }
        }
        // Version guards and fallbacks: every branch contributes declarations
        "if_statement" | "try_statement" | "elif_clause" | "else_clause" | "except_clause"
        | "finally_clause" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "block" => out.extend(lower_block(&child, source)),
                    "elif_clause" | "else_clause" | "except_clause" | "finally_clause" => {
                        lower_statement(&child, source, out)
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

fn lower_callable(node: &Node, source: &str) -> Option<CallableDecl> {
    let name = node_text(&node.child_by_field_name("name")?, source).to_string();
    let docstring = node
        .child_by_field_name("body")
        .and_then(|body| docstring(&body, source));

    let mut params = Vec::new();
    let mut rejected = Vec::new();
    if let Some(parameters) = node.child_by_field_name("parameters") {
        lower_parameters(&parameters, source, &mut params, &mut rejected);
    }

    Some(CallableDecl {
        name,
        docstring,
        params,
        rejected,
    })
}

/// Classify parameters in declaration order.
///
/// Plain parameters before a `/` become positional-only; after a bare `*` or
/// `*args` they become keyword-only.
fn lower_parameters(
    parameters: &Node,
    source: &str,
    params: &mut Vec<DeclaredParam>,
    rejected: &mut Vec<RecoverableError>,
) {
    let mut after_star = false;
    let mut cursor = parameters.walk();

    for node in parameters.named_children(&mut cursor) {
        let plain_slot = if after_star {
            ParamSlot::KeywordOnly
        } else {
            ParamSlot::PositionalOrKeyword
        };

        match node.kind() {
            "comment" => {}
            "positional_separator" => {
                for param in params.iter_mut() {
                    if param.slot == ParamSlot::PositionalOrKeyword {
                        param.slot = ParamSlot::PositionalOnly;
                    }
                }
            }
            "keyword_separator" => after_star = true,
            "identifier" => params.push(DeclaredParam {
                name: node_text(&node, source).to_string(),
                slot: plain_slot,
                annotation: None,
                default: None,
            }),
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                match splat_param(&node, source, None) {
                    Some(param) => {
                        after_star = true;
                        params.push(param);
                    }
                    None => rejected.push(RecoverableError::Parameter {
                        text: node_text(&node, source).to_string(),
                    }),
                }
            }
            "typed_parameter" => {
                let annotation = node
                    .child_by_field_name("type")
                    .map(|ty| render_annotation(&ty, source));
                let Some(inner) = node.named_child(0) else {
                    continue;
                };
                match inner.kind() {
                    "identifier" => params.push(DeclaredParam {
                        name: node_text(&inner, source).to_string(),
                        slot: plain_slot,
                        annotation,
                        default: None,
                    }),
                    "list_splat_pattern" | "dictionary_splat_pattern" => {
                        match splat_param(&inner, source, annotation) {
                            Some(param) => {
                                after_star = true;
                                params.push(param);
                            }
                            None => rejected.push(RecoverableError::Parameter {
                                text: node_text(&node, source).to_string(),
                            }),
                        }
                    }
                    _ => rejected.push(RecoverableError::Parameter {
                        text: node_text(&node, source).to_string(),
                    }),
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let name_node = node.child_by_field_name("name");
                match name_node.filter(|n| n.kind() == "identifier") {
                    Some(name_node) => params.push(DeclaredParam {
                        name: node_text(&name_node, source).to_string(),
                        slot: plain_slot,
                        annotation: node
                            .child_by_field_name("type")
                            .map(|ty| render_annotation(&ty, source)),
                        default: node
                            .child_by_field_name("value")
                            .map(|value| render_default(&value, source)),
                    }),
                    None => rejected.push(RecoverableError::Parameter {
                        text: node_text(&node, source).to_string(),
                    }),
                }
            }
            _ => rejected.push(RecoverableError::Parameter {
                text: node_text(&node, source).to_string(),
            }),
        }
    }
}

fn splat_param(node: &Node, source: &str, annotation: Rendered) -> Option<DeclaredParam> {
    let slot = if node.kind() == "list_splat_pattern" {
        ParamSlot::VarPositional
    } else {
        ParamSlot::VarKeyword
    };
    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find(|child| child.kind() == "identifier")?;
    Some(DeclaredParam {
        name: node_text(&name, source).to_string(),
        slot,
        annotation,
        default: None,
    })
}

fn lower_type(node: &Node, source: &str) -> Option<TypeDecl> {
    let name = node_text(&node.child_by_field_name("name")?, source).to_string();

    let mut bases = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            // keyword arguments such as `metaclass=...` are not bases
            if base.kind() == "identifier" {
                bases.push(node_text(&base, source).to_string());
            }
        }
    }

    let (docstring, body) = match node.child_by_field_name("body") {
        Some(block) => (docstring(&block, source), lower_block(&block, source)),
        None => (None, Vec::new()),
    };

    Some(TypeDecl {
        name,
        docstring,
        bases,
        body,
    })
}

fn lower_annotated_name(statement: &Node, source: &str) -> Option<AnnotatedNameDecl> {
    let assignment = statement.named_child(0)?;
    if assignment.kind() != "assignment" {
        return None;
    }
    let annotation = assignment.child_by_field_name("type")?;
    let target = assignment.child_by_field_name("left")?;
    if target.kind() != "identifier" {
        return None;
    }

    let simple_type = annotation
        .named_child(0)
        .filter(|inner| annotation.named_child_count() == 1 && inner.kind() == "identifier")
        .map(|inner| node_text(&inner, source).to_string());

    Some(AnnotatedNameDecl {
        name: node_text(&target, source).to_string(),
        simple_type,
    })
}

fn lower_re_export(node: &Node, source: &str) -> Option<ReExportDecl> {
    let module_node = node.child_by_field_name("module_name")?;
    let source_ref = match module_node.kind() {
        "relative_import" => {
            let mut level = 0;
            let mut module = None;
            let mut cursor = module_node.walk();
            for child in module_node.named_children(&mut cursor) {
                match child.kind() {
                    "import_prefix" => {
                        level = node_text(&child, source).matches('.').count();
                    }
                    "dotted_name" => module = Some(node_text(&child, source).to_string()),
                    _ => {}
                }
            }
            ReExportSource::Relative { level, module }
        }
        _ => ReExportSource::Absolute(node_text(&module_node, source).to_string()),
    };

    let mut names = Vec::new();
    let mut wildcard = false;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.id() == module_node.id() {
            continue;
        }
        match child.kind() {
            "wildcard_import" => wildcard = true,
            "dotted_name" => names.push(ImportedName {
                name: node_text(&child, source).to_string(),
                alias: None,
            }),
            "aliased_import" => {
                let name = child.child_by_field_name("name");
                let alias = child.child_by_field_name("alias");
                if let Some(name) = name {
                    names.push(ImportedName {
                        name: node_text(&name, source).to_string(),
                        alias: alias.map(|a| node_text(&a, source).to_string()),
                    });
                }
            }
            _ => {}
        }
    }

    Some(ReExportDecl {
        source: source_ref,
        names,
        wildcard,
    })
}
