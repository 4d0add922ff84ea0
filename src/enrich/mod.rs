//! Runtime doc enrichment
//!
//! Fills documentation and call shapes the static pass could not provide by
//! asking a [`LiveEnvironment`]. Every lookup is best-effort: a module that
//! cannot be imported passes through unchanged, and a failed lookup leaves the
//! entry as it was.
//!
//! Signature backfill tries, in order, stopping at the first success:
//! 1. structured signature introspection, giving a full [`Signature`]
//! 2. the legacy argument spec with receiver detection, giving a [`Signature`]
//!    whose receiver is marked rather than removed
//! 3. the same argument spec without receiver detection (flat `params`)
//! 4. parameter names parsed from the rendered help page

pub mod live;
pub mod python;
pub mod textual;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{LiveError, StubscanError};
use crate::extract::signature::align_defaults;
use crate::schema::{
    registry_from_document, to_json_value, Entry, ParamHint, Parameter, Registry,
    RegistryDocument, Signature, VarParameter,
};

pub use live::{ArgSpec, LiveEnvironment, LiveParamKind, LiveParameter, SymbolInfo, SymbolKind};
pub use python::PythonProcess;

/// Module the top-level namespace is imported as
pub const TOP_LEVEL_MODULE: &str = "builtins";

/// Symbols whose inferred parameter list is discarded rather than recorded.
///
/// `print` documents a mandatory argument but is routinely called without one.
pub const DISCARDED_PARAM_LISTS: &[(&str, &str)] = &[("", "print"), ("builtins", "print")];

/// Docs that open with a call line such as `sleep(ms)`
static LEADING_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+\(").expect("Invalid leading call regex"));

/// Which fallback produced an entry's call shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeSource {
    Signature,
    ArgSpec,
    FlatArgSpec,
    HelpText,
}

/// An entry for which every signature fallback failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub module: String,
    pub symbol: String,
    /// One line per fallback, in the order they were tried
    pub failures: Vec<String>,
}

/// Counters for one enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    pub modules_resolved: usize,
    pub modules_skipped: usize,
    pub docs_filled: usize,
    pub shapes_filled: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Enrich every module of `registry` in place
pub fn enrich_registry<E: LiveEnvironment + ?Sized>(
    env: &mut E,
    registry: &mut Registry,
) -> EnrichReport {
    let mut report = EnrichReport::default();

    for (module, entries) in registry.iter_mut() {
        let live_module = live_module_name(module);
        if let Err(e) = env.import_module(live_module) {
            tracing::debug!("Passing `{}` through unchanged: {}", module, e);
            report.modules_skipped += 1;
            continue;
        }
        report.modules_resolved += 1;

        for entry in entries.iter_mut() {
            if backfill_documentation(env, live_module, entry) {
                report.docs_filled += 1;
            }
            match backfill_call_shape(env, module, entry) {
                Ok(Some(source)) => {
                    tracing::debug!("{}.{}: call shape from {:?}", module, entry.ac_result, source);
                    report.shapes_filled += 1;
                }
                Ok(None) => {}
                Err(failures) => {
                    tracing::debug!(
                        "{}.{}: no call shape ({})",
                        module,
                        entry.ac_result,
                        failures.join("; ")
                    );
                    report.diagnostics.push(Diagnostic {
                        module: module.clone(),
                        symbol: entry.ac_result.clone(),
                        failures,
                    });
                }
            }
        }
    }

    tracing::info!(
        "Enriched {} modules ({} skipped): {} docs, {} call shapes, {} unresolved",
        report.modules_resolved,
        report.modules_skipped,
        report.docs_filled,
        report.shapes_filled,
        report.diagnostics.len()
    );
    report
}

/// Enrich a raw registry document in place.
///
/// Only the fields enrichment filled are written back. Every other value,
/// including fields of entries left alone, keeps its exact input form.
pub fn enrich_document<E: LiveEnvironment + ?Sized>(
    env: &mut E,
    document: &mut RegistryDocument,
    context: &str,
) -> Result<EnrichReport, StubscanError> {
    let original = registry_from_document(document, context)?;
    let mut registry = original.clone();
    let report = enrich_registry(env, &mut registry);

    for (module, entries) in &registry {
        let (Some(values), Some(before)) = (document.get_mut(module), original.get(module)) else {
            continue;
        };
        for ((value, before), after) in values.iter_mut().zip(before).zip(entries) {
            write_back(value, before, after)?;
        }
    }
    Ok(report)
}

fn write_back(value: &mut Value, before: &Entry, after: &Entry) -> Result<(), StubscanError> {
    let Value::Object(fields) = value else {
        return Ok(());
    };
    if after.documentation != before.documentation {
        fields.insert(
            "documentation".to_string(),
            Value::String(after.documentation.clone()),
        );
    }
    if after.signature != before.signature {
        if let Some(signature) = &after.signature {
            fields.insert("signature".to_string(), to_json_value(signature)?);
        }
    }
    if after.params != before.params {
        if let Some(params) = &after.params {
            fields.insert("params".to_string(), to_json_value(params)?);
        }
    }
    Ok(())
}

/// Importable name of a registry module path
pub fn live_module_name(module: &str) -> &str {
    if module.is_empty() {
        TOP_LEVEL_MODULE
    } else {
        module
    }
}

/// Fill empty documentation. Returns whether the entry changed.
fn backfill_documentation<E: LiveEnvironment + ?Sized>(
    env: &mut E,
    live_module: &str,
    entry: &mut Entry,
) -> bool {
    if !entry.documentation.is_empty() {
        return false;
    }
    match env.documentation(live_module, &entry.ac_result) {
        Ok(doc) => {
            let doc = tidy_documentation(&doc);
            if doc.is_empty() {
                return false;
            }
            entry.documentation = doc;
            true
        }
        Err(e) => {
            tracing::trace!("{}: {}", entry.ac_result, e);
            false
        }
    }
}

/// Drop a leading call-line block and normalize line endings
pub fn tidy_documentation(doc: &str) -> String {
    let doc = doc.replace("\r\n", "\n").replace('\r', "\n");
    let body = if LEADING_CALL.is_match(&doc) {
        match doc.find("\n\n") {
            Some(blank) if blank > 0 => &doc[blank..],
            _ => doc.as_str(),
        }
    } else {
        doc.as_str()
    };
    body.trim().to_string()
}

/// Whether `symbol` in registry module `module` is in [`DISCARDED_PARAM_LISTS`]
pub fn discards_param_list(module: &str, symbol: &str) -> bool {
    DISCARDED_PARAM_LISTS
        .iter()
        .any(|(m, s)| *m == module && *s == symbol)
}

/// Run the signature fallbacks for one entry.
///
/// `Ok(None)` means nothing was attempted (not a function, or a call shape is
/// already present) or the entry is exempt. `Err` lists why each fallback failed.
fn backfill_call_shape<E: LiveEnvironment + ?Sized>(
    env: &mut E,
    module: &str,
    entry: &mut Entry,
) -> Result<Option<ShapeSource>, Vec<String>> {
    if !entry.is_function() || entry.has_call_shape() {
        return Ok(None);
    }
    let live_module = live_module_name(module);
    let path = entry.ac_result.clone();
    let mut failures = Vec::new();

    match env.signature(live_module, &path) {
        Ok(params) => {
            entry.signature = Some(signature_from_live(&params));
            return Ok(Some(ShapeSource::Signature));
        }
        Err(e) => failures.push(format!("signature: {}", e)),
    }

    let argspec = env.argspec(live_module, &path);
    if let Ok(spec) = &argspec {
        match needs_receiver(env, live_module, entry) {
            Ok(receiver) => {
                entry.signature = Some(signature_from_argspec(spec, receiver));
                return Ok(Some(ShapeSource::ArgSpec));
            }
            Err(e) => failures.push(format!("receiver detection: {}", e)),
        }
    }

    if discards_param_list(module, &path) {
        tracing::debug!("{}: inferred parameter list discarded", path);
        entry.params = None;
        return Ok(None);
    }

    match argspec {
        Ok(spec) => {
            entry.params = Some(params_from_argspec(&spec));
            return Ok(Some(ShapeSource::FlatArgSpec));
        }
        Err(e) => failures.push(format!("argspec: {}", e)),
    }

    let help = match env.render_doc(live_module, &path) {
        Ok(help) => help,
        Err(e) => {
            failures.push(format!("help text: {}", e));
            return Err(failures);
        }
    };
    let leaf = path.rsplit('.').next().unwrap_or(&path);
    match textual::parse_arguments(&help, leaf) {
        Some(names) if !names.is_empty() => {
            entry.params = Some(names.into_iter().map(ParamHint::named).collect());
            Ok(Some(ShapeSource::HelpText))
        }
        Some(_) => {
            failures.push("help text: call line lists no parameters".to_string());
            Err(failures)
        }
        None => {
            failures.push("help text: no call line".to_string());
            Err(failures)
        }
    }
}

/// Convert structured introspection into a [`Signature`]
pub fn signature_from_live(params: &[LiveParameter]) -> Signature {
    let mut signature = Signature::default();
    for param in params {
        let rendered = Parameter {
            name: param.name.clone(),
            default_value: param.default.clone(),
            arg_type: param.annotation.clone(),
        };
        match param.kind {
            LiveParamKind::PositionalOnly => signature.positional_only_args.push(rendered),
            LiveParamKind::PositionalOrKeyword => {
                signature.positional_or_keyword_args.push(rendered)
            }
            LiveParamKind::KeywordOnly => signature.keyword_only_args.push(rendered),
            LiveParamKind::VarPositional => {
                signature.var_args = Some(VarParameter {
                    name: param.name.clone(),
                    arg_type: param.annotation.clone(),
                })
            }
            LiveParamKind::VarKeyword => {
                signature.var_kwargs = Some(VarParameter {
                    name: param.name.clone(),
                    arg_type: param.annotation.clone(),
                })
            }
        }
    }
    let first_is_receiver = signature
        .positional()
        .next()
        .is_some_and(Parameter::is_receiver);
    signature.first_param_is_self_or_cls = first_is_receiver;
    signature.hoist_receiver();
    signature
}

/// Convert an argument spec into a [`Signature`].
///
/// When `receiver` is set the first positional parameter is flagged as the
/// receiver and kept.
pub fn signature_from_argspec(spec: &ArgSpec, receiver: bool) -> Signature {
    let annotated = |name: &String| spec.annotations.get(name).cloned();
    let defaults = align_defaults(spec.args.len(), &spec.defaults);

    let mut signature = Signature::default();
    signature.positional_or_keyword_args = spec
        .args
        .iter()
        .zip(defaults)
        .map(|(name, default_value)| Parameter {
            name: name.clone(),
            default_value,
            arg_type: annotated(name),
        })
        .collect();
    signature.var_args = spec.varargs.as_ref().map(|name| VarParameter {
        name: name.clone(),
        arg_type: annotated(name),
    });
    signature.keyword_only_args = spec
        .kwonlyargs
        .iter()
        .map(|name| Parameter {
            name: name.clone(),
            default_value: spec.kwonlydefaults.get(name).cloned(),
            arg_type: annotated(name),
        })
        .collect();
    signature.var_kwargs = spec.varkw.as_ref().map(|name| VarParameter {
        name: name.clone(),
        arg_type: annotated(name),
    });

    signature.first_param_is_self_or_cls =
        receiver && !signature.positional_or_keyword_args.is_empty();
    if signature.first_param_is_self_or_cls {
        let first = signature.positional_or_keyword_args.remove(0);
        signature.positional_only_args.push(first);
    }
    signature
}

/// Flat parameter list with right-aligned defaults
pub fn params_from_argspec(spec: &ArgSpec) -> Vec<ParamHint> {
    let defaults = align_defaults(spec.args.len(), &spec.defaults);
    spec.args
        .iter()
        .zip(defaults)
        .map(|(name, default_value)| ParamHint {
            name: name.clone(),
            default_value,
            hide: false,
        })
        .collect()
}

/// Whether the first argspec parameter is an implicit receiver.
///
/// Constructors always take one and static methods never do. Otherwise the
/// symbol's dotted path (its `__qualname__` when known) is shortened one
/// segment at a time until a prefix names a type.
fn needs_receiver<E: LiveEnvironment + ?Sized>(
    env: &mut E,
    live_module: &str,
    entry: &Entry,
) -> Result<bool, LiveError> {
    if entry.kinds.is_constructor() {
        return Ok(true);
    }
    let info = env.describe(live_module, &entry.ac_result)?;
    if info.kind == SymbolKind::StaticMethod {
        return Ok(false);
    }

    let dotted = info.qualname.as_deref().unwrap_or(&entry.ac_result);
    let segments: Vec<&str> = dotted.split('.').collect();
    for end in (1..segments.len()).rev() {
        let owner = segments[..end].join(".");
        // qualnames may name scopes that are not attributes (`<locals>`)
        if let Ok(owner_info) = env.describe(live_module, &owner) {
            if owner_info.kind == SymbolKind::Type {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
