//! Signature derivation from declared parameters

use super::declaration::{DeclaredParam, ParamSlot, Rendered};
use crate::schema::{Parameter, Signature, VarParameter};

/// Right-align `defaults` against `count` positional parameters.
///
/// Parameter `count - 1 - k` receives `defaults[len - 1 - k]` for every
/// `k < len`; parameters before `count - len` get nothing. Surplus defaults
/// (more defaults than parameters) are ignored from the left.
pub fn align_defaults<T: Clone>(count: usize, defaults: &[T]) -> Vec<Option<T>> {
    let first_with_default = count.saturating_sub(defaults.len());
    let skipped = defaults.len().saturating_sub(count);
    (0..count)
        .map(|i| {
            if i < first_with_default {
                None
            } else {
                defaults.get(skipped + i - first_with_default).cloned()
            }
        })
        .collect()
}

/// Build the [`Signature`] of a declared callable.
///
/// `qualified` is only used to attribute rendering failures in the log.
pub fn derive_signature(qualified: &str, params: &[DeclaredParam]) -> Signature {
    let mut signature = Signature::default();

    let positional: Vec<&DeclaredParam> = params
        .iter()
        .filter(|p| matches!(p.slot, ParamSlot::PositionalOnly | ParamSlot::PositionalOrKeyword))
        .collect();
    let positional_defaults: Vec<Option<String>> = positional
        .iter()
        .filter_map(|p| p.default.as_ref())
        .map(|d| settle(qualified, d))
        .collect();
    let aligned = align_defaults(positional.len(), &positional_defaults);

    for (param, default) in positional.iter().zip(aligned) {
        let rendered = Parameter {
            name: param.name.clone(),
            default_value: default.flatten(),
            arg_type: settle_opt(qualified, &param.annotation),
        };
        match param.slot {
            ParamSlot::PositionalOnly => signature.positional_only_args.push(rendered),
            _ => signature.positional_or_keyword_args.push(rendered),
        }
    }

    for param in params {
        match param.slot {
            ParamSlot::PositionalOnly | ParamSlot::PositionalOrKeyword => {}
            ParamSlot::VarPositional => {
                signature.var_args = Some(VarParameter {
                    name: param.name.clone(),
                    arg_type: settle_opt(qualified, &param.annotation),
                })
            }
            ParamSlot::KeywordOnly => signature.keyword_only_args.push(Parameter {
                name: param.name.clone(),
                default_value: settle_opt(qualified, &param.default),
                arg_type: settle_opt(qualified, &param.annotation),
            }),
            ParamSlot::VarKeyword => {
                signature.var_kwargs = Some(VarParameter {
                    name: param.name.clone(),
                    arg_type: settle_opt(qualified, &param.annotation),
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

/// Log a rendering failure and degrade it to an absent field
fn settle(qualified: &str, field: &Result<String, crate::error::RecoverableError>) -> Option<String> {
    match field {
        Ok(text) => Some(text.clone()),
        Err(e) => {
            tracing::warn!("{}: {}", qualified, e);
            None
        }
    }
}

fn settle_opt(qualified: &str, field: &Rendered) -> Option<String> {
    field.as_ref().and_then(|f| settle(qualified, f))
}
