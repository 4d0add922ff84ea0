//! Enrich command handler - registry in, enriched registry out.

use std::fs;
use std::io::{self, Read};

use crate::cli::EnrichArgs;
use crate::commands::CommandContext;
use crate::enrich::{enrich_document, PythonProcess};
use crate::error::{Result, StubscanError};
use crate::fs_utils::write_atomic;
use crate::schema::{document_from_str, to_json_pretty};

pub fn run_enrich(args: &EnrichArgs, ctx: &CommandContext) -> Result<String> {
    let (json, context) = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|e| StubscanError::IoError {
                path: path.clone(),
                message: e.to_string(),
            })?;
            (json, path.display().to_string())
        }
        None => {
            let mut json = String::new();
            io::stdin().read_to_string(&mut json)?;
            (json, "stdin".to_string())
        }
    };
    let mut document = document_from_str(&json, &context)?;

    let python = args
        .python
        .as_deref()
        .unwrap_or(&ctx.config.enrich.python);
    let mut env = PythonProcess::spawn(python, &ctx.config.enrich.python_paths)?;
    let report = enrich_document(&mut env, &mut document, &context)?;
    drop(env);

    if let Some(path) = &args.diagnostics {
        let diagnostics = to_json_pretty(&report.diagnostics)?;
        write_atomic(path, diagnostics.as_bytes()).map_err(|e| StubscanError::IoError {
            path: path.clone(),
            message: e.to_string(),
        })?;
    }

    Ok(format!("{}\n", to_json_pretty(&document)?))
}
