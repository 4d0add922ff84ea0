//! Scripted live environment
//!
//! Answers introspection queries from fixed tables and records every query,
//! so tests can check which fallbacks ran.

use std::collections::{HashMap, HashSet};

use stubscan::enrich::{ArgSpec, LiveEnvironment, LiveParameter, SymbolInfo, SymbolKind};
use stubscan::LiveError;

type Key = (String, String);

fn key(module: &str, path: &str) -> Key {
    (module.to_string(), path.to_string())
}

#[derive(Debug, Default)]
pub struct ScriptedEnv {
    modules: HashSet<String>,
    docs: HashMap<Key, String>,
    signatures: HashMap<Key, Vec<LiveParameter>>,
    argspecs: HashMap<Key, ArgSpec>,
    symbols: HashMap<Key, SymbolInfo>,
    help: HashMap<Key, String>,
    /// `query:module:path` for every call, in order
    pub calls: Vec<String>,
}

impl ScriptedEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, module: &str) -> Self {
        self.modules.insert(module.to_string());
        self
    }

    pub fn with_doc(mut self, module: &str, path: &str, doc: &str) -> Self {
        self.docs.insert(key(module, path), doc.to_string());
        self
    }

    pub fn with_signature(mut self, module: &str, path: &str, params: Vec<LiveParameter>) -> Self {
        self.signatures.insert(key(module, path), params);
        self
    }

    pub fn with_argspec(mut self, module: &str, path: &str, args: &[&str], defaults: &[&str]) -> Self {
        self.argspecs.insert(
            key(module, path),
            ArgSpec {
                args: args.iter().map(|s| s.to_string()).collect(),
                defaults: defaults.iter().map(|s| s.to_string()).collect(),
                ..ArgSpec::default()
            },
        );
        self
    }

    pub fn with_full_argspec(mut self, module: &str, path: &str, spec: ArgSpec) -> Self {
        self.argspecs.insert(key(module, path), spec);
        self
    }

    pub fn with_symbol(
        mut self,
        module: &str,
        path: &str,
        kind: SymbolKind,
        qualname: Option<&str>,
    ) -> Self {
        self.symbols.insert(
            key(module, path),
            SymbolInfo {
                kind,
                qualname: qualname.map(String::from),
            },
        );
        self
    }

    pub fn with_help(mut self, module: &str, path: &str, text: &str) -> Self {
        self.help.insert(key(module, path), text.to_string());
        self
    }

    /// Whether any query of this kind was made
    pub fn queried(&self, query: &str) -> bool {
        let prefix = format!("{}:", query);
        self.calls.iter().any(|c| c.starts_with(&prefix))
    }

    fn record(&mut self, query: &str, module: &str, path: &str) {
        self.calls.push(format!("{}:{}:{}", query, module, path));
    }
}

fn lookup<T: Clone>(table: &HashMap<Key, T>, module: &str, path: &str) -> Result<T, LiveError> {
    table
        .get(&key(module, path))
        .cloned()
        .ok_or_else(|| LiveError::SymbolNotFound {
            path: path.to_string(),
        })
}

impl LiveEnvironment for ScriptedEnv {
    fn import_module(&mut self, module: &str) -> Result<(), LiveError> {
        self.record("import", module, "");
        if self.modules.contains(module) {
            Ok(())
        } else {
            Err(LiveError::ModuleNotFound {
                module: module.to_string(),
                message: "No module named".to_string(),
            })
        }
    }

    fn documentation(&mut self, module: &str, path: &str) -> Result<String, LiveError> {
        self.record("doc", module, path);
        self.docs
            .get(&key(module, path))
            .cloned()
            .ok_or_else(|| LiveError::NoDocumentation {
                path: path.to_string(),
            })
    }

    fn signature(&mut self, module: &str, path: &str) -> Result<Vec<LiveParameter>, LiveError> {
        self.record("signature", module, path);
        self.signatures
            .get(&key(module, path))
            .cloned()
            .ok_or_else(|| LiveError::Introspection {
                path: path.to_string(),
                message: "no signature found for builtin".to_string(),
            })
    }

    fn argspec(&mut self, module: &str, path: &str) -> Result<ArgSpec, LiveError> {
        self.record("argspec", module, path);
        self.argspecs
            .get(&key(module, path))
            .cloned()
            .ok_or_else(|| LiveError::Introspection {
                path: path.to_string(),
                message: "unsupported callable".to_string(),
            })
    }

    fn describe(&mut self, module: &str, path: &str) -> Result<SymbolInfo, LiveError> {
        self.record("describe", module, path);
        lookup(&self.symbols, module, path)
    }

    fn render_doc(&mut self, module: &str, path: &str) -> Result<String, LiveError> {
        self.record("render_doc", module, path);
        lookup(&self.help, module, path)
    }
}
