//! Plugin Registry

use crate::{EvalContext, FunctionMeta, FunctionPlugin};
use proconv_core::{ProError, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Central plugin registry
pub struct PluginRegistry {
    functions: BTreeMap<String, Arc<dyn FunctionPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    pub fn with_function<F: FunctionPlugin + 'static>(mut self, f: F) -> Self {
        let name = f.meta().name.to_lowercase();
        self.functions.insert(name, Arc::new(f));
        self
    }

    pub fn get_function(&self, name: &str) -> Option<&dyn FunctionPlugin> {
        self.functions.get(&name.to_lowercase()).map(|f| f.as_ref())
    }

    pub fn call_function(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
        match self.get_function(name) {
            Some(f) => {
                let meta = f.meta();
                if args.len() < meta.required_args() {
                    return Value::Error(ProError::arg_count(meta.name, meta.required_args(), args.len()));
                }
                debug!(function = name, args = args.len(), "calling function");
                f.call(args, ctx)
            }
            None => {
                let similar = self.find_similar_functions(name);
                let mut err = ProError::undefined_func(name);
                if !similar.is_empty() {
                    let suggestions: Vec<&str> = similar.iter().take(5).map(|s| s.as_str()).collect();
                    err = err.with_suggestion(format!(
                        "Similar: {}. Use help() for full list.",
                        suggestions.join(", ")
                    ));
                }
                Value::Error(err)
            }
        }
    }

    /// Find function names similar to the given name (for error suggestions)
    fn find_similar_functions(&self, name: &str) -> Vec<String> {
        let name_lower = name.to_lowercase();
        let mut matches: Vec<(String, usize)> = self.functions.keys()
            .filter_map(|func_name| {
                let score = Self::similarity_score(&name_lower, func_name);
                if score > 0 {
                    Some((func_name.clone(), score))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1));
        matches.into_iter().map(|(name, _)| name).collect()
    }

    /// Similarity between a query and a candidate name; 0 means unrelated
    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        let common = query_chars.intersection(&candidate_chars).count();
        score += common * 2;

        let len_diff = (query.len() as i32 - candidate.len() as i32).unsigned_abs() as usize;
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        match name {
            Some(n) => self.help_for(n),
            None => self.general_help(),
        }
    }

    fn help_for(&self, name: &str) -> Value {
        match self.functions.get(&name.to_lowercase()) {
            Some(f) => Value::Object(Self::function_to_help(f.meta())),
            None => Value::Error(ProError::not_found(name)),
        }
    }

    fn general_help(&self) -> Value {
        let mut funcs_by_cat: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for (name, f) in &self.functions {
            let cat = f.meta().category.to_string();
            funcs_by_cat.entry(cat).or_default().push(Value::Text(name.clone()));
        }

        let mut help = BTreeMap::new();
        help.insert("functions".to_string(),
            Value::Object(funcs_by_cat.into_iter()
                .map(|(k, v)| (k, Value::List(v)))
                .collect()));
        help.insert("usage".to_string(),
            Value::Text("Call help('function_name') for detailed help.".to_string()));
        Value::Object(help)
    }

    fn function_to_help(meta: FunctionMeta) -> BTreeMap<String, Value> {
        let mut help = BTreeMap::new();
        help.insert("name".to_string(), Value::from(meta.name));
        help.insert("description".to_string(), Value::from(meta.description));
        help.insert("usage".to_string(), Value::from(meta.usage));
        help.insert("returns".to_string(), Value::from(meta.returns));
        help.insert("category".to_string(), Value::from(meta.category));
        help.insert("args".to_string(), Value::List(
            meta.args.iter().map(|a| {
                let mut arg = BTreeMap::new();
                arg.insert("name".to_string(), Value::from(a.name));
                arg.insert("type".to_string(), Value::from(a.typ));
                arg.insert("description".to_string(), Value::from(a.description));
                arg.insert("optional".to_string(), Value::Bool(a.optional));
                if let Some(default) = a.default {
                    arg.insert("default".to_string(), Value::from(default));
                }
                Value::Object(arg)
            }).collect()
        ));
        help.insert("examples".to_string(), Value::List(
            meta.examples.iter().map(|e| Value::from(*e)).collect()
        ));
        help.insert("related".to_string(), Value::List(
            meta.related.iter().map(|r| Value::from(*r)).collect()
        ));
        help
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
