//! Template loading and management

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use swagger_query_gen_common::naming::{
    capitalize, escape_js_string, to_camel_case, to_kebab_case, to_pascal_case,
};
use swagger_query_gen_common::{GeneratorError, Result};
use tera::{Tera, Value};
use tracing::debug;

/// Built-in templates, by name
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("dto.ts", include_str!("../templates/dto.ts.tera")),
    ("api.ts", include_str!("../templates/api.ts.tera")),
    ("instance.ts", include_str!("../templates/instance.ts.tera")),
    ("queries.ts", include_str!("../templates/queries.ts.tera")),
    ("mutations.ts", include_str!("../templates/mutations.ts.tera")),
];

/// Load all templates, letting `<override_dir>/<name>.tera` replace a built-in
pub fn load_templates(override_dir: Option<&Path>) -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("capitalize", capitalize_filter);
    tera.register_filter("camel_case", camel_case_filter);
    tera.register_filter("pascal_case", pascal_case_filter);
    tera.register_filter("kebab_case", kebab_case_filter);
    tera.register_filter("js_string", js_string_filter);
    tera.register_filter("js_comment", js_comment_filter);

    for &(name, builtin) in BUILTIN_TEMPLATES {
        let source = match override_dir {
            Some(dir) => read_override(dir, name)?,
            None => None,
        };
        let content = source.as_deref().unwrap_or(builtin);

        tera.add_raw_template(name, content).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

fn read_override(dir: &Path, name: &str) -> Result<Option<String>> {
    if !dir.is_dir() {
        return Err(GeneratorError::Config(format!(
            "Template directory {} does not exist",
            dir.display()
        )));
    }

    let path = dir.join(format!("{}.tera", name));
    if !path.is_file() {
        return Ok(None);
    }

    debug!(template = name, path = %path.display(), "using project template");
    fs::read_to_string(&path).map(Some).map_err(|e| {
        GeneratorError::Generation(format!(
            "Failed to read template {}: {}",
            path.display(),
            e
        ))
    })
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter expects a string", filter)))
}

/// Filter to capitalize first letter
fn capitalize_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(capitalize(string_arg(value, "capitalize")?)))
}

fn camel_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_camel_case(string_arg(value, "camel_case")?)))
}

fn pascal_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_pascal_case(string_arg(value, "pascal_case")?)))
}

fn kebab_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_kebab_case(string_arg(value, "kebab_case")?)))
}

/// Filter producing a double-quoted JS string literal
fn js_string_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = string_arg(value, "js_string")?;
    Ok(Value::String(format!("\"{}\"", escape_js_string(s))))
}

/// Filter making text safe inside a `/** */` block on a single line
fn js_comment_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = string_arg(value, "js_comment")?;
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(Value::String(flat.replace("*/", "*\\/")))
}
