//! Template-facing views over the IR
//!
//! Precomputes the argument lists and imports that are awkward to express in
//! tera so the templates stay declarative.

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path};
use swagger_query_gen_common::{BodyContent, ModuleDefinition, RouteDefinition};

/// One module as seen by a per-module template
#[derive(Debug, Serialize)]
pub struct ModuleView<'a> {
    pub name: &'a str,
    pub module_name: &'a str,
    pub class_name: &'a str,
    pub instance_name: &'a str,
    /// Routes rendered into this file
    pub routes: Vec<RouteView<'a>>,
    /// DTO names used by `routes`
    pub imports: Vec<String>,
    /// Specifier of the API class file relative to the file being rendered
    pub api_import: String,
    /// Specifier of the API instance file relative to the file being rendered
    pub instance_import: String,
    pub uses_search_params: bool,
    pub uses_form_data: bool,
    pub uses_url_encoded: bool,
}

impl<'a> ModuleView<'a> {
    pub fn new(
        module: &'a ModuleDefinition,
        routes: impl Iterator<Item = &'a RouteDefinition>,
        api_import: String,
        instance_import: String,
    ) -> Self {
        let routes: Vec<RouteView<'a>> = routes.map(RouteView::new).collect();
        let imports: BTreeSet<String> = routes
            .iter()
            .flat_map(|r| r.route.dto_imports.iter().cloned())
            .collect();
        let body_uses = |content: BodyContent| {
            routes
                .iter()
                .any(|r| r.route.body.as_ref().is_some_and(|b| b.content == content))
        };

        Self {
            name: &module.name,
            module_name: &module.module_name,
            class_name: &module.class_name,
            instance_name: &module.instance_name,
            uses_search_params: routes.iter().any(|r| r.route.query.is_some()),
            uses_form_data: body_uses(BodyContent::FormData),
            uses_url_encoded: body_uses(BodyContent::UrlEncoded),
            imports: imports.into_iter().collect(),
            routes,
            api_import,
            instance_import,
        }
    }
}

/// A route with its TypeScript call signature worked out
#[derive(Debug, Serialize)]
pub struct RouteView<'a> {
    #[serde(flatten)]
    pub route: &'a RouteDefinition,
    /// Uppercase HTTP method
    pub method: String,
    /// Parameter list without the trailing `options`, e.g. `petId: number, data: NewPet`
    pub signature: String,
    /// Argument names in call order, e.g. `petId, data`
    pub call_args: String,
    /// Mutation variables type, `void` when the route takes no arguments
    pub variables_type: String,
    /// Destructuring pattern for the mutation variables
    pub variables_pattern: String,
    pub returns_void: bool,
}

struct Arg {
    name: String,
    type_expr: String,
    optional: bool,
}

impl<'a> RouteView<'a> {
    pub fn new(route: &'a RouteDefinition) -> Self {
        let mut args: Vec<Arg> = route
            .path_params
            .iter()
            .map(|p| Arg {
                name: p.ident.clone(),
                type_expr: p.type_expr.clone(),
                optional: false,
            })
            .collect();

        if let Some(query) = &route.query {
            args.push(Arg {
                name: "query".to_string(),
                type_expr: query.type_name.clone(),
                optional: !query.required,
            });
        }
        if let Some(body) = &route.body {
            args.push(Arg {
                name: "data".to_string(),
                type_expr: body.type_expr.clone(),
                optional: !body.required,
            });
        }

        let signature = signature(&args);
        let call_args = args
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let (variables_type, variables_pattern) = if args.is_empty() {
            ("void".to_string(), String::new())
        } else {
            let fields = args
                .iter()
                .map(|a| {
                    let marker = if a.optional { "?" } else { "" };
                    format!("{}{}: {}", a.name, marker, a.type_expr)
                })
                .collect::<Vec<_>>()
                .join("; ");
            (format!("{{ {} }}", fields), format!("{{ {} }}", call_args))
        };

        Self {
            method: route.http_method.as_str().to_uppercase(),
            returns_void: route.response_type == "void",
            route,
            signature,
            call_args,
            variables_type,
            variables_pattern,
        }
    }
}

/// An optional argument followed by a required one is written as
/// `name: T | undefined` instead of `name?: T`
fn signature(args: &[Arg]) -> String {
    args.iter()
        .enumerate()
        .map(|(i, arg)| {
            let trailing_optional = args[i..].iter().all(|a| a.optional);
            match (arg.optional, trailing_optional) {
                (true, true) => format!("{}?: {}", arg.name, arg.type_expr),
                (true, false) => format!("{}: {} | undefined", arg.name, arg.type_expr),
                _ => format!("{}: {}", arg.name, arg.type_expr),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// ES module specifier of `to` as imported from `from`, both relative to the
/// output root, e.g. `src/a/queries.ts` → `src/a/instance.ts` gives `./instance`
pub fn relative_import(from: &Path, to: &Path) -> String {
    let from_dir: Vec<Component> = from
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let target = to.with_extension("");
    let to_parts: Vec<Component> = target.components().collect();

    let common = from_dir
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from_dir.len() - common];
    parts.extend(
        to_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    let joined = parts.join("/");
    if joined.starts_with("..") {
        joined
    } else {
        format!("./{}", joined)
    }
}
