//! Converts an OpenAPI document into the generator's `ApiDefinition` IR

use super::types::{OpenApiSpec, Operation, Parameter, Required, Schema, SchemaType};
use crate::resolver::{SchemaComponentsIndex, SchemaKind, SchemaNode, TypeResolver};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashSet};
use swagger_query_gen_common::naming::{
    format_type_name, quote_property_key, sanitize_identifier, to_camel_case, to_pascal_case,
};
use swagger_query_gen_common::{
    ApiDefinition, BodyContent, BodyDefinition, CodegenConfig, DtoDefinition, DtoKind, HttpMethod,
    ModuleDefinition, ParamDefinition, PropertyDefinition, QueryDefinition, Result,
    RouteDefinition,
};
use tracing::{debug, warn};

/// Module used for routes with neither a tag nor a usable path segment
const FALLBACK_MODULE: &str = "common";

/// Success responses in the order they are considered
const RESPONSE_PRIORITY: &[&str] = &["200", "201", "202", "203", "206", "default"];

/// Convert a parsed document into `ApiDefinition`
pub fn convert_spec(spec: &OpenApiSpec, config: &CodegenConfig) -> Result<ApiDefinition> {
    let index = SchemaComponentsIndex::from_spec(spec);
    let resolver = TypeResolver::new(&index, &config.placeholders);
    debug!(components = index.len(), "built schema components index");

    let mut converter = Converter {
        spec,
        config,
        resolver,
        dtos: Vec::new(),
        dto_names: HashSet::new(),
    };

    converter.convert_components()?;
    let modules = converter.convert_paths()?;

    Ok(ApiDefinition {
        title: spec.info.title.clone(),
        version: spec.info.version.clone(),
        base_url: config.base_url.clone().or_else(|| spec.base_url()),
        dtos: converter.dtos,
        modules,
    })
}

struct Converter<'a> {
    spec: &'a OpenApiSpec,
    config: &'a CodegenConfig,
    resolver: TypeResolver<'a>,
    dtos: Vec<DtoDefinition>,
    dto_names: HashSet<String>,
}

/// Routes collected for one module before finalization
struct ModuleBuilder {
    name: String,
    routes: Vec<RouteDefinition>,
    route_names: HashSet<String>,
}

impl<'a> Converter<'a> {
    fn convert_components(&mut self) -> Result<()> {
        let index = self.resolver.index();
        let mut dtos = Vec::with_capacity(index.len());

        for component in index.iter() {
            let name = format_type_name(&component.type_name);
            let schema = &component.raw_type_data;

            let is_interface =
                SchemaKind::of(schema) == SchemaKind::Object && !schema.properties.is_empty();
            let kind = if is_interface {
                let mut properties = Vec::with_capacity(schema.properties.len());
                for (prop_name, prop_schema) in &schema.properties {
                    let node = SchemaNode::new(
                        prop_schema.clone(),
                        vec![component.type_name.clone(), prop_name.clone()],
                    );
                    properties.push(PropertyDefinition {
                        name: prop_name.clone(),
                        key: quote_property_key(prop_name),
                        type_expr: self.resolver.resolve_inline(&node)?,
                        optional: !schema.is_property_required(prop_name),
                        description: prop_schema.description.clone(),
                    });
                }
                DtoKind::Interface { properties }
            } else {
                let node = SchemaNode::new(schema.clone(), vec![component.type_name.clone()]);
                DtoKind::Alias {
                    type_expr: self.resolver.resolve_inline(&node)?,
                }
            };

            dtos.push(DtoDefinition {
                name,
                description: schema.description.clone().or_else(|| schema.title.clone()),
                kind,
            });
        }

        for dto in dtos {
            self.push_dto(dto);
        }
        Ok(())
    }

    fn push_dto(&mut self, dto: DtoDefinition) {
        if !self.dto_names.insert(dto.name.clone()) {
            warn!(name = %dto.name, "duplicate DTO name, later definition ignored");
            return;
        }
        self.dtos.push(dto);
    }

    fn unique_dto_name(&self, base: &str) -> String {
        if !self.dto_names.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.dto_names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    fn convert_paths(&mut self) -> Result<Vec<ModuleDefinition>> {
        let spec = self.spec;
        let mut modules: IndexMap<String, ModuleBuilder> = IndexMap::new();

        for (path, item) in &spec.paths {
            for (method, operation) in item.operations() {
                let raw_module = self.module_name_for(path, operation);
                let key = module_key(&raw_module);
                let module = modules.entry(key.clone()).or_insert_with(|| ModuleBuilder {
                    name: raw_module.clone(),
                    routes: Vec::new(),
                    route_names: HashSet::new(),
                });

                let name = unique_route_name(&mut module.route_names, method, path, operation);
                let params = merge_parameters(spec, &item.parameters, &operation.parameters);
                debug!(route = %name, method = method.as_str(), path = %path, "converting route");

                let route = self.convert_route(name, method, path, operation, &params)?;
                if let Some(module) = modules.get_mut(&key) {
                    module.routes.push(route);
                }
            }
        }

        Ok(modules
            .into_iter()
            .map(|(module_name, builder)| self.finish_module(module_name, builder))
            .collect())
    }

    fn module_name_for(&self, path: &str, operation: &Operation) -> String {
        if let Some(tag) = operation.tags.first().filter(|t| !t.trim().is_empty()) {
            return tag.clone();
        }
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .nth(self.config.module_name_index)
            .filter(|segment| !segment.starts_with('{'))
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_MODULE.to_string())
    }

    fn convert_route(
        &mut self,
        name: String,
        method: HttpMethod,
        path: &str,
        operation: &Operation,
        params: &[Parameter],
    ) -> Result<RouteDefinition> {
        let mut path_params = Vec::new();
        let mut query_params = Vec::new();

        for param in params {
            match param.location.as_str() {
                "path" => path_params.push(self.convert_param(&name, param, true)?),
                "query" => query_params.push(self.convert_param(&name, param, param.required)?),
                "body" | "formData" => {}
                other => debug!(param = %param.name, location = other, "skipping parameter"),
            }
        }

        let query = if query_params.is_empty() {
            None
        } else {
            Some(self.query_dto(&name, query_params))
        };

        let body = if self.spec.is_swagger2() {
            self.swagger2_body(operation, params)?
        } else {
            self.request_body(operation)?
        };

        let response_type = self.response_type(operation)?;
        let dto_imports = {
            let exprs = path_params
                .iter()
                .map(|p| p.type_expr.as_str())
                .chain(query.iter().map(|q| q.type_name.as_str()))
                .chain(body.iter().map(|b| b.type_expr.as_str()))
                .chain(std::iter::once(response_type.as_str()));
            self.referenced_dtos(exprs)
        };

        Ok(RouteDefinition {
            path_template: path_template(path),
            response_type,
            dto_imports,
            http_method: method,
            path: path.to_string(),
            path_params,
            query,
            body,
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            deprecated: operation.deprecated,
            is_query: method.is_query(),
            name,
        })
    }

    fn convert_param(
        &self,
        route_name: &str,
        param: &Parameter,
        required: bool,
    ) -> Result<ParamDefinition> {
        let node = SchemaNode::new(
            param.value_schema(),
            vec![route_name.to_string(), param.name.clone()],
        )
        .with_required(required);

        Ok(ParamDefinition {
            name: param.name.clone(),
            ident: sanitize_identifier(&param.name),
            type_expr: self.resolver.resolve_inline(&node)?,
            required,
            description: param.description.clone(),
        })
    }

    /// Register the `<Route>Query` DTO holding the query parameters
    fn query_dto(&mut self, route_name: &str, params: Vec<ParamDefinition>) -> QueryDefinition {
        let type_name = self.unique_dto_name(&format!("{}Query", to_pascal_case(route_name)));
        let properties = params
            .iter()
            .map(|p| PropertyDefinition {
                name: p.name.clone(),
                key: quote_property_key(&p.name),
                type_expr: p.type_expr.clone(),
                optional: !p.required,
                description: p.description.clone(),
            })
            .collect();

        self.push_dto(DtoDefinition {
            name: type_name.clone(),
            description: None,
            kind: DtoKind::Interface { properties },
        });

        QueryDefinition {
            type_name,
            required: params.iter().any(|p| p.required),
            params,
        }
    }

    fn request_body(&self, operation: &Operation) -> Result<Option<BodyDefinition>> {
        let Some(body) = operation.request_body.as_ref() else {
            return Ok(None);
        };
        let Some(body) = self.spec.resolve_request_body(body) else {
            warn!(reference = ?body.ref_path, "unresolved request body reference");
            return Ok(None);
        };

        let chosen = body
            .content
            .iter()
            .find(|(media, _)| is_json(media))
            .or_else(|| body.content.iter().find(|(m, _)| *m == "multipart/form-data"))
            .or_else(|| {
                body.content
                    .iter()
                    .find(|(m, _)| *m == "application/x-www-form-urlencoded")
            })
            .or_else(|| body.content.first());

        let Some((media, media_type)) = chosen else {
            return Ok(None);
        };

        let type_expr = match &media_type.schema {
            Some(schema) => {
                let node = SchemaNode::new(schema.clone(), Vec::new()).with_required(body.required);
                self.resolver.resolve_inline(&node)?
            }
            None => self.resolver.placeholders().any.clone(),
        };

        Ok(Some(BodyDefinition {
            type_expr,
            content: body_content(media),
            required: body.required,
        }))
    }

    fn swagger2_body(
        &self,
        operation: &Operation,
        params: &[Parameter],
    ) -> Result<Option<BodyDefinition>> {
        if let Some(param) = params.iter().find(|p| p.location == "body") {
            let node = SchemaNode::new(param.value_schema(), Vec::new()).with_required(param.required);
            return Ok(Some(BodyDefinition {
                type_expr: self.resolver.resolve_inline(&node)?,
                content: BodyContent::Json,
                required: param.required,
            }));
        }

        let form: Vec<&Parameter> = params.iter().filter(|p| p.location == "formData").collect();
        if form.is_empty() {
            return Ok(None);
        }

        let form_schema = Schema {
            schema_type: Some(SchemaType::Single("object".to_string())),
            properties: form
                .iter()
                .map(|p| (p.name.clone(), p.value_schema()))
                .collect(),
            required: Some(Required::Properties(
                form.iter()
                    .filter(|p| p.required)
                    .map(|p| p.name.clone())
                    .collect(),
            )),
            ..Schema::default()
        };
        let required = form.iter().any(|p| p.required);

        let urlencoded = operation
            .consumes
            .iter()
            .any(|c| c == "application/x-www-form-urlencoded");
        let multipart = operation.consumes.iter().any(|c| c == "multipart/form-data");
        let content = if urlencoded && !multipart {
            BodyContent::UrlEncoded
        } else {
            BodyContent::FormData
        };

        Ok(Some(BodyDefinition {
            type_expr: self.resolver.resolve_schema(&form_schema)?,
            content,
            required,
        }))
    }

    fn response_type(&self, operation: &Operation) -> Result<String> {
        let candidates = RESPONSE_PRIORITY
            .iter()
            .filter_map(|code| operation.responses.get(*code))
            .chain(
                operation
                    .responses
                    .iter()
                    .filter(|(code, _)| {
                        code.starts_with('2') && !RESPONSE_PRIORITY.contains(&code.as_str())
                    })
                    .map(|(_, response)| response),
            );

        for response in candidates {
            let Some(response) = self.spec.resolve_response(response) else {
                continue;
            };

            let schema = response
                .content
                .iter()
                .find(|(media, _)| is_json(media))
                .or_else(|| response.content.first())
                .and_then(|(_, media)| media.schema.as_ref())
                .or(response.schema.as_ref());

            if let Some(schema) = schema {
                let node = SchemaNode::new(schema.clone(), Vec::new()).with_required(true);
                return self.resolver.resolve_inline(&node);
            }
        }

        Ok("void".to_string())
    }

    /// DTO names used in the given type expressions, sorted
    fn referenced_dtos<'e>(&self, exprs: impl Iterator<Item = &'e str>) -> Vec<String> {
        let mut used = BTreeSet::new();
        for expr in exprs {
            for ident in type_identifiers(expr) {
                if self.dto_names.contains(ident) {
                    used.insert(ident.to_string());
                }
            }
        }
        used.into_iter().collect()
    }

    fn finish_module(&self, module_name: String, builder: ModuleBuilder) -> ModuleDefinition {
        let used: BTreeSet<String> = builder
            .routes
            .iter()
            .flat_map(|r| r.dto_imports.iter().cloned())
            .collect();

        let pascal = format_type_name(&to_pascal_case(&builder.name));
        let mut instance = to_camel_case(&builder.name);
        if instance.is_empty() || instance.starts_with(|c: char| c.is_ascii_digit()) {
            instance = format!("_{}", instance);
        }

        ModuleDefinition {
            class_name: format!("{}Api", pascal),
            instance_name: format!("{}Api", instance),
            name: builder.name,
            module_name,
            dto_imports: used.into_iter().collect(),
            routes: builder.routes,
        }
    }
}

/// Lowercased Pascal form of the module name, used in output paths
fn module_key(raw: &str) -> String {
    let key = to_pascal_case(raw).to_lowercase();
    if key.is_empty() {
        FALLBACK_MODULE.to_string()
    } else {
        key
    }
}

/// Route method name from `operationId`, else from method and path,
/// suffixed with a counter on collision
fn unique_route_name(
    used: &mut HashSet<String>,
    method: HttpMethod,
    path: &str,
    operation: &Operation,
) -> String {
    let base = match operation.operation_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => sanitize_identifier(id),
        None => {
            let words: Vec<String> = path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(param) => format!("by {}", param),
                    None => segment.to_string(),
                })
                .collect();
            sanitize_identifier(&format!("{} {}", method.as_str(), words.join(" ")))
        }
    };

    let mut name = base.clone();
    let mut counter = 2;
    while !used.insert(name.clone()) {
        name = format!("{}{}", base, counter);
        counter += 1;
    }
    name
}

/// Path-level parameters overridden by operation-level ones with the same
/// name and location. References are followed; unresolved ones are dropped.
fn merge_parameters(
    spec: &OpenApiSpec,
    path_level: &[Parameter],
    op_level: &[Parameter],
) -> Vec<Parameter> {
    let mut merged: Vec<Parameter> = Vec::new();
    for param in path_level.iter().chain(op_level) {
        let Some(resolved) = spec.resolve_parameter(param) else {
            warn!(reference = ?param.ref_path, "unresolved parameter reference");
            continue;
        };
        match merged
            .iter_mut()
            .find(|p| p.name == resolved.name && p.location == resolved.location)
        {
            Some(existing) => *existing = resolved.clone(),
            None => merged.push(resolved.clone()),
        }
    }
    merged
}

/// `/users/{user_id}/posts` → `users/${userId}/posts`
fn path_template(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut rest = path.trim_start_matches('/');

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                let name = &rest[start + 1..start + end];
                out.push_str("${");
                out.push_str(&sanitize_identifier(name));
                out.push('}');
                rest = &rest[start + end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_json(media: &str) -> bool {
    media == "application/json" || media.ends_with("+json") || media.contains("/json")
}

fn body_content(media: &str) -> BodyContent {
    match media {
        "multipart/form-data" => BodyContent::FormData,
        "application/x-www-form-urlencoded" => BodyContent::UrlEncoded,
        _ => BodyContent::Json,
    }
}

/// Identifier tokens of a type expression, skipping string literals
fn type_identifiers(expr: &str) -> Vec<&str> {
    let mut idents = Vec::new();
    let mut quote: Option<char> = None;
    let mut start: Option<usize> = None;
    let mut prev = '\0';

    for (i, ch) in expr.char_indices() {
        if let Some(q) = quote {
            if ch == q && prev != '\\' {
                quote = None;
            }
            prev = ch;
            continue;
        }

        let is_ident = ch.is_ascii_alphanumeric() || ch == '_' || ch == '$';
        match (is_ident, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                idents.push(&expr[s..i]);
                start = None;
            }
            _ => {}
        }
        if ch == '"' || ch == '\'' {
            quote = Some(ch);
        }
        prev = ch;
    }
    if let Some(s) = start {
        idents.push(&expr[s..]);
    }
    idents
}
