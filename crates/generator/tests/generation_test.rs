//! Integration test for TypeScript client generation

use std::fs;
use swagger_query_gen_common::{ApiDefinition, CodegenConfig, FileKind};
use swagger_query_gen_generator::{generate_client, ClientGenerator, GeneratedFile};
use swagger_query_gen_parser::OpenApiParser;
use tempfile::TempDir;

const SPEC: &str = r##"{
    "openapi": "3.0.3",
    "info": {"title": "Pet Store", "version": "1.0.0"},
    "servers": [{"url": "https://pets.example.com/api"}],
    "paths": {
        "/pets": {
            "get": {
                "operationId": "listPets",
                "tags": ["pets"],
                "summary": "List all pets",
                "parameters": [{"name": "limit", "in": "query", "schema": {"type": "integer"}}],
                "responses": {"200": {"description": "ok", "content": {"application/json": {
                    "schema": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
                }}}}
            },
            "post": {
                "operationId": "createPet",
                "tags": ["pets"],
                "requestBody": {"required": true, "content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Pet"}
                }}},
                "responses": {"201": {"description": "created", "content": {"application/json": {
                    "schema": {"$ref": "#/components/schemas/Pet"}
                }}}}
            }
        },
        "/pets/{petId}/photo": {
            "put": {
                "operationId": "uploadPhoto",
                "tags": ["pets"],
                "parameters": [{"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}],
                "requestBody": {"content": {"multipart/form-data": {"schema": {
                    "type": "object", "properties": {"file": {"type": "string", "format": "binary"}}
                }}}},
                "responses": {"204": {"description": "stored"}}
            }
        },
        "/health": {
            "get": {
                "operationId": "health",
                "responses": {"200": {"description": "ok", "content": {"application/json": {
                    "schema": {"type": "string"}
                }}}}
            }
        }
    },
    "components": {"schemas": {
        "Pet": {
            "type": "object",
            "description": "A pet */ in the store",
            "required": ["id"],
            "properties": {
                "id": {"type": "integer"},
                "nickname": {"anyOf": [{"type": "string"}, {"type": "null"}]}
            }
        },
        "Status": {"type": "string", "enum": ["available", "sold"]}
    }}
}"##;

fn api() -> ApiDefinition {
    OpenApiParser::from_json(SPEC)
        .unwrap()
        .parse(&CodegenConfig::default())
        .unwrap()
}

fn find<'a>(files: &'a [GeneratedFile], kind: FileKind, module: Option<&str>) -> &'a str {
    &files
        .iter()
        .find(|f| f.kind == kind && f.module_name.as_deref() == module)
        .unwrap_or_else(|| panic!("missing {:?} file for {:?}", kind, module))
        .content
}

#[test]
fn test_render_dto_file() {
    let generator = ClientGenerator::new(api(), &CodegenConfig::default()).unwrap();
    let files = generator.render().unwrap();
    let dto = find(&files, FileKind::Dto, None);

    assert!(dto.contains("/** A pet *\\/ in the store */"));
    assert!(dto.contains("export interface Pet {\n  id: number;\n  nickname?: string | null;\n}"));
    assert!(dto.contains("export type Status = \"available\" | \"sold\";"));
    assert!(dto.contains("export interface ListPetsQuery {\n  limit?: number;\n}"));
}

#[test]
fn test_render_api_class() {
    let generator = ClientGenerator::new(api(), &CodegenConfig::default()).unwrap();
    let files = generator.render().unwrap();
    let api_file = find(&files, FileKind::Api, Some("pets"));

    assert!(api_file.contains("import type { KyInstance, Options } from \"ky\";"));
    assert!(api_file.contains("import type { ListPetsQuery, Pet } from \"@/shared/api/dto\";"));
    assert!(api_file.contains("export class PetsApi {"));
    assert!(api_file.contains("const toSearchParams"));
    assert!(api_file.contains("const toFormData"));
    assert!(!api_file.contains("const toUrlEncoded"));

    assert!(api_file.contains(
        "listPets = async (query?: ListPetsQuery, options?: Options): Promise<Pet[]> => {"
    ));
    assert!(api_file.contains("   * List all pets\n   * @request GET:/pets\n   */"));
    assert!(api_file.contains("searchParams: toSearchParams(query),"));
    assert!(api_file.contains("}).json<Pet[]>();"));

    assert!(api_file.contains("createPet = async (data: Pet, options?: Options): Promise<Pet> => {"));
    assert!(api_file.contains("json: data,"));

    assert!(api_file.contains(
        "uploadPhoto = async (petId: number, data?: { file?: File }, options?: Options): Promise<void> => {"
    ));
    assert!(api_file.contains("await this.http(`pets/${petId}/photo`, {"));
    assert!(api_file.contains("method: \"PUT\","));
    assert!(api_file.contains("body: toFormData(data),"));
}

#[test]
fn test_render_instance_queries_and_mutations() {
    let generator = ClientGenerator::new(api(), &CodegenConfig::default()).unwrap();
    let files = generator.render().unwrap();

    let instance = find(&files, FileKind::ApiInstance, Some("pets"));
    assert!(instance.contains("import { PetsApi } from \"./index\";"));
    assert!(instance.contains("export const petsApi = new PetsApi("));
    assert!(instance.contains("ky.create({ prefixUrl: \"https://pets.example.com/api\" })"));

    let queries = find(&files, FileKind::Query, Some("pets"));
    assert!(queries.contains("import { petsApi } from \"./instance\";"));
    assert!(queries.contains("import type { ListPetsQuery, Pet } from \"@/shared/api/dto\";"));
    assert!(queries.contains("export const listPetsQueryOptions = (query?: ListPetsQuery) =>"));
    assert!(queries.contains("queryKey: petsKeys.listPets(query),"));
    assert!(queries.contains("queryFn: () => petsApi.listPets(query),"));
    assert!(!queries.contains("createPet"));

    let mutations = find(&files, FileKind::Mutation, Some("pets"));
    assert!(mutations.contains("export const useCreatePetMutation = ("));
    assert!(mutations.contains("UseMutationOptions<Pet, globalThis.Error, { data: Pet }>"));
    assert!(mutations.contains("mutationFn: ({ data }: { data: Pet }) =>"));
    assert!(mutations.contains("petsApi.createPet(data),"));
    assert!(mutations.contains("export const useUploadPhotoMutation = ("));
    assert!(!mutations.contains("listPets"));

    // The untagged health route only has a query, so no mutation file is emitted
    assert!(files
        .iter()
        .all(|f| !(f.kind == FileKind::Mutation && f.module_name.as_deref() == Some("health"))));
    let health_queries = find(&files, FileKind::Query, Some("health"));
    assert!(health_queries.contains("export const healthQueryOptions = () =>"));
    assert!(!health_queries.contains("import type"));
}

#[test]
fn test_render_targets_filters_kinds() {
    let generator = ClientGenerator::new(api(), &CodegenConfig::default()).unwrap();
    let files = generator
        .render_targets(&[FileKind::Dto, FileKind::Query])
        .unwrap();

    assert!(files
        .iter()
        .all(|f| matches!(f.kind, FileKind::Dto | FileKind::Query)));
    assert_eq!(files.iter().filter(|f| f.kind == FileKind::Dto).count(), 1);
}

#[test]
fn test_generate_client_writes_layout() {
    let temp_dir = TempDir::new().unwrap();
    let written = generate_client(api(), &CodegenConfig::default(), temp_dir.path()).unwrap();

    let root = temp_dir.path();
    assert!(root.join("src/shared/api/dto.ts").exists());
    assert!(root.join("src/entities/pets/api/index.ts").exists());
    assert!(root.join("src/entities/pets/api/instance.ts").exists());
    assert!(root.join("src/entities/pets/api/queries.ts").exists());
    assert!(root.join("src/entities/pets/api/mutations.ts").exists());
    assert!(root.join("src/entities/health/api/queries.ts").exists());
    assert!(!root.join("src/entities/health/api/mutations.ts").exists());
    assert_eq!(written.len(), 8);

    let dto = fs::read_to_string(root.join("src/shared/api/dto.ts")).unwrap();
    assert!(dto.contains("export interface Pet {"));
}

#[test]
fn test_custom_output_paths_and_templates() {
    let temp_dir = TempDir::new().unwrap();
    let template_dir = temp_dir.path().join("templates");
    fs::create_dir_all(&template_dir).unwrap();
    fs::write(
        template_dir.join("instance.ts.tera"),
        "export const base = {{ base_url | js_string }}; // {{ module.api_import }}\n",
    )
    .unwrap();

    let yaml = format!(
        "templates: \"{}\"\nbase_url: http://localhost:3000\noutput:\n  api: \"src/api/{{moduleName}}.ts\"\n  api_instance: \"src/instances/{{moduleName}}.ts\"\n",
        template_dir.display()
    );
    let config = CodegenConfig::from_yaml(&yaml).unwrap();

    let out = temp_dir.path().join("out");
    let generator = ClientGenerator::new(api(), &config).unwrap();
    generator
        .write_to_directory(&out, &[FileKind::Api, FileKind::ApiInstance])
        .unwrap();

    assert!(out.join("src/api/pets.ts").exists());
    let instance = fs::read_to_string(out.join("src/instances/pets.ts")).unwrap();
    assert_eq!(
        instance,
        "export const base = \"http://localhost:3000\"; // ../api/pets\n"
    );
}

#[test]
fn test_mutation_error_type_is_not_shadowed_by_dto() {
    let doc = r##"{
        "openapi": "3.0.3",
        "info": {"title": "Reports", "version": "1"},
        "paths": {"/errors": {"post": {
            "operationId": "reportError",
            "tags": ["errors"],
            "requestBody": {"required": true, "content": {"application/json": {
                "schema": {"$ref": "#/components/schemas/Error"}
            }}},
            "responses": {"201": {"description": "ok", "content": {"application/json": {
                "schema": {"$ref": "#/components/schemas/Error"}
            }}}}
        }}},
        "components": {"schemas": {"Error": {
            "type": "object", "required": ["message"],
            "properties": {"message": {"type": "string"}}
        }}}
    }"##;
    let api = OpenApiParser::from_json(doc)
        .unwrap()
        .parse(&CodegenConfig::default())
        .unwrap();
    let files = ClientGenerator::new(api, &CodegenConfig::default())
        .unwrap()
        .render()
        .unwrap();

    let mutations = find(&files, FileKind::Mutation, Some("errors"));
    assert!(mutations.contains("import type { Error } from \"@/shared/api/dto\";"));
    assert!(mutations.contains(
        "UseMutationOptions<Error, globalThis.Error, { data: Error }>"
    ));
}
