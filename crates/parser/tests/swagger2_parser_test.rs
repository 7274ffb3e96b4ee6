//! Integration test for Swagger 2.0 parsing

use std::fs;
use swagger_query_gen_common::{BodyContent, CodegenConfig, DtoKind};
use swagger_query_gen_parser::parse_document;
use tempfile::TempDir;

const SWAGGER_YAML: &str = r##"
swagger: "2.0"
info:
  title: Legacy Users
  version: "0.9"
host: users.example.com
basePath: /v2
schemes: [https]
parameters:
  PageParam:
    name: page
    in: query
    type: integer
paths:
  /users:
    get:
      tags: [user management]
      operationId: get_users
      parameters:
        - $ref: "#/parameters/PageParam"
        - name: role
          in: query
          type: string
          enum: [admin, member]
      responses:
        "200":
          description: ok
          schema:
            type: array
            items:
              $ref: "#/definitions/User"
    post:
      tags: [user management]
      operationId: create_user
      parameters:
        - name: body
          in: body
          required: true
          schema:
            $ref: "#/definitions/User"
      responses:
        "201":
          description: created
          schema:
            $ref: "#/definitions/User"
  /users/{id}/avatar:
    post:
      tags: [user management]
      consumes: [multipart/form-data]
      parameters:
        - name: id
          in: path
          required: true
          type: integer
        - name: file
          in: formData
          required: true
          type: file
        - name: caption
          in: formData
          type: string
      responses:
        "204":
          description: uploaded
  /session:
    post:
      consumes: [application/x-www-form-urlencoded]
      parameters:
        - name: login
          in: formData
          required: true
          type: string
      responses:
        "200":
          description: ok
          schema:
            type: string
definitions:
  User:
    type: object
    required: [id]
    properties:
      id:
        type: integer
      email:
        type: string
        x-nullable: true
      roles:
        type: array
        items:
          type: string
"##;

fn parse() -> swagger_query_gen_common::ApiDefinition {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("swagger.yaml");
    fs::write(&path, SWAGGER_YAML).unwrap();
    parse_document(&path, &CodegenConfig::default()).unwrap()
}

#[test]
fn test_swagger2_definitions() {
    let api = parse();
    assert_eq!(api.base_url.as_deref(), Some("https://users.example.com/v2"));

    let user = api.dtos.iter().find(|d| d.name == "User").unwrap();
    let DtoKind::Interface { properties } = &user.kind else {
        panic!("User should be an interface");
    };
    assert_eq!(properties[1].name, "email");
    assert_eq!(properties[1].type_expr, "string | null");
    assert!(properties[1].optional);
    assert_eq!(properties[2].type_expr, "string[]");
}

#[test]
fn test_swagger2_routes() {
    let api = parse();
    assert_eq!(api.modules.len(), 2);

    let users = &api.modules[0];
    assert_eq!(users.module_name, "usermanagement");
    assert_eq!(users.class_name, "UserManagementApi");
    assert_eq!(users.instance_name, "userManagementApi");

    let list = &users.routes[0];
    assert_eq!(list.name, "getUsers");
    assert_eq!(list.response_type, "User[]");
    let query = list.query.as_ref().unwrap();
    assert_eq!(query.type_name, "GetUsersQuery");
    assert!(!query.required);
    assert_eq!(query.params[0].name, "page");
    assert_eq!(query.params[0].type_expr, "number");
    assert_eq!(query.params[1].type_expr, "\"admin\" | \"member\"");

    let create = &users.routes[1];
    assert_eq!(create.name, "createUser");
    let body = create.body.as_ref().unwrap();
    assert_eq!(body.content, BodyContent::Json);
    assert_eq!(body.type_expr, "User");
    assert!(body.required);

    let upload = &users.routes[2];
    assert_eq!(upload.name, "postUsersByIdAvatar");
    assert_eq!(upload.path_template, "users/${id}/avatar");
    let body = upload.body.as_ref().unwrap();
    assert_eq!(body.content, BodyContent::FormData);
    assert_eq!(body.type_expr, "{ file: File; caption?: string }");
    assert_eq!(upload.response_type, "void");

    let session = &api.modules[1];
    assert_eq!(session.module_name, "session");
    let login = &session.routes[0];
    assert_eq!(login.body.as_ref().unwrap().content, BodyContent::UrlEncoded);
    assert_eq!(login.response_type, "string");
}
