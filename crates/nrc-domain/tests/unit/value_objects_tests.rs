//! Value Object Tests

use nrc_domain::value_objects::{
    HttpMethod, HttpResponse, MethodDescriptor, RequestArgs, ResponseDecoder, ServerEndpoint,
    ServiceName,
};

#[test]
fn test_service_name_rejects_blank() {
    assert!(ServiceName::new("").is_err());
    assert!(ServiceName::new("   ").is_err());
    assert_eq!(ServiceName::new("svc1").unwrap().to_string(), "svc1");
}

#[test]
fn test_service_name_is_case_sensitive() {
    let lower = ServiceName::new("svc").unwrap();
    let upper = ServiceName::new("SVC").unwrap();
    assert_ne!(lower, upper);
}

#[test]
fn test_server_endpoint_parse() {
    let endpoint: ServerEndpoint = "localhost:8080".parse().unwrap();
    assert_eq!(endpoint, ServerEndpoint::new("localhost", 8080));
    assert_eq!(endpoint.to_string(), "localhost:8080");

    assert!("localhost".parse::<ServerEndpoint>().is_err());
    assert!(":8080".parse::<ServerEndpoint>().is_err());
    assert!("localhost:http".parse::<ServerEndpoint>().is_err());
}

#[test]
fn test_response_decode_json_empty_body_is_null() {
    let response = HttpResponse::new(404, Vec::new());
    let decoded: Option<serde_json::Value> = response.decode_json().unwrap();
    assert!(decoded.is_none());
}

#[test]
fn test_response_json_roundtrip_and_header() {
    let response = HttpResponse::json(&serde_json::json!({"id": 7})).unwrap();
    assert!(response.is_success());
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    let value: serde_json::Value = response.decode_json().unwrap();
    assert_eq!(value["id"], 7);
}

#[test]
fn test_method_descriptor_builders() {
    let get = MethodDescriptor::get("getUser", "/user/{id}");
    assert_eq!(get.method, HttpMethod::Get);
    assert_eq!(get.decoder, ResponseDecoder::Json);

    let delete = MethodDescriptor::delete("removeUser", "/user/{id}")
        .with_decoder(ResponseDecoder::Discard);
    assert_eq!(delete.method, HttpMethod::Delete);
    assert_eq!(delete.decoder, ResponseDecoder::Discard);
}

#[test]
fn test_request_args_builder() {
    let args = RequestArgs::new()
        .path("id", 42)
        .query("verbose", true)
        .header("x-trace", "abc")
        .json_body(&serde_json::json!({"name": "rao"}))
        .unwrap();

    assert_eq!(args.path_vars.get("id").map(String::as_str), Some("42"));
    assert_eq!(args.query, vec![("verbose".to_string(), "true".to_string())]);
    assert_eq!(args.body.unwrap()["name"], "rao");
}

#[test]
fn test_http_method_idempotence() {
    assert!(HttpMethod::Get.is_idempotent_read());
    assert!(!HttpMethod::Post.is_idempotent_read());
    assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
}
