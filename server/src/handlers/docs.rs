use axum::Json;
use serde_json::{json, Value};

/// OpenAPI 3.0 description of the ticket endpoints.
pub async fn openapi_document() -> Json<Value> {
    Json(document())
}

fn string_props(names: &[&str]) -> Value {
    names
        .iter()
        .map(|name| (name.to_string(), json!({ "type": "string" })))
        .collect::<serde_json::Map<_, _>>()
        .into()
}

fn json_body(schema: Value) -> Value {
    json!({ "content": { "application/json": { "schema": schema } } })
}

fn object_schema(fields: &[&str], required: bool) -> Value {
    let mut schema = json!({ "type": "object", "properties": string_props(fields) });
    if required {
        schema["required"] = json!(fields);
    }
    schema
}

fn issue_path() -> Value {
    let mut ok = json_body(object_schema(&["qrCodeUrl"], false));
    ok["description"] = json!("QR code gerado com sucesso.");

    json!({
        "post": {
            "summary": "Gera um ingresso com QR code.",
            "requestBody": json_body(object_schema(
                &["nome", "evento", "data", "hora", "local", "cpf"],
                true,
            )),
            "responses": {
                "200": ok,
                "400": { "description": "Campo obrigatório ausente ou inválido." },
                "409": { "description": "Ingresso com os mesmos dados já existe." },
                "500": { "description": "Erro ao gerar ingresso." },
            }
        }
    })
}

fn validate_path() -> Value {
    let mut ok = json_body(object_schema(&["status", "qrCodeData"], false));
    ok["description"] = json!("Ingresso válido.");

    json!({
        "post": {
            "summary": "Valida um ingresso pelo CPF e identificador.",
            "requestBody": json_body(object_schema(&["cpf", "uuidQr"], true)),
            "responses": {
                "200": ok,
                "400": { "description": "Ingresso inválido." },
                "500": { "description": "Erro ao validar ingresso." },
            }
        }
    })
}

fn list_path() -> Value {
    let summary = object_schema(&["Nome", "Evento", "Data", "Hora", "Local", "image"], false);
    let mut ok = json_body(json!({ "type": "array", "items": summary }));
    ok["description"] = json!("Ingressos encontrados.");

    json!({
        "get": {
            "summary": "Lista os ingressos de um CPF.",
            "parameters": [{
                "in": "path",
                "name": "cpf",
                "required": true,
                "schema": { "type": "string" },
            }],
            "responses": {
                "200": ok,
                "404": { "description": "Nenhum ingresso encontrado." },
                "500": { "description": "Erro ao buscar ingressos." },
            }
        }
    })
}

fn document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "API de Ingressos",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API para gerar e validar ingressos com QR code.",
        },
        "paths": {
            "/gerar_ingresso": issue_path(),
            "/validar_ingresso": validate_path(),
            "/ingressos/{cpf}": list_path(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_ticket_routes() {
        let doc = document();
        let paths = doc["paths"].as_object().unwrap();

        assert!(paths.contains_key("/gerar_ingresso"));
        assert!(paths.contains_key("/validar_ingresso"));
        assert!(paths.contains_key("/ingressos/{cpf}"));
        assert_eq!(
            doc["paths"]["/gerar_ingresso"]["post"]["requestBody"]["content"]["application/json"]
                ["schema"]["required"]
                .as_array()
                .unwrap()
                .len(),
            6
        );
    }
}
