// OpenAPI / Swagger document access
// Decodes JSON or YAML into an order-preserving serde_json tree and exposes the
// handful of structures endpoint extraction needs, normalizing Swagger 2.0 to the
// OpenAPI 3.x view (single server URL, no body/formData parameters).

use crate::error::DocumentError;
use crate::models::{Method, ParameterLocation};
use serde_json::{Map, Value};
use tracing::debug;

/// Specification family, detected from the root version attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    Swagger2,
    OpenApi3,
}

/// A parameter as declared on an operation or path item, after `$ref` resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameter {
    pub name: String,
    pub location: ParameterLocation,
}

/// One non-null operation found under a path item
#[derive(Debug, Clone)]
pub struct RawOperation<'a> {
    pub path: &'a str,
    pub method: Method,
    pub body: &'a Map<String, Value>,
    pub path_item: &'a Map<String, Value>,
}

impl<'a> RawOperation<'a> {
    /// Operation summary, else description, else empty.
    pub fn description(&self) -> String {
        self.body
            .get("summary")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("description").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    }
}

/// Decoded specification plus the structural diagnostics found while loading it
#[derive(Debug)]
pub struct Document {
    root: Value,
    version: SpecVersion,
    diagnostics: Vec<String>,
}

/// Decode spec text as JSON when it looks like JSON, falling back to YAML.
pub fn decode(text: &str) -> Result<Value, DocumentError> {
    if text.trim_start().starts_with('{') {
        match serde_json::from_str(text) {
            Ok(value) => Ok(value),
            Err(json_err) => {
                debug!("JSON decode failed ({}), retrying as YAML", json_err);
                serde_yaml::from_str(text).map_err(|_| DocumentError::Json(json_err))
            }
        }
    } else {
        Ok(serde_yaml::from_str(text)?)
    }
}

fn detect_version(root: &Map<String, Value>) -> Result<SpecVersion, DocumentError> {
    let attr = |key: &str| {
        root.get(key).and_then(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    };

    if let Some(openapi) = attr("openapi") {
        return if openapi.starts_with('3') {
            Ok(SpecVersion::OpenApi3)
        } else {
            Err(DocumentError::UnsupportedVersion(format!("openapi {}", openapi)))
        };
    }
    if let Some(swagger) = attr("swagger") {
        return if swagger.starts_with('2') {
            Ok(SpecVersion::Swagger2)
        } else {
            Err(DocumentError::UnsupportedVersion(format!("swagger {}", swagger)))
        };
    }
    Err(DocumentError::MissingVersion)
}

impl Document {
    /// Decode and classify spec text. Missing optional structure is reported
    /// through `diagnostics()` rather than as an error.
    pub fn load(text: &str) -> Result<Self, DocumentError> {
        let root = decode(text)?;
        let obj = root.as_object().ok_or(DocumentError::NotAnObject)?;
        let version = detect_version(obj)?;

        let mut diagnostics = Vec::new();
        if !obj.get("info").map_or(false, Value::is_object) {
            diagnostics.push("attribute info is missing".to_string());
        }
        if !obj.contains_key("paths") {
            diagnostics.push("attribute paths is missing".to_string());
        }

        Ok(Self { root, version, diagnostics })
    }

    pub fn version(&self) -> SpecVersion {
        self.version
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// URL of the first declared server, with OpenAPI server variables replaced
    /// by their defaults. Swagger 2.0 documents synthesize it from
    /// `schemes`/`host`/`basePath`.
    pub fn first_server_url(&self) -> Option<String> {
        match self.version {
            SpecVersion::OpenApi3 => self
                .root
                .get("servers")
                .and_then(Value::as_array)
                .and_then(|servers| servers.first())
                .and_then(server_with_vars),
            SpecVersion::Swagger2 => self.swagger_server(),
        }
    }

    fn swagger_server(&self) -> Option<String> {
        let host = self
            .root
            .get("host")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|h| !h.is_empty());
        let base_path = self
            .root
            .get("basePath")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or("");

        match host {
            Some(host) => {
                let scheme = self
                    .root
                    .get("schemes")
                    .and_then(Value::as_array)
                    .and_then(|s| s.first())
                    .and_then(Value::as_str)
                    .unwrap_or("https");
                Some(format!("{}://{}{}", scheme, host, base_path))
            }
            None if !base_path.is_empty() => Some(base_path.to_string()),
            None => None,
        }
    }

    /// Every non-null operation, paths in document order and methods in
    /// `Method::ALL` order. Non-object operations are skipped with a diagnostic.
    pub fn operations(&self) -> (Vec<RawOperation<'_>>, Vec<String>) {
        let mut ops = Vec::new();
        let mut diagnostics = Vec::new();

        let Some(paths) = self.root.get("paths").and_then(Value::as_object) else {
            return (ops, diagnostics);
        };

        for (path, item) in paths {
            let Some(path_item) = item.as_object() else {
                continue;
            };
            for method in Method::ALL {
                match path_item.get(method.spec_key()) {
                    None | Some(Value::Null) => {}
                    Some(Value::Object(body)) => ops.push(RawOperation {
                        path: path.as_str(),
                        method,
                        body,
                        path_item,
                    }),
                    Some(_) => diagnostics.push(format!(
                        "attribute paths.'{}'({}) is not of type object",
                        path,
                        method.spec_key()
                    )),
                }
            }
        }

        (ops, diagnostics)
    }

    /// Operation parameters followed by inherited path-item parameters that the
    /// operation does not redeclare. Returns unresolved reference diagnostics too.
    pub fn parameters(&self, op: &RawOperation<'_>) -> (Vec<RawParameter>, Vec<String>) {
        let mut params = Vec::new();
        let mut diagnostics = Vec::new();

        self.collect_parameters(op.body.get("parameters"), &mut params, &mut diagnostics);
        let own = params.len();

        let mut inherited = Vec::new();
        self.collect_parameters(op.path_item.get("parameters"), &mut inherited, &mut diagnostics);
        for p in inherited {
            if !params[..own].contains(&p) {
                params.push(p);
            }
        }

        (params, diagnostics)
    }

    fn collect_parameters(
        &self,
        list: Option<&Value>,
        out: &mut Vec<RawParameter>,
        diagnostics: &mut Vec<String>,
    ) {
        let Some(list) = list.and_then(Value::as_array) else {
            return;
        };

        for entry in list {
            let param = match entry.get("$ref").and_then(Value::as_str) {
                Some(reference) => match self.resolve_local_ref(reference) {
                    Some(resolved) => resolved,
                    None => {
                        diagnostics.push(format!("could not resolve parameter reference {}", reference));
                        continue;
                    }
                },
                None => entry,
            };

            let Some(name) = param.get("name").and_then(Value::as_str) else {
                continue;
            };
            let location = param.get("in").and_then(Value::as_str);

            // Swagger 2.0 body/formData parameters describe the request body.
            if self.version == SpecVersion::Swagger2
                && matches!(location, Some("body") | Some("formData"))
            {
                continue;
            }

            out.push(RawParameter {
                name: name.to_string(),
                location: ParameterLocation::from_spec(location),
            });
        }
    }

    /// Resolve a local reference such as `#/components/parameters/Limit`.
    /// External references are not followed.
    pub fn resolve_local_ref(&self, reference: &str) -> Option<&Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(&self.root);
        }
        self.root.pointer(pointer)
    }
}

// If server URL contains variables like {env}, replace with defaults when available
fn server_with_vars(server: &Value) -> Option<String> {
    let url = server.get("url")?.as_str()?;
    let mut result = url.to_string();
    if let Some(vars) = server.get("variables").and_then(Value::as_object) {
        for (k, v) in vars {
            if let Some(def) = v.get("default").and_then(Value::as_str) {
                result = result.replace(&format!("{{{}}}", k), def);
            }
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_json_and_yaml() {
        assert!(decode(r#"{"openapi":"3.0.0"}"#).unwrap().is_object());
        assert!(decode("openapi: 3.0.0\npaths: {}\n").unwrap().is_object());
    }

    #[test]
    fn numeric_version_is_accepted() {
        let doc = Document::load("openapi: 3.0\ninfo: {title: x, version: '1'}\npaths: {}\n").unwrap();
        assert_eq!(doc.version(), SpecVersion::OpenApi3);
        assert!(doc.diagnostics().is_empty());
    }

    #[test]
    fn missing_version_is_an_error() {
        assert!(matches!(
            Document::load(r#"{"info":{}}"#),
            Err(DocumentError::MissingVersion)
        ));
        assert!(matches!(
            Document::load(r#"{"openapi":"4.0"}"#),
            Err(DocumentError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn swagger_server_is_synthesized() {
        let doc = Document::load(
            r#"{"swagger":"2.0","host":"api.example.com:8443","basePath":"/v2","schemes":["http","https"],"paths":{}}"#,
        )
        .unwrap();
        assert_eq!(doc.first_server_url().as_deref(), Some("http://api.example.com:8443/v2"));

        let doc = Document::load(r#"{"swagger":"2.0","basePath":"/v2","paths":{}}"#).unwrap();
        assert_eq!(doc.first_server_url().as_deref(), Some("/v2"));

        let doc = Document::load(r#"{"swagger":"2.0","paths":{}}"#).unwrap();
        assert_eq!(doc.first_server_url(), None);
    }

    #[test]
    fn server_variables_use_defaults() {
        let doc = Document::load(
            r#"{"openapi":"3.0.0","servers":[{"url":"https://{env}.example.com/v{version}","variables":{"env":{"default":"api"},"version":{"default":"1"}}}],"paths":{}}"#,
        )
        .unwrap();
        assert_eq!(doc.first_server_url().as_deref(), Some("https://api.example.com/v1"));
    }

    #[test]
    fn operations_follow_fixed_method_order() {
        let doc = Document::load(
            r#"{"openapi":"3.0.0","paths":{"/b":{"post":{},"get":{}},"/a":{"delete":{},"put":null}}}"#,
        )
        .unwrap();
        let (ops, diags) = doc.operations();
        let seen: Vec<_> = ops.iter().map(|o| (o.path, o.method)).collect();
        assert_eq!(
            seen,
            vec![("/b", Method::GET), ("/b", Method::POST), ("/a", Method::DELETE)]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn non_object_operation_is_reported() {
        let doc = Document::load(r#"{"openapi":"3.0.0","paths":{"/x":{"get":"nope"}}}"#).unwrap();
        let (ops, diags) = doc.operations();
        assert!(ops.is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].contains("'/x'(get)"));
    }

    #[test]
    fn refs_and_inherited_parameters() {
        let doc = Document::load(
            r##"{"openapi":"3.0.0","paths":{"/users/{id}":{
                "parameters":[{"name":"id","in":"path"},{"name":"trace","in":"header"}],
                "get":{"parameters":[{"$ref":"#/components/parameters/Limit"},{"name":"id","in":"path"},{"$ref":"#/nope"}]}}},
              "components":{"parameters":{"Limit":{"name":"limit","in":"query"}}}}"##,
        )
        .unwrap();
        let (ops, _) = doc.operations();
        let (params, diags) = doc.parameters(&ops[0]);
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["limit", "id", "trace"]);
        assert_eq!(diags, vec!["could not resolve parameter reference #/nope".to_string()]);
    }

    #[test]
    fn swagger_body_parameters_are_dropped() {
        let doc = Document::load(
            r#"{"swagger":"2.0","paths":{"/pets":{"post":{"parameters":[{"name":"body","in":"body"},{"name":"name","in":"formData"},{"name":"dry","in":"query"}]}}}}"#,
        )
        .unwrap();
        let (ops, _) = doc.operations();
        let (params, _) = doc.parameters(&ops[0]);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "dry");
    }
}
