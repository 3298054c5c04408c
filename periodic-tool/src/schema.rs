use schemars::JsonSchema;
use serde_json::{Value, json};

/// JSON schema for `T`, stripped of keywords that model APIs reject.
pub fn schema_for_type<T: JsonSchema>() -> Value {
    let mut schema = match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(schema) => schema,
        Err(_) => json!({"type": "object"}),
    };
    sanitize_schema(&mut schema);
    schema
}

/// Removes `$schema`, `title`, `definitions`, `$ref` and `additionalProperties`
/// at every level. Gemini refuses function declarations that carry them.
pub fn sanitize_schema(value: &mut Value) {
    if let Value::Object(map) = value {
        map.remove("$schema");
        map.remove("title");
        map.remove("definitions");
        map.remove("$ref");
        map.remove("additionalProperties");

        for (key, v) in map.iter_mut() {
            match (key.as_str(), v) {
                // Property names are user data, not keywords.
                ("properties", Value::Object(props)) => props.values_mut().for_each(sanitize_schema),
                (_, v) => sanitize_schema(v),
            }
        }
    } else if let Value::Array(arr) = value {
        for v in arr.iter_mut() {
            sanitize_schema(v);
        }
    }
}
