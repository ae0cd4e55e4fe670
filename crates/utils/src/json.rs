//! JSON pass-throughs over `serde_json`
//!
//! The free functions cover the one-off conversions. [`JsonParser`] binds a
//! target type and an optional root element name once and is then reused.

use commonutil_core::{Error, Result, UtilsConfig, ERR_JSON_READ, ERR_JSON_WRITE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::any::type_name;
use std::io::Read;
use std::marker::PhantomData;
use tracing::error;

/// Serialize `value`, dropping `null` members per the global configuration
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    to_json_with(value, UtilsConfig::global())
}

/// Serialize `value` using an explicit configuration
pub fn to_json_with<T: Serialize + ?Sized>(value: &T, config: &UtilsConfig) -> Result<String> {
    let tree = to_tree(value, config.json_skip_nulls)?;
    serde_json::to_string(&tree).map_err(|e| log_write_error::<T>(e))
}

/// Serialize `value` with indentation
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let tree = to_tree(value, UtilsConfig::global().json_skip_nulls)?;
    serde_json::to_string_pretty(&tree).map_err(|e| log_write_error::<T>(e))
}

/// Deserialize `json` into `T`; unknown fields are ignored
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| log_read_error::<T>(e, json))
}

/// Parse `json` into a generic tree
pub fn from_str(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| log_read_error::<Value>(e, json))
}

/// Serialize `value` into a tree without rendering it
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| log_write_error::<T>(e))
}

/// Empty JSON object
pub fn create_node() -> Value {
    Value::Object(Map::new())
}

/// Empty JSON array
pub fn create_array() -> Value {
    Value::Array(Vec::new())
}

/// Shallow merge of JSON objects; later keys win
///
/// Anything that is not an object (including `null`) is skipped.
pub fn merge<'a, I>(objects: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Map::new();
    for object in objects {
        if let Value::Object(fields) = object {
            for (key, value) in fields {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Value::Object(merged)
}

/// Wrap `value` as `{ root: value }` and serialize it
pub fn to_json_with_root<T: Serialize + ?Sized>(root: &str, value: &T) -> Result<String> {
    let tree = to_tree(value, UtilsConfig::global().json_skip_nulls)?;
    let mut wrapper = Map::with_capacity(1);
    wrapper.insert(root.to_string(), tree);
    serde_json::to_string(&Value::Object(wrapper)).map_err(|e| log_write_error::<T>(e))
}

fn to_tree<T: Serialize + ?Sized>(value: &T, skip_nulls: bool) -> Result<Value> {
    let tree = to_value(value)?;
    Ok(if skip_nulls { strip_nulls(tree) } else { tree })
}

/// Remove `null` members from every object in the tree; array slots stay
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

fn log_write_error<T: ?Sized>(e: serde_json::Error) -> Error {
    error!(target_type = type_name::<T>(), error = %e, "{}", ERR_JSON_WRITE);
    e.into()
}

fn log_read_error<T: ?Sized>(e: serde_json::Error, json: &str) -> Error {
    error!(target_type = type_name::<T>(), payload = %json, error = %e, "{}", ERR_JSON_READ);
    e.into()
}

fn missing_root(root: &str) -> Error {
    <serde_json::Error as serde::de::Error>::custom(format!("missing root element '{root}'")).into()
}

/// Builder for [`JsonParser`]
#[derive(Debug)]
pub struct JsonParserBuilder<T> {
    root: Option<String>,
    skip_nulls: bool,
    pretty: bool,
    _target: PhantomData<fn() -> T>,
}

impl<T> Default for JsonParserBuilder<T> {
    fn default() -> Self {
        Self {
            root: None,
            skip_nulls: UtilsConfig::global().json_skip_nulls,
            pretty: false,
            _target: PhantomData,
        }
    }
}

impl<T> JsonParserBuilder<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap written values in, and unwrap read values from, `{ root: ... }`
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn skip_nulls(mut self, skip: bool) -> Self {
        self.skip_nulls = skip;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> JsonParser<T> {
        JsonParser {
            root: self.root,
            skip_nulls: self.skip_nulls,
            pretty: self.pretty,
            _target: PhantomData,
        }
    }
}

/// Reusable reader/writer for one target type
#[derive(Debug)]
pub struct JsonParser<T> {
    root: Option<String>,
    skip_nulls: bool,
    pretty: bool,
    _target: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonParser<T> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            skip_nulls: self.skip_nulls,
            pretty: self.pretty,
            _target: PhantomData,
        }
    }
}

impl<T> JsonParser<T> {
    pub fn builder() -> JsonParserBuilder<T> {
        JsonParserBuilder::new()
    }

    /// Parse `json` into a generic tree, ignoring the root setting
    pub fn read_tree(&self, json: &str) -> Result<Value> {
        from_str(json)
    }

    fn unwrap_root(&self, tree: Value) -> Result<Value> {
        match &self.root {
            None => Ok(tree),
            Some(root) => match tree {
                Value::Object(mut fields) => fields.remove(root).ok_or_else(|| missing_root(root)),
                _ => Err(missing_root(root)),
            },
        }
    }
}

impl<T: DeserializeOwned> JsonParser<T> {
    /// Read a single value
    pub fn read(&self, json: &str) -> Result<T> {
        let tree = self.read_tree(json)?;
        self.decode_tree(tree, json)
    }

    /// Read every value in a stream of concatenated or whitespace separated documents
    ///
    /// A document that is a JSON array contributes each of its elements.
    pub fn read_all(&self, json: &str) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for tree in serde_json::Deserializer::from_str(json).into_iter::<Value>() {
            let tree = tree.map_err(|e| log_read_error::<T>(e, json))?;
            match self.unwrap_root(tree)? {
                Value::Array(items) => {
                    for item in items {
                        values.push(self.decode_value(item, json)?);
                    }
                }
                other => values.push(self.decode_value(other, json)?),
            }
        }
        Ok(values)
    }

    /// Read a single value from any byte source
    pub fn read_reader<R: Read>(&self, reader: R) -> Result<T> {
        let tree: Value = serde_json::from_reader(reader).map_err(|e| {
            error!(target_type = type_name::<T>(), error = %e, "{}", ERR_JSON_READ);
            Error::from(e)
        })?;
        let tree = self.unwrap_root(tree)?;
        serde_json::from_value(tree).map_err(|e| {
            error!(target_type = type_name::<T>(), error = %e, "{}", ERR_JSON_READ);
            Error::from(e)
        })
    }

    fn decode_tree(&self, tree: Value, json: &str) -> Result<T> {
        let tree = self.unwrap_root(tree)?;
        self.decode_value(tree, json)
    }

    fn decode_value(&self, tree: Value, json: &str) -> Result<T> {
        serde_json::from_value(tree).map_err(|e| log_read_error::<T>(e, json))
    }
}

impl<T: Serialize> JsonParser<T> {
    /// Serialize `value`, wrapped in the root element when one is set
    pub fn write(&self, value: &T) -> Result<String> {
        let mut tree = to_tree(value, self.skip_nulls)?;
        if let Some(root) = &self.root {
            let mut wrapper = Map::with_capacity(1);
            wrapper.insert(root.clone(), tree);
            tree = Value::Object(wrapper);
        }

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&tree)
        } else {
            serde_json::to_string(&tree)
        };
        rendered.map_err(|e| log_write_error::<T>(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u32,
        name: String,
        note: Option<String>,
    }

    fn payload() -> Payload {
        Payload {
            id: 7,
            name: "seven".to_string(),
            note: None,
        }
    }

    #[test]
    fn test_to_json_skips_nulls_by_config() {
        let skipping = UtilsConfig::default().with_json_skip_nulls(true);
        let keeping = UtilsConfig::default().with_json_skip_nulls(false);

        assert_eq!(
            to_json_with(&payload(), &skipping).unwrap(),
            r#"{"id":7,"name":"seven"}"#
        );
        assert_eq!(
            to_json_with(&payload(), &keeping).unwrap(),
            r#"{"id":7,"name":"seven","note":null}"#
        );
    }

    #[test]
    fn test_strip_nulls_is_recursive_but_keeps_array_slots() {
        let tree = json!({"a": null, "b": {"c": null, "d": 1}, "e": [null, {"f": null}]});
        assert_eq!(strip_nulls(tree), json!({"b": {"d": 1}, "e": [null, {}]}));
    }

    #[test]
    fn test_from_json_ignores_unknown_fields() {
        let parsed: Payload =
            from_json(r#"{"id":1,"name":"one","extra":true}"#).unwrap();
        assert_eq!(parsed.id, 1);
        assert_eq!(parsed.note, None);
    }

    #[test]
    fn test_from_json_reports_errors() {
        let result: Result<Payload> = from_json("{not json");
        assert!(matches!(result, Err(Error::Json { .. })));
    }

    #[test]
    fn test_tree_helpers() {
        assert_eq!(create_node(), json!({}));
        assert_eq!(create_array(), json!([]));
        assert_eq!(from_str(r#"{"a":[1,2]}"#).unwrap(), json!({"a": [1, 2]}));
        assert_eq!(
            to_value(&payload()).unwrap(),
            json!({"id": 7, "name": "seven", "note": null})
        );
    }

    #[test]
    fn test_merge() {
        let first = json!({"a": 1, "b": 1});
        let second = json!({"b": 2, "c": {"nested": true}});
        let ignored = json!(null);

        let merged = merge([&first, &ignored, &second]);
        assert_eq!(merged, json!({"a": 1, "b": 2, "c": {"nested": true}}));
        assert_eq!(merge(std::iter::empty()), json!({}));
    }

    #[test]
    fn test_parser_round_trip_with_root() {
        let parser = JsonParser::<Payload>::builder()
            .with_root("payload")
            .skip_nulls(true)
            .build();

        let written = parser.write(&payload()).unwrap();
        assert_eq!(written, r#"{"payload":{"id":7,"name":"seven"}}"#);
        assert_eq!(parser.read(&written).unwrap(), payload());

        let missing = parser.read(r#"{"other":{}}"#);
        assert!(matches!(missing, Err(Error::Json { .. })));
    }

    #[test]
    fn test_parser_read_all() {
        let parser = JsonParser::<Payload>::builder().build();
        let stream = r#"{"id":1,"name":"a"} {"id":2,"name":"b"}
            {"id":3,"name":"c","note":"x"}"#;

        let values = parser.read_all(stream).unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[2].note.as_deref(), Some("x"));

        assert!(parser.read_all("").unwrap().is_empty());
        assert!(parser.read_all(r#"{"id":1,"name":"a"} {"#).is_err());
    }

    #[test]
    fn test_parser_read_all_unwraps_top_level_array() {
        let parser = JsonParser::<Payload>::builder().build();
        let stream = r#"[{"id":1,"name":"a"},{"id":2,"name":"b"}] {"id":3,"name":"c"}"#;

        let ids: Vec<u32> = parser
            .read_all(stream)
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(parser.read_all("[]").unwrap().is_empty());
    }

    #[test]
    fn test_to_json_keeps_field_order() {
        #[derive(Serialize)]
        struct Employee {
            name: String,
            email: String,
            age: u32,
        }

        let employee = Employee {
            name: "Ravi".to_string(),
            email: "r@d".to_string(),
            age: 21,
        };
        assert_eq!(
            to_json(&employee).unwrap(),
            r#"{"name":"Ravi","email":"r@d","age":21}"#
        );
    }

    #[test]
    fn test_to_json_keeps_map_insertion_order() {
        let mut headers = crate::collection::MultiValueMap::new();
        headers.add("zeta".to_string(), 1);
        headers.add("alpha".to_string(), 2);
        assert_eq!(to_json(&headers).unwrap(), r#"{"zeta":[1],"alpha":[2]}"#);

        let merged = merge([&json!({"z": 1, "b": 1}), &json!({"a": 2, "b": 2})]);
        assert_eq!(
            serde_json::to_string(&merged).unwrap(),
            r#"{"z":1,"b":2,"a":2}"#
        );
    }

    #[test]
    fn test_parser_read_reader() {
        let parser = JsonParser::<Payload>::builder().build();
        let bytes = br#"{"id":9,"name":"nine"}"#;
        let value = parser.read_reader(&bytes[..]).unwrap();
        assert_eq!(value.id, 9);
    }

    #[test]
    fn test_parser_pretty_and_nulls() {
        let parser = JsonParser::<Payload>::builder()
            .skip_nulls(false)
            .pretty(true)
            .build();
        let written = parser.write(&payload()).unwrap();
        assert!(written.contains('\n'));
        assert!(written.contains("\"note\": null"));
    }

    #[test]
    fn test_to_json_with_root() {
        let json = to_json_with_root("items", &vec![1, 2, 3]).unwrap();
        assert_eq!(json, r#"{"items":[1,2,3]}"#);
    }
}
