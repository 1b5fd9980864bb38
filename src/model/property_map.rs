//! PropertyMap: the key-value store on nodes and relationships.

use super::Value;

/// A map of property names to values.
pub type PropertyMap = hashbrown::HashMap<String, Value>;

/// Build a PropertyMap from `(key, value)` pairs.
pub fn props<K, V, I>(pairs: I) -> PropertyMap
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Typed property access with a default fallback, shared by nodes and
/// relationships.
pub trait PropertyAccess {
    fn properties(&self) -> &PropertyMap;

    fn float_or(&self, key: &str, default: f64) -> f64 {
        self.properties().get(key).and_then(Value::as_float).unwrap_or(default)
    }

    fn int_or(&self, key: &str, default: i64) -> i64 {
        self.properties().get(key).and_then(Value::as_int).unwrap_or(default)
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        self.properties().get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.properties().get(key).and_then(Value::as_str).unwrap_or(default)
    }
}
