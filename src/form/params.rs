//! The decoded parameter map.

use std::borrow::Cow;
use std::collections::HashMap;

/// Parameters decoded from a form body.
///
/// Every name maps to the values it was submitted with, in arrival order.
/// Names are case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    inner: HashMap<String, Vec<String>>,
}

impl ParameterMap {
    /// Decode an `&`-separated list of `name=value` definitions.
    ///
    /// A definition without `=` is a name with an empty value. Only the value
    /// side is decoded: `+` becomes a space and `%XX` escapes are read as
    /// UTF-8 bytes (invalid sequences become U+FFFD).
    pub fn decode(raw: &[u8]) -> Self {
        let mut map = Self::default();

        for definition in raw.split(|&b| b == b'&') {
            if definition.is_empty() {
                continue;
            }

            let (name, value) = match definition.iter().position(|&b| b == b'=') {
                Some(eq) => (&definition[..eq], decode_value(&definition[eq + 1..])),
                None => (definition, String::new()),
            };

            map.push(String::from_utf8_lossy(name).into_owned(), value);
        }

        map
    }

    /// Append a value for `name`, creating the sequence on first use.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.entry(name.into()).or_default().push(value.into());
    }

    /// All values submitted for `name`.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// The first value submitted for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn decode_value(raw: &[u8]) -> String {
    let raw: Cow<'_, [u8]> = if raw.contains(&b'+') {
        Cow::Owned(
            raw.iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(raw)
    };

    let bytes = urlencoding::decode_binary(&raw);
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(map: &ParameterMap, name: &str) -> Vec<String> {
        map.get(name).map(<[String]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn test_repeated_names_keep_order() {
        let map = ParameterMap::decode(b"a=1&b=2&a=3");
        assert_eq!(map.len(), 2);
        assert_eq!(values(&map, "a"), vec!["1", "3"]);
        assert_eq!(values(&map, "b"), vec!["2"]);
    }

    #[test]
    fn test_empty_payload() {
        assert!(ParameterMap::decode(b"").is_empty());
    }

    #[test]
    fn test_name_without_value() {
        let map = ParameterMap::decode(b"flag");
        assert_eq!(values(&map, "flag"), vec![""]);
        assert_eq!(map.first("flag"), Some(""));
    }

    #[test]
    fn test_value_is_percent_decoded() {
        let map = ParameterMap::decode(b"x=%20y");
        assert_eq!(map.first("x"), Some(" y"));

        let map = ParameterMap::decode(b"js_code=var+a%3D%27%C3%A9%27%3B");
        assert_eq!(map.first("js_code"), Some("var a='é';"));
    }

    #[test]
    fn test_name_is_not_decoded() {
        let map = ParameterMap::decode(b"js%5Fcode=1&a+b=2");
        assert!(!map.contains("js_code"));
        assert_eq!(map.first("js%5Fcode"), Some("1"));
        assert_eq!(map.first("a+b"), Some("2"));
    }

    #[test]
    fn test_only_first_equals_splits() {
        let map = ParameterMap::decode(b"expr=a=b&empty=");
        assert_eq!(map.first("expr"), Some("a=b"));
        assert_eq!(map.first("empty"), Some(""));
    }

    #[test]
    fn test_empty_definitions_are_skipped() {
        let map = ParameterMap::decode(b"a=1&&b=2&");
        assert_eq!(map.len(), 2);
        assert!(!map.contains(""));
    }

    #[test]
    fn test_malformed_escapes_pass_through() {
        let map = ParameterMap::decode(b"a=100%&b=%zz&c=%C3");
        assert_eq!(map.first("a"), Some("100%"));
        assert_eq!(map.first("b"), Some("%zz"));
        assert_eq!(map.first("c"), Some("\u{FFFD}"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let map = ParameterMap::decode(b"JS_CODE=x");
        assert!(map.get("js_code").is_none());
    }
}
