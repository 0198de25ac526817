//! Query string manipulation for signing and validation.
//!
//! These functions work on raw strings rather than a parsed URL type: the input only has to
//! support query-parameter round-tripping, not be a valid absolute URL. Components that are not
//! touched by an operation are copied through byte-for-byte, so stripping the parameters added by
//! [`add_query_parameters`] recovers the exact string that was signed.

use {
    crate::constants::HEX_DIGITS_UPPER,
    log::trace,
    qualifier_attr::qualifiers,
    std::{borrow::Cow, collections::HashMap},
};

/// A URL broken into the part before the query, the query itself, and the fragment.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct UrlParts<'a> {
    /// Everything before the `?` (or the `#` if there is no query).
    pub base: &'a str,

    /// The query string without the leading `?`, if a `?` is present.
    pub query: Option<&'a str>,

    /// The fragment without the leading `#`, if a `#` is present.
    pub fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    /// Split a URL. The fragment starts at the first `#`; the query starts at the first `?` before
    /// the fragment.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn split(url: &'a str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (url, None),
        };

        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (rest, None),
        };

        UrlParts {
            base,
            query,
            fragment,
        }
    }

    /// Split the query string into raw components, skipping empty ones.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn components(&self) -> Vec<QueryComponent<'a>> {
        match self.query {
            None => Vec::new(),
            Some(query) => query.split('&').filter(|c| !c.is_empty()).map(QueryComponent::parse).collect(),
        }
    }

    /// Reassemble a URL from the base, the given query components, and the fragment. No `?` is
    /// emitted if there are no components.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn rebuild(&self, components: &[QueryComponent<'_>]) -> String {
        let mut result = String::with_capacity(
            self.base.len()
                + components.iter().map(|c| c.raw.len() + 1).sum::<usize>()
                + self.fragment.map_or(0, |f| f.len() + 1),
        );
        result.push_str(self.base);

        for (i, component) in components.iter().enumerate() {
            result.push(if i == 0 {
                '?'
            } else {
                '&'
            });
            result.push_str(&component.raw);
        }

        if let Some(fragment) = self.fragment {
            result.push('#');
            result.push_str(fragment);
        }

        result
    }
}

/// A single `key=value` component of a query string.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone, Debug, Eq, PartialEq)]
struct QueryComponent<'a> {
    /// The component exactly as it appears (or will appear) in the URL.
    pub raw: Cow<'a, str>,

    /// The percent-decoded key.
    pub key: String,

    /// The percent-decoded value; empty if the component has no `=`.
    pub value: String,
}

impl<'a> QueryComponent<'a> {
    /// Parse a raw `key=value` component, borrowing it as-is.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn parse(raw: &'a str) -> Self {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        QueryComponent {
            raw: Cow::Borrowed(raw),
            key: decode_query_element(key),
            value: decode_query_element(value),
        }
    }

    /// Build an encoded component from a decoded key and value.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(key: &str, value: &str) -> Self {
        QueryComponent {
            raw: Cow::Owned(format!("{}={}", encode_query_element(key), encode_query_element(value))),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Decoded query parameters, in the order their keys first appear in the URL.
///
/// Keys are unique. If a key appears more than once, the value from its last occurrence is kept.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryParameters {
    entries: Vec<(String, String)>,
}

impl QueryParameters {
    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Indicates whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates whether the query string had no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the query string of `url` into [`QueryParameters`].
///
/// A URL without a query string yields an empty map. Parsing never fails: malformed percent
/// escapes are kept literally and invalid UTF-8 is replaced with U+FFFD.
pub fn query_parameters(url: &str) -> QueryParameters {
    let parts = UrlParts::split(url);
    let mut entries: Vec<(String, String)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for component in parts.components() {
        match positions.get(&component.key) {
            Some(&i) => entries[i].1 = component.value,
            None => {
                positions.insert(component.key.clone(), entries.len());
                entries.push((component.key, component.value));
            }
        }
    }

    QueryParameters {
        entries,
    }
}

/// Set each of `parameters` on `url`, overwriting parameters with the same key.
///
/// An overwritten parameter keeps the position of its first occurrence and any later duplicates
/// are dropped. New parameters are appended in the order given. Untouched components and the
/// fragment are copied through unchanged.
pub fn add_query_parameters<I, K, V>(url: &str, parameters: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let parts = UrlParts::split(url);
    let mut components = parts.components();

    for (key, value) in parameters {
        let (key, value) = (key.as_ref(), value.as_ref());
        let replacement = QueryComponent::new(key, value);

        match components.iter().position(|c| c.key == key) {
            Some(first) => {
                components[first] = replacement;
                let mut i = 0;
                components.retain(|c| {
                    let keep = i <= first || c.key != key;
                    i += 1;
                    keep
                });
            }
            None => components.push(replacement),
        }
    }

    let result = parts.rebuild(&components);
    trace!("add_query_parameters: {} -> {}", url, result);
    result
}

/// Remove every occurrence of each parameter in `names` from `url`.
///
/// Names are compared against decoded keys. Remaining components and the fragment are copied
/// through unchanged; if nothing remains in the query, the `?` is removed as well.
pub fn without_parameters<I, S>(url: &str, names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<S> = names.into_iter().collect();
    let parts = UrlParts::split(url);
    let mut components = parts.components();
    components.retain(|c| !names.iter().any(|n| n.as_ref() == c.key));
    parts.rebuild(&components)
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Convert a byte to uppercase hex representation.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}

/// Percent-encode a key or value for a query string. Unreserved characters are left alone;
/// everything else, including spaces, becomes `%XX`.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn encode_query_element(element: &str) -> String {
    let mut result = String::with_capacity(element.len());
    for c in element.bytes() {
        if is_rfc3986_unreserved(c) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }
    result
}

/// Decode a percent-encoded key or value from a query string.
///
/// `+` decodes to a space. A `%` that is not followed by two hex digits is kept as-is.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn decode_query_element(element: &str) -> String {
    let bytes = element.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' && i + 3 <= bytes.len() {
            if let Ok(value) = hex::decode(&bytes[i + 1..i + 3]) {
                result.push(value[0]);
                i += 3;
                continue;
            }
        }

        result.push(if c == b'+' {
            b' '
        } else {
            c
        });
        i += 1;
    }

    String::from_utf8_lossy(&result).into_owned()
}
