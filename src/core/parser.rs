//! Query string, form body and cookie header parsing.

use std::borrow::Cow;

/// Key-value pair list (faster than HashMap for small collections).
///
/// Duplicate keys are kept; lookups take the last occurrence.
pub type ParamList = Vec<(String, String)>;

/// Percent decode, returning the input untouched when nothing is encoded.
#[inline]
pub fn fast_percent_decode(s: &str) -> Cow<'_, str> {
    if s.contains('%') {
        Cow::Owned(
            percent_encoding::percent_decode_str(s)
                .decode_utf8_lossy()
                .into_owned(),
        )
    } else {
        Cow::Borrowed(s)
    }
}

/// Decode a form component: `+` is a space, then percent decoding.
#[inline]
fn form_decode(s: &str) -> String {
    if s.contains('+') {
        fast_percent_decode(&s.replace('+', " ")).into_owned()
    } else {
        fast_percent_decode(s).into_owned()
    }
}

/// Parse a query string or `application/x-www-form-urlencoded` body.
pub fn parse_query_string(query: &str) -> ParamList {
    let pair_count = query.matches('&').count() + 1;
    let mut params = Vec::with_capacity(pair_count.min(16));

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, ""),
        };

        if !key.is_empty() {
            params.push((form_decode(key), form_decode(value)));
        }
    }

    params
}

/// Parse a Cookie header into name-value pairs.
pub fn parse_cookies(cookie_header: &str) -> ParamList {
    let mut cookies = Vec::new();

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        let Some(pos) = cookie.find('=') else {
            continue;
        };
        let name = cookie[..pos].trim();
        if !name.is_empty() {
            cookies.push((
                name.to_string(),
                fast_percent_decode(cookie[pos + 1..].trim()).into_owned(),
            ));
        }
    }

    cookies
}

/// Flatten the top level of a JSON object body into string parameters.
/// Nested values keep their JSON text.
pub fn parse_json_body(body: &[u8]) -> ParamList {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_slice::<serde_json::Value>(body)
    else {
        return Vec::new();
    };

    map.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

/// Find the last value stored under `name`.
#[inline]
pub fn lookup<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string() {
        let params = parse_query_string("id=5&name=hello%20world&q=a+b&flag&=skip");
        assert_eq!(
            params,
            vec![
                ("id".to_string(), "5".to_string()),
                ("name".to_string(), "hello world".to_string()),
                ("q".to_string(), "a b".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_lookup_last_wins() {
        let params = parse_query_string("a=1&a=2");
        assert_eq!(lookup(&params, "a"), Some("2"));
        assert_eq!(lookup(&params, "b"), None);
    }

    #[test]
    fn test_parse_cookies() {
        let cookies = parse_cookies("refer=%2Flist; sid=abc ; broken; =x");
        assert_eq!(
            cookies,
            vec![
                ("refer".to_string(), "/list".to_string()),
                ("sid".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_json_body() {
        let params = parse_json_body(br#"{"name":"x","n":3,"skip":null,"tags":["a"]}"#);
        assert_eq!(
            params,
            vec![
                ("name".to_string(), "x".to_string()),
                ("n".to_string(), "3".to_string()),
                ("tags".to_string(), r#"["a"]"#.to_string()),
            ]
        );
        assert!(parse_json_body(b"[1,2]").is_empty());
    }
}
