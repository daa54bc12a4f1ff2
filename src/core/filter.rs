//! Input filtering applied to request parameters on read.

/// Sanitization hook run over parameter values when the caller asks for
/// filtered input.
pub trait ParamFilter: Send + Sync {
    fn filter(&self, value: &str) -> String;
}

/// Default filter: trims, drops control characters and escapes the
/// characters that break out of HTML text or attributes.
///
/// `&` is left alone so URLs with query strings survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlFilter;

impl ParamFilter for HtmlFilter {
    fn filter(&self, value: &str) -> String {
        let value = value.trim();
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#039;"),
                c if c.is_control() && c != '\n' && c != '\t' => {}
                c => out.push(c),
            }
        }
        out
    }
}

/// Pass-through filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFilter;

impl ParamFilter for NoFilter {
    fn filter(&self, value: &str) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_filter_escapes_markup() {
        let f = HtmlFilter;
        assert_eq!(
            f.filter(" <b onclick='x'>\"hi\"</b> "),
            "&lt;b onclick=&#039;x&#039;&gt;&quot;hi&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_html_filter_keeps_urls() {
        let f = HtmlFilter;
        assert_eq!(
            f.filter("http://example.com/a?x=1&y=2#top"),
            "http://example.com/a?x=1&y=2#top"
        );
    }

    #[test]
    fn test_html_filter_strips_control_chars() {
        assert_eq!(HtmlFilter.filter("a\u{0}b\u{7}c"), "abc");
    }

    #[test]
    fn test_no_filter() {
        assert_eq!(NoFilter.filter(" <x> "), " <x> ");
    }
}
