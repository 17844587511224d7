//! Escaping for report lines.

/// Escapes element text.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escapes an attribute or namespace declaration value.
///
/// Newlines become `&#10;` so every attribute stays on its report line.
pub fn escape_attribute(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\n' => result.push_str("&#10;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("say \"hi\"\n"), "say \"hi\"\n");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute("line one\n\"two\" & <three>"),
            "line one&#10;&quot;two&quot; &amp; &lt;three&gt;"
        );
    }
}
