/// Replaces `{key}` placeholders with the given values in one left-to-right
/// pass. Substituted text is never rescanned; unknown `{...}` is left as is.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(tpl.len());
    let mut rest = tpl;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let key = &after[..close];
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (close, *v))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Log-safe truncation. Cuts on a char boundary so Devanagari text never panics.
pub fn trunc_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_every_placeholder() {
        let out = fill_template("{count} questions on {subject}, {count} total", &[
            ("count", "25"),
            ("subject", "PCB"),
        ]);
        assert_eq!(out, "25 questions on PCB, 25 total");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let out = fill_template("Subject: {subject} in {language}", &[
            ("subject", "PCB {language} {links}"),
            ("language", "Marathi"),
            ("links", "[x](y)"),
        ]);
        assert_eq!(out, "Subject: PCB {language} {links} in Marathi");
    }

    #[test]
    fn literal_braces_survive() {
        let out = fill_template("{\n  \"id\": {count} }", &[("count", "3")]);
        assert_eq!(out, "{\n  \"id\": 3 }");
    }

    #[test]
    fn truncates_multibyte_text_safely() {
        let marathi = "प्रश्न प्रश्न प्रश्न";
        let out = trunc_for_log(marathi, 4);
        assert!(out.starts_with("प"));
        assert!(out.contains("bytes total"));
        assert_eq!(trunc_for_log("short", 10), "short");
    }
}
