use std::borrow::Cow;

/// Removes line and block comments from script source.
///
/// Quoted strings and template literals are copied through untouched, so
/// comment markers inside them survive. Line breaks inside removed comments
/// are kept. Regular expression literals are not recognized.
pub fn strip_comments(source: &str) -> Cow<'_, str> {
    if !source.contains("//") && !source.contains("/*") {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                out.push(c);
                while let Some(inner) = chars.next() {
                    out.push(inner);
                    if inner == '\\' {
                        if let Some(escaped) = chars.next() {
                            out.push(escaped);
                        }
                    } else if inner == c || (inner == '\n' && c != '`') {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'/') => {
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    if inner == '\n' {
                        out.push('\n');
                    }
                    prev = inner;
                }
            }
            _ => out.push(c),
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_without_comments_is_borrowed() {
        let source = "const a = 1 / 2;";
        assert!(matches!(strip_comments(source), Cow::Borrowed(_)));
    }

    #[test]
    fn removes_line_and_block_comments() {
        let source = "a; // @Inject()\nb; /* @Component\n */ c;";
        assert_eq!(strip_comments(source), "a; \nb; \n c;");
    }

    #[test]
    fn keeps_markers_inside_strings() {
        let source = r#"const url = "http://x/*y*/"; const t = `// @Tag`;"#;
        assert_eq!(strip_comments(source), source);
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let source = r#"const s = "a\"//b"; // gone"#;
        assert_eq!(strip_comments(source), r#"const s = "a\"//b"; "#);
    }

    #[test]
    fn unterminated_block_comment_runs_to_end() {
        assert_eq!(strip_comments("x /* @Foo"), "x ");
    }
}
