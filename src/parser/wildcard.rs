/// Rewrite legacy `{{ expr }}` template wildcards to `{{{ expr }}}`
///
/// A double-brace expression is rewritten only when it is not flanked by an
/// extra brace on either side, so expressions that are already triple-braced
/// (or otherwise irregular brace runs) are left untouched. The transform is
/// total and idempotent.
///
/// # Examples
/// ```
/// use layout2scene::parser::convert_wildcards;
///
/// assert_eq!(convert_wildcards("Hi {{ name }}!"), "Hi {{{ name }}}!");
/// assert_eq!(convert_wildcards("Hi {{{ name }}}!"), "Hi {{{ name }}}!");
/// ```
pub fn convert_wildcards(input: &str) -> String {
    let mut output = String::with_capacity(input.len() + 8);
    let mut rest = input;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let from_brace = &rest[start..];

        // Length of the run of opening braces
        let open_run = from_brace.chars().take_while(|&c| c == '{').count();
        let after_open = &from_brace[open_run..];

        if open_run != 2 {
            output.push_str(&from_brace[..open_run]);
            rest = after_open;
            continue;
        }

        match find_closing(after_open) {
            Some(inner_len) => {
                output.push_str("{{{");
                output.push_str(&after_open[..inner_len]);
                output.push_str("}}}");
                rest = &after_open[inner_len + 2..];
            }
            None => {
                output.push_str("{{");
                rest = after_open;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Find the byte length of the expression body before an exact `}}` run
///
/// Returns `None` when the body contains a brace, is blank, or is closed by a
/// run of braces other than exactly two.
fn find_closing(body: &str) -> Option<usize> {
    let end = body.find(['{', '}'])?;
    let inner = &body[..end];
    if inner.trim().is_empty() {
        return None;
    }

    let close_run = body[end..].chars().take_while(|&c| c == '}').count();
    if close_run == 2 {
        Some(end)
    } else {
        None
    }
}

/// Check whether a value contains a template wildcard expression
pub fn is_wildcard(value: &str) -> bool {
    match value.find("{{") {
        Some(start) => value[start + 2..].contains("}}"),
        None => false,
    }
}
