//! Parameter names recovered from rendered help text
//!
//! Last-resort fallback for callables that refuse introspection: the help page
//! usually starts with a call line such as `foo(a, b [, c])`.

/// Parameter names from the first line of `text` that starts with `name(`.
///
/// Returns `None` when no such line exists. The closing `)` ends the list and
/// keeps the last name, so `foo(a, b)` yields both. A bare `*` or a leading `.`
/// (as in `...`) ends it and drops the token in progress. An optional group
/// opened by `[` and followed by `,` also ends it. Tokens containing `=`
/// (keyword defaults) are dropped.
pub fn parse_arguments(text: &str, name: &str) -> Option<Vec<String>> {
    let opener = format!("{}(", name);
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&opener))?;
    let argument_part = &line[opener.len()..];

    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut after_bracket = false;

    for ch in argument_part.chars() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            } else {
                current.push(ch);
            }
            after_bracket = false;
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' => {
                after_bracket = true;
                continue;
            }
            // `foo(required [, optional])` ends the required list
            ',' if after_bracket => {
                arguments.push(current.trim().to_string());
                current.clear();
                break;
            }
            // the token before `)` is the last required name
            ')' => break,
            '*' => {
                current.clear();
                break;
            }
            '.' if current.trim().is_empty() => {
                current.clear();
                break;
            }
            ',' => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
        after_bracket = false;
    }

    if !current.trim().is_empty() {
        arguments.push(current.trim().to_string());
    }

    Some(
        arguments
            .into_iter()
            .filter(|arg| !arg.is_empty() && !arg.contains('='))
            .collect(),
    )
}
