//! Helpers for composing TypeScript type expressions

/// Split an expression into its top-level union members.
///
/// Bars nested inside brackets, generics or string literals are not split
/// points, so `Record<string, A | B> | null` yields two members.
pub fn split_union(expr: &str) -> Vec<&str> {
    split_top_level(expr, '|')
}

/// Whether the expression is a union or intersection at the top level
pub fn is_compound(expr: &str) -> bool {
    split_top_level(expr, '|').len() > 1 || split_top_level(expr, '&').len() > 1
}

/// Append a member unless an identical one is already present
pub fn push_unique(members: &mut Vec<String>, member: &str) {
    if !members.iter().any(|m| m == member) {
        members.push(member.to_string());
    }
}

/// Join members into a union, flattening nested unions and dropping duplicates
pub fn union_of<I, S>(members: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut union = Vec::new();
    for member in members {
        for part in split_union(member.as_ref()) {
            push_unique(&mut union, part);
        }
    }
    union
}

/// Wrap a compound expression in parentheses, e.g. before appending `[]`
pub fn parenthesize(expr: &str) -> String {
    if is_compound(expr) {
        format!("({})", expr)
    } else {
        expr.to_string()
    }
}

fn split_top_level(expr: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in expr.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' | '`' => quote = Some(ch),
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(expr[start..].trim());

    parts.retain(|p| !p.is_empty());
    parts
}
