//! Identifier and case helpers for generated TypeScript

/// TypeScript reserved words that cannot be used as bare identifiers
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "let", "static", "implements",
    "interface", "package", "private", "protected", "public", "await", "async",
];

/// Split a name into words on separators, lower→upper transitions and
/// acronym boundaries (`HTTPServer` → `HTTP`, `Server`).
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Capitalize the first letter of a string
pub fn capitalize(s: &str) -> String {
    capitalize_word(s)
}

/// `get_user-by id` → `getUserById`
pub fn to_camel_case(s: &str) -> String {
    let words = split_words(s);
    let mut result = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            result.push_str(&word.to_lowercase());
        } else {
            result.push_str(&capitalize_word(&word.to_lowercase()));
        }
    }
    result
}

/// `user profile` → `UserProfile`; inner casing of each word is preserved
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize_word(w)).collect()
}

/// `MyApiTitle` → `my-api-title`, `user_management` → `user-management`
pub fn to_kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Format a component name into a TypeScript type name (`Page«User»` → `PageUser`)
pub fn format_type_name(name: &str) -> String {
    let formatted: String = name
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|part| !part.is_empty())
        .map(capitalize_word)
        .collect();

    if formatted.is_empty() {
        return "UnnamedType".to_string();
    }
    if formatted.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{formatted}");
    }
    formatted
}

/// Make a name usable as a TypeScript identifier (camelCase, reserved words
/// and leading digits escaped with `_`).
pub fn sanitize_identifier(name: &str) -> String {
    let mut result = to_camel_case(name);
    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result = format!("_{result}");
    }
    if RESERVED_WORDS.contains(&result.as_str()) {
        result = format!("_{result}");
    }
    result
}

/// Whether a property key must be quoted in an object type
pub fn needs_quoting(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for a double-quoted JavaScript literal
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Quote a property key when needed
pub fn quote_property_key(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}
