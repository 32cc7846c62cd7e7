//! URL templates expanded per item into extra candidate sources.
//!
//! Supported placeholders:
//! - `{title}`: words capitalized and joined by `-` (`Bench Press` -> `Bench-Press`)
//! - `{kebab}`: the normalized cache name (`Bench Press` -> `bench-press`)

use crate::utils::files::normalize_name;

/// Capitalize the first letter of each whitespace separated word, lower-case
/// the rest, and join the words with `-`.
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Fill one template for `name`.
pub fn expand(template: &str, name: &str) -> String {
    let url = template
        .replace("{title}", &title_case(name))
        .replace("{kebab}", &normalize_name(name));
    tidy_hyphens(&url)
}

/// Fill every template for `name`, keeping template order.
pub fn expand_all(templates: &[String], name: &str) -> Vec<String> {
    templates.iter().map(|t| expand(t, name)).collect()
}

// Names like "Pull-ups -" leave doubled or dangling hyphens behind.
fn tidy_hyphens(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_end_matches('-').to_string()
}
