//! Environment variable expansion for path patterns

use std::collections::HashMap;

/// Expands `${VAR}` references in `input` using the supplied environment map.
///
/// References to variables absent from the map are left verbatim, matching
/// how build hosts expand job parameters. Malformed references (no closing
/// brace) are also left untouched.
#[must_use]
pub fn expand_vars(input: &str, env: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match env.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
