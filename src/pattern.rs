//! Path template matching.
//!
//! Root markers declare the expected shape of the paths below them as
//! format-string style templates ("boards/{manufacturer}/{board}.toml").
//! A template compiles to a regular expression with one capture group per
//! `{field}` placeholder; matching a concrete relative path extracts the
//! field values. Placeholders match lazily and may span separators, so the
//! literal text between them decides where captures end.

use crate::error::PatternError;
use regex::Regex;

/// A compiled path template.
///
/// Supports two matching modes: `search` finds the template anywhere inside
/// the candidate (the cascade engine's mode) while `matches` requires the
/// whole candidate to fit the template (the tabulator's mode).
#[derive(Debug, Clone)]
pub struct PathTemplate {
    source: String,
    /// Field names in first-occurrence order.
    fields: Vec<String>,
    /// Internal regex group name -> declared field name, in template order.
    /// Repeated fields get distinct groups and must capture equal text.
    groups: Vec<(String, String)>,
    search: Regex,
    exact: Regex,
}

impl PathTemplate {
    /// Compile a template string. Placeholders are `{name}` (or `{}` for a
    /// match-only hole); `{{` and `}}` escape literal braces.
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let err = |reason: String| PatternError {
            template: template.to_string(),
            reason,
        };

        let mut body = String::new();
        let mut literal = String::new();
        let mut fields: Vec<String> = Vec::new();
        let mut groups: Vec<(String, String)> = Vec::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    body.push_str(&regex::escape(&literal));
                    literal.clear();

                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => name.push(ch),
                            Some(ch) => {
                                return Err(err(format!("unexpected '{}' in field name", ch)))
                            }
                            None => return Err(err("unterminated field".to_string())),
                        }
                    }
                    if name.is_empty() {
                        body.push_str("(?:.+?)");
                    } else {
                        if name.starts_with(|ch: char| ch.is_ascii_digit()) {
                            return Err(err(format!("field name '{}' starts with a digit", name)));
                        }
                        let group = format!("g{}", groups.len());
                        body.push_str(&format!("(?P<{}>.+?)", group));
                        groups.push((group, name.clone()));
                        if !fields.contains(&name) {
                            fields.push(name);
                        }
                    }
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        literal.push('}');
                    } else {
                        return Err(err("unmatched '}'".to_string()));
                    }
                }
                other => literal.push(other),
            }
        }
        body.push_str(&regex::escape(&literal));

        let search = Regex::new(&body)
            .map_err(|e| err(format!("regex compilation failed: {}", e)))?;
        let exact = Regex::new(&format!("^(?:{})$", body))
            .map_err(|e| err(format!("regex compilation failed: {}", e)))?;

        Ok(Self {
            source: template.to_string(),
            fields,
            groups,
            search,
            exact,
        })
    }

    /// First match anywhere in `text`, extracting named fields.
    pub fn search(&self, text: &str) -> Option<Vec<(String, String)>> {
        self.extract(&self.search, text)
    }

    /// Anchored match: the whole of `text` must fit the template.
    pub fn matches(&self, text: &str) -> Option<Vec<(String, String)>> {
        self.extract(&self.exact, text)
    }

    fn extract(&self, re: &Regex, text: &str) -> Option<Vec<(String, String)>> {
        re.captures_iter(text)
            .find_map(|caps| self.fields_from(&caps))
    }

    fn fields_from(&self, caps: &regex::Captures<'_>) -> Option<Vec<(String, String)>> {
        let mut out: Vec<(String, String)> = Vec::new();
        for (group, field) in &self.groups {
            let Some(m) = caps.name(group) else { continue };
            match out.iter().find(|(f, _)| f == field) {
                // A repeated field must capture the same text everywhere.
                Some((_, earlier)) if earlier != m.as_str() => return None,
                Some(_) => {}
                None => out.push((field.clone(), m.as_str().to_string())),
            }
        }
        Some(out)
    }

    /// Field names declared by this template, first occurrence first.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The original template string.
    pub fn source(&self) -> &str {
        &self.source
    }
}
