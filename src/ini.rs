//! Minimal reader for setuptools' INI-style `setup.cfg`
//!
//! Follows the parsing rules setuptools itself relies on:
//! - `[section]` headers; `[DEFAULT]` values are visible from every section
//! - `key = value` or `key: value`, keys folded to lowercase
//! - full-line comments starting with `#` or `;` (no inline comments)
//! - lines indented deeper than their key continue the previous value and are
//!   joined with `\n`; blank lines inside a value are kept, trailing ones dropped
//! - duplicate sections or keys are errors

use crate::error::ParseFailure;
use std::collections::BTreeMap;

const DEFAULT_SECTION: &str = "DEFAULT";

/// A parsed INI document
#[derive(Debug, Default)]
pub struct Ini {
    defaults: BTreeMap<String, String>,
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl Ini {
    pub fn parse(content: &str) -> Result<Self, ParseFailure> {
        let mut parser = Parser::default();
        for (idx, line) in content.lines().enumerate() {
            parser.line(idx + 1, line)?;
        }
        Ok(parser.finish())
    }

    /// Value of `key` in `section`, falling back to `[DEFAULT]`.
    ///
    /// Returns `None` when the section does not exist.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let values = self.sections.get(section)?;
        let key = key.to_lowercase();
        values
            .get(&key)
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }
}

/// Where values are currently being collected
enum Target {
    Defaults,
    Section(String),
}

#[derive(Default)]
struct Parser {
    ini: Ini,
    target: Option<Target>,
    /// Key whose value continuation lines extend, with its line parts
    key: Option<String>,
    parts: Vec<String>,
    indent: usize,
}

impl Parser {
    fn line(&mut self, number: usize, raw: &str) -> Result<(), ParseFailure> {
        let trimmed = raw.trim();

        if trimmed.starts_with('#') || trimmed.starts_with(';') {
            return Ok(());
        }

        if trimmed.is_empty() {
            if self.key.is_some() {
                self.parts.push(String::new());
            } else {
                self.indent = usize::MAX;
            }
            return Ok(());
        }

        let indent = raw.len() - raw.trim_start().len();
        if self.key.is_some() && indent > self.indent {
            self.parts.push(trimmed.to_string());
            return Ok(());
        }

        self.flush();
        self.indent = indent;

        if let Some(rest) = trimmed.strip_prefix('[')
            && let Some(end) = rest.rfind(']')
            && end > 0
        {
            return self.section(number, &rest[..end]);
        }

        let Some(target) = &self.target else {
            return Err(error(number, "option line before any section header"));
        };

        let Some(split) = trimmed.find(['=', ':']) else {
            return Err(error(number, format!("no '=' or ':' in {:?}", trimmed)));
        };
        let key = trimmed[..split].trim_end().to_lowercase();
        if key.is_empty() {
            return Err(error(number, "empty option name"));
        }

        let values = match target {
            Target::Defaults => &self.ini.defaults,
            Target::Section(name) => &self.ini.sections[name],
        };
        if values.contains_key(&key) {
            return Err(error(number, format!("duplicate option {:?}", key)));
        }

        self.parts.push(trimmed[split + 1..].trim().to_string());
        self.key = Some(key);
        Ok(())
    }

    fn section(&mut self, number: usize, name: &str) -> Result<(), ParseFailure> {
        if name == DEFAULT_SECTION {
            self.target = Some(Target::Defaults);
            return Ok(());
        }
        if self.ini.sections.contains_key(name) {
            return Err(error(number, format!("duplicate section {:?}", name)));
        }
        self.ini.sections.insert(name.to_string(), BTreeMap::new());
        self.target = Some(Target::Section(name.to_string()));
        Ok(())
    }

    /// Store the value collected for the current key.
    fn flush(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        let value = self.parts.join("\n").trim_end().to_string();
        self.parts.clear();

        let values = match &self.target {
            Some(Target::Defaults) => &mut self.ini.defaults,
            Some(Target::Section(name)) => match self.ini.sections.get_mut(name) {
                Some(values) => values,
                None => return,
            },
            None => return,
        };
        values.insert(key, value);
    }

    fn finish(mut self) -> Ini {
        self.flush();
        self.ini
    }
}

fn error(line: usize, message: impl Into<String>) -> ParseFailure {
    ParseFailure::Ini {
        line,
        message: message.into(),
    }
}
