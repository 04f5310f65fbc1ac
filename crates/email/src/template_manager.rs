//! Markdown email templates
//!
//! A rendered email is `header.md`, the interpolated body template and
//! `footer.md` joined by newlines, converted to HTML and given inline styles
//! so that mail clients without stylesheet support still display it sensibly.

use crate::error::{EmailError, EmailResult};
use once_cell::sync::Lazy;
use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const HEADER_TEMPLATE: &str = "header.md";
const FOOTER_TEMPLATE: &str = "footer.md";

const BODY_STYLE: &str = "font-family: Arial, sans-serif; font-size: 16px; color: #333333; background-color: #ffffff; line-height: 1.5;";

const ELEMENT_STYLES: &[(&str, &str)] = &[
    (
        "h1",
        "font-size: 24px; color: #333333; font-weight: bold; margin-top: 20px; margin-bottom: 10px;",
    ),
    ("p", "font-size: 16px; color: #666666; margin: 10px 0; line-height: 1.6;"),
    ("a", "color: #0056b3; text-decoration: none; font-weight: bold;"),
    ("footer", "font-size: 12px; color: #777777; padding: 20px 0;"),
    ("ul", "list-style-type: none; padding: 0;"),
    ("li", "margin-bottom: 10px;"),
];

/// Opening tags of the styled elements, bare or followed by attributes.
static STYLED_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(h1|p|a|footer|ul|li)([\s>])").expect("styled tag pattern is valid")
});

fn element_style(tag: &str) -> Option<&'static str> {
    ELEMENT_STYLES
        .iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, style)| *style)
}

/// Where template fragments come from.
pub trait TemplateSource: Send + Sync {
    /// Return the full text of `filename`.
    fn read(&self, filename: &str) -> EmailResult<String>;

    /// Directory backing this source, if any.
    fn root(&self) -> Option<&Path> {
        None
    }
}

/// Reads templates from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    dir: PathBuf,
}

impl FileTemplateSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateSource for FileTemplateSource {
    fn read(&self, filename: &str) -> EmailResult<String> {
        let path = self.dir.join(filename);
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => EmailError::TemplateNotFound { path },
            _ => EmailError::Io { path, source },
        })
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

/// In-memory templates keyed by filename.
#[derive(Debug, Clone, Default)]
pub struct StaticTemplateSource {
    templates: HashMap<String, String>,
}

impl StaticTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filename: impl Into<String>, contents: impl Into<String>) -> Self {
        self.templates.insert(filename.into(), contents.into());
        self
    }
}

impl TemplateSource for StaticTemplateSource {
    fn read(&self, filename: &str) -> EmailResult<String> {
        self.templates
            .get(filename)
            .cloned()
            .ok_or_else(|| EmailError::TemplateNotFound {
                path: PathBuf::from(filename),
            })
    }
}

/// Named values substituted into `{key}` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, String>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateContext
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = TemplateContext::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}

/// Renders email bodies from Markdown fragments.
#[derive(Clone)]
pub struct TemplateManager {
    source: Arc<dyn TemplateSource>,
}

impl TemplateManager {
    /// Templates are read from `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self::with_source(FileTemplateSource::new(templates_dir))
    }

    pub fn with_source(source: impl TemplateSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn templates_dir(&self) -> Option<&Path> {
        self.source.root()
    }

    pub fn read_template(&self, filename: &str) -> EmailResult<String> {
        self.source.read(filename)
    }

    /// Wrap `html` in the styled container and add inline styles to known elements.
    pub fn apply_email_styles(&self, html: &str) -> String {
        let styled = STYLED_TAG_REGEX.replace_all(html, |caps: &Captures<'_>| {
            let tag = &caps[1];
            match element_style(tag) {
                Some(style) => format!("<{tag} style=\"{style}\"{}", &caps[2]),
                None => caps[0].to_string(),
            }
        });
        format!("<div style=\"{BODY_STYLE}\">{styled}</div>")
    }

    /// Render `<name>.md` between the shared header and footer.
    pub fn render_template(&self, name: &str, context: &TemplateContext) -> EmailResult<String> {
        let header = self.read_template(HEADER_TEMPLATE)?;
        let footer = self.read_template(FOOTER_TEMPLATE)?;
        let body = self.read_template(&format!("{name}.md"))?;

        let body = interpolate(&body, context)?;
        let markdown = format!("{header}\n{body}\n{footer}");
        let html = markdown_to_html(&markdown);

        debug!(template = name, "rendered email template");
        Ok(self.apply_email_styles(&html))
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html, parser);
    html
}

/// Replace `{key}` placeholders. `{{` and `}}` produce literal braces.
pub fn interpolate(template: &str, context: &TemplateContext) -> EmailResult<String> {
    let mut output = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                output.push('{');
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some((_, '}')) => break,
                        Some((_, '{')) | None => {
                            return Err(EmailError::MalformedTemplate {
                                position,
                                reason: "unclosed placeholder",
                            })
                        }
                        Some((_, c)) => key.push(c),
                    }
                }
                let key = key.trim();
                if key.is_empty() {
                    return Err(EmailError::MalformedTemplate {
                        position,
                        reason: "empty placeholder",
                    });
                }
                let value = context
                    .get(key)
                    .ok_or_else(|| EmailError::MissingVariable(key.to_string()))?;
                output.push_str(value);
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                output.push('}');
            }
            '}' => {
                return Err(EmailError::MalformedTemplate {
                    position,
                    reason: "unmatched closing brace",
                })
            }
            other => output.push(other),
        }
    }

    Ok(output)
}
