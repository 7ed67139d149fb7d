//! Markup produced by theming units: the nested wrapper element and the
//! global stylesheet.
//!
//! Both are rendered with minijinja. The wrapper template is named with an
//! `.html` extension so its class attribute is HTML-escaped.

use minijinja::{context, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ThemeError;
use crate::theme::{ColorMode, ResolvedTheme, ThemeName};

static ENVIRONMENT: Lazy<Environment<'static>> = Lazy::new(Environment::new);

const WRAPPER_TEMPLATE: &str = r#"<div class="{{ class_name }}">{{ children|safe }}</div>"#;

const GLOBAL_STYLES_TEMPLATE: &str = r#"
{%- for block in blocks %}
{{ block.selector }} {
{%- for name, value in block.variables %}
  --{{ name }}: {{ value }};
{%- endfor %}
  background-color: var(--background);
  color: var(--foreground);
}
{%- endfor %}
"#;

/// The element a nested theming unit wraps its children in.
///
/// ```rust
/// use desktop_theme::Wrapper;
///
/// let wrapper = Wrapper::new("theme-macos theme-macos-dark");
/// assert_eq!(
///     wrapper.to_html("<p>hi</p>").unwrap(),
///     r#"<div class="theme-macos theme-macos-dark"><p>hi</p></div>"#,
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    class_name: String,
}

impl Wrapper {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Renders the wrapper around already-rendered `children` markup.
    pub fn to_html(&self, children: &str) -> Result<String, ThemeError> {
        let html = ENVIRONMENT.render_named_str(
            "wrapper.html",
            WRAPPER_TEMPLATE,
            context! { class_name => &self.class_name, children => children },
        )?;
        Ok(html)
    }
}

#[derive(Serialize)]
struct VariantBlock {
    selector: String,
    variables: Vec<(&'static str, &'static str)>,
}

/// Renders the stylesheet binding every theme variant's tokens to its
/// class selector.
pub(crate) fn global_stylesheet() -> Result<String, ThemeError> {
    let mut blocks = Vec::new();
    for theme in ThemeName::all() {
        for mode in ColorMode::ALL {
            for window_blur in [true, false] {
                let resolved = ResolvedTheme::new(*theme, mode, window_blur);
                blocks.push(VariantBlock {
                    selector: resolved.selector(),
                    variables: resolved.tokens().values().variables().to_vec(),
                });
            }
        }
    }

    let stylesheet = ENVIRONMENT.render_named_str(
        "global.css",
        GLOBAL_STYLES_TEMPLATE,
        context! { blocks => blocks },
    )?;
    Ok(stylesheet)
}
