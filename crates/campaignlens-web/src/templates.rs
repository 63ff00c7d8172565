//! Template Engine
//!
//! Handles HTML template rendering using minijinja.

use minijinja::{AutoEscape, Environment, Error as MiniJinjaError};

/// Template manager
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Create a new template manager
    pub fn new() -> Self {
        let mut env = Environment::new();

        // Campaign and account names come from the remote API
        env.set_auto_escape_callback(|_| AutoEscape::Html);

        env.add_filter("thousands", thousands);
        env.add_filter("pct", pct);
        env.add_filter("bar_width", bar_width);

        // Register templates
        env.add_template("base", include_str!("../templates/base.html"))
            .expect("Failed to add base template");
        env.add_template("dashboard", include_str!("../templates/dashboard.html"))
            .expect("Failed to add dashboard template");
        env.add_template("accounts", include_str!("../templates/accounts.html"))
            .expect("Failed to add accounts template");

        Self { env }
    }

    /// Render a template with context
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, MiniJinjaError> {
        let template = self.env.get_template(name)?;
        template.render(context)
    }
}

impl Default for Templates {
    fn default() -> Self {
        Self::new()
    }
}

/// `15420` -> `15,420`
fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// One decimal place
fn pct(value: f64) -> String {
    format!("{:.1}", value)
}

/// A percentage clamped to a CSS width
fn bar_width(value: f64) -> String {
    pct(value.clamp(0.0, 100.0))
}
