//! Minimal CSS rule building for generated class names.

use std::fmt::Write;

use crate::theme::Color;

/// Names classes `<component>-<sub>`.
#[derive(Debug, Clone, Copy)]
pub struct StyleFactory {
    component: &'static str,
}

impl StyleFactory {
    pub fn new(component: &'static str) -> Self { Self { component } }

    pub fn class_name(&self, sub: &str) -> String { format!("{}-{}", self.component, sub) }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self { selector: selector.into(), declarations: Vec::new() }
    }

    pub fn decl(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations.push((property.to_string(), value.into()));
        self
    }

    pub fn decl_opt(self, property: &str, value: Option<String>) -> Self {
        match value {
            Some(v) => self.decl(property, v),
            None => self,
        }
    }

    pub fn color(self, property: &str, value: Option<&Color>) -> Self {
        self.decl_opt(property, value.map(Color::to_css))
    }

    pub fn is_empty(&self) -> bool { self.declarations.is_empty() }
}

/// Render rules, skipping ones without declarations.
pub fn render(rules: &[Rule]) -> String {
    let mut out = String::new();
    for rule in rules.iter().filter(|r| !r.is_empty()) {
        let _ = writeln!(out, "{} {{", rule.selector);
        for (prop, value) in &rule.declarations {
            let _ = writeln!(out, "  {}: {};", prop, value);
        }
        out.push_str("}\n");
    }
    out
}

/// `12` -> `12px`, `1.5` -> `1.5px`.
pub fn px(v: f64) -> String { format!("{}px", v) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_non_empty_rules_in_order() {
        let css = render(&[
            Rule::new(".button-primary").decl("min-height", px(36.0)).color("color", Some(&Color::WHITE)),
            Rule::new(".button-primary:hover"),
            Rule::new(".button-primary:active").decl("z-index", "1"),
        ]);
        assert_eq!(
            css,
            ".button-primary {\n  min-height: 36px;\n  color: #ffffff;\n}\n.button-primary:active {\n  z-index: 1;\n}\n"
        );
    }

    #[test]
    fn class_names_are_prefixed_by_component() {
        assert_eq!(StyleFactory::new("buttonUtils").class_name("asText"), "buttonUtils-asText");
        assert_eq!(px(1.5), "1.5px");
    }
}
