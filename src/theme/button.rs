//! Button style variables and generated button classes.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::theme::color::{modify_color_based_on_lightness, Color};
use crate::theme::css::{px, render, Rule, StyleFactory};
use crate::theme::merge::deep_merge;
use crate::theme::variables::{form_elements_variables, global_variables, BorderVariables, VariableFactory};
use crate::theme::ThemeCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ButtonTypes {
    Standard,
    Primary,
    Transparent,
    Compact,
    CompactPrimary,
    Translucid,
    Inverted,
    Custom,
    Text,
    TextPrimary,
    Icon,
    IconCompact,
}

impl ButtonTypes {
    pub const ALL: [ButtonTypes; 12] = [
        ButtonTypes::Standard,
        ButtonTypes::Primary,
        ButtonTypes::Transparent,
        ButtonTypes::Compact,
        ButtonTypes::CompactPrimary,
        ButtonTypes::Translucid,
        ButtonTypes::Inverted,
        ButtonTypes::Custom,
        ButtonTypes::Text,
        ButtonTypes::TextPrimary,
        ButtonTypes::Icon,
        ButtonTypes::IconCompact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonTypes::Standard => "standard",
            ButtonTypes::Primary => "primary",
            ButtonTypes::Transparent => "transparent",
            ButtonTypes::Compact => "compact",
            ButtonTypes::CompactPrimary => "compactPrimary",
            ButtonTypes::Translucid => "translucid",
            ButtonTypes::Inverted => "inverted",
            ButtonTypes::Custom => "custom",
            ButtonTypes::Text => "text",
            ButtonTypes::TextPrimary => "textPrimary",
            ButtonTypes::Icon => "icon",
            ButtonTypes::IconCompact => "iconCompact",
        }
    }
}

impl fmt::Display for ButtonTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonColors {
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonFont {
    pub color: Color,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonPadding {
    pub top: f64,
    pub bottom: f64,
    pub side: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSizingVars {
    pub min_height: f64,
    pub min_width: f64,
    pub compact_height: f64,
}

/// Defaults shared by every button type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonGlobalVariables {
    pub padding: ButtonPadding,
    pub sizing: ButtonSizingVars,
    pub border: BorderVariables,
    pub font: ButtonFont,
    pub colors: ButtonColors,
}

pub fn button_global_variables(cache: &ThemeCache) -> Arc<ButtonGlobalVariables> {
    cache.get_or_insert_with("buttonGlobalVariables", |theme| {
        let globals = global_variables(cache);
        let form = form_elements_variables(cache);
        let make = VariableFactory::new(theme, "button");
        ButtonGlobalVariables {
            colors: make.make("colors", ButtonColors { fg: globals.main_colors.fg, bg: globals.main_colors.bg }),
            font: make.make("font", ButtonFont { color: globals.main_colors.fg, size: globals.fonts.size.medium }),
            padding: make.make("padding", ButtonPadding { top: 2.0, bottom: 3.0, side: 12.0 }),
            sizing: make.make("sizing", ButtonSizingVars { min_height: form.sizing.height, min_width: 104.0, compact_height: 24.0 }),
            border: make.make("border", globals.border.clone()),
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateColors {
    pub bg: Option<Color>,
    pub fg: Option<Color>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateBorders {
    pub color: Option<Color>,
    pub radius: Option<f64>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateFonts {
    pub color: Option<Color>,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSizing {
    pub min_height: Option<f64>,
    pub min_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonStateVars {
    pub colors: StateColors,
    pub borders: StateBorders,
    pub fonts: StateFonts,
}

impl ButtonStateVars {
    fn with_bg(bg: Color) -> Self { Self { colors: StateColors { bg: Some(bg), fg: None }, ..Self::default() } }
    fn with_font(color: Color) -> Self { Self { fonts: StateFonts { color: Some(color), size: None }, ..Self::default() } }
    fn with_border(mut self, color: Color) -> Self { self.borders.color = Some(color); self }
    fn with_font_color(mut self, color: Color) -> Self { self.fonts.color = Some(color); self }
    fn with_bg_color(mut self, bg: Color) -> Self { self.colors.bg = Some(bg); self }
}

/// Variables for one kind of button. Unset fields fall back to [`ButtonGlobalVariables`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonTypeVars {
    pub name: String,
    pub spinner_color: Option<Color>,
    pub colors: StateColors,
    pub borders: StateBorders,
    pub fonts: StateFonts,
    pub sizing: StateSizing,
    pub hover: ButtonStateVars,
    pub active: ButtonStateVars,
    pub focus: ButtonStateVars,
    pub focus_accessible: ButtonStateVars,
}

impl ButtonTypeVars {
    /// Apply the same state to hover, active, focus and accessible focus.
    fn all_states(mut self, state: ButtonStateVars) -> Self {
        self.hover = state.clone();
        self.active = state.clone();
        self.focus = state.clone();
        self.focus_accessible = state;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonVariables {
    pub standard: ButtonTypeVars,
    pub primary: ButtonTypeVars,
    pub transparent: ButtonTypeVars,
    pub compact: ButtonTypeVars,
    pub compact_primary: ButtonTypeVars,
    pub translucid: ButtonTypeVars,
    pub inverted: ButtonTypeVars,
}

impl ButtonVariables {
    pub fn get(&self, kind: ButtonTypes) -> Option<&ButtonTypeVars> {
        match kind {
            ButtonTypes::Standard => Some(&self.standard),
            ButtonTypes::Primary => Some(&self.primary),
            ButtonTypes::Transparent => Some(&self.transparent),
            ButtonTypes::Compact => Some(&self.compact),
            ButtonTypes::CompactPrimary => Some(&self.compact_primary),
            ButtonTypes::Translucid => Some(&self.translucid),
            ButtonTypes::Inverted => Some(&self.inverted),
            _ => None,
        }
    }
}

pub fn button_variables(cache: &ThemeCache) -> Arc<ButtonVariables> {
    cache.get_or_insert_with("buttonVariables", |theme| {
        let g = global_variables(cache);
        let make = VariableFactory::new(theme, "button");
        let main = &g.main_colors;
        let transparent = g.elementary_colors.transparent;
        let radius = Some(g.border.radius);

        let standard = ButtonTypeVars {
            name: ButtonTypes::Standard.to_string(),
            spinner_color: Some(main.fg),
            colors: StateColors { bg: Some(main.bg), fg: None },
            borders: StateBorders { color: Some(g.mix_bg_and_fg(0.24)), radius, width: None },
            fonts: StateFonts { color: Some(main.fg), size: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_bg(main.primary).with_border(main.primary).with_font_color(main.bg));

        let compact = ButtonTypeVars {
            name: ButtonTypes::Compact.to_string(),
            colors: StateColors { bg: Some(main.bg), fg: None },
            borders: StateBorders { color: Some(transparent), radius, width: None },
            sizing: StateSizing { min_height: Some(24.0), min_width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_font(main.primary));

        let compact_primary = ButtonTypeVars {
            name: ButtonTypes::CompactPrimary.to_string(),
            colors: StateColors { bg: Some(main.bg), fg: None },
            fonts: StateFonts { color: Some(main.primary.fade(0.7)), size: None },
            sizing: StateSizing { min_height: Some(24.0), min_width: None },
            borders: StateBorders { color: Some(transparent), radius, width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_font(main.primary).with_border(main.primary));

        let primary = ButtonTypeVars {
            name: ButtonTypes::Primary.to_string(),
            colors: StateColors { bg: Some(main.primary), fg: None },
            fonts: StateFonts { color: Some(main.bg), size: None },
            spinner_color: Some(main.bg),
            borders: StateBorders { color: Some(main.primary), radius, width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_font(main.bg).with_bg_color(main.secondary));

        let transparent_vars = ButtonTypeVars {
            name: ButtonTypes::Transparent.to_string(),
            colors: StateColors { bg: Some(transparent), fg: None },
            fonts: StateFonts { color: Some(main.fg), size: None },
            borders: StateBorders { color: Some(modify_color_based_on_lightness(&main.fg, 1.0, true)), radius, width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_bg(modify_color_based_on_lightness(&main.fg, 0.9, false)));

        let translucid_bg = modify_color_based_on_lightness(&main.bg, 1.0, false);
        let translucid = ButtonTypeVars {
            name: ButtonTypes::Translucid.to_string(),
            colors: StateColors { bg: Some(translucid_bg.fade(0.1)), fg: None },
            fonts: StateFonts { color: Some(main.bg), size: None },
            spinner_color: Some(main.bg),
            borders: StateBorders { color: Some(main.bg), radius, width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_bg(translucid_bg.fade(0.2)).with_border(main.bg));

        let inverted = ButtonTypeVars {
            name: ButtonTypes::Inverted.to_string(),
            colors: StateColors { bg: Some(main.fg), fg: None },
            fonts: StateFonts { color: Some(main.primary), size: None },
            spinner_color: Some(g.elementary_colors.white),
            borders: StateBorders { color: Some(main.fg), radius, width: None },
            ..Default::default()
        }
        .all_states(ButtonStateVars::with_bg(main.fg.fade(0.9)));

        ButtonVariables {
            standard: make.make("basic", standard),
            primary: make.make("primary", primary),
            transparent: make.make("transparent", transparent_vars),
            compact: make.make("compact", compact),
            compact_primary: make.make("compactPrimary", compact_primary),
            translucid: make.make("translucid", translucid),
            inverted: make.make("inverted", inverted),
        }
    })
}

/// Deep-merge `overwrite` over `base`; the result is named `<base>-<overwrite>`.
pub fn overwrite_button_vars(base: &ButtonTypeVars, overwrite: &ButtonTypeVars) -> ButtonTypeVars {
    let name = format!("{}-{}", base.name, overwrite.name);
    let merged = match (serde_json::to_value(base), serde_json::to_value(overwrite)) {
        (Ok(mut b), Ok(o)) => {
            deep_merge(&mut b, &o);
            serde_json::from_value::<ButtonTypeVars>(b).unwrap_or_else(|_| base.clone())
        }
        _ => base.clone(),
    };
    ButtonTypeVars { name, ..merged }
}

/// A generated class name and the CSS that defines it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClass {
    pub class_name: String,
    pub css: String,
}

impl ButtonClass {
    fn empty() -> Self { Self { class_name: String::new(), css: String::new() } }
}

/// Build the class for one button type: base rule plus hover/focus/active states.
pub fn generate_button_class(cache: &ThemeCache, vars: &ButtonTypeVars, set_z_index_on_state: bool) -> ButtonClass {
    let defaults = button_global_variables(cache);
    let class_name = StyleFactory::new("button").class_name(&vars.name);
    let sel = format!(".{}", class_name);

    let base = Rule::new(sel.clone())
        .decl("display", "inline-flex")
        .decl("align-items", "center")
        .decl("justify-content", "center")
        .decl("cursor", "pointer")
        .color("color", Some(vars.fonts.color.as_ref().unwrap_or(&defaults.font.color)))
        .color("background-color", Some(vars.colors.bg.as_ref().unwrap_or(&defaults.colors.bg)))
        .decl("border-style", defaults.border.style.clone())
        .decl("border-width", px(vars.borders.width.unwrap_or(defaults.border.width)))
        .color("border-color", Some(vars.borders.color.as_ref().unwrap_or(&defaults.border.color)))
        .decl("border-radius", px(vars.borders.radius.unwrap_or(defaults.border.radius)))
        .decl("font-size", px(vars.fonts.size.unwrap_or(defaults.font.size)))
        .decl("min-height", px(vars.sizing.min_height.unwrap_or(defaults.sizing.min_height)))
        .decl("min-width", px(vars.sizing.min_width.unwrap_or(defaults.sizing.min_width)))
        .decl(
            "padding",
            format!("{} {} {}", px(defaults.padding.top), px(defaults.padding.side), px(defaults.padding.bottom)),
        );

    let state = |suffix: &str, s: &ButtonStateVars| {
        let rule = Rule::new(format!("{}:not([disabled]){}", sel, suffix))
            .color("color", s.fonts.color.as_ref())
            .color("background-color", s.colors.bg.as_ref())
            .color("border-color", s.borders.color.as_ref())
            .decl_opt("border-radius", s.borders.radius.map(px));
        if set_z_index_on_state && !rule.is_empty() { rule.decl("z-index", "1") } else { rule }
    };

    let rules = [
        base,
        state(":hover", &vars.hover),
        state(":focus", &vars.focus),
        state(".focus-visible", &vars.focus_accessible),
        state(":active", &vars.active),
        Rule::new(format!("{}[disabled]", sel)).decl("opacity", "0.5").decl("cursor", "default"),
    ];
    ButtonClass { class_name, css: render(&rules) }
}

/// Overwrite `base` with `overwrite` and generate the resulting class.
pub fn overwrite_button_class(
    cache: &ThemeCache,
    base: &ButtonTypeVars,
    overwrite: &ButtonTypeVars,
    set_z_index_on_state: bool,
) -> ButtonClass {
    generate_button_class(cache, &overwrite_button_vars(base, overwrite), set_z_index_on_state)
}

/// Icon-only and text-like buttons that are not driven by [`ButtonTypeVars`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonUtilityClasses {
    pub push_left: ButtonClass,
    pub push_right: ButtonClass,
    pub button_icon: ButtonClass,
    pub button_icon_compact: ButtonClass,
    pub button_as_text: ButtonClass,
    pub button_as_text_primary: ButtonClass,
}

pub fn button_utility_classes(cache: &ThemeCache) -> Arc<ButtonUtilityClasses> {
    cache.get_or_insert_with("buttonUtilityClasses", |_| {
        let vars = button_global_variables(cache);
        let g = global_variables(cache);
        let form = form_elements_variables(cache);
        let style = StyleFactory::new("buttonUtils");

        let single = |sub: &str, rules: Vec<Rule>| ButtonClass { class_name: style.class_name(sub), css: render(&rules) };
        let reset = |rule: Rule| {
            rule.decl("-webkit-appearance", "none")
                .decl("appearance", "none")
                .decl("user-select", "none")
                .decl("border", "0")
                .decl("background", "none")
                .decl("cursor", "pointer")
                .decl("font", "inherit")
        };
        let icon = |sub: &str, dimension: f64| {
            let sel = format!(".{}", style.class_name(sub));
            single(sub, vec![
                reset(Rule::new(sel.clone()))
                    .decl("color", "inherit")
                    .decl("display", "flex")
                    .decl("align-items", "center")
                    .decl("justify-content", "center")
                    .decl("height", px(dimension))
                    .decl("width", px(dimension))
                    .decl("min-width", px(dimension))
                    .decl("padding", "0"),
                Rule::new(format!("{}:hover", sel)).color("color", Some(&g.main_colors.primary)),
                Rule::new(format!("{}:focus, {}:active, {}.focus-visible", sel, sel, sel))
                    .color("color", Some(&g.main_colors.secondary)),
            ])
        };
        let as_text = |sub: &str, color: Option<&Color>| {
            let sel = format!(".{}", style.class_name(sub));
            let base = reset(Rule::new(sel.clone()))
                .decl("min-width", "0 !important")
                .decl("padding", "0")
                .decl("overflow", "hidden")
                .decl("text-align", "left")
                .decl("line-height", g.line_heights.base.to_string())
                .decl("font-weight", g.fonts.weights.semi_bold.to_string());
            let base = match color {
                Some(c) => base.color("color", Some(c)),
                None => base.decl("color", "inherit"),
            };
            single(sub, vec![
                base,
                Rule::new(format!("{}:not(.focus-visible)", sel)).decl("outline", "0"),
                Rule::new(format!("{}:focus, {}:active, {}:hover", sel, sel, sel))
                    .color("color", Some(&g.main_colors.secondary)),
            ])
        };

        ButtonUtilityClasses {
            push_left: single("pushLeft", vec![Rule::new(format!(".{}", style.class_name("pushLeft"))).decl("margin-right", "auto !important")]),
            push_right: single("pushRight", vec![Rule::new(format!(".{}", style.class_name("pushRight"))).decl("margin-left", "auto !important")]),
            button_icon: icon("icon", form.sizing.height),
            button_icon_compact: icon("iconCompact", vars.sizing.compact_height),
            button_as_text: as_text("asText", None),
            button_as_text_primary: as_text("asTextPrimary", Some(&g.main_colors.primary)),
        }
    })
}

/// Generated classes for every [`ButtonTypes`] variant; `Custom` maps to an empty class.
pub fn button_classes(cache: &ThemeCache) -> Arc<BTreeMap<ButtonTypes, ButtonClass>> {
    cache.get_or_insert_with("buttonClasses", |_| {
        let vars = button_variables(cache);
        let utils = button_utility_classes(cache);
        ButtonTypes::ALL
            .iter()
            .map(|kind| {
                let class = match kind {
                    ButtonTypes::Icon => utils.button_icon.clone(),
                    ButtonTypes::IconCompact => utils.button_icon_compact.clone(),
                    ButtonTypes::Text => utils.button_as_text.clone(),
                    ButtonTypes::TextPrimary => utils.button_as_text_primary.clone(),
                    ButtonTypes::Custom => ButtonClass::empty(),
                    other => match vars.get(*other) {
                        Some(v) => generate_button_class(cache, v, false),
                        None => ButtonClass::empty(),
                    },
                };
                (*kind, class)
            })
            .collect::<BTreeMap<_, _>>()
    })
}

/// Sizing declarations for a button of the given height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonSizing {
    pub min_height: String,
    pub min_width: String,
    pub font_size: String,
    pub padding: String,
    pub line_height: String,
}

pub fn button_sizing(cache: &ThemeCache, height: f64, min_width: f64, font_size: f64, padding_horizontal: f64) -> ButtonSizing {
    let form = form_elements_variables(cache);
    let border_width = form.border_width.unwrap_or_else(|| button_global_variables(cache).border.width);
    ButtonSizing {
        min_height: px(height),
        min_width: px(min_width),
        font_size: px(font_size),
        padding: format!("{} {}", px(0.0), px(padding_horizontal)),
        line_height: px(height - border_width * 2.0),
    }
}

/// Spinner color for a loading button; primary has its own, everything else uses standard's.
pub fn spinner_color(cache: &ThemeCache, kind: ButtonTypes) -> Color {
    let vars = button_variables(cache);
    let type_vars = match kind {
        ButtonTypes::Primary => &vars.primary,
        _ => &vars.standard,
    };
    type_vars.spinner_color.unwrap_or_else(|| global_variables(cache).main_colors.primary)
}

/// Raw JSON view of [`button_variables`], for dumping.
pub fn button_variables_json(cache: &ThemeCache) -> Value {
    serde_json::to_value(&*button_variables(cache)).unwrap_or(Value::Null)
}
