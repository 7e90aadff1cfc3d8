//! Theme-aware variable generation and the global style variables.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::theme::color::{modify_color_based_on_lightness, Color};
use crate::theme::merge::deep_merge;
use crate::theme::{Theme, ThemeCache};

/// Builds variables for one component, applying the theme's overrides.
#[derive(Debug, Clone, Copy)]
pub struct VariableFactory<'a> {
    theme: &'a Theme,
    component: &'static str,
}

impl<'a> VariableFactory<'a> {
    pub fn new(theme: &'a Theme, component: &'static str) -> Self { Self { theme, component } }

    /// `defaults` with `theme.variables[component][sub]` deep-merged over them.
    ///
    /// Overrides that don't fit the shape of `T` are ignored (logged at warn).
    pub fn make<T>(&self, sub: &str, defaults: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(overrides) = self.theme.overrides(self.component, sub) else { return defaults; };
        let mut value = match serde_json::to_value(&defaults) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(component = self.component, sub, error = %e, "cannot serialize theme defaults");
                return defaults;
            }
        };
        deep_merge(&mut value, overrides);
        match serde_json::from_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(theme = %self.theme.key, component = self.component, sub, error = %e, "ignoring invalid theme override");
                defaults
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainColors {
    pub fg: Color,
    pub bg: Color,
    pub primary: Color,
    pub secondary: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitialMainColors {
    fg: Color,
    bg: Color,
    primary: Color,
    secondary: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryColors {
    pub white: Color,
    pub black: Color,
    pub transparent: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderVariables {
    pub color: Color,
    pub width: f64,
    pub style: String,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSizes {
    pub large: f64,
    pub medium: f64,
    pub small: f64,
    pub title: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontWeights {
    pub normal: u16,
    pub semi_bold: u16,
    pub bold: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fonts {
    pub size: FontSizes,
    pub weights: FontWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineHeights {
    pub base: f64,
    pub condensed: f64,
}

/// Site-wide tokens every component builds on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariables {
    pub main_colors: MainColors,
    pub elementary_colors: ElementaryColors,
    pub border: BorderVariables,
    pub fonts: Fonts,
    pub line_heights: LineHeights,
}

impl GlobalVariables {
    /// Mix of foreground and background; `weight` is the foreground share.
    pub fn mix_bg_and_fg(&self, weight: f64) -> Color {
        self.main_colors.fg.mix(&self.main_colors.bg, weight)
    }

    fn generate(theme: &Theme) -> Self {
        let make = VariableFactory::new(theme, "global");

        let initial = make.make("mainColors", InitialMainColors {
            fg: Color::rgb(0x55, 0x5a, 0x62),
            bg: Color::WHITE,
            primary: Color::rgb(0x02, 0x91, 0xdb),
            secondary: None,
        });
        // Secondary follows the (possibly overridden) primary unless set explicitly.
        let secondary = initial
            .secondary
            .unwrap_or_else(|| modify_color_based_on_lightness(&initial.primary, 0.05, true));
        let main_colors = MainColors { fg: initial.fg, bg: initial.bg, primary: initial.primary, secondary };

        let elementary_colors = make.make("elementaryColors", ElementaryColors {
            white: Color::WHITE,
            black: Color::BLACK,
            transparent: Color::TRANSPARENT,
        });

        let border = make.make("border", BorderVariables {
            color: main_colors.fg.mix(&main_colors.bg, 0.15),
            width: 1.0,
            style: "solid".into(),
            radius: 6.0,
        });

        let fonts = make.make("fonts", Fonts {
            size: FontSizes { large: 16.0, medium: 14.0, small: 12.0, title: 22.0 },
            weights: FontWeights { normal: 400, semi_bold: 600, bold: 700 },
        });

        let line_heights = make.make("lineHeights", LineHeights { base: 1.5, condensed: 1.25 });

        Self { main_colors, elementary_colors, border, fonts, line_heights }
    }
}

pub fn global_variables(cache: &ThemeCache) -> Arc<GlobalVariables> {
    cache.get_or_insert_with("globalVariables", GlobalVariables::generate)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElementSizing {
    pub height: f64,
    pub min_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElementVariables {
    pub sizing: FormElementSizing,
    pub border_width: Option<f64>,
}

pub fn form_elements_variables(cache: &ThemeCache) -> Arc<FormElementVariables> {
    cache.get_or_insert_with("formElementsVariables", |theme| {
        let make = VariableFactory::new(theme, "formElements");
        FormElementVariables {
            sizing: make.make("sizing", FormElementSizing { height: 36.0, min_height: 36.0 }),
            border_width: make.make("borderWidth", None),
        }
    })
}
