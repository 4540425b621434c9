use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub hovered: Srgba<f64>,
    pub idle: Srgba<f64>,
    pub border: Srgba<f64>,
    pub center: Srgba<f64>,
    pub text: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            hovered: Srgba::new(0.30, 0.55, 0.95, 0.95),
            idle: Srgba::new(0.15, 0.15, 0.15, 0.85),
            border: Srgba::new(1.0, 1.0, 1.0, 0.25),
            center: Srgba::new(0.08, 0.08, 0.08, 0.9),
            text: Srgba::new(1.0, 1.0, 1.0, 1.0),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        Self {
            hovered: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                fallback.hovered,
                Some(0.95),
            ),
            idle: Self::lookup_color(context, "theme_bg_color", fallback.idle, Some(0.85)),
            border: Self::lookup_color(context, "borders", fallback.border, Some(0.4)),
            center: Self::lookup_color(context, "theme_base_color", fallback.center, Some(0.9)),
            text: Self::lookup_color(context, "theme_fg_color", fallback.text, None),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.handy-window, .handy-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
