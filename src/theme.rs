use ratatui::style::Color;

/// Colours the views draw with. Every field has exactly one role on screen.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub name: &'static str,
    /// Headings, ids and the active composer tab.
    pub accent: Color,
    /// Loaded issue frame and the "creating" progress line.
    pub positive: Color,
    /// Errors and the validation popup.
    pub danger: Color,
    /// `[image]` badges and upload progress.
    pub badge: Color,
    pub background: Color,
    /// Panels and popups.
    pub panel: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub border_focus: Color,
    pub selected_row: Color,
    /// Highlighted range inside an editable field.
    pub selected_text: Color,
}

pub const THEMES: [Palette; 3] = [
    Palette {
        name: "dark",
        accent: Color::Rgb(94, 172, 211),
        positive: Color::Rgb(111, 194, 118),
        danger: Color::Rgb(224, 108, 96),
        badge: Color::Rgb(229, 181, 83),
        background: Color::Rgb(17, 19, 23),
        panel: Color::Rgb(24, 27, 33),
        text: Color::Rgb(214, 218, 224),
        muted: Color::Rgb(128, 136, 150),
        border: Color::Rgb(52, 58, 70),
        border_focus: Color::Rgb(94, 172, 211),
        selected_row: Color::Rgb(38, 48, 62),
        selected_text: Color::Rgb(60, 84, 110),
    },
    Palette {
        name: "light",
        accent: Color::Rgb(24, 102, 160),
        positive: Color::Rgb(36, 128, 58),
        danger: Color::Rgb(186, 44, 38),
        badge: Color::Rgb(166, 104, 0),
        background: Color::Rgb(250, 249, 246),
        panel: Color::Rgb(241, 239, 234),
        text: Color::Rgb(34, 36, 40),
        muted: Color::Rgb(110, 112, 118),
        border: Color::Rgb(200, 196, 188),
        border_focus: Color::Rgb(24, 102, 160),
        selected_row: Color::Rgb(222, 232, 242),
        selected_text: Color::Rgb(190, 212, 236),
    },
    Palette {
        name: "contrast",
        accent: Color::Cyan,
        positive: Color::Green,
        danger: Color::LightRed,
        badge: Color::Yellow,
        background: Color::Black,
        panel: Color::Black,
        text: Color::White,
        muted: Color::Gray,
        border: Color::Gray,
        border_focus: Color::LightCyan,
        selected_row: Color::DarkGray,
        selected_text: Color::Blue,
    },
];

/// Looks a palette up by name, ignoring case and surrounding spaces. Unknown or
/// missing names fall back to the default.
pub fn resolve_theme(name: Option<&str>) -> &'static Palette {
    name.map(str::trim)
        .and_then(|name| {
            THEMES
                .iter()
                .find(|theme| theme.name.eq_ignore_ascii_case(name))
        })
        .unwrap_or_else(default_theme)
}

pub fn default_theme() -> &'static Palette {
    &THEMES[0]
}

pub fn theme_names() -> Vec<&'static str> {
    THEMES.iter().map(|theme| theme.name).collect()
}

#[cfg(test)]
mod tests {
    use super::{default_theme, resolve_theme, theme_names};

    #[test]
    fn resolves_known_theme_ignoring_case_and_spaces() {
        assert_eq!(resolve_theme(Some(" CoNtRaSt ")).name, "contrast");
        assert_eq!(resolve_theme(Some("light")).name, "light");
    }

    #[test]
    fn falls_back_to_default_for_unknown_theme() {
        assert_eq!(resolve_theme(Some("solarized")).name, default_theme().name);
        assert_eq!(resolve_theme(None).name, "dark");
    }

    #[test]
    fn lists_every_theme_name() {
        assert_eq!(theme_names(), vec!["dark", "light", "contrast"]);
    }
}
