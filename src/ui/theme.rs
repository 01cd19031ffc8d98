use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub status_ok: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub overlay_border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub pill_key_bg: Color,
    pub pill_key_fg: Color,
    pub pill_desc_fg: Color,
    pub gauge_filled: Color,
    pub gauge_unfilled: Color,
    pub sparkline_color: Color,
    pub high_memory: Color,
    pub tag_high_mem: Color,
    pub tag_high_cpu: Color,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            "mono" | "monochrome" => Self::mono(),
            _ => Self::dark(),
        }
    }

    pub fn next(&self) -> Self {
        match self.name {
            "dark" => Self::light(),
            "light" => Self::mono(),
            _ => Self::dark(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            selection_bg: Color::Rgb(55, 65, 81),
            selection_fg: Color::White,
            status_ok: Color::Green,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            overlay_border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::Yellow,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            gauge_filled: Color::Rgb(103, 232, 249),
            gauge_unfilled: Color::DarkGray,
            sparkline_color: Color::Rgb(251, 146, 60),
            high_memory: Color::Rgb(239, 68, 68),
            tag_high_mem: Color::Rgb(236, 72, 153),
            tag_high_cpu: Color::Rgb(249, 115, 22),
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            selection_bg: Color::Rgb(200, 200, 200),
            selection_fg: Color::Black,
            status_ok: Color::Rgb(0, 120, 0),
            status_err: Color::Red,
            statusbar_bg: Color::Rgb(220, 220, 220),
            overlay_border: Color::Rgb(150, 150, 150),
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            pill_key_bg: Color::Blue,
            pill_key_fg: Color::White,
            pill_desc_fg: Color::Black,
            gauge_filled: Color::Rgb(70, 130, 180),
            gauge_unfilled: Color::Rgb(200, 200, 200),
            sparkline_color: Color::Rgb(70, 130, 180),
            high_memory: Color::Rgb(200, 60, 60),
            tag_high_mem: Color::Rgb(160, 80, 160),
            tag_high_cpu: Color::Rgb(220, 120, 80),
        }
    }

    pub fn mono() -> Self {
        Theme {
            name: "mono",
            header_accent_bg: Color::White,
            header_accent_fg: Color::Black,
            selection_bg: Color::Gray,
            selection_fg: Color::Black,
            status_ok: Color::White,
            status_err: Color::White,
            statusbar_bg: Color::Black,
            overlay_border: Color::Gray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            pill_key_bg: Color::White,
            pill_key_fg: Color::Black,
            pill_desc_fg: Color::White,
            gauge_filled: Color::White,
            gauge_unfilled: Color::DarkGray,
            sparkline_color: Color::White,
            high_memory: Color::White,
            tag_high_mem: Color::Gray,
            tag_high_cpu: Color::Gray,
        }
    }
}
