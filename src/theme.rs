use serde::Serialize;

/// Five page colors applied through CSS variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemePalette {
    pub button_color: &'static str,
    pub sidebar_bg_color: &'static str,
    pub main_bg_color: &'static str,
    pub text_color: &'static str,
    pub top_bar_color: &'static str,
}

const fn swatch(
    button_color: &'static str,
    sidebar_bg_color: &'static str,
    main_bg_color: &'static str,
    text_color: &'static str,
    top_bar_color: &'static str,
) -> ThemePalette {
    ThemePalette { button_color, sidebar_bg_color, main_bg_color, text_color, top_bar_color }
}

// Order is the selector order; the first entry is the default.
pub const PALETTES: [(&str, ThemePalette); 30] = [
    ("Ocean Breeze", swatch("#008CBA", "#E0F7FA", "#B2EBF2", "#003B2E", "#006B8A")),
    ("Forest Green", swatch("#4CAF50", "#E8F5E9", "#C8E6C9", "#1B5E20", "#3E8E41")),
    ("Sunset Glow", swatch("#FF5722", "#FFF3E0", "#FFE0B2", "#6A2C20", "#E64A19")),
    ("Midnight Blue", swatch("#1A237E", "#E8EAF6", "#C5CAE9", "#0D47A1", "#283593")),
    ("Cherry Blossom", swatch("#E91E63", "#FCE4EC", "#F8BBD0", "#880E4F", "#C2185B")),
    ("Citrus Splash", swatch("#FFEB3B", "#FFFDE7", "#FFF59D", "#F57F17", "#FBC02D")),
    ("Royal Purple", swatch("#9C27B0", "#F3E5F5", "#E1BEE7", "#4A148C", "#7B1FA2")),
    ("Coral Reef", swatch("#FF7043", "#FBE9E7", "#FFCCBC", "#BF360C", "#D84315")),
    ("Cool Gray", swatch("#607D8B", "#ECEFF1", "#CFD8DC", "#37474F", "#455A64")),
    ("Golden Sand", swatch("#FFD54F", "#FFF8E1", "#FFE082", "#FF6F00", "#FFA000")),
    ("Mystic Lavender", swatch("#BA68C8", "#F3E5F5", "#E1BEE7", "#4A148C", "#8E24AA")),
    ("Teal Dream", swatch("#009688", "#E0F2F1", "#B2DFDB", "#004D40", "#00796B")),
    ("Amber Glow", swatch("#FFC107", "#FFF8E1", "#FFECB3", "#FF6F00", "#FFA000")),
    ("Slate Blue", swatch("#3F51B5", "#E8EAF6", "#C5CAE9", "#1A237E", "#303F9F")),
    ("Spring Meadow", swatch("#8BC34A", "#F1F8E9", "#DCEDC8", "#33691E", "#689F38")),
    ("Rosewood", swatch("#880E4F", "#FCE4EC", "#F8BBD0", "#4A148C", "#D81B60")),
    ("Sandstone", swatch("#A1887F", "#EFEBE9", "#D7CCC8", "#5D4037", "#8D6E63")),
    ("Ruby Red", swatch("#D32F2F", "#FFEBEE", "#FFCDD2", "#B71C1C", "#C62828")),
    ("Mossy Green", swatch("#689F38", "#F1F8E9", "#DCEDC8", "#33691E", "#558B2F")),
    ("Cobalt Blue", swatch("#0D47A1", "#E3F2FD", "#BBDEFB", "#0D47A1", "#1976D2")),
    ("Graphite Night", swatch("#00A0B0", "#333333", "#222222", "#E0E0E0", "#404040")),
    ("Desert Mirage", swatch("#D2691E", "#F5F5DC", "#DEB887", "#5C4033", "#A0522D")),
    ("Emerald Isle", swatch("#FFD700", "#F0FFF0", "#90EE90", "#006400", "#2E8B57")),
    ("Lavender Dreams", swatch("#9370DB", "#E6E6FA", "#D8BFD8", "#483D8B", "#7B68EE")),
    ("Crimson Peak", swatch("#DC143C", "#EEEEEE", "#DCDCDC", "#400000", "#B22222")),
    ("Mocha Delight", swatch("#A0522D", "#F5F5DC", "#FFEBCD", "#5D4037", "#8B4513")),
    ("Steel Blue", swatch("#4682B4", "#E0E5EC", "#B0C4DE", "#2F4F4F", "#5F7C8A")),
    ("Volcanic Ash", swatch("#FF4500", "#4A4A4A", "#303030", "#E8E8E8", "#202020")),
    ("Minty Fresh", swatch("#20B2AA", "#F0FFF0", "#AFEEEE", "#00695C", "#48D1CC")),
    ("Autumn Harvest", swatch("#FF8C00", "#FFF8DC", "#FFE4B5", "#8B4513", "#D2691E")),
];

pub const DATE_FORMATS: [(&str, &str); 6] = [
    ("YYYY-MM-DD (%Y-%m-%d)", "%Y-%m-%d"),
    ("YY-MM-DD (%y-%m-%d)", "%y-%m-%d"),
    ("Month D, YYYY (%b %d, %Y)", "%b %d, %Y"),
    ("MM/DD/YY (%m/%d/%y)", "%m/%d/%y"),
    ("YYYY-MM (%Y-%m)", "%Y-%m"),
    ("YY-MM (%y-%m)", "%y-%m"),
];

pub const ROTATIONS: [(&str, i32); 4] = [
    ("Angled (-45°)", -45),
    ("Horizontal (0°)", 0),
    ("Vertical (90°)", 90),
    ("Vertical (-90°)", -90),
];

// d3-format tokens, interpreted by the chart renderer.
pub const PRICE_FORMATS: [(&str, &str); 5] = [
    ("Currency ($1,234.56)", "$,.2f"),
    ("Currency ($1234.56)", "$.2f"),
    ("Number (1,234.56)", ",.2f"),
    ("Number (1234.56)", ".2f"),
    ("Currency, Integer ($1,235)", "$,.0f"),
];

pub const VOLUME_FORMATS: [(&str, &str); 4] = [
    ("Integer (1,234,567)", ",.0f"),
    ("SI Suffix (1.23M)", ".2s"),
    ("SI Suffix, Integer (1M)", ".0s"),
    ("Integer (1234567)", ".0f"),
];

pub const FALLBACK_CSS: &str = r#"
body { background-color: var(--main-bg-color, #FFFFFF); color: var(--text-color, #000000); }
button { background-color: var(--button-color, #008CBA); color: white; border: none; padding: 0.25em 0.75em; border-radius: 0.25rem; }
button:hover { opacity: 0.8; }
aside.sidebar { background-color: var(--sidebar-bg-color, #E0F7FA); }
header.top-bar { background-color: var(--top-bar-color, #006B8A); }
h1, h2, h3, h4, h5, h6, p, table, .message { color: var(--text-color, #000000) !important; }
"#;

const VEGA_TEXT_OVERRIDE: &str = ".vega-embed .mark-text text, .vega-embed .title-text, .vega-embed .axis .label-text, \
.vega-embed .axis .title-text, .vega-embed .legend .label-text, .vega-embed .legend .title-text { \
fill: var(--text-color) !important; }";

/// Looks up a value in a label menu, falling back to the first entry.
fn lookup<T: Copy>(menu: &[(&'static str, T)], label: Option<&str>) -> (&'static str, T) {
    label
        .and_then(|label| menu.iter().find(|(name, _)| *name == label))
        .copied()
        .unwrap_or(menu[0])
}

pub fn palette(name: Option<&str>) -> (&'static str, ThemePalette) {
    lookup(&PALETTES, name)
}

pub fn date_format(label: Option<&str>) -> &'static str {
    lookup(&DATE_FORMATS, label).1
}

pub fn rotation(label: Option<&str>) -> i32 {
    lookup(&ROTATIONS, label).1
}

pub fn price_format(label: Option<&str>) -> &'static str {
    lookup(&PRICE_FORMATS, label).1
}

pub fn volume_format(label: Option<&str>) -> &'static str {
    lookup(&VOLUME_FORMATS, label).1
}

/// `:root` variables for the palette plus the chart text fill override.
pub fn palette_css(palette: &ThemePalette) -> String {
    format!(
        ":root {{\n    --top-bar-color: {};\n    --sidebar-bg-color: {};\n    --main-bg-color: {};\n    --button-color: {};\n    --text-color: {};\n}}\n{}\n",
        palette.top_bar_color,
        palette.sidebar_bg_color,
        palette.main_bg_color,
        palette.button_color,
        palette.text_color,
        VEGA_TEXT_OVERRIDE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn palette_names_are_unique() {
        let names: HashSet<_> = PALETTES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names.len(), PALETTES.len());
    }

    #[test]
    fn palette_colors_are_hex() {
        for (name, p) in PALETTES.iter() {
            for color in [p.button_color, p.sidebar_bg_color, p.main_bg_color, p.text_color, p.top_bar_color] {
                assert!(
                    color.len() == 7 && color.starts_with('#') && color[1..].chars().all(|c| c.is_ascii_hexdigit()),
                    "{} has bad color {}",
                    name,
                    color
                );
            }
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_first_entry() {
        assert_eq!(palette(Some("No Such Palette")).0, "Ocean Breeze");
        assert_eq!(palette(None).1.button_color, "#008CBA");
        assert_eq!(date_format(Some("bogus")), "%Y-%m-%d");
        assert_eq!(rotation(None), -45);
        assert_eq!(price_format(None), "$,.2f");
        assert_eq!(volume_format(Some("")), ",.0f");
    }

    #[test]
    fn known_labels_resolve() {
        assert_eq!(palette(Some("Graphite Night")).1.main_bg_color, "#222222");
        assert_eq!(date_format(Some("YYYY-MM (%Y-%m)")), "%Y-%m");
        assert_eq!(rotation(Some("Vertical (90°)")), 90);
        assert_eq!(price_format(Some("Number (1234.56)")), ".2f");
        assert_eq!(volume_format(Some("SI Suffix (1.23M)")), ".2s");
    }

    #[test]
    fn palette_css_sets_all_variables() {
        let css = palette_css(&palette(Some("Teal Dream")).1);
        assert!(css.contains("--button-color: #009688;"));
        assert!(css.contains("--top-bar-color: #00796B;"));
        assert!(css.contains("fill: var(--text-color) !important;"));
    }
}
