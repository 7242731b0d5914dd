use ratatui::style::Color;
use std::collections::HashMap;

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::LightRed,
    Color::LightCyan,
    Color::LightMagenta,
];

/// Session-stable color assignment: the first request for a (name, category)
/// pair claims the next palette slot and every later request returns the same
/// color. Shared across all timeline engines in the session; queried, never
/// reset.
#[derive(Debug, Default)]
pub struct ColorProvider {
    assigned: HashMap<(String, String), Color>,
    next_slot: usize,
}

impl ColorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_color(&mut self, name: &str, category: &str) -> Color {
        let key = (name.to_string(), category.to_string());
        if let Some(&color) = self.assigned.get(&key) {
            return color;
        }

        let color = PALETTE[self.next_slot % PALETTE.len()];
        self.next_slot += 1;
        self.assigned.insert(key, color);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OVERVIEW_METRIC;

    #[test]
    fn same_name_and_category_always_get_the_same_color() {
        let mut colors = ColorProvider::new();
        let first = colors.get_color("cpu", OVERVIEW_METRIC);
        let _ = colors.get_color("mem", OVERVIEW_METRIC);
        assert_eq!(colors.get_color("cpu", OVERVIEW_METRIC), first);
    }

    #[test]
    fn distinct_names_get_distinct_colors_while_palette_lasts() {
        let mut colors = ColorProvider::new();
        let cpu = colors.get_color("cpu", OVERVIEW_METRIC);
        let mem = colors.get_color("mem", OVERVIEW_METRIC);
        assert_ne!(cpu, mem);
    }

    #[test]
    fn categories_are_independent() {
        let mut colors = ColorProvider::new();
        let overview = colors.get_color("cpu", OVERVIEW_METRIC);
        let detail = colors.get_color("cpu", "detail");
        assert_ne!(overview, detail);
    }
}
