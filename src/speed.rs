use std::time::Duration;

use clap::ValueEnum;

/// Difficulty presets offered at the start of every round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Speed {
    Slug,
    Snake,
    Python,
}

impl Speed {
    pub const ALL: [Speed; 3] = [Speed::Slug, Speed::Snake, Speed::Python];

    pub fn label(self) -> &'static str {
        match self {
            Speed::Slug => "Slug",
            Speed::Snake => "Snake",
            Speed::Python => "Python",
        }
    }

    pub fn tick_interval(self) -> Duration {
        let ms = match self {
            Speed::Slug => 180,
            Speed::Snake => 100,
            Speed::Python => 60,
        };
        Duration::from_millis(ms)
    }

    fn index(self) -> usize {
        Speed::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

/// Difficulty menu: one highlighted entry, moved with up/down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    selected: usize,
}

impl Menu {
    pub fn new(preselected: Speed) -> Self {
        Menu { selected: preselected.index() }
    }

    pub fn selected(&self) -> Speed {
        Speed::ALL[self.selected]
    }

    pub fn select(&mut self, speed: Speed) {
        self.selected = speed.index();
    }

    pub fn up(&mut self) {
        self.selected = (self.selected + Speed::ALL.len() - 1) % Speed::ALL.len();
    }

    pub fn down(&mut self) {
        self.selected = (self.selected + 1) % Speed::ALL.len();
    }

    /// Lines for the menu box, the highlighted entry marked like a hovered button.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec!["Choose Difficulty".to_string(), String::new()];

        for speed in Speed::ALL.iter() {
            let line = if *speed == self.selected() {
                format!("> [ {:^6} ] <", speed.label())
            } else {
                format!("  [ {:^6} ]  ", speed.label())
            };
            lines.push(line);
        }

        lines.push(String::new());
        lines.push("Up/Down and Enter, or 1-3".to_string());
        lines
    }
}
