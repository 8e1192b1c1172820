use ratatui::style::{Color, Modifier, Style};

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const SELECTED_BG: Color = Color::Rgb(60, 60, 80);
pub const STRIPE_BG: Color = Color::Rgb(25, 25, 35);

pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Row style for alternating, possibly selected rows
pub fn row(index: usize, selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::White)
            .bg(SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    } else if index % 2 == 1 {
        Style::default().fg(Color::White).bg(STRIPE_BG)
    } else {
        Style::default().fg(Color::White)
    }
}

pub fn remove_control() -> Style {
    Style::default().fg(Color::LightRed)
}

pub fn status_bar() -> Style {
    Style::default().fg(Color::White).bg(BAR_BG)
}

pub fn error() -> Style {
    Style::default().fg(Color::White).bg(Color::Red)
}
