use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Interpolate between two RGB colors.
///
/// `position` is clamped to 0.0..=1.0.
pub fn gradient_color(start: (u8, u8, u8), end: (u8, u8, u8), position: f32) -> Color {
    let t = position.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
    Color::Rgb(lerp(start.0, end.0), lerp(start.1, end.1), lerp(start.2, end.2))
}

/// Bold text with a left-to-right color gradient, one span per character.
pub fn gradient_text(text: &str, start: (u8, u8, u8), end: (u8, u8, u8)) -> Line<'static> {
    let total = text.chars().count().saturating_sub(1).max(1) as f32;

    let spans: Vec<Span<'static>> = text
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            Span::styled(
                ch.to_string(),
                Style::default()
                    .fg(gradient_color(start, end, i as f32 / total))
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();

    Line::from(spans)
}
