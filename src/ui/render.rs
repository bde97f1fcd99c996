use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::config::ThemeConfig;
use crate::message::Role;
use crate::session::WidgetView;

use super::gradient::{gradient_color, gradient_text};
use super::text::{tail, wrap_text};

/// Panel size when the terminal is large enough.
const PANEL_WIDTH: u16 = 46;
const PANEL_HEIGHT: u16 = 24;

/// Launcher bubble size.
const LAUNCHER_WIDTH: u16 = 12;
const LAUNCHER_HEIGHT: u16 = 3;

pub const PANEL_TITLE: &str = " ByteBot AI ";
pub const PANEL_SUBTITLE: &str = "Security Consultant";
pub const INPUT_PLACEHOLDER: &str = "Type your question...";
pub const TYPING_INDICATOR: &str = "ByteBot is typing...";

/// Draw the widget for the given view.
///
/// Output depends only on `view` and `theme`, so the same view always draws
/// the same frame.
pub fn render(f: &mut Frame, view: &WidgetView<'_>, theme: &ThemeConfig) {
    let area = f.size();

    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg_page())),
        area,
    );
    render_backdrop(f, area, view.is_open);

    let launcher = launcher_area(area);
    render_launcher(f, launcher, view.is_open, theme);

    if view.is_open {
        if let Some(panel) = panel_area(area, launcher) {
            render_panel(f, panel, view, theme);
        }
    }
}

fn launcher_area(area: Rect) -> Rect {
    let width = LAUNCHER_WIDTH.min(area.width);
    let height = LAUNCHER_HEIGHT.min(area.height);
    Rect::new(
        area.x + area.width - width,
        area.y + area.height - height,
        width,
        height,
    )
}

/// Panel sits above the launcher, right-aligned. None if there is no room.
fn panel_area(area: Rect, launcher: Rect) -> Option<Rect> {
    let width = PANEL_WIDTH.min(area.width);
    let height = PANEL_HEIGHT.min(launcher.y.saturating_sub(area.y));
    if height < 6 || width < 12 {
        return None;
    }
    Some(Rect::new(
        area.x + area.width - width,
        launcher.y - height,
        width,
        height,
    ))
}

fn render_backdrop(f: &mut Frame, area: Rect, is_open: bool) {
    if area.width < 4 || area.height == 0 {
        return;
    }
    let hint = if is_open {
        "Esc to close chat · Ctrl+C to quit"
    } else {
        "Ctrl+O to chat with ByteBot · Ctrl+C to quit"
    };
    let backdrop = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Left);

    let rect = Rect::new(area.x + 2, area.y, area.width.saturating_sub(2), 2.min(area.height));
    f.render_widget(backdrop, rect);
}

fn render_launcher(f: &mut Frame, area: Rect, is_open: bool, theme: &ThemeConfig) {
    let (start, end) = theme.panel_gradient();
    let label = if is_open { "✕ Close" } else { "✉ Chat" };

    let launcher = Paragraph::new(Line::from(Span::styled(
        label,
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(gradient_color(start, end, 1.0)))
            .style(Style::default().bg(theme.bg_panel())),
    );

    f.render_widget(Clear, area);
    f.render_widget(launcher, area);
}

fn render_panel(f: &mut Frame, area: Rect, view: &WidgetView<'_>, theme: &ThemeConfig) {
    let (start, end) = theme.panel_gradient();

    let (status_text, status_color) = if view.is_awaiting_reply {
        ("● Thinking ", theme.status_waiting())
    } else {
        ("● Online ", theme.status_ready())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(gradient_color(start, end, 0.5)))
        .title(Title::from(gradient_text(PANEL_TITLE, start, end)))
        .title(
            Title::from(Span::styled(status_text, Style::default().fg(status_color)))
                .alignment(Alignment::Right)
                .position(Position::Top),
        )
        .style(Style::default().bg(theme.bg_panel()));

    let inner = block.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Subtitle
            Constraint::Min(1),    // Transcript
            Constraint::Length(2), // Input (top rule + line)
        ])
        .split(inner);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        PANEL_SUBTITLE,
        Style::default().fg(Color::Gray),
    )));
    f.render_widget(subtitle, chunks[0]);

    // Always follow the newest entry
    let lines = transcript_lines(view, chunks[1].width, theme);
    let overflow = lines.len().saturating_sub(chunks[1].height as usize);
    let messages = Paragraph::new(lines).scroll((overflow.min(u16::MAX as usize) as u16, 0));
    f.render_widget(messages, chunks[1]);

    render_input(f, chunks[2], view.pending_input, theme);
}

/// Lay out the transcript as display lines for a panel of `width` columns.
///
/// Assistant bubbles hug the left edge, user bubbles the right. A typing row
/// follows the transcript while a reply is pending.
pub fn transcript_lines(view: &WidgetView<'_>, width: u16, theme: &ThemeConfig) -> Vec<Line<'static>> {
    // Bubbles take at most 80% of the row
    let bubble_width = (width as usize * 4 / 5).max(1);
    let mut lines = Vec::new();

    for message in view.transcript {
        let (style, alignment) = match message.role() {
            Role::User => (Style::default().fg(theme.user_fg()), Alignment::Right),
            Role::Assistant => (Style::default().fg(theme.assistant_fg()), Alignment::Left),
        };

        lines.push(
            Line::from(Span::styled(
                message.role().label(),
                style.add_modifier(Modifier::BOLD),
            ))
            .alignment(alignment),
        );
        for wrapped in wrap_text(message.content(), bubble_width) {
            lines.push(Line::from(Span::styled(wrapped, style)).alignment(alignment));
        }
        lines.push(Line::from(""));
    }

    if view.is_awaiting_reply {
        lines.push(Line::from(Span::styled(
            TYPING_INDICATOR,
            Style::default()
                .fg(theme.status_waiting())
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn render_input(f: &mut Frame, area: Rect, draft: &str, theme: &ThemeConfig) {
    let (start, end) = theme.panel_gradient();
    let visible = area.width.saturating_sub(2) as usize;

    let text = if draft.is_empty() {
        Line::from(vec![
            Span::styled("▎", Style::default().fg(Color::White)),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled(tail(draft, visible).to_string(), Style::default().fg(Color::White)),
            Span::styled("▎", Style::default().fg(Color::White)),
        ])
    };

    let input = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(gradient_color(start, end, 0.2)))
            .style(Style::default().bg(theme.bg_input())),
    );

    f.render_widget(input, area);
}
