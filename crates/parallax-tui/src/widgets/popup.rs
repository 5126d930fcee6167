use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use parallax_core::config::KeymapConfig;

use crate::theme::Theme;

pub struct PopupWidget;

impl PopupWidget {
    /// Spinner shown while the search request is outstanding
    pub fn render_loading(
        frame: &mut Frame,
        area: Rect,
        spinner: &str,
        query: &str,
        theme: &Theme,
    ) {
        let popup_area = centered_rect(36u16.min(area.width), 3u16.min(area.height), area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.status_bg));

        let text = Line::from(vec![
            Span::styled(format!("{} ", spinner), Style::default().fg(theme.accent)),
            Span::styled(
                format!("Loading \"{}\"…", query),
                Style::default().fg(theme.foreground),
            ),
        ]);

        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).block(block),
            popup_area,
        );
    }

    /// Error panel for a failed load attempt
    pub fn render_error(
        frame: &mut Frame,
        area: Rect,
        message: &str,
        reload_key: &str,
        theme: &Theme,
    ) {
        let popup_width = 60u16.min(area.width.saturating_sub(4));
        let popup_height = 8u16.min(area.height.saturating_sub(2));
        let popup_area = centered_rect(popup_width, popup_height, area);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Could not load photos ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.status_bg));

        let inner_area = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Message
                Constraint::Length(1), // Hint
            ])
            .split(inner_area);

        let message_paragraph = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(message_paragraph, chunks[0]);

        let hint_paragraph = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(theme.muted)),
            Span::styled(
                reload_key,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to try again", Style::default().fg(theme.muted)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hint_paragraph, chunks[1]);
    }

    /// Key binding reference
    pub fn render_help(frame: &mut Frame, area: Rect, keymap: &KeymapConfig, theme: &Theme) {
        let rows = [
            (format!("{} / →", keymap.next), "Next photo"),
            (format!("{} / ←", keymap.prev), "Previous photo"),
            (format!("{} / Home", keymap.first), "First photo"),
            (format!("{} / End", keymap.last), "Last photo"),
            (keymap.reload.clone(), "Reload"),
            (keymap.open_browser.clone(), "Open photo in browser"),
            (keymap.help.clone(), "Toggle help"),
            (format!("{} / Ctrl+C", keymap.quit), "Quit"),
        ];

        let lines: Vec<Line> = rows
            .iter()
            .map(|(keys, desc)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>14}  ", keys),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*desc, Style::default().fg(theme.foreground)),
                ])
            })
            .collect();

        let popup_area = centered_rect(
            44u16.min(area.width),
            (lines.len() as u16 + 2).min(area.height),
            area,
        );
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.status_bg));

        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
