use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use parallax_core::config::KeymapConfig;

use crate::app::{App, LoadState, Mode};

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.status_bg);

        let status_text = status_text(app);
        let help_hint = help_hint(&app.config.keymap);
        let padding_len =
            (area.width as usize).saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, bar.fg(theme.foreground)),
            Span::styled(" ".repeat(padding_len), bar),
            Span::styled(help_hint, bar.fg(theme.muted)),
        ]);

        frame.render_widget(Paragraph::new(line).style(bar), area);
    }
}

/// Left side of the bar: mode, then either the status message or the position
pub fn status_text(app: &App) -> String {
    let mode_str = match (&app.mode, &app.load_state) {
        (Mode::Help, _) => "HELP",
        (_, LoadState::Loading) => "LOADING",
        (_, LoadState::Failed(_)) => "ERROR",
        (_, LoadState::Ready) => "NORMAL",
    };

    if let Some(msg) = &app.status_message {
        return format!(" {} | {}", mode_str, msg);
    }

    let count = app.item_count();
    let position = if count == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", app.current_entry_index(), count)
    };
    let pending = app.images.pending_count();
    let downloading = if pending > 0 {
        format!(" ({} loading)", pending)
    } else {
        String::new()
    };

    format!(
        " {} | \"{}\" | {} | Images: {}/{}{}",
        mode_str,
        app.config.unsplash.query,
        position,
        app.images.ready_count(),
        count,
        downloading
    )
}

/// Right side of the bar, built from the configured keys
pub fn help_hint(keymap: &KeymapConfig) -> String {
    format!(
        " {}:quit {}/{}:move {}:reload {}:open {}:help ",
        keymap.quit, keymap.prev, keymap.next, keymap.reload, keymap.open_browser, keymap.help
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parallax_core::{AppConfig, ImageRecord};

    use crate::event::SearchResult;
    use crate::theme::Theme;

    #[test]
    fn test_help_hint_default_keys() {
        assert_eq!(
            help_hint(&KeymapConfig::default()),
            " q:quit h/l:move r:reload o:open ?:help "
        );
    }

    #[test]
    fn test_help_hint_follows_remapped_keys() {
        let keymap = KeymapConfig {
            next: "n".to_string(),
            prev: "p".to_string(),
            reload: "<C-r>".to_string(),
            ..Default::default()
        };
        let hint = help_hint(&keymap);
        assert!(hint.contains("p/n:move"));
        assert!(hint.contains("<C-r>:reload"));
        assert!(!hint.contains("h/l"));
    }

    #[test]
    fn test_status_text_counts_pending_downloads() {
        let mut config = AppConfig::default();
        config.unsplash.query = "cat".to_string();
        let mut app = App::new(Arc::new(config), Theme::default());
        app.set_viewport_width(100);

        let generation = app.begin_load();
        let records: Vec<ImageRecord> = ["a", "b"]
            .iter()
            .map(|id| ImageRecord {
                id: id.to_string(),
                full_url: format!("https://images.example.com/{}", id),
                raw_url: format!("https://images.example.com/{}", id),
                alt_description: None,
            })
            .collect();
        app.apply_search_result(SearchResult::Success {
            generation,
            records,
        });
        app.images.start_loading("a");
        app.images.start_loading("b");

        assert_eq!(
            status_text(&app),
            " NORMAL | \"cat\" | 1/2 | Images: 0/2 (2 loading)"
        );

        app.images.set_failed("a".to_string(), "HTTP 404".to_string());
        app.images.set_failed("b".to_string(), "HTTP 404".to_string());
        assert_eq!(status_text(&app), " NORMAL | \"cat\" | 1/2 | Images: 0/2");
    }
}
