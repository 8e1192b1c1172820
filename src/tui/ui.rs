use crate::page::ContainerContent;
use crate::tui::app::{App, Focus};
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const RECENT_PANEL_WIDTH: u16 = 32;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(5),    // Recent searches + hits
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_search_bar(frame, app, chunks[0]);

    let recent = app.recent_container.snapshot();
    if recent.hidden || recent.body.is_none() {
        draw_hits(frame, app, chunks[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(RECENT_PANEL_WIDTH), Constraint::Min(10)])
            .split(chunks[1]);
        draw_recent_panel(frame, app, &recent, body[0]);
        draw_hits(frame, app, body[1]);
    }

    draw_status_bar(frame, app, chunks[2]);

    if app.focus == Focus::Search {
        // border (1) + leading space (1) + icon (2) + space (1)
        let typed = &app.search.query[..app.search.cursor_pos];
        let cursor_x = chunks[0].x + 5 + typed.width() as u16;
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border(app.focus == Focus::Search))
        .title(" Search ");

    let search_text = format!(" \u{1F50D} {}", app.search.query);
    let paragraph = Paragraph::new(search_text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn draw_recent_panel(frame: &mut Frame, app: &mut App, content: &ContainerContent, area: Rect) {
    let title = format!(" {} ", content.header.as_deref().unwrap_or("Recent"));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border(app.focus == Focus::Recent))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(list) = &content.body else {
        return;
    };

    let visible = (inner.height as usize).min(app.config.max_visible_recent.max(1));
    app.recent.set_visible_rows(visible);
    let start = app.recent.scroll_offset.min(list.rows.len());
    let end = (start + visible).min(list.rows.len());

    for (visual_idx, logical_idx) in (start..end).enumerate() {
        let row = &list.rows[logical_idx];
        let selected = app.focus == Focus::Recent && app.recent.selected == Some(logical_idx);
        let style = colors::row(visual_idx, selected);

        let remove = format!(" {} ", row.remove_label);
        let label_width = (inner.width as usize).saturating_sub(remove.width() + 1);
        let label = truncate_to_width(&row.label, label_width);
        let padding = label_width.saturating_sub(label.width());

        let line = Line::from(vec![
            Span::styled(format!(" {}{}", label, " ".repeat(padding)), style),
            Span::styled(remove, colors::remove_control().bg(style.bg.unwrap_or(Color::Reset))),
        ]);
        let row_area = Rect::new(inner.x, inner.y + visual_idx as u16, inner.width, 1);
        frame.render_widget(Paragraph::new(line), row_area);
    }
}

fn draw_hits(frame: &mut Frame, app: &mut App, area: Rect) {
    let (title, hits): (String, Vec<String>) = match app.host.results() {
        Some(results) => (format!(" Hits ({}) ", results.nb_hits), results.hits.clone()),
        None => (" Hits ".to_string(), Vec::new()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(colors::border(app.focus == Focus::Hits))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if hits.is_empty() {
        let empty = Paragraph::new(" No results").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    app.hits.set_visible_rows(inner.height as usize);
    let start = app.hits.scroll_offset.min(hits.len());
    let end = (start + inner.height as usize).min(hits.len());

    for (visual_idx, logical_idx) in (start..end).enumerate() {
        let selected = app.focus == Focus::Hits && app.hits.selected == Some(logical_idx);
        let text = truncate_to_width(&hits[logical_idx], (inner.width as usize).saturating_sub(1));
        let row_area = Rect::new(inner.x, inner.y + visual_idx as u16, inner.width, 1);
        frame.render_widget(
            Paragraph::new(format!(" {}", text)).style(colors::row(visual_idx, selected)),
            row_area,
        );
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref error) = app.last_error {
        let status = Paragraph::new(format!(" {}", error)).style(colors::error());
        frame.render_widget(status, area);
        return;
    }

    let left_text = format!(" {}", app.status_message);
    let right_text = match app.focus {
        Focus::Recent => " Enter:Search again  x/Del:Remove  Tab:Next  Esc:Back ",
        _ => " Tab:Next pane  Esc:Clear/Quit  Ctrl+Q:Quit ",
    };

    // Build the status line: left-aligned text + padding + right-aligned text
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        // Not enough space, just show left text
        format!("{:width$}", left_text, width = available_width)
    };

    frame.render_widget(Paragraph::new(status_str).style(colors::status_bar()), area);
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('\u{2026}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::SearchHelper;
    use crate::AppConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Instant;

    fn test_app(dir: &std::path::Path, max_visible_recent: usize) -> App {
        let config = AppConfig {
            storage_path: dir.join("storage.json"),
            storage_key: "R".into(),
            max_visible_recent,
            ..AppConfig::default()
        };
        App::new(config).expect("app")
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..height {
            for x in 0..width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn recent_panel_scrolls_to_selected_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path(), 3);
        for q in ["q1", "q2", "q3", "q4", "q5", "q6"] {
            app.store.upsert("R", q).unwrap();
        }
        app.host.session().search();
        app.tick(Instant::now());
        assert_eq!(app.recent_rows().len(), 6);

        app.focus = Focus::Recent;
        app.recent.select_last(6);
        let screen = render(&mut app, 80, 24);

        assert_eq!(app.recent.visible_rows, 3);
        assert_eq!(app.recent.scroll_offset, 3);
        assert!(screen.contains("q1"));
        assert!(!screen.contains("q6"));
    }

    #[test]
    fn hits_scroll_to_selected_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = test_app(dir.path(), 10);
        assert_eq!(app.hit_count(), 8);

        app.focus = Focus::Hits;
        app.hits.select_last(8);
        // 3 search + 1 status leaves a 6 row pane, 4 rows inside the border
        let screen = render(&mut app, 80, 10);

        assert_eq!(app.hits.visible_rows, 4);
        assert_eq!(app.hits.scroll_offset, 4);
        assert!(screen.contains("Adidas Ultraboost shoes"));
        assert!(!screen.contains("Apple iPhone 15 Pro"));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("shoes", 10), "shoes");
        assert_eq!(truncate_to_width("running shoes", 8), "running\u{2026}");
        assert_eq!(truncate_to_width("日本語の検索", 5), "日本\u{2026}");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
