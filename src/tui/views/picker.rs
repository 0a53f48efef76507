//! Picker view
//!
//! One screen: header with the catalog kind and mode, an optional message
//! banner, the ranked list (with a window preview beside it for sessions),
//! the text input box in the text-entry modes, and a help line.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{MessageLevel, Mode, PickerState, PreviewWindow};
use crate::catalog::{CatalogKind, Item, ItemKind};
use crate::scoring::RankOrder;
use crate::tui::layout::{LayoutConfig, PickerLayout};
use crate::tui::theme::Theme;
use crate::tui::widgets::selection::{selection_name_style, selection_prefix};

const TITLE: &str = "tmux sessionizer";

/// Render the whole picker into `area`
pub fn render_picker(
    frame: &mut Frame,
    area: Rect,
    state: &PickerState,
    preview: Option<&[PreviewWindow]>,
    theme: &Theme,
    layout_config: &LayoutConfig,
) {
    let layout = PickerLayout::calculate(
        area,
        layout_config,
        state.message.is_some(),
        state.mode.is_text_input(),
        preview.is_some(),
    );

    render_header(frame, layout.header, state, theme);

    if let (Some(area), Some(message)) = (layout.banner, &state.message) {
        let (text, style) = match message.level {
            MessageLevel::Info => (format!("✔ {}", message.text), theme.info_banner_style()),
            MessageLevel::Error => (format!("✖ {}", message.text), theme.error_banner_style()),
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }

    render_list(frame, layout.list, state, theme);

    if let (Some(area), Some(windows)) = (layout.preview, preview) {
        render_preview(frame, area, windows, theme);
    }

    if let Some(area) = layout.input {
        render_input(frame, area, &state.mode, theme);
    }

    let help = Paragraph::new(help_text(&state.mode)).style(theme.muted_style());
    frame.render_widget(help, layout.footer);
}

fn render_header(frame: &mut Frame, area: Rect, state: &PickerState, theme: &Theme) {
    let kind = match state.kind {
        CatalogKind::Sessions => "[ SESSIONS ]",
        CatalogKind::Projects => "[ PROJECTS ]",
    };
    let mut spans = vec![
        Span::styled(TITLE, theme.header_style()),
        Span::raw("  "),
        Span::styled(kind, theme.text_style()),
        Span::raw("  "),
        Span::styled(state.mode.label(), theme.input_style()),
    ];
    if !state.mode.query().is_empty() {
        spans.push(Span::styled(
            format!("  {}/{}", state.visible_len(), state.items.len()),
            theme.muted_style(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style(false)),
    );
    frame.render_widget(header, area);
}

fn render_list(frame: &mut Frame, area: Rect, state: &PickerState, theme: &Theme) {
    let height = area.height as usize;
    if height == 0 {
        return;
    }

    if state.visible_len() == 0 {
        let text = if state.items.is_empty() {
            match state.kind {
                CatalogKind::Sessions => "No sessions",
                CatalogKind::Projects => "No projects",
            }
        } else {
            "No matches"
        };
        frame.render_widget(Paragraph::new(text).style(theme.muted_style()), area);
        return;
    }

    let bottom_anchored = state.order == RankOrder::Ascending;
    let (offset, padding) = visible_window(state.selected, state.visible_len(), height, bottom_anchored);
    let numbered = state.mode == Mode::Normal;

    let mut lines: Vec<Line> = std::iter::repeat(Line::default()).take(padding).collect();
    lines.extend(
        (offset..state.visible_len())
            .take(height - padding)
            .filter_map(|position| {
                let item = state.visible_item(position)?;
                let number = (numbered && position < 9).then_some(position + 1);
                Some(item_line(item, position == state.selected, number, theme))
            }),
    );

    frame.render_widget(Paragraph::new(lines), area);
}

/// First visible row and number of blank rows above it
///
/// Bottom-anchored lists pad from the top so the last item sits just above
/// the input line.
fn visible_window(selected: usize, count: usize, height: usize, bottom_anchored: bool) -> (usize, usize) {
    let selected = selected.min(count.saturating_sub(1));
    if count <= height {
        let padding = if bottom_anchored { height - count } else { 0 };
        return (0, padding);
    }
    let offset = if selected >= height {
        selected + 1 - height
    } else {
        0
    };
    let offset = if bottom_anchored {
        // Keep the bottom of the list in view until the cursor moves above it
        offset.max(count - height).min(selected)
    } else {
        offset
    };
    (offset, 0)
}

fn item_line<'a>(item: &'a Item, selected: bool, number: Option<usize>, theme: &Theme) -> Line<'a> {
    let mut spans = vec![Span::styled(
        selection_prefix(selected),
        theme.selected_style(),
    )];
    match number {
        Some(n) => spans.push(Span::styled(format!("{} ", n), theme.muted_style())),
        None => spans.push(Span::raw("  ")),
    }

    match &item.kind {
        ItemKind::Session {
            attached,
            window_count,
        } => {
            let dot = if *attached { "● " } else { "○ " };
            spans.push(Span::styled(dot, Style::default().fg(theme.attached_color(*attached))));
            spans.push(Span::styled(item.title.as_str(), selection_name_style(selected, theme)));
            spans.push(Span::styled(
                format!("  ({})", window_count_label(window_count)),
                theme.muted_style(),
            ));
        }
        ItemKind::Project => {
            spans.push(Span::styled(item.title.as_str(), selection_name_style(selected, theme)));
            spans.push(Span::styled(
                format!("  {}", item.description),
                theme.muted_style(),
            ));
        }
    }
    Line::from(spans)
}

fn window_count_label(count: &str) -> String {
    if count == "1" {
        "1 window".to_string()
    } else {
        format!("{} windows", count)
    }
}

fn render_preview(frame: &mut Frame, area: Rect, windows: &[PreviewWindow], theme: &Theme) {
    let lines: Vec<Line> = if windows.is_empty() {
        vec![Line::styled("no windows", theme.muted_style())]
    } else {
        windows
            .iter()
            .map(|w| {
                Line::from(vec![
                    Span::styled(selection_prefix(w.active), theme.selected_style()),
                    Span::styled(
                        format!("{}: {}", w.index, w.name),
                        selection_name_style(w.active, theme),
                    ),
                    Span::styled(format!("  {}", w.path), theme.muted_style()),
                ])
            })
            .collect()
    };

    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(theme.border_style(false))
        .title(Span::styled(" windows ", theme.muted_style()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_input(frame: &mut Frame, area: Rect, mode: &Mode, theme: &Theme) {
    let title = match mode {
        Mode::Search { .. } => " search ".to_string(),
        Mode::NewSession { .. } => " new session: project, name or repository URL ".to_string(),
        Mode::Rename { target, .. } => format!(" rename {} ", target),
        Mode::Normal => return,
    };
    let text = mode.input().unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(true))
        .title(title);
    let input = Paragraph::new(Line::from(vec![
        Span::styled("> ", theme.input_style()),
        Span::styled(text, theme.text_style()),
    ]))
    .block(block);
    frame.render_widget(input, area);

    // Cursor after the typed text, inside the border
    let cursor_x = area.x + 1 + 2 + text.chars().count() as u16;
    if area.height >= 3 && cursor_x < area.x + area.width.saturating_sub(1) {
        frame.set_cursor(cursor_x, area.y + 1);
    }
}

fn help_text(mode: &Mode) -> &'static str {
    match mode {
        Mode::Normal => {
            "enter/1-9 open · / search · n new · r rename · x kill · t toggle · ^r refresh · q quit"
        }
        Mode::Search { .. } => "type to filter · ↑↓ move · enter open first · ^u clear · esc back",
        Mode::NewSession { .. } => "type to filter or name · ↑↓ move · enter create · ^u clear · esc back",
        Mode::Rename { .. } => "type new name · enter rename · esc cancel",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Message;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::path::PathBuf;

    fn render_to_text(state: &PickerState, preview: Option<&[PreviewWindow]>, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_picker(frame, area, state, preview, &Theme::dark(), &LayoutConfig::default())
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buffer.get(x, y).symbol()).collect())
            .collect()
    }

    fn sessions() -> PickerState {
        PickerState::new(
            CatalogKind::Sessions,
            vec![
                Item::session("api", true, "1"),
                Item::session("web", false, "3"),
            ],
        )
    }

    #[test]
    fn test_visible_window_top_anchored() {
        assert_eq!(visible_window(0, 3, 10, false), (0, 0));
        assert_eq!(visible_window(12, 20, 10, false), (3, 0));
    }

    #[test]
    fn test_visible_window_bottom_anchored() {
        assert_eq!(visible_window(2, 3, 10, true), (0, 7));
        assert_eq!(visible_window(19, 20, 10, true), (10, 0));
        assert_eq!(visible_window(4, 20, 10, true), (4, 0));
    }

    #[test]
    fn test_window_count_label() {
        assert_eq!(window_count_label("1"), "1 window");
        assert_eq!(window_count_label("4"), "4 windows");
    }

    #[test]
    fn test_renders_sessions_with_indicators() {
        let rows = render_to_text(&sessions(), None, 100, 12);
        assert!(rows[0].contains("[ SESSIONS ]"));
        assert!(rows[0].contains("NORMAL"));
        assert!(rows[2].contains("▶ 1 ● api  (1 window)"));
        assert!(rows[3].contains("  2 ○ web  (3 windows)"));
        assert!(rows[11].contains("q quit"));
    }

    #[test]
    fn test_renders_message_banner() {
        let mut state = sessions();
        state.message = Some(Message::error("Failed to kill web: boom"));
        let rows = render_to_text(&state, None, 100, 12);
        assert!(rows[2].contains("✖ Failed to kill web: boom"));
    }

    #[test]
    fn test_renders_preview_beside_sessions() {
        let windows = vec![PreviewWindow {
            index: "0".into(),
            name: "vim".into(),
            active: true,
            path: "~/dev/api".into(),
        }];
        let rows = render_to_text(&sessions(), Some(&windows), 100, 12);
        assert!(rows.iter().any(|r| r.contains("0: vim  ~/dev/api")));
    }

    #[test]
    fn test_new_session_list_is_bottom_anchored() {
        let mut state = PickerState::new(
            CatalogKind::Projects,
            vec![Item::project("alpha", "~/dev/alpha", PathBuf::from("/home/u/dev/alpha"))],
        );
        state.mode = Mode::NewSession { query: String::new() };
        state.order = RankOrder::Ascending;
        state.refilter();

        let rows = render_to_text(&state, None, 100, 12);
        // 12 rows: header(2) list(6) input(3) footer(1)
        assert!(rows[7].contains("▶   alpha  ~/dev/alpha"));
        assert!(rows[2].trim().is_empty());
        assert!(rows[9].contains("> "));
    }

    #[test]
    fn test_empty_catalog_placeholder() {
        let state = PickerState::new(CatalogKind::Sessions, Vec::new());
        let rows = render_to_text(&state, None, 60, 8);
        assert!(rows[2].contains("No sessions"));
    }
}
