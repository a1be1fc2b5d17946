use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, WORD_COUNT_PRESETS},
    session::{CharState, Session, SessionStatus},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const HEADER_HEIGHT: u16 = 3;

const WORDS_LABEL: &str = "words";
const PRESET_GAP: u16 = 2;
const RESTART_LABEL: &str = "↻ restart";

/// Screen regions, shared by rendering and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// Everything inside the outer margins; clicks here never drop focus
    pub trainer: Rect,
    pub wpm: Rect,
    pub errors: Rect,
    pub words: Rect,
    pub practice: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let [_, header, body, footer, _] = Layout::vertical([
            Constraint::Length(VERTICAL_MARGIN),
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(VERTICAL_MARGIN),
        ])
        .areas(area);

        let [_, header, _] = Layout::horizontal([
            Constraint::Length(HORIZONTAL_MARGIN),
            Constraint::Min(0),
            Constraint::Length(HORIZONTAL_MARGIN),
        ])
        .areas(header);
        let [wpm, errors, words] = Layout::horizontal([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(2, 4),
        ])
        .spacing(1)
        .areas(header);

        let practice = body.inner(ratatui::layout::Margin {
            horizontal: HORIZONTAL_MARGIN,
            vertical: VERTICAL_MARGIN,
        });
        let footer = footer.inner(ratatui::layout::Margin {
            horizontal: HORIZONTAL_MARGIN,
            vertical: 0,
        });

        Self {
            trainer: header.union(footer),
            wpm,
            errors,
            words,
            practice,
            footer,
        }
    }

    /// Click targets of the word-count presets, in `WORD_COUNT_PRESETS` order
    pub fn preset_rects(&self) -> [Rect; 3] {
        let inner = Block::bordered().inner(self.words);
        let mut x = inner.x + 1 + WORDS_LABEL.width() as u16 + PRESET_GAP;

        WORD_COUNT_PRESETS.map(|preset| {
            let width = preset.to_string().width() as u16;
            let rect = Rect::new(x, inner.y, width, 1).intersection(inner);
            x += width + PRESET_GAP;
            rect
        })
    }

    pub fn restart_button(&self) -> Rect {
        Rect::new(
            self.footer.x,
            self.footer.y,
            RESTART_LABEL.width() as u16,
            self.footer.height,
        )
        .intersection(self.footer)
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = AppLayout::new(area);
        let session = &self.session;

        render_stat("wpm", session.wpm(), Color::Green, layout.wpm, buf);
        render_stat(
            "errors",
            session.error_count() as u32,
            Color::Red,
            layout.errors,
            buf,
        );
        render_presets(self.number_of_words(), layout.words, buf);

        render_prompt(session, self.is_fading(), layout.practice, buf);
        if session.has_ended() {
            render_results(session, layout.practice, buf);
        }

        render_footer(session, layout.footer, buf);
    }
}

fn render_stat(label: &str, value: u32, accent: Color, area: Rect, buf: &mut Buffer) {
    let line = Line::from(vec![
        Span::styled(format!(" {label} "), Style::default().fg(accent)),
        Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);

    Paragraph::new(line)
        .block(panel())
        .render(area, buf);
}

fn render_presets(current: usize, area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().fg(Color::DarkGray);
    let gap = " ".repeat(PRESET_GAP as usize);

    let mut spans = vec![Span::raw(" "), Span::styled(WORDS_LABEL, dim_style)];
    for preset in WORD_COUNT_PRESETS {
        spans.push(Span::raw(gap.clone()));
        let style = if preset == current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            dim_style
        };
        spans.push(Span::styled(preset.to_string(), style));
    }

    Paragraph::new(Line::from(spans))
        .block(panel())
        .render(area, buf);
}

fn panel() -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Styled spans for the target text, one per character
pub fn prompt_spans(session: &Session, fading: bool) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let untyped_style = if fading {
        bold_style.fg(Color::DarkGray)
    } else {
        bold_style.fg(Color::Gray).add_modifier(Modifier::DIM)
    };
    let correct_style = bold_style.fg(Color::Green);
    let incorrect_style = bold_style.fg(Color::Red);

    let cursor = session.cursor_pos();
    let show_cursor = session.is_focused();

    session
        .target()
        .chars()
        .zip(session.char_states())
        .enumerate()
        .map(|(idx, (expected, state))| {
            let (symbol, mut style) = match state {
                CharState::Untyped => (expected, untyped_style),
                CharState::Correct => (expected, correct_style),
                // a missed space would be invisible
                CharState::Incorrect if expected == ' ' => ('·', incorrect_style),
                CharState::Incorrect => (expected, incorrect_style),
            };
            if show_cursor && idx == cursor {
                style = style
                    .fg(Color::Yellow)
                    .remove_modifier(Modifier::DIM)
                    .add_modifier(Modifier::UNDERLINED);
            }
            Span::styled(symbol.to_string(), style)
        })
        .collect()
}

fn render_prompt(session: &Session, fading: bool, area: Rect, buf: &mut Buffer) {
    let max_chars_per_line = area.width.max(1);
    let prompt_width = session.target().width() as u16;

    // one extra line absorbs word wrapping slack
    let prompt_occupied_lines = if prompt_width <= max_chars_per_line {
        1
    } else {
        prompt_width.div_ceil(max_chars_per_line) + 1
    };

    let [_, prompt_area, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(prompt_occupied_lines),
        Constraint::Fill(1),
    ])
    .areas(area);

    Paragraph::new(Line::from(prompt_spans(session, fading)))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: false })
        .render(prompt_area, buf);
}

fn render_results(session: &Session, area: Rect, buf: &mut Buffer) {
    let title = match session.status() {
        SessionStatus::Completed => " check the results ".to_string(),
        status => format!(" {status} "),
    };
    let summary = format!(
        "{} wpm   {} errors   {}% acc   {:.1}s",
        session.wpm(),
        session.error_count(),
        session.accuracy(),
        session.elapsed().as_secs_f64()
    );
    let lines = vec![
        Line::from(Span::styled(
            summary,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "(enter) or click to restart",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let width = (area.width).min(48);
    let height = area.height.min(4);
    let overlay = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(overlay, buf);
    Paragraph::new(lines)
        .block(panel().title(title).title_alignment(Alignment::Center))
        .alignment(Alignment::Center)
        .render(overlay, buf);
}

fn render_footer(session: &Session, area: Rect, buf: &mut Buffer) {
    let italic_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC);

    let legend = if session.is_focused() {
        "   (esc) pause / (tab) restart / (ctrl+w) delete word"
    } else if session.has_ended() {
        "   (enter) restart / (1/2/3) words / (q)uit"
    } else {
        "   (enter) or click text to start / (1/2/3) words / (tab) restart / (q)uit"
    };

    Paragraph::new(Line::from(vec![
        Span::styled(
            RESTART_LABEL,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(legend, italic_style),
    ]))
    .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{AppSettings, Message},
        language::Language,
    };
    use rand::{rngs::StdRng, SeedableRng};
    use std::time::Instant;

    fn create_test_app(prompt: &str) -> App {
        let settings = AppSettings {
            prompt: Some(prompt.to_string()),
            ..AppSettings::default()
        };
        App::with_rng(
            &settings,
            Language::english().unwrap(),
            StdRng::seed_from_u64(0),
        )
    }

    fn render_to_string(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_layout_regions_do_not_overlap() {
        let layout = AppLayout::new(Rect::new(0, 0, 80, 24));

        assert!(!layout.practice.intersects(layout.words));
        assert!(!layout.practice.intersects(layout.footer));
        assert!(!layout.wpm.intersects(layout.errors));
        assert!(layout.practice.width > 0 && layout.practice.height > 0);

        for preset in layout.preset_rects() {
            assert!(layout.words.contains(preset.as_position()));
            assert_eq!(preset.width, 2);
        }
        assert!(layout.footer.contains(layout.restart_button().as_position()));
    }

    #[test]
    fn test_layout_tiny_area_does_not_panic() {
        let layout = AppLayout::new(Rect::new(0, 0, 4, 3));
        let _ = layout.preset_rects();
        let _ = layout.restart_button();
    }

    #[test]
    fn test_render_idle() {
        let app = create_test_app("hello world");
        let rendered = render_to_string(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("hello world"));
        assert!(rendered.contains("wpm 0"));
        assert!(rendered.contains("errors 0"));
        assert!(rendered.contains("words  10  25  50"));
        assert!(rendered.contains("(enter) or click text to start"));
    }

    #[test]
    fn test_render_results_overlay() {
        let mut app = create_test_app("hi");
        let now = Instant::now();

        app.update(Message::Activate, now);
        app.update(Message::Edit(crate::app::Edit::Char('h')), now);
        app.update(Message::Edit(crate::app::Edit::Char('x')), now);

        let rendered = render_to_string(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("check the results"));
        assert!(rendered.contains("1 errors"));
        assert!(rendered.contains("errors 1"));
    }

    #[test]
    fn test_render_small_area() {
        let app = create_test_app("hello");
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);

        app.render(area, &mut buffer);

        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn test_render_large_prompt_wraps() {
        let app = create_test_app(&"word ".repeat(200));
        let area = Rect::new(0, 0, 40, 20);
        let mut buffer = Buffer::empty(area);

        app.render(area, &mut buffer);

        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn test_prompt_spans_highlight() {
        let mut app = create_test_app("a b");
        let now = Instant::now();

        app.update(Message::Activate, now);
        app.update(Message::Edit(crate::app::Edit::Char('a')), now);
        app.update(Message::Edit(crate::app::Edit::Char('x')), now);

        let spans = prompt_spans(&app.session, false);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].content, "·");
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        // cursor sits on the next untyped character while focused
        assert_eq!(spans[2].style.fg, Some(Color::Yellow));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_prompt_spans_no_cursor_when_unfocused() {
        let app = create_test_app("ab");
        let spans = prompt_spans(&app.session, false);

        assert!(spans
            .iter()
            .all(|s| !s.style.add_modifier.contains(Modifier::UNDERLINED)));
    }
}
