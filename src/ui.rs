use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, MenuFocus, Screen};
use crate::classifier::Classification;
use crate::session::AVAILABLE_TIMES;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const ORANGE: Color = Color::Rgb(255, 165, 0);

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn verdict_color(classification: Option<Classification>) -> Color {
    match classification {
        Some(Classification::Exact) => Color::Green,
        Some(Classification::PartialPrefix) => Color::Red,
        Some(Classification::Mismatch) => ORANGE,
        None => Color::Gray,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Menu => render_menu(self, area, buf),
            Screen::Typing => render_typing(self, area, buf),
            Screen::Results => render_results(self, area, buf),
        }

        if let Some(message) = &self.alert {
            render_alert(message, area, buf);
        }
    }
}

fn picker_lines<'a>(
    items: impl Iterator<Item = String>,
    selected: Option<usize>,
    focused: bool,
) -> Vec<Line<'a>> {
    let highlight = if focused {
        bold().fg(Color::Cyan)
    } else {
        bold()
    };
    items
        .enumerate()
        .map(|(i, label)| {
            if Some(i) == selected {
                Line::from(Span::styled(format!("> {label}"), highlight))
            } else {
                Line::from(Span::styled(format!("  {label}"), dim_bold()))
            }
        })
        .collect()
}

fn unlisted_line<'a>(label: &str) -> Line<'a> {
    Line::from(Span::styled(
        format!("> {label} (unlisted)"),
        bold().fg(Color::Yellow),
    ))
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled("tak", bold().fg(Color::Magenta)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    let menu = &app.menu;
    let mut corpus_lines = if menu.corpora.is_empty() {
        vec![Line::from(Span::styled(
            "no word lists found",
            Style::default().fg(Color::Yellow),
        ))]
    } else {
        picker_lines(
            menu.corpora.iter().cloned(),
            menu.corpus_idx,
            menu.focus == MenuFocus::Corpus,
        )
    };
    if let Some(corpus) = &menu.pending_corpus {
        corpus_lines.push(unlisted_line(corpus));
    }
    Paragraph::new(corpus_lines)
        .block(Block::default().borders(Borders::ALL).title("Language"))
        .render(columns[0], buf);

    let mut duration_lines = picker_lines(
        AVAILABLE_TIMES.iter().map(|secs| format!("{secs} seconds")),
        menu.duration_idx,
        menu.focus == MenuFocus::Duration,
    );
    if let Some(secs) = menu.pending_duration {
        duration_lines.push(unlisted_line(&format!("{secs} seconds")));
    }
    Paragraph::new(duration_lines)
        .block(Block::default().borders(Borders::ALL).title("Time"))
        .render(columns[1], buf);

    Paragraph::new(Span::styled(
        "(↑/↓) select  (tab) switch list  (enter) start  (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

/// Paragraph with consumed words blanked out, the current word underlined
fn paragraph_spans<'a>(words: &'a [String], cursor: usize) -> Vec<Span<'a>> {
    let mut spans = Vec::with_capacity(words.len() * 2);
    for (idx, word) in words.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let span = if idx < cursor {
            Span::raw(" ".repeat(word.width()))
        } else if idx == cursor {
            Span::styled(word.as_str(), bold().add_modifier(Modifier::UNDERLINED))
        } else {
            Span::styled(word.as_str(), dim_bold())
        };
        spans.push(span);
    }
    spans
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let metrics = session.metrics();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // current word
            Constraint::Min(3),    // paragraph
            Constraint::Length(3), // input
            Constraint::Length(4), // stats
            Constraint::Length(1), // progress
            Constraint::Length(1), // legend
        ])
        .split(area);

    let color = verdict_color(session.last_verdict().map(|v| v.classification));
    let mut header = vec![Span::styled(
        metrics.current_word.clone().unwrap_or_default(),
        bold().fg(color),
    )];
    if let Some(next) = &metrics.next_word {
        header.push(Span::styled(format!("  {next}"), dim_bold()));
    }
    Paragraph::new(vec![
        Line::from(header),
        Line::from(Span::styled(
            format!("{} · {}s", session.corpus(), session.duration_secs()),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if let Some(target) = session.target() {
        Paragraph::new(Line::from(paragraph_spans(target.words(), session.cursor())))
            .wrap(Wrap { trim: false })
            .render(chunks[1], buf);
    }

    Paragraph::new(Span::raw(app.input.as_str()))
        .block(Block::default().borders(Borders::ALL).title("Start typing..."))
        .render(chunks[2], buf);

    let accuracy = metrics
        .accuracy
        .map(|a| format!("{a:.2}%"))
        .unwrap_or_else(|| "--".to_string());
    let stats = vec![
        Line::from(format!("Time: {}s", metrics.remaining_secs)),
        Line::from(format!("Current WPM: {}", metrics.current_wpm)),
        Line::from(format!("Average WPM: {:.2}", metrics.average_wpm)),
        Line::from(format!("Accuracy: {accuracy}")),
    ];
    Paragraph::new(stats).style(bold()).render(chunks[3], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(metrics.progress.clamp(0.0, 1.0))
        .label(format!("{}/{}", session.cursor(), session.words_per_paragraph()))
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(space/enter) submit word  (esc) back to menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let Some(report) = app.session.report() else {
        return;
    };

    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Total WPM: {:?}", report.total_wpm),
            bold().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            format!("Accuracy: {:.2}%", report.accuracy),
            bold(),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let stats = &report.stats;
    Paragraph::new(Span::styled(
        format!(
            "{} typed   {} correct   {} extra   {} missed   {} keystrokes",
            stats.words_typed,
            stats.correct_words,
            stats.extra_words,
            stats.missed_words,
            stats.total_keystrokes
        ),
        dim_bold(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    let saved = match (&app.saved_to, &app.save_error) {
        (Some(path), _) => Span::styled(
            format!("saved to {}", path.display()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
        ),
        (None, Some(err)) => Span::styled(
            format!("not saved: {err}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::ITALIC),
        ),
        (None, None) => Span::raw(""),
    };
    Paragraph::new(saved)
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    Paragraph::new(Span::styled(
        "(r) retry  (m) menu  (esc) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn render_alert(message: &str, area: Rect, buf: &mut Buffer) {
    let width = (message.width() as u16 + 4).clamp(20, area.width.max(20));
    let popup = centered(area, width, 5);

    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(message.to_string(), bold())),
        Line::from(Span::styled("press any key", dim_bold())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Error")
            .border_style(Style::default().fg(Color::Red)),
    )
    .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::corpus::EmbeddedCorpusStore;
    use crate::persist::{FileResultSink, ResultFormat};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buffer_text(&buf)
    }

    fn app(config: Config) -> App {
        let dir = std::env::temp_dir().join("tak-ui-tests");
        App::new(
            config,
            Box::new(EmbeddedCorpusStore),
            Box::new(FileResultSink::new(dir, ResultFormat::Text)),
        )
    }

    #[test]
    fn menu_lists_corpora_and_times() {
        let text = render(&app(Config::default()));
        assert!(text.contains("english"));
        assert!(text.contains("german"));
        assert!(text.contains("300 seconds"));
    }

    #[test]
    fn alert_popup_is_drawn() {
        let mut app = app(Config::default());
        app.alert = Some("Please select a language and time.".to_string());
        let text = render(&app);
        assert!(text.contains("Please select a language and time."));
    }

    #[test]
    fn typing_screen_shows_live_stats() {
        let mut app = app(Config {
            corpus: Some("english".into()),
            duration_secs: Some(60),
            words_per_paragraph: 5,
            ..Config::default()
        });
        assert!(app.start_session());

        let text = render(&app);
        assert!(text.contains("Time: 60s"));
        assert!(text.contains("Current WPM: 0"));
        assert!(text.contains("Accuracy: --"));
    }

    #[test]
    fn unlisted_selection_is_shown_in_the_menu() {
        let text = render(&app(Config {
            corpus: Some("klingon".into()),
            duration_secs: Some(30),
            ..Config::default()
        }));
        assert!(text.contains("klingon (unlisted)"));
        assert!(text.contains("30 seconds (unlisted)"));
    }

    #[test]
    fn typing_header_names_corpus_and_next_word() {
        let mut app = app(Config {
            corpus: Some("german".into()),
            duration_secs: Some(45),
            words_per_paragraph: 3,
            ..Config::default()
        });
        assert!(app.start_session());

        let next = app.session.next_word().unwrap().to_string();
        let text = render(&app);
        assert!(text.contains("german · 45s"));
        assert!(text.contains(&next));
    }

    #[test]
    fn consumed_words_are_blanked() {
        let words = vec!["cat".to_string(), "horse".to_string(), "dog".to_string()];
        let spans = paragraph_spans(&words, 2);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "          dog");
    }

    #[test]
    fn verdict_colors() {
        assert_eq!(verdict_color(Some(Classification::Exact)), Color::Green);
        assert_eq!(verdict_color(Some(Classification::PartialPrefix)), Color::Red);
        assert_eq!(verdict_color(Some(Classification::Mismatch)), ORANGE);
        assert_eq!(verdict_color(None), Color::Gray);
    }
}
