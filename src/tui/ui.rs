use std::sync::OnceLock;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use regex::Regex;

use crate::app::{App, InputTarget, NoticeKind, Tab};
use crate::models::GenerationStatus;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.tab {
        Tab::Generate => render_generate_tab(frame, app, chunks[1]),
        Tab::Saved => render_saved_tab(frame, app, chunks[1]),
    }

    render_status_line(frame, app, chunks[2]);

    if app.input_active {
        render_text_input(frame, app);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let (generate_style, saved_style) = match app.tab {
        Tab::Generate => (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::DarkGray),
        ),
        Tab::Saved => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    };

    let line = Line::from(vec![
        Span::styled(" Generate Content ", generate_style),
        Span::raw("|"),
        Span::styled(
            format!(" Saved Posts ({}) ", app.saved.len()),
            saved_style,
        ),
    ]);

    let block = Block::default()
        .title(" Social Media Post Generator ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_generate_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3), // Form
            Constraint::Ratio(2, 3), // Generated post
        ])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_generated_post(frame, app, chunks[1]);
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.form;
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);

    let topic = if form.topic.is_empty() {
        Span::styled("e.g., Future of Remote Work", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(form.topic.as_str(), value)
    };
    let keywords = if form.keywords.is_empty() {
        Span::styled("e.g., productivity, #remotefirst", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(form.keywords.as_str(), value)
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" (p) Platform  ", label),
            Span::styled(form.platform.label(), value),
        ]),
        Line::from(vec![
            Span::styled(" (t) Tone      ", label),
            Span::styled(form.tone.label(), value),
        ]),
        Line::from(vec![Span::styled(" (i) Topic     ", label), topic]),
        Line::from(vec![Span::styled(" (w) Keywords  ", label), keywords]),
        Line::from(vec![
            Span::styled(" (+/-) Posts   ", label),
            Span::styled(form.batch_count.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" ([/]) Emojis  ", label),
            Span::styled(form.emoji_count.to_string(), value),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            " Enter/g: generate",
            Style::default().fg(Color::Green),
        )),
    ];

    let block = Block::default()
        .title(" New Post ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_generated_post(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let title = if app.generated.is_empty() {
        " Generated Post ".to_string()
    } else {
        format!(
            " Generated Post {}/{} ",
            app.selected_generated + 1,
            app.generated.len()
        )
    };

    let lines = match app.generation_status {
        GenerationStatus::Generating => vec![Line::from("Generating post(s)...")],
        GenerationStatus::NoApiKey if app.generated.is_empty() => vec![
            Line::from("OpenRouter API key not configured."),
            Line::from(""),
            Line::from("Add it to the config file:"),
            Line::from("  openrouter_api_key = \"sk-or-...\""),
        ],
        _ => match app.selected_generated_post() {
            Some(post) => content_lines(&post.content),
            None => vec![Line::from("Fill the form and press Enter to generate...")],
        },
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, chunks[0]);

    let status = match app.generation_status {
        GenerationStatus::Idle => "",
        GenerationStatus::Generating => "⏳ Generating...",
        GenerationStatus::Done => "j/k:posts  s:save  e:export",
        GenerationStatus::NoApiKey => "⚠️  No API key",
    };
    let model = app
        .selected_generated_post()
        .map(|p| format!("  [{}]", p.model_used))
        .unwrap_or_default();
    let paragraph = Paragraph::new(format!("{status}{model}"))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, chunks[1]);
}

fn render_saved_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    render_saved_list(frame, app, chunks[0]);
    render_saved_detail(frame, app, chunks[1]);
}

fn render_saved_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .saved
        .iter()
        .map(|post| {
            let line = Line::from(vec![
                Span::styled(
                    format!("[{}] ", post.platform),
                    Style::default().fg(Color::Blue),
                ),
                Span::styled(post.topic.as_str(), Style::default().fg(Color::White)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Saved Posts ")
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.saved.is_empty() {
        state.select(Some(app.selected_saved));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_saved_detail(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match app.selected_saved_post() {
        Some(post) => {
            let label = Style::default().fg(Color::DarkGray);
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("Date:     ", label),
                    Span::raw(post.date.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Topic:    ", label),
                    Span::raw(post.topic.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Keywords: ", label),
                    Span::raw(post.keywords.clone()),
                ]),
                Line::from(vec![
                    Span::styled("Model:    ", label),
                    Span::raw(post.model_used.clone()),
                ]),
                Line::from(""),
            ];
            lines.extend(content_lines(&post.content));
            lines
        }
        None => vec![Line::from(
            "No posts saved yet. Generate some in the 'Generate Content' tab.",
        )],
    };

    let block = Block::default()
        .title(" Post ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.notice {
        Some((NoticeKind::Success, msg)) => (msg.clone(), Style::default().fg(Color::Green)),
        Some((NoticeKind::Error, msg)) => (msg.clone(), Style::default().fg(Color::Red)),
        Some((NoticeKind::Info, msg)) => (msg.clone(), Style::default().fg(Color::Yellow)),
        None => {
            let hints = match app.tab {
                Tab::Generate => "Tab:saved  g:generate  s:save  e:export  ?:help  q:quit",
                Tab::Saved => "Tab:generate  j/k:nav  d:delete  C:clear all  ?:help  q:quit",
            };
            (hints.to_string(), Style::default().fg(Color::DarkGray))
        }
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_text_input(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.area());

    let title = match app.input_target {
        InputTarget::Topic => " Main Topic/Subject ",
        InputTarget::Keywords => " Keywords/Hashtags (comma separated) ",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.input_buffer);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());

    let help_text = vec![
        "",
        " Form:",
        "   p        Cycle platform",
        "   t        Cycle tone",
        "   i        Edit topic",
        "   w        Edit keywords",
        "   + / -    More / fewer posts per batch",
        "   ] / [    More / fewer emojis",
        "",
        " Actions:",
        "   Enter/g  Generate post(s)",
        "   j / k    Select post",
        "   s        Save selected post",
        "   e        Export selected post to Google Sheets",
        "   d        Delete saved post",
        "   C        Clear all saved posts",
        "",
        " General:",
        "   Tab      Switch tab",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(ratatui::widgets::Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

static HASHTAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn hashtag_regex() -> &'static Regex {
    HASHTAG_REGEX.get_or_init(|| Regex::new(r"#[A-Za-z0-9_]+").expect("valid regex"))
}

/// Split one line of text into (segment, is_hashtag) pieces.
fn split_hashtags(line: &str) -> Vec<(&str, bool)> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in hashtag_regex().find_iter(line) {
        if m.start() > last {
            segments.push((&line[last..m.start()], false));
        }
        segments.push((m.as_str(), true));
        last = m.end();
    }
    if last < line.len() {
        segments.push((&line[last..], false));
    }
    segments
}

/// Turn generated content into styled lines with hashtags highlighted.
fn content_lines(content: &str) -> Vec<Line<'_>> {
    content
        .lines()
        .map(|line| {
            let spans: Vec<Span> = split_hashtags(line)
                .into_iter()
                .map(|(segment, is_hashtag)| {
                    if is_hashtag {
                        Span::styled(
                            segment,
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::raw(segment)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_hashtags_out_of_plain_text() {
        let segments = split_hashtags("Try #remotework today, #AI_2025 is here");
        assert_eq!(
            segments,
            vec![
                ("Try ", false),
                ("#remotework", true),
                (" today, ", false),
                ("#AI_2025", true),
                (" is here", false),
            ]
        );
    }

    #[test]
    fn line_without_hashtags_is_one_segment() {
        assert_eq!(split_hashtags("no tags here"), vec![("no tags here", false)]);
    }

    #[test]
    fn content_lines_follow_newlines() {
        let lines = content_lines("one\ntwo #tag");
        assert_eq!(lines.len(), 2);
    }
}
