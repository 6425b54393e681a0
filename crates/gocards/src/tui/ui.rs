//! Rendering for the study screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::card::Difficulty;
use crate::progress::StudyStats;
use crate::session::Filter;

use super::StudyApp;

pub(super) fn draw(frame: &mut Frame, app: &StudyApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_progress_gauge(frame, app, chunks[0]);
    draw_meta_line(frame, app, chunks[1]);
    if app.show_help() {
        draw_help(frame, chunks[2]);
    } else {
        draw_card(frame, app, chunks[2]);
    }
    draw_notice_line(frame, app, chunks[3]);
    draw_key_line(frame, chunks[4]);
}

/// Overall progress across the whole deck, independent of the filter.
fn draw_progress_gauge(frame: &mut Frame, app: &StudyApp, area: Rect) {
    let stats = StudyStats::collect(app.deck(), app.progress());
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" gocards "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(stats.ratio())
        .label(format!(
            "{}/{} studied",
            stats.studied_cards, stats.total_cards
        ));
    frame.render_widget(gauge, area);
}

fn draw_meta_line(frame: &mut Frame, app: &StudyApp, area: Rect) {
    let session = app.session();
    let mut spans = vec![Span::styled(
        match session.position() {
            Some((position, total)) => format!(" card {position}/{total}"),
            None => " no cards".to_string(),
        },
        Style::default().fg(Color::Gray),
    )];
    spans.push(Span::styled(
        format!("  |  filter: {}", session.filter().label()),
        Style::default().fg(Color::Gray),
    ));
    if session.study_mode() {
        spans.push(Span::styled(
            "  |  unstudied only",
            Style::default().fg(Color::Magenta),
        ));
    }
    if let Some(card) = session.current_card(app.deck()) {
        spans.push(Span::styled(
            format!("  |  {}", card.difficulty),
            Style::default().fg(difficulty_color(card.difficulty)),
        ));
        if app.progress().is_studied(card.id) {
            spans.push(Span::styled(
                "  |  studied",
                Style::default().fg(Color::Green),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_card(frame: &mut Frame, app: &StudyApp, area: Rect) {
    let lines = match app.session().current_card(app.deck()) {
        Some(card) => {
            let mut lines = vec![
                Line::default(),
                Line::from(Span::styled(
                    card.question.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::default(),
            ];
            if app.session().revealed() {
                lines.push(Line::from(Span::styled(
                    card.answer.clone(),
                    Style::default().fg(Color::Cyan),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "[space] reveal answer",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                )));
            }
            lines
        }
        None => empty_selection_lines(app.session().filter(), app.session().study_mode()),
    };

    let card_view = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    frame.render_widget(card_view, area);
}

/// The empty state: shown instead of a card, never as an error.
fn empty_selection_lines(filter: Filter, study_mode: bool) -> Vec<Line<'static>> {
    let hint = match (filter, study_mode) {
        (Filter::All, true) => "every card is studied; press u to include them, or R to reset",
        (_, true) => "press 0 to show all cards, or u to include studied cards",
        _ => "press 0 to show all cards",
    };
    vec![
        Line::default(),
        Line::from(Span::styled(
            "no cards match the current selection",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
    ]
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let rows = [
        ("space / enter", "flip question and answer"),
        ("n / right", "next card"),
        ("p / left", "previous card"),
        ("m", "mark card studied"),
        ("s", "shuffle current selection"),
        ("u", "hide or show studied cards"),
        ("0 1 2 3", "filter: all / basic / intermediate / advanced"),
        ("R", "reset all saved progress"),
        ("q / esc", "quit"),
    ];
    let mut lines = vec![Line::from(Span::styled(
        "keys",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    for (key, action) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<14}"), Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ]));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "press any key to close",
        Style::default().fg(Color::DarkGray),
    )));

    let help = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" help "));
    frame.render_widget(help, area);
}

fn draw_notice_line(frame: &mut Frame, app: &StudyApp, area: Rect) {
    if app.persistence_degraded() {
        let notice = Paragraph::new(Span::styled(
            " progress is not being saved (storage unavailable)",
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(notice, area);
    }
}

fn draw_key_line(frame: &mut Frame, area: Rect) {
    let keys = Paragraph::new(Span::styled(
        " space flip  n/p move  m mark  s shuffle  u unstudied  0-3 filter  ? more",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(keys, area);
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Basic => Color::Green,
        Difficulty::Intermediate => Color::Yellow,
        Difficulty::Advanced => Color::Red,
    }
}
