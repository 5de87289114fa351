//! Stateless UI rendering for the game screen.

use monty_hall::{Decision, DoorCount, Statistics, rules};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::{DoorCard, DoorFace};

const HELP: &str =
    "←/→ or 1-9,0 move  Enter pick  s stay  w switch  n new round  +/- doors  r reset stats  q quit";

/// Renders the doors, statistics, status line and key help.
pub fn draw(
    frame: &mut Frame,
    cards: &[DoorCard],
    door_count: DoorCount,
    statistics: &Statistics,
    status: &str,
) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(7),    // Doors
            Constraint::Length(7), // Statistics
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new(format!("Monty Hall - {} doors", door_count))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_doors(frame, chunks[1], cards);
    draw_statistics(frame, chunks[2], door_count, statistics);

    let status_text = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_text, chunks[3]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}

fn draw_doors(frame: &mut Frame, area: Rect, cards: &[DoorCard]) {
    let count = cards.len().max(1) as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(cards.iter().map(|_| Constraint::Ratio(1, count)))
        .split(area);

    for (card, col) in cards.iter().zip(cols.iter()) {
        draw_door(frame, *col, card);
    }
}

fn draw_door(frame: &mut Frame, area: Rect, card: &DoorCard) {
    let (symbol, face_style) = match card.face {
        DoorFace::Closed => ("?", Style::default().fg(Color::White)),
        DoorFace::Goat => ("goat", Style::default().fg(Color::DarkGray)),
        DoorFace::Car => (
            "CAR",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let border_style = if card.under_cursor {
        Style::default().fg(Color::Black).bg(Color::White)
    } else if card.picked {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let marker = if card.picked { "your pick" } else { "" };
    let lines = vec![
        Line::from(Span::styled(symbol, face_style)),
        Line::from(""),
        Line::from(format!("{:.1}%", card.probability * 100.0)),
        Line::from(Span::styled(marker, Style::default().fg(Color::Yellow))),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(format!(" {} ", card.door.number()))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);
}

fn draw_statistics(frame: &mut Frame, area: Rect, door_count: DoorCount, stats: &Statistics) {
    let row = |decision: Decision, wins: u64, rounds: u64| {
        Line::from(format!(
            "{:<7} {:>6} / {:<6} {:>6.2}%   theory {:>6.2}%",
            decision,
            wins,
            rounds,
            stats.win_rate(decision),
            rules::theoretical_win_rate(door_count, decision) * 100.0
        ))
    };

    let lines = vec![
        Line::from(format!("Rounds played: {}", stats.total_rounds())),
        row(Decision::Stay, stats.stay_wins(), stats.stay_rounds()),
        row(Decision::Switch, stats.switch_wins(), stats.switch_rounds()),
        Line::from(format!("Overall win rate: {:.2}%", stats.overall_win_rate())),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(" Statistics ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
