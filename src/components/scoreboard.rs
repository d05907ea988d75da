use crate::state::match_clock::{MatchClock, Phase};
use match_api::duration::format_clock;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// Big scoreboard panel: clock readout, period, both teams' score and fouls.
pub struct ScoreboardView<'a> {
    pub clock: &'a MatchClock,
}

impl Widget for ScoreboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let clock = self.clock;
        let border = if clock.is_running() { Color::Green } else { Color::Yellow };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(border))
            .title(format!(" Match {} ", clock.match_id()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width < 20 || inner.height < 5 {
            render_line(Line::from(readout(clock)), inner.x, inner.y, inner.width, buf);
            return;
        }

        let record = clock.record();
        let board = clock.scoreboard();
        let mut y = inner.y;

        render_centered(
            Line::from(Span::styled(
                readout(clock),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            inner,
            y,
            buf,
        );
        y += 1;
        render_centered(
            Line::from(Span::styled(status_line(clock), Style::default().fg(Color::Gray))),
            inner,
            y,
            buf,
        );
        y += 2;

        let half = inner.width / 2;
        let left = Rect::new(inner.x, y, half, inner.height.saturating_sub(y - inner.y));
        let right = Rect::new(inner.x + half, y, inner.width - half, left.height);
        render_team(buf, left, &record.team1.name, board.team1_score, board.team1_fouls, "Q/W", "A/S");
        render_team(buf, right, &record.team2.name, board.team2_score, board.team2_fouls, "O/P", "K/L");
    }
}

fn readout(clock: &MatchClock) -> String {
    let marker = if clock.is_running() { "▶" } else { "⏸" };
    match clock.phase() {
        Phase::InPeriod => format!("{marker} {}", format_clock(clock.remaining())),
        _ => format_clock(clock.remaining()),
    }
}

fn status_line(clock: &MatchClock) -> String {
    match clock.phase() {
        Phase::InPeriod => format!("{} | {}", clock.period().label(), clock.status().label()),
        phase => format!("{} | {}", phase.label(), clock.status().label()),
    }
}

fn render_team(buf: &mut Buffer, area: Rect, name: &str, score: u32, fouls: u32, score_keys: &str, foul_keys: &str) {
    let rows = [
        Line::from(Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            score.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("fouls {fouls}"), Style::default().fg(Color::Red))),
        Line::from(Span::styled(
            format!("score {score_keys}  fouls {foul_keys}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    for (offset, line) in rows.into_iter().enumerate() {
        render_centered(line, area, area.y + offset as u16, buf);
    }
}

fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.width, buf);
}

fn render_line(line: Line, x: u16, y: u16, max_width: u16, buf: &mut Buffer) {
    let mut cx = x;
    let limit = x.saturating_add(max_width);
    for span in &line.spans {
        let style: Style = span.style;
        let mut run = String::new();
        for ch in span.content.chars() {
            if cx >= limit {
                break;
            }
            run.push(ch);
            cx += 1;
        }
        let start = cx.saturating_sub(run.chars().count() as u16);
        if !run.is_empty() {
            buf.set_string(start, y, run, style);
        }
    }
}
