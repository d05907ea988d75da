use chrono::Local;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::scoreboard::ScoreboardView;
use crate::state::match_clock::{MatchClock, Phase};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use match_api::duration::{format_clock, format_duration};
use match_api::{Match, MatchResult};

static TABS: &[&str; 2] = &["Live", "Result"];

const HELP_TEXT: &str = "\
Enter   start match / start 2nd half
Space   pause / resume the clock
Q / W   team 1 score +1 / -1      O / P   team 2 score +1 / -1
A / S   team 1 fouls +1 / -1      K / L   team 2 fouls +1 / -1
e       end period                 n       start overtime
x       force end (decide now)     1 / 2   award to team 1 / team 2
t       edit time remaining (paused only)
m       overtime length            h       break length
b       start / pause break timer
Tab     live / result view         r       revert result edit
\"       toggle logs                f       full screen
Ctrl+C  quit                       Esc     close help";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Live => draw_live(f, layout.main, app),
            MenuItem::Result => draw_result_edit(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }
        draw_status_bar(f, layout.status_bar, app);
        draw_input(f, layout.main, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Live => 0,
        MenuItem::Result => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_live(f: &mut Frame, area: Rect, app: &App) {
    let Some(clock) = app.clock() else {
        f.render_widget(
            Paragraph::new(format!("Loading match {}...", app.state.match_id))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(default_border(Color::DarkGray)),
            area,
        );
        return;
    };

    let [board_area, side_area] = if area.width >= 90 {
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area)
    } else {
        Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).areas(area)
    };

    f.render_widget(ScoreboardView { clock }, board_area);
    draw_controls(f, side_area, clock);
}

fn draw_controls(f: &mut Frame, area: Rect, clock: &MatchClock) {
    let block = default_border(Color::White).title(" Controls ");
    let dim = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = match clock.phase() {
        Phase::NotStarted => vec![Line::from("Enter  start match")],
        Phase::InPeriod if clock.is_running() => vec![
            Line::from("Space  pause"),
            Line::from("e      end period"),
        ],
        Phase::InPeriod => vec![
            Line::from("Space  resume"),
            Line::from("t      edit time remaining"),
            Line::from("e      end period"),
        ],
        Phase::HalftimeBreak => {
            let mut lines = vec![Line::from("Enter  start 2nd half")];
            if let Some(timer) = clock.break_timer() {
                let state = if timer.running {
                    "running"
                } else if timer.is_done() {
                    "over"
                } else {
                    "paused"
                };
                lines.push(Line::from(vec![
                    Span::raw("Break  "),
                    Span::styled(
                        format_clock(timer.remaining),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("  ({state}, b to toggle)"), dim),
                ]));
            }
            lines
        }
        Phase::OvertimePending => vec![
            Line::from("Level after regulation"),
            Line::from(format!("n      start overtime ({})", format_clock(clock.overtime_length()))),
            Line::from("m      change overtime length"),
        ],
        Phase::Finished => vec![Line::from(result_summary(clock.record()))],
    };

    if clock.phase() != Phase::Finished {
        lines.push(Line::from(Span::styled("x      force end   1/2  award", dim)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Period: {}", format_duration(clock.period_length())),
        dim,
    )));
    lines.push(Line::from(Span::styled(
        format!("Overtime: {}", format_duration(clock.overtime_length())),
        dim,
    )));
    lines.push(Line::from(Span::styled(
        format!("Break: {}", format_duration(clock.break_length())),
        dim,
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn result_summary(record: &Match) -> String {
    match record.result() {
        Some(result) => describe_result(record, &result),
        None => "Completed".to_string(),
    }
}

fn describe_result(record: &Match, result: &MatchResult) -> String {
    match result.winner_id.as_deref() {
        Some(id) => format!(
            "Winner: {} ({})",
            record.team_name(id).unwrap_or(id),
            result.reason
        ),
        None => "Draw".to_string(),
    }
}

fn draw_result_edit(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Result Edit ");
    let (Some(clock), Some(editor)) = (app.clock(), app.state.result_edit.as_ref()) else {
        f.render_widget(
            Paragraph::new("Results can be edited once the match is completed")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
        return;
    };

    let record = clock.record();
    let draft = editor.draft();
    let changed = if editor.is_dirty() { "  (unsaved)" } else { "" };
    let lines = vec![
        Line::from(format!(
            "{:<20} {:>3}  fouls {:>3}",
            record.team1.name, draft.team1_score, draft.team1_fouls
        )),
        Line::from(format!(
            "{:<20} {:>3}  fouls {:>3}",
            record.team2.name, draft.team2_score, draft.team2_fouls
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}{changed}", describe_result(record, editor.result())),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Q/W O/P A/S K/L adjust   Enter save   r revert",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    f.render_widget(
        Paragraph::new(HELP_TEXT).block(default_border(Color::White).title(" Help ")),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();
    if app.state.in_flight > 0 {
        spans.push(Span::styled(
            format!(" saving ({}) ", app.state.in_flight),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(notice) = app.state.notice.as_ref()
        && notice.is_fresh(Local::now())
    {
        let color = if notice.is_error { Color::Red } else { Color::Green };
        spans.push(Span::styled(
            format!(" {} ", notice.message),
            Style::default().fg(color),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let Some(input) = app.state.input.as_ref() else {
        return;
    };
    let width = 40.min(area.width);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(3) / 2,
        width,
        3.min(area.height),
    );
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(format!("{}_", input.buffer)).block(
            default_border(Color::Yellow).title(format!(" {} ", input.field.prompt())),
        ),
        popup,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
