use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::BannerTheme;
use crate::components::bracket::{BracketView, diagram_height, scroll_for_selection, terminal_params};
use crate::ui::layout::LayoutAreas;
use torneo_bracket::{LEAF_SLOTS, Side, cell_px, grid_placement};

static TABS: &[&str; 2] = &["Bracket", "Entrants"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            if app.state.show_intro {
                draw_intro(f, f.area(), app);
                return;
            }

            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Bracket => draw_bracket(f, layout.main, app),
                MenuItem::Entrants => draw_entrants(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            draw_status_line(f, layout.status, app);

            if app.state.show_logs {
                draw_logs_overlay(f, f.area());
            }
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Torneo ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            stage: app.state.bracket.stage,
            side: app.state.bracket.side,
        },
        banner_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to view bracket")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket | MenuItem::Help => 0,
        MenuItem::Entrants => 1,
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

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .areas(inner);

    let cursor = &app.state.bracket;
    let header_text = format!(
        "Torneo 64 | {} | {} half | {}",
        cursor.stage.label(),
        cursor.side.label(),
        app.progress_line()
    );
    f.render_widget(Paragraph::new(header_text), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=match  r=side  t/b=winner  w=final  u=undo  ?=help")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    if content.width == 0 || content.height == 0 {
        return;
    }

    // Follow the selection with the scroll window before rendering.
    let params = terminal_params(content.width);
    let selected_cell = grid_placement(
        cursor.side,
        cursor.stage.index(),
        cursor.selected_match,
        &params,
    );
    let cell_top = cell_px(selected_cell, &params).y_top as u16;
    let max_scroll = diagram_height(&params).saturating_sub(content.height);
    app.state.bracket.scroll_offset =
        scroll_for_selection(cell_top, content.height, app.state.bracket.scroll_offset)
            .min(max_scroll);

    f.render_widget(
        BracketView {
            state: &app.state.bracket.current,
            selected_side: app.state.bracket.side,
            selected_stage: app.state.bracket.stage,
            selected_match: app.state.bracket.selected_match,
            scroll_offset: app.state.bracket.scroll_offset,
            theme: BannerTheme::Dark,
        },
        content,
    );
}

fn draw_entrants(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Entrants ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let state = &app.state.bracket.current;
    let mut lines: Vec<Line> = Vec::with_capacity(LEAF_SLOTS + 2);
    lines.push(Line::from("Seeded leaves (j/k scroll). Set TORNEO_PLAYERS_FILE to load a roster."));
    lines.push(Line::from(""));

    for leaf in 0..LEAF_SLOTS {
        let side = if leaf < 32 { Side::Left } else { Side::Right };
        let k = leaf % 32;
        let entry = state
            .match_at(side, 0, k / 2)
            .and_then(|m| m.slot((k % 2) as u8));
        let (name, style) = match entry {
            Some(e) => (e.name.as_str(), Style::default().fg(Color::White)),
            None => ("—", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{leaf:>2}  "), Style::default().fg(Color::DarkGray)),
            Span::styled(name.to_string(), style),
        ]));
    }

    let total = lines.len();
    let visible = inner.height as usize;
    let offset = (app.state.roster_scroll as usize).min(total.saturating_sub(visible));
    let end = (offset + visible).min(total);
    f.render_widget(Paragraph::new(lines[offset..end].to_vec()), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "q=quit  1=Bracket  2=Entrants  ?=help  Esc=back

Bracket:
  h/l or arrows   previous / next round
  j/k or arrows   move between matches
  r or Tab        switch half (left/right)
  t / b           top / bottom slot wins the selected match
  w               selected half's finalist wins the final
  u               undo last command
  R               reset the bracket
  s / o           save / load snapshot

Global:
  a               pause/resume demo autoplay
  f               toggle full screen
  \"               toggle log pane";
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let (text, style) = if let Some(err) = app.state.last_error.as_deref() {
        (format!(" {err}"), Style::default().fg(Color::Red))
    } else if let Some(status) = app.state.status.as_deref() {
        (format!(" {status}"), Style::default().fg(Color::DarkGray))
    } else {
        (
            format!(" {} | undo depth {}", app.progress_line(), app.state.bracket.history_len()),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_logs_overlay(f: &mut Frame, area: Rect) {
    let height = (area.height / 3).max(6).min(area.height);
    let overlay = Rect::new(area.x, area.y + area.height - height, area.width, height);
    f.render_widget(Clear, overlay);
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(logger, overlay);
}
