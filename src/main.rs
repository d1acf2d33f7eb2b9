mod app;
mod catalog;
mod certificate;
mod config;
mod event;
mod session;
mod store;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use catalog::{Category, EXERCISES_PER_LEVEL, Level, Track};
use config::TIMED_TEST_MINUTES;
use event::{AppEvent, EventHandler};
use ui::components::menu::{Menu, MenuItem};
use ui::components::milestones::MilestoneGrid;
use ui::components::progress_bar::ProgressBar;
use ui::components::results::ResultsPanel;
use ui::components::typing_area::TypingArea;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(
    name = "typemaster",
    version,
    about = "Terminal typing tutor with skill levels, timed tests, and certificates"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, value_parser = clap::value_parser!(u32), help = "Start a timed test immediately (1, 3, or 5 minutes)")]
    timed: Option<u32>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut app = App::new();

    if let Some(theme_name) = cli.theme {
        if let Some(theme) = ui::theme::Theme::load(&theme_name) {
            let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
            app.theme = theme;
        }
    }
    if let Some(minutes) = cli.timed {
        if TIMED_TEST_MINUTES.contains(&minutes) {
            app.start_timed_test(minutes);
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Press only; Repeat would inflate typed input
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::LevelSelect => handle_level_select_key(app, key, &Level::GENERAL),
        AppScreen::ProgrammerSelect => handle_level_select_key(app, key, &Level::PROGRAMMER),
        AppScreen::CategorySelect => handle_category_select_key(app, key),
        AppScreen::ExercisePicker => handle_picker_key(app, key),
        AppScreen::DurationSelect => handle_duration_key(app, key),
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
        AppScreen::CertificateName => handle_certificate_name_key(app, key),
        AppScreen::Progress => handle_progress_key(app, key),
    }
}

const MENU_ITEM_COUNT: usize = 5;

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.open(AppScreen::LevelSelect),
        KeyCode::Char('2') => app.open(AppScreen::ProgrammerSelect),
        KeyCode::Char('3') => app.open(AppScreen::CategorySelect),
        KeyCode::Char('4') => app.open(AppScreen::DurationSelect),
        KeyCode::Char('5') | KeyCode::Char('p') => app.open(AppScreen::Progress),
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_index = app.select_index.checked_sub(1).unwrap_or(MENU_ITEM_COUNT - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_index = (app.select_index + 1) % MENU_ITEM_COUNT;
        }
        KeyCode::Enter => match app.select_index {
            0 => app.open(AppScreen::LevelSelect),
            1 => app.open(AppScreen::ProgrammerSelect),
            2 => app.open(AppScreen::CategorySelect),
            3 => app.open(AppScreen::DurationSelect),
            4 => app.open(AppScreen::Progress),
            _ => {}
        },
        _ => {}
    }
}

fn handle_level_select_key(app: &mut App, key: KeyEvent, levels: &[Level]) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.open(AppScreen::Menu),
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_index = app.select_index.checked_sub(1).unwrap_or(levels.len() - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_index = (app.select_index + 1) % levels.len();
        }
        KeyCode::Enter => {
            if let Some(level) = levels.get(app.select_index) {
                app.open_picker(Track::Level(*level));
            }
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let choice = (ch as usize).wrapping_sub('1' as usize);
            if let Some(level) = levels.get(choice) {
                app.open_picker(Track::Level(*level));
            }
        }
        _ => {}
    }
}

fn handle_category_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.open(AppScreen::Menu),
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_index = app
                .select_index
                .checked_sub(1)
                .unwrap_or(Category::ALL.len() - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_index = (app.select_index + 1) % Category::ALL.len();
        }
        KeyCode::Enter => {
            if let Some(category) = Category::ALL.get(app.select_index) {
                app.open_picker(Track::Category(*category));
            }
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let choice = (ch as usize).wrapping_sub('1' as usize);
            if let Some(category) = Category::ALL.get(choice) {
                app.open_picker(Track::Category(*category));
            }
        }
        _ => {}
    }
}

fn handle_duration_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.open(AppScreen::Menu),
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_index = app
                .select_index
                .checked_sub(1)
                .unwrap_or(TIMED_TEST_MINUTES.len() - 1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_index = (app.select_index + 1) % TIMED_TEST_MINUTES.len();
        }
        KeyCode::Enter => {
            if let Some(minutes) = TIMED_TEST_MINUTES.get(app.select_index) {
                app.start_timed_test(*minutes);
            }
        }
        KeyCode::Char(ch) if ch.is_ascii_digit() => {
            let choice = (ch as usize).wrapping_sub('1' as usize);
            if let Some(minutes) = TIMED_TEST_MINUTES.get(choice) {
                app.start_timed_test(*minutes);
            }
        }
        _ => {}
    }
}

fn picker_return_screen(app: &App) -> AppScreen {
    match app.picker_track {
        Some(Track::Level(level)) if level.is_programmer() => AppScreen::ProgrammerSelect,
        Some(Track::Level(_)) => AppScreen::LevelSelect,
        Some(Track::Category(_)) => AppScreen::CategorySelect,
        None => AppScreen::Menu,
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            let back = picker_return_screen(app);
            app.open(back);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.picker_index = app.picker_index.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.picker_index = (app.picker_index + 1).min(EXERCISES_PER_LEVEL - 1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.picker_index = app.picker_index.saturating_sub(10);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.picker_index = (app.picker_index + 10).min(EXERCISES_PER_LEVEL - 1);
        }
        KeyCode::Enter => app.start_picked_exercise(),
        _ => {}
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_session(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.type_char('\n'),
        // Tab is a literal character so code exercises reproduce exactly
        KeyCode::Tab => app.type_char('\t'),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry_session(),
        KeyCode::Char('p') => app.start_problem_key_drill(),
        KeyCode::Char('c') => app.open_certificate_name(),
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => app.go_to_menu(),
        _ => {}
    }
}

fn handle_certificate_name_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.screen = AppScreen::Results,
        KeyCode::Enter => app.issue_certificate(),
        KeyCode::Backspace => {
            app.certificate_name.pop();
        }
        KeyCode::Char(ch) => {
            if app.certificate_name.chars().count() < 40 {
                app.certificate_name.push(ch);
            }
        }
        _ => {}
    }
}

fn handle_progress_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.open(AppScreen::Menu),
        KeyCode::Up | KeyCode::Char('k') => {
            app.progress_scroll = app.progress_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.progress_scroll = (app.progress_scroll + 1).min(App::all_tracks().len() - 1);
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::LevelSelect => render_level_select(
            frame,
            app,
            "Skill Levels",
            "Prose exercises, five levels of difficulty",
            &Level::GENERAL,
        ),
        AppScreen::ProgrammerSelect => render_level_select(
            frame,
            app,
            "Programmer Track",
            "Code, queries, and shell commands",
            &Level::PROGRAMMER,
        ),
        AppScreen::CategorySelect => render_category_select(frame, app),
        AppScreen::ExercisePicker => render_picker(frame, app),
        AppScreen::DurationSelect => render_duration_select(frame, app),
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Results => render_results(frame, app),
        AppScreen::CertificateName => render_certificate_name(frame, app),
        AppScreen::Progress => render_progress(frame, app),
    }
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect, text: &str) {
    let colors = &app.theme.colors;
    let footer = Paragraph::new(Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, area);
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let completed: usize = App::all_tracks()
        .iter()
        .map(|t| app.progress.completed_count(t.name()))
        .sum();
    let header_info = format!(" {completed} exercises completed");
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typemaster ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let mut menu = Menu::new(
        "typemaster",
        "Terminal Typing Tutor",
        vec![
            MenuItem::new("1", "Skill Levels", "Beginner through Master, 100 exercises each"),
            MenuItem::new("2", "Programmer Track", "Practice on code snippets"),
            MenuItem::new("3", "Categories", "Prose by topic"),
            MenuItem::new("4", "Timed Test", "1, 3, or 5 minutes; earn a certificate"),
            MenuItem::new("5", "Progress", "Milestones for every level"),
        ],
        app.theme,
    );
    menu.selected = app.select_index;
    let menu_area = ui::layout::centered_rect(60, 85, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(frame, app, layout.footer, " [1-5] Open  [j/k] Move  [q] Quit ");
}

fn render_level_select(
    frame: &mut ratatui::Frame,
    app: &App,
    title: &str,
    subtitle: &str,
    levels: &[Level],
) {
    let layout = AppLayout::new(frame.area());

    let items: Vec<MenuItem> = levels
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let done = app.progress.completed_count(level.name());
            MenuItem::new(
                &(i + 1).to_string(),
                level.name(),
                &format!("{done}/{EXERCISES_PER_LEVEL} completed, min {} words", level.min_words()),
            )
        })
        .collect();

    let mut menu = Menu::new(title, subtitle, items, app.theme);
    menu.selected = app.select_index;
    let menu_area = ui::layout::centered_rect(60, 85, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(frame, app, layout.footer, " [Enter] Choose  [Esc] Back ");
}

fn render_category_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let items: Vec<MenuItem> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let done = app.progress.completed_count(category.name());
            MenuItem::new(
                &(i + 1).to_string(),
                category.name(),
                &format!("{done}/{EXERCISES_PER_LEVEL} completed"),
            )
        })
        .collect();

    let mut menu = Menu::new("Categories", "Prose by topic", items, app.theme);
    menu.selected = app.select_index;
    let menu_area = ui::layout::centered_rect(60, 85, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(frame, app, layout.footer, " [Enter] Choose  [Esc] Back ");
}

fn render_duration_select(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());

    let items: Vec<MenuItem> = TIMED_TEST_MINUTES
        .iter()
        .enumerate()
        .map(|(i, minutes)| {
            let label = if *minutes == 1 {
                "1 minute".to_string()
            } else {
                format!("{minutes} minutes")
            };
            MenuItem::new(&(i + 1).to_string(), &label, "Type as much as you can")
        })
        .collect();

    let mut menu = Menu::new("Timed Test", "The timer starts on your first keystroke", items, app.theme);
    menu.selected = app.select_index;
    let menu_area = ui::layout::centered_rect(60, 70, layout.main);
    frame.render_widget(&menu, menu_area);

    render_footer(frame, app, layout.footer, " [Enter] Start  [Esc] Back ");
}

fn render_picker(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let Some(track) = app.picker_track else {
        return;
    };
    let name = track.name();
    let done = app.progress.completed_count(name);

    let header = Paragraph::new(Line::from(Span::styled(
        format!(" {name} "),
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8)])
        .split(layout.main);

    let bar = ProgressBar::new(name, done, EXERCISES_PER_LEVEL, app.theme);
    frame.render_widget(bar, main[0]);

    // 10x10 grid of exercises, the selected one highlighted
    let block = Block::bordered()
        .title(format!(" Exercise {} ", app.picker_index + 1))
        .border_style(Style::default().fg(colors.border()));
    let inner = block.inner(main[1]);
    frame.render_widget(block, main[1]);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..10 {
        let mut spans: Vec<Span> = Vec::new();
        for col in 0..10 {
            let idx = row * 10 + col;
            let completed = app.progress.is_completed(name, idx);
            let selected = idx == app.picker_index;
            let symbol = if completed { "\u{25cf} " } else { "\u{25cb} " };
            let style = if selected {
                Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg())
            } else if completed {
                Style::default().fg(colors.success())
            } else {
                Style::default().fg(colors.accent_dim())
            };
            spans.push(Span::styled(symbol, style));
        }
        lines.push(Line::from(spans));
    }
    let grid = Paragraph::new(lines);
    frame.render_widget(grid, inner);

    render_footer(
        frame,
        app,
        layout.footer,
        " [Arrows] Pick  [Enter] Start  [Esc] Back ",
    );
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let Some(session) = app.session.as_ref() else {
        return;
    };

    let mut header_text = format!(" {} ", app.session_title);
    if app.config.show_live_wpm {
        if let Some(live) = app.live {
            header_text.push_str(&format!("| WPM: {} | Errors: {} ", live.live_wpm, live.error_count));
        }
    }
    if let Some(remaining) = session.remaining_secs() {
        header_text.push_str(&format!("| {}:{:02} left ", remaining / 60, remaining % 60));
    }

    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let typing = TypingArea::new(session, app.theme);
    frame.render_widget(typing, layout.main);

    render_footer(frame, app, layout.footer, " [Esc] Abandon  [Backspace] Delete ");
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let Some(result) = app.last_result.as_ref() else {
        return;
    };

    let centered = ui::layout::centered_rect(60, 70, layout.main);
    let panel = ResultsPanel::new(result, &app.session_title, app.theme);
    frame.render_widget(panel, centered);

    if let Some(status) = app.status.as_ref() {
        let status_line = Paragraph::new(Line::from(Span::styled(
            format!(" {status} "),
            Style::default().fg(colors.warning()),
        )));
        frame.render_widget(status_line, layout.header);
    }

    let mut hints = String::from(" [r] Retry ");
    if app.finished_timed_minutes().is_some() {
        hints.push_str(" [c] Certificate ");
    }
    if !result.top_missed_keys(3).is_empty() {
        hints.push_str(" [p] Practice trouble keys ");
    }
    hints.push_str(" [Enter] Menu ");
    render_footer(frame, app, layout.footer, &hints);
}

fn render_certificate_name(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 40, layout.main);
    let block = Block::bordered()
        .title(" Certificate ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    frame.render_widget(block, centered);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Name to print on the certificate:",
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(colors.accent())),
            Span::styled(
                app.certificate_name.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("_", Style::default().fg(colors.text_cursor_bg())),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    render_footer(frame, app, layout.footer, " [Enter] Save certificate  [Esc] Back ");
}

fn render_progress(frame: &mut ratatui::Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    let colors = &app.theme.colors;

    let header = Paragraph::new(Line::from(Span::styled(
        " Progress Pathway ",
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let tracks = App::all_tracks();
    let visible: Vec<&Track> = tracks.iter().skip(app.progress_scroll).collect();
    let grid_height = 7u16; // 5 dot rows + borders

    let constraints: Vec<Constraint> = visible
        .iter()
        .map(|_| Constraint::Length(grid_height))
        .chain([Constraint::Min(0)])
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(layout.main);

    for (i, track) in visible.iter().enumerate() {
        if rows[i].height < grid_height {
            break;
        }
        let grid = MilestoneGrid::new(
            track.name(),
            app.progress.milestones(track.name()),
            app.theme,
        );
        frame.render_widget(grid, rows[i]);
    }

    render_footer(frame, app, layout.footer, " [j/k] Scroll  [Esc] Back ");
}
