//! Interactive terminal page.
//!
//! Renders the prompt input, the two buttons and the status label in a
//! centered popup. Enter generates, Ctrl+D downloads, Esc or Ctrl+C quits.

use super::lock;
use super::page::Page;
use super::session::{Phase, PromptClient};
use crate::config::DownloadConfig;
use crate::download;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

/// How long to wait for a key before redrawing from page state.
const TICK: Duration = Duration::from_millis(50);

/// What the terminal currently shows.
#[derive(Debug, Clone, Default)]
pub struct TerminalState {
    pub prompt: String,
    pub status: String,
    pub download_visible: bool,
}

/// Page backed by the terminal UI.
#[derive(Default)]
pub struct TerminalPage {
    state: Mutex<TerminalState>,
    navigation: Mutex<Option<String>>,
}

impl TerminalPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TerminalState {
        lock(&self.state).clone()
    }

    /// Mirror the input widget's value into the prompt element.
    pub fn set_prompt(&self, prompt: &str) {
        lock(&self.state).prompt = prompt.to_string();
    }

    pub fn take_navigation(&self) -> Option<String> {
        lock(&self.navigation).take()
    }
}

impl Page for TerminalPage {
    fn has_element(&self, _id: &str) -> bool {
        // draw_ui renders every element the client drives
        true
    }

    fn prompt_text(&self) -> String {
        lock(&self.state).prompt.clone()
    }

    fn set_status(&self, text: &str) {
        lock(&self.state).status = text.to_string();
    }

    fn set_download_visible(&self, visible: bool) {
        lock(&self.state).download_visible = visible;
    }

    fn navigate(&self, url: &str) {
        *lock(&self.navigation) = Some(url.to_string());
    }
}

/// Run the TUI until the user quits.
pub async fn run_tui(
    client: Arc<PromptClient<TerminalPage>>,
    download: DownloadConfig,
    initial_prompt: Option<String>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, client, download, initial_prompt).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}

/// The main event loop.
async fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    client: Arc<PromptClient<TerminalPage>>,
    download: DownloadConfig,
    initial_prompt: Option<String>,
) -> Result<()> {
    let mut input = Input::default();
    if let Some(prompt) = initial_prompt {
        input = input.with_value(prompt);
    }
    client.page().set_prompt(input.value());

    loop {
        let state = client.page().snapshot();
        let phase = client.phase();
        terminal.draw(|frame| draw_ui(frame, &input, &state, &phase))?;

        if let Some(url) = client.page().take_navigation() {
            spawn_download(Arc::clone(&client), url, download.clone());
        }

        // Poll so in-flight submissions show up without a keypress
        if !event::poll(TICK)? {
            tokio::task::yield_now().await;
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Enter => {
                    let client = Arc::clone(&client);
                    tokio::spawn(async move {
                        client.generate().await;
                    });
                }
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    client.trigger_download();
                }
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                _ => {
                    input.handle_event(&Event::Key(key));
                    client.page().set_prompt(input.value());
                }
            }
        }
    }
}

/// Fetch the artifact in the background and report the outcome in the status label.
fn spawn_download(client: Arc<PromptClient<TerminalPage>>, url: String, download: DownloadConfig) {
    client.page().set_status(&format!("Downloading {}...", url));
    tokio::spawn(async move {
        match download::fetch_artifact(client.http(), &url, &download).await {
            Ok(path) => client.page().set_status(&format!("Saved to {}", path.display())),
            Err(e) => client.page().set_status(&format!("Download failed: {:#}", e)),
        }
    });
}

/// Draw the TUI.
fn draw_ui(frame: &mut Frame, input: &Input, state: &TerminalState, phase: &Phase) {
    let size = frame.area();

    let popup_width = size.width.saturating_sub(4).min(80);
    let popup_height = 8;
    let popup_area = centered_rect(popup_width, popup_height, size);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" promptgen ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner_area = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    // prompt / buttons / status / help
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner_area);

    let prompt_block = Block::default()
        .title(" prompt ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let prompt_area = prompt_block.inner(rows[0]);
    frame.render_widget(prompt_block, rows[0]);

    // Scroll the input if cursor is beyond visible area
    let input_width = prompt_area.width as usize;
    let cursor_pos = input.visual_cursor();
    let scroll = if cursor_pos >= input_width {
        cursor_pos - input_width + 1
    } else {
        0
    };
    let visible_value: String = input.value().chars().skip(scroll).take(input_width).collect();
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            visible_value,
            Style::default().fg(Color::White),
        ))),
        prompt_area,
    );

    let button_style = Style::default().fg(Color::Black).bg(Color::Cyan);
    let mut buttons = vec![Span::styled(" Generate [Enter] ", button_style)];
    if state.download_visible {
        buttons.push(Span::raw("  "));
        buttons.push(Span::styled(
            " Download [Ctrl+D] ",
            Style::default().fg(Color::Black).bg(Color::Green),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(buttons)), rows[1]);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            state.status.as_str(),
            status_style(phase, &state.status),
        ))),
        rows[2],
    );

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Esc to quit",
            Style::default().fg(Color::DarkGray),
        ))),
        rows[3],
    );

    let cursor_x = prompt_area.x + (cursor_pos - scroll) as u16;
    frame.set_cursor_position((cursor_x, prompt_area.y));
}

fn status_style(phase: &Phase, status: &str) -> Style {
    // A failed download reports through the status label only
    if matches!(phase, Phase::Error(_)) || status.starts_with("Download failed") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

/// Create a centered rectangle.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
