use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind}, execute, terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen}};
use ratatui::{backend::CrosstermBackend, Terminal, widgets::{Block, Borders, List, ListItem, Paragraph, ListState}, layout::{Layout, Constraint, Direction}, style::{Style, Modifier, Color}};

use todolist::{application::item_service::{ItemService, ItemServiceImpl}, config::Config, domain::{item::{CreateItem, Item, UpdateItem}, repository::ItemRepository}, infrastructure::csv_store::CsvItemStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let csv_label = config.csv_path.display().to_string();
    let service = ItemServiceImpl::new(CsvItemStore::new(&config.csv_path));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, service, csv_label).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode { View, Create, Edit }

#[derive(Clone, Copy, PartialEq, Eq)]
enum Filter { All, Pending, Done }

impl Filter {
    fn label(self) -> &'static str {
        match self { Filter::All => "All", Filter::Pending => "Pending", Filter::Done => "Done" }
    }

    fn next(self) -> Self {
        match self { Filter::All => Filter::Pending, Filter::Pending => Filter::Done, Filter::Done => Filter::All }
    }

    fn includes(self, item: &Item) -> bool {
        match self { Filter::All => true, Filter::Pending => !item.complete, Filter::Done => item.complete }
    }
}

struct App<R: ItemRepository> {
    service: ItemServiceImpl<R>,
    items: Vec<Item>,
    selected: usize,
    last_tick: Instant,
    mode: Mode,
    list_state: ListState,
    filter: Filter,
    filtered_indices: Vec<usize>,
    draft: String,
}

impl<R: ItemRepository> App<R> {
    async fn load(&mut self) -> Result<()> {
        self.items = self.service.list().await?;
        self.recompute_filtered();
        Ok(())
    }

    fn recompute_filtered(&mut self) {
        self.filtered_indices = self.items.iter().enumerate().filter(|(_, e)| self.filter.includes(e)).map(|(i, _)| i).collect();
        // Clamp selection within filtered bounds
        let len = self.filtered_indices.len();
        if len == 0 { self.selected = 0; self.list_state.select(None); }
        else { if self.selected >= len { self.selected = len - 1; } self.list_state.select(Some(self.selected)); }
    }

    fn selected_item(&self) -> Option<&Item> {
        self.filtered_indices.get(self.selected).and_then(|&idx| self.items.get(idx))
    }
}

async fn run_app<R: ItemRepository>(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, service: ItemServiceImpl<R>, csv_label: String) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut app = App { service, items: vec![], selected: 0, last_tick: Instant::now(), mode: Mode::View, list_state: ListState::default(), filter: Filter::All, filtered_indices: Vec::new(), draft: String::new() };
    app.load().await?;

    loop {
        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(1),
                    Constraint::Length(3),
                ])
                .split(f.size());

            let header = Paragraph::new("Items (Enter: toggle, n: new, e: edit, f: filter, r: reload, q: quit)  |  New/Edit: type text, Enter to save, Esc to cancel")
                .block(Block::default().borders(Borders::ALL).title("todolist-tui"));
            f.render_widget(header, chunks[0]);

            let list_items: Vec<ListItem> = app.filtered_indices.iter().filter_map(|&idx| app.items.get(idx)).map(|e| {
                let mark = if e.complete { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} #{} {}", mark, e.id, e.text))
            }).collect();
            if app.filtered_indices.is_empty() { app.list_state.select(None); } else { app.list_state.select(Some(app.selected)); }
            let list = List::new(list_items)
                .block(Block::default().borders(Borders::ALL).title(format!("items [{}]", app.filter.label())))
                .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol(">> ");
            f.render_stateful_widget(list, chunks[1], &mut app.list_state);

            let footer_text = match app.mode {
                Mode::View => format!("TODOLIST_CSV={}  |  Filter=[{}]", csv_label, app.filter.label()),
                Mode::Create => format!("New: {}_  |  (Enter to save, Esc to cancel)", app.draft),
                Mode::Edit => format!("Edit: {}_  |  (Enter to save, Esc to cancel)", app.draft),
            };
            let footer = Paragraph::new(footer_text)
                .block(Block::default().borders(Borders::ALL).title(match app.mode { Mode::View => "info", Mode::Create => "create", Mode::Edit => "edit" }));
            f.render_widget(footer, chunks[2]);
        })?;

        let timeout = tick_rate.saturating_sub(app.last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Ignore repeats and releases
                if key.kind != KeyEventKind::Press { continue; }
                match app.mode {
                    Mode::View => match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Up => { if app.selected > 0 { app.selected -= 1; } }
                        KeyCode::Down => { if app.selected + 1 < app.filtered_indices.len() { app.selected += 1; } }
                        KeyCode::Enter => {
                            if let Some(entry) = app.selected_item() {
                                let (id, complete) = (entry.id, !entry.complete);
                                app.service.update(id, UpdateItem { text: None, complete: Some(complete) }).await?;
                                app.load().await?;
                            }
                        }
                        KeyCode::Char('n') => {
                            app.mode = Mode::Create;
                            app.draft.clear();
                        }
                        KeyCode::Char('e') => {
                            if let Some(text) = app.selected_item().map(|e| e.text.clone()) {
                                app.mode = Mode::Edit;
                                app.draft = text;
                            }
                        }
                        KeyCode::Char('f') => {
                            app.filter = app.filter.next();
                            app.recompute_filtered();
                        }
                        KeyCode::Char('r') => app.load().await?,
                        _ => {}
                    },
                    Mode::Create | Mode::Edit => match key.code {
                        KeyCode::Esc => { app.mode = Mode::View; app.draft.clear(); }
                        KeyCode::Enter => {
                            let text = app.draft.trim().to_string();
                            if !text.is_empty() {
                                if app.mode == Mode::Create {
                                    app.service.create(CreateItem { text, complete: false }).await?;
                                } else if let Some(id) = app.selected_item().map(|e| e.id) {
                                    app.service.update(id, UpdateItem { text: Some(text), complete: None }).await?;
                                }
                            }
                            app.mode = Mode::View;
                            app.draft.clear();
                            app.load().await?;
                        }
                        KeyCode::Backspace => { app.draft.pop(); }
                        KeyCode::Char(c) => app.draft.push(c),
                        _ => {}
                    },
                }
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.last_tick = Instant::now();
        }
    }
    Ok(())
}
