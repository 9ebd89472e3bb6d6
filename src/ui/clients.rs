use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::components::popup::render_popup;
use crate::models::Client;
use crate::store::filter_clients;
use crate::validation::mask::{format_cep, format_cnpj, format_phone};

// Represents the state of the client list screen
pub struct ClientsState {
    table_state: TableState,
    search: String,
    searching: bool,
    show_delete_confirmation: bool,
}

pub enum ClientAction {
    Quit,
    Refresh,
    NewClient,
    EditClient(i32),   // Contains client_id
    DeleteClient(i32), // Contains client_id
}

impl ClientsState {
    pub fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            table_state,
            search: String::new(),
            searching: false,
            show_delete_confirmation: false,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.show_delete_confirmation
    }

    pub fn visible<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
        filter_clients(clients, &self.search)
    }

    /// Keep the selection inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        let selected = match (len, self.table_state.selected()) {
            (0, _) => None,
            (_, Some(i)) if i >= len => Some(len - 1),
            (_, Some(i)) => Some(i),
            (_, None) => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn next(&mut self, len: usize) {
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_client_id(&self, visible: &[&Client]) -> Option<i32> {
        self.table_state
            .selected()
            .and_then(|i| visible.get(i))
            .map(|c| c.id)
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    fn edit_search(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.search.push(c),
            KeyCode::Backspace => {
                self.search.pop();
            }
            _ => return,
        }
        self.table_state.select(Some(0));
    }
}

impl Default for ClientsState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_clients<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut ClientsState,
    clients: &[Client],
    loading: bool,
    error: Option<&str>,
) {
    let size = frame.size();
    let visible = state.visible(clients);
    state.clamp(visible.len());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    // Search box
    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Spans::from(vec![
        Span::styled(state.search.clone(), search_style),
        Span::raw(if state.searching { "|" } else { "" }),
    ]))
    .block(
        Block::default()
            .title(format!("Search ({} records)", visible.len()))
            .borders(Borders::ALL),
    );
    frame.render_widget(search, chunks[0]);

    // Client table
    let header = Row::new(vec!["Name", "Email", "Phone", "CNPJ", "CEP", "City/State"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = visible
        .iter()
        .map(|client| {
            Row::new(vec![
                Cell::from(client.name.clone()),
                Cell::from(client.email.clone()),
                Cell::from(format_phone(client.phone.as_deref())),
                Cell::from(format_cnpj(client.cnpj.as_deref())),
                Cell::from(format_cep(Some(&client.cep))),
                Cell::from(format!("{}/{}", client.city, client.state)),
            ])
        })
        .collect();

    let title = if loading {
        "Clients (loading...)".to_string()
    } else if visible.is_empty() {
        "Clients (no clients found)".to_string()
    } else {
        "Clients".to_string()
    };

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .widths(&[
            Constraint::Percentage(20),
            Constraint::Percentage(22),
            Constraint::Percentage(15),
            Constraint::Percentage(17),
            Constraint::Percentage(10),
            Constraint::Percentage(16),
        ])
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    // Status line: last error, or the key help
    let status = match error {
        Some(message) => Paragraph::new(message.to_string()).style(Style::default().fg(Color::Red)),
        None if state.searching => Paragraph::new("Type to filter | <Enter>/<Esc> Done")
            .style(Style::default().fg(Color::White)),
        None if state.selected_client_id(&visible).is_some() => Paragraph::new(
            "<N> New | <E> Edit | <D> Delete | </> Search | <R> Refresh | <Q> Quit",
        )
        .style(Style::default().fg(Color::White)),
        None => Paragraph::new("<N> New | </> Search | <R> Refresh | <Q> Quit")
            .style(Style::default().fg(Color::White)),
    };
    frame.render_widget(status.block(Block::default().borders(Borders::TOP)), chunks[2]);

    if state.show_delete_confirmation {
        render_popup(
            frame,
            "Confirm Delete",
            vec![
                Spans::from(""),
                Spans::from("Are you sure you want to delete this client?"),
                Spans::from(""),
                Spans::from("This action cannot be undone."),
                Spans::from(""),
                Spans::from("<Y> Yes  <N> No"),
            ],
        );
    }
}

pub fn handle_key(
    state: &mut ClientsState,
    key: KeyCode,
    visible: &[&Client],
) -> Option<ClientAction> {
    if state.searching {
        match key {
            KeyCode::Enter | KeyCode::Esc => state.searching = false,
            other => state.edit_search(other),
        }
        return None;
    }

    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state
                    .selected_client_id(visible)
                    .map(ClientAction::DeleteClient);
            }
            KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
                state.toggle_delete_confirmation();
            }
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ClientAction::Quit),
        KeyCode::Char('n') => return Some(ClientAction::NewClient),
        KeyCode::Char('r') => return Some(ClientAction::Refresh),
        KeyCode::Char('/') => state.searching = true,
        KeyCode::Char('e') => {
            return state
                .selected_client_id(visible)
                .map(ClientAction::EditClient);
        }
        KeyCode::Char('d') => {
            if state.selected_client_id(visible).is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(visible.len()),
        KeyCode::Up => state.previous(visible.len()),
        _ => {}
    }
    None
}

pub fn handle_input(state: &mut ClientsState, clients: &[Client]) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            let visible = state.visible(clients);
            return Ok(handle_key(state, key.code, &visible));
        }
    }
    Ok(None)
}
