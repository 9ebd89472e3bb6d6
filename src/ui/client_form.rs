use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::cep::LookupError;
use crate::models::{CepResponse, Client, ClientInput};
use crate::validation::advisory::{validate_field, validate_form};
use crate::validation::mask::{mask_cnpj, mask_phone};
use crate::validation::{Field, FieldErrors};

pub const ENTER_CEP: &str = "Enter a CEP";
pub const ADDRESS_FILLED: &str = "Address filled automatically";
pub const CEP_NOT_FOUND: &str = "CEP not found";
pub const CEP_LOOKUP_FAILED: &str = "CEP lookup failed";

pub enum ClientFormAction {
    Cancel,
    LookupCep(String),
    Save {
        id: Option<i32>,
        client: ClientInput,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CepStatus {
    Filled,
    Failed(String),
}

pub struct ClientFormState {
    pub editing_id: Option<i32>,
    pub client: ClientInput,
    pub current_field: Field,
    pub editing: bool,
    pub errors: FieldErrors,
    pub cep_status: Option<CepStatus>,
    pub submit_error: Option<String>,
    pub submitting: bool,
    pub looking_up: bool,
}

impl ClientFormState {
    pub fn new() -> Self {
        Self {
            editing_id: None,
            client: ClientInput::default(),
            current_field: Field::Name,
            editing: false,
            errors: FieldErrors::new(),
            cep_status: None,
            submit_error: None,
            submitting: false,
            looking_up: false,
        }
    }

    pub fn from_existing(client: &Client) -> Self {
        Self {
            editing_id: Some(client.id),
            client: ClientInput::from(client),
            ..Self::new()
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    fn position(&self) -> usize {
        Field::ALL
            .iter()
            .position(|f| *f == self.current_field)
            .unwrap_or(0)
    }

    pub fn next_field(&mut self) {
        self.current_field = Field::ALL[(self.position() + 1) % Field::ALL.len()];
    }

    pub fn previous_field(&mut self) {
        let len = Field::ALL.len();
        self.current_field = Field::ALL[(self.position() + len - 1) % len];
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = self.current_field;
        let value = field.value_mut(&mut self.client);

        match key {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            _ => return,
        }

        // Masks are re-applied on every keystroke
        match field {
            Field::Phone => *value = mask_phone(value),
            Field::Cnpj => *value = mask_cnpj(value),
            _ => {}
        }
    }

    fn revalidate_current(&mut self, known: &[Client]) {
        let field = self.current_field;
        match validate_field(field, &self.client, self.editing_id, known) {
            Some(message) => self.errors.insert(field, message),
            None => self.errors.remove(&field),
        };
    }

    /// Fold a lookup result into the form. Failures leave every field as
    /// it was.
    pub fn apply_lookup(&mut self, result: Result<CepResponse, LookupError>) {
        self.looking_up = false;

        self.cep_status = Some(match result {
            Ok(address) => {
                address.merge_into(&mut self.client);
                for field in [Field::Street, Field::Neighborhood, Field::City, Field::State] {
                    self.errors.remove(&field);
                }
                CepStatus::Filled
            }
            Err(LookupError::NotFound) => CepStatus::Failed(CEP_NOT_FOUND.to_string()),
            Err(err @ LookupError::InvalidCep) => CepStatus::Failed(err.to_string()),
            Err(LookupError::Transport(detail)) => {
                tracing::warn!(error = %detail, "CEP lookup failed");
                CepStatus::Failed(CEP_LOOKUP_FAILED.to_string())
            }
        });
    }

    /// The server turned the submission down. The form stays as typed.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.submitting = false;
        self.submit_error = Some(message.into());
    }
}

impl Default for ClientFormState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_client_form<B: Backend>(f: &mut Frame<B>, state: &ClientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.size());

    let title_text = if state.editing_id.is_none() {
        "New Client"
    } else {
        "Edit Client"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    render_form(f, state, chunks[1]);
    render_messages(f, state, chunks[2]);

    let help_text = if state.editing {
        "Enter - Done | Esc - Stop editing"
    } else if state.submitting {
        "Saving..."
    } else {
        "Enter - Edit field | Up/Down - Navigate | L - Look up CEP | S - Save | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn render_form<B: Backend>(f: &mut Frame<B>, state: &ClientFormState, area: Rect) {
    let items: Vec<ListItem> = Field::ALL
        .iter()
        .map(|field| {
            let value = field.value(&state.client);
            let selected = *field == state.current_field;
            let marker = if field.is_required() { "*" } else { "" };

            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };

            let label = format!("{}{}: ", field.label(), marker);
            let mut spans = vec![Span::styled(label, label_style)];
            if selected && state.editing {
                spans.push(Span::styled(
                    format!("{}|", value),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(value.to_string()));
            }

            if let Some(error) = state.errors.get(field) {
                spans.push(Span::styled(
                    format!("  {}", error),
                    Style::default().fg(Color::Red),
                ));
            }

            ListItem::new(Spans::from(spans))
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Client Details"));

    f.render_widget(form_list, area);
}

fn render_messages<B: Backend>(f: &mut Frame<B>, state: &ClientFormState, area: Rect) {
    let mut lines = Vec::new();

    if state.looking_up {
        lines.push(Spans::from(Span::raw("Looking up CEP...")));
    }
    match &state.cep_status {
        Some(CepStatus::Filled) => lines.push(Spans::from(Span::styled(
            ADDRESS_FILLED,
            Style::default().fg(Color::Green),
        ))),
        Some(CepStatus::Failed(message)) => lines.push(Spans::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => {}
    }
    if let Some(error) = &state.submit_error {
        lines.push(Spans::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    let messages = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(messages, area);
}

/// `known` is the store's current client list, used for the advisory
/// duplicate-email check.
pub fn handle_key(
    state: &mut ClientFormState,
    key: KeyCode,
    known: &[Client],
) -> Option<ClientFormAction> {
    if state.editing {
        match key {
            KeyCode::Enter | KeyCode::Esc => {
                state.toggle_editing();
                state.revalidate_current(known);
            }
            other => state.edit_current_field(other),
        }
        return None;
    }

    match key {
        KeyCode::Esc => return Some(ClientFormAction::Cancel),
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up => state.previous_field(),
        KeyCode::Down | KeyCode::Tab => state.next_field(),
        KeyCode::Char('l') if !state.looking_up => {
            if state.client.cep.trim().is_empty() {
                state.cep_status = Some(CepStatus::Failed(ENTER_CEP.to_string()));
            } else {
                state.cep_status = None;
                state.looking_up = true;
                return Some(ClientFormAction::LookupCep(state.client.cep.clone()));
            }
        }
        KeyCode::Char('s') if !state.submitting => {
            state.errors = validate_form(&state.client, state.editing_id, known);
            if state.errors.is_empty() {
                state.submitting = true;
                state.submit_error = None;
                return Some(ClientFormAction::Save {
                    id: state.editing_id,
                    client: state.client.clone(),
                });
            }
        }
        _ => {}
    }

    None
}

pub fn handle_input(
    state: &mut ClientFormState,
    known: &[Client],
) -> Result<Option<ClientFormAction>> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            return Ok(handle_key(state, key.code, known));
        }
    }

    Ok(None)
}
