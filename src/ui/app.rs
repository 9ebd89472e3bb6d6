use anyhow::Result;
use tui::{backend::Backend, Frame, Terminal};

use super::client_form::{
    handle_input as handle_form_input, render_client_form, ClientFormAction, ClientFormState,
};
use super::clients::{
    handle_input as handle_clients_input, render_clients, ClientAction, ClientsState,
};
use crate::cep::AddressLookup;
use crate::store::{ClientStore, RegistryApi};

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Clients,
    ClientForm,
}

/// Screen-independent work produced by one key press.
pub enum Action {
    List(ClientAction),
    Form(ClientFormAction),
}

/// Top-level UI state. Owns the client store; screens only ever see
/// snapshots of it.
pub struct App<A, L> {
    store: ClientStore<A>,
    lookup: L,
    screen: Screen,
    clients_state: ClientsState,
    form_state: Option<ClientFormState>,
    should_quit: bool,
}

impl<A: RegistryApi, L: AddressLookup> App<A, L> {
    pub fn new(api: A, lookup: L) -> Self {
        Self {
            store: ClientStore::new(api),
            lookup,
            screen: Screen::Clients,
            clients_state: ClientsState::new(),
            form_state: None,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn store(&self) -> &ClientStore<A> {
        &self.store
    }

    pub fn form(&self) -> Option<&ClientFormState> {
        self.form_state.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ClientFormState> {
        self.form_state.as_mut()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn start(&mut self) {
        self.store.fetch_clients().await;
    }

    pub fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        match self.screen {
            Screen::Clients => render_clients(
                f,
                &mut self.clients_state,
                self.store.clients(),
                self.store.is_loading(),
                self.store.error(),
            ),
            Screen::ClientForm => {
                if let Some(state) = &self.form_state {
                    render_client_form(f, state);
                }
            }
        }
    }

    // Blocks until the next key press on the current screen
    fn read_input(&mut self) -> Result<Option<Action>> {
        let action = match self.screen {
            Screen::Clients => handle_clients_input(&mut self.clients_state, self.store.clients())?
                .map(Action::List),
            Screen::ClientForm => match &mut self.form_state {
                Some(state) => handle_form_input(state, self.store.clients())?.map(Action::Form),
                None => None,
            },
        };
        Ok(action)
    }

    /// State to show while `action` is in flight.
    pub fn prepare(&mut self, action: &Action) {
        if let Action::List(ClientAction::Refresh) = action {
            self.store.begin_loading();
        }
    }

    pub async fn dispatch(&mut self, action: Action) {
        match action {
            Action::List(action) => self.on_list_action(action).await,
            Action::Form(action) => self.on_form_action(action).await,
        }
    }

    async fn on_list_action(&mut self, action: ClientAction) {
        match action {
            ClientAction::Quit => self.should_quit = true,
            ClientAction::Refresh => self.store.fetch_clients().await,
            ClientAction::NewClient => {
                self.store.clear_error();
                self.form_state = Some(ClientFormState::new());
                self.screen = Screen::ClientForm;
            }
            ClientAction::EditClient(client_id) => match self.store.get_client(client_id).await {
                Ok(client) => {
                    self.form_state = Some(ClientFormState::from_existing(&client));
                    self.screen = Screen::ClientForm;
                }
                Err(err) if err.is_not_found() => {
                    // Removed elsewhere since the last fetch
                    self.store.fetch_clients().await;
                }
                Err(err) => tracing::warn!(client_id, error = %err, "could not open client"),
            },
            ClientAction::DeleteClient(client_id) => {
                if let Err(err) = self.store.delete_client(client_id).await {
                    tracing::warn!(client_id, error = %err, "delete rejected");
                }
            }
        }
    }

    async fn on_form_action(&mut self, action: ClientFormAction) {
        match action {
            ClientFormAction::Cancel => self.back_to_list(),
            ClientFormAction::LookupCep(cep) => {
                let result = self.lookup.lookup(&cep).await;
                if let Some(state) = &mut self.form_state {
                    state.apply_lookup(result);
                }
            }
            ClientFormAction::Save { id, client } => {
                let result = match id {
                    Some(id) => self.store.update_client(id, &client).await,
                    None => self.store.add_client(&client).await,
                };

                match result {
                    Ok(()) => self.back_to_list(),
                    Err(err) => {
                        let message = self
                            .store
                            .error()
                            .map(str::to_string)
                            .unwrap_or_else(|| err.to_string());
                        if let Some(state) = &mut self.form_state {
                            state.submit_failed(message);
                        }
                    }
                }
            }
        }
    }

    fn back_to_list(&mut self) {
        self.store.clear_error();
        self.form_state = None;
        self.screen = Screen::Clients;
    }
}

pub async fn run_app<B, A, L>(terminal: &mut Terminal<B>, app: &mut App<A, L>) -> Result<()>
where
    B: Backend,
    A: RegistryApi,
    L: AddressLookup,
{
    app.store.begin_loading();
    terminal.draw(|f| app.draw(f))?;
    app.start().await;

    loop {
        terminal.draw(|f| app.draw(f))?;

        if let Some(action) = app.read_input()? {
            // Show in-flight flags (loading, saving, looking up) before waiting
            app.prepare(&action);
            terminal.draw(|f| app.draw(f))?;
            app.dispatch(action).await;
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
