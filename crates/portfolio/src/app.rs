use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{
    action::{Action, ContactSnapshot},
    components::{footer::FooterComponent, modal::FeedbackModal, nav::NavComponent, Component},
    config::Config,
    contact::{
        Celebration, ContactIntent, Effect, HttpRelay, RelayAdapter, SubmissionOrchestrator,
    },
    content::Content,
    pages::{ContactPage, Page, PageKind, RolesPage, ServicesPage},
    tui::{Event, EventResponse, Tui},
};

pub struct App {
    pub config: Config,
    pub pages: Vec<Box<dyn Page>>,
    pub active_page: PageKind,
    pub nav: NavComponent,
    pub footer: FooterComponent,
    pub modal: FeedbackModal,
    pub celebration: Celebration,
    pub orchestrator: SubmissionOrchestrator,
    pub should_quit: bool,
    pub should_suspend: bool,
}

impl App {
    /// App wired to the configured form-relay provider.
    pub fn new(config: Config, start: PageKind) -> Result<Self> {
        let relay = HttpRelay::new(&config.relay)?;
        info!("contact form relays to {}", relay.url());
        Self::with_adapter(config, start, RelayAdapter::new(relay))
    }

    pub fn with_adapter(config: Config, start: PageKind, adapter: RelayAdapter) -> Result<Self> {
        let content = Content::bundled()?;
        let pages: Vec<Box<dyn Page>> = vec![
            Box::new(RolesPage::new(content.academic_roles.clone())),
            Box::new(ServicesPage::new(content.services.clone())),
            Box::new(ContactPage::new(content.contact.clone())),
        ];
        Ok(Self {
            celebration: Celebration::new(config.celebration.clone()),
            orchestrator: SubmissionOrchestrator::new(adapter),
            nav: NavComponent::new(start),
            footer: FooterComponent::new(start, content.contact.linkedin_url.clone()),
            modal: FeedbackModal::new(),
            pages,
            active_page: start,
            config,
            should_quit: false,
            should_suspend: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        let mut tui = self.new_tui()?;
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
        }
        self.page_mut(self.active_page).on_enter()?;

        loop {
            if let Some(e) = tui.next().await {
                for action in self.handle_event(e)? {
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match action {
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&mut tui, &action_tx)?;
                    }
                    Action::Render => self.draw(&mut tui, &action_tx)?,
                    Action::ClearScreen => tui.terminal.clear()?,
                    _ => {}
                }
                for follow_up in self.update(action)? {
                    action_tx.send(follow_up)?;
                }
            }

            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                action_tx.send(Action::ClearScreen)?;
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn new_tui(&self) -> Result<Tui> {
        Ok(Tui::new()?
            .tick_rate(self.config.ui.tick_rate)
            .frame_rate(self.config.ui.frame_rate)
            .mouse(true)
            .paste(true))
    }

    fn draw(&mut self, tui: &mut Tui, action_tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        tui.draw(|f| {
            if let Err(err) = self.render(f) {
                action_tx
                    .send(Action::Error(format!("Failed to draw: {err:?}")))
                    .ok();
            }
        })?;
        Ok(())
    }

    fn page_mut(&mut self, kind: PageKind) -> &mut Box<dyn Page> {
        &mut self.pages[kind.index()]
    }

    /// Turn a terminal event into actions. Routing order: modal (exclusive
    /// while open), navigation header, active page, global keys.
    pub fn handle_event(&mut self, event: Event) -> Result<Vec<Action>> {
        match &event {
            Event::Tick => return Ok(vec![Action::Tick]),
            Event::Render => return Ok(vec![Action::Render]),
            Event::Resize(w, h) => return Ok(vec![Action::Resize(*w, *h)]),
            Event::Error(msg) => {
                return Ok(vec![Action::Error(format!("terminal input failed: {msg}"))])
            }
            Event::Key(key) if key.modifiers.contains(KeyModifiers::CONTROL) => match key.code {
                KeyCode::Char('c') => return Ok(vec![Action::Quit]),
                KeyCode::Char('z') => return Ok(vec![Action::Suspend]),
                _ => {}
            },
            _ => {}
        }

        // focus trap: nothing behind an open modal sees input
        if self.modal.is_open() {
            return Ok(self
                .modal
                .handle_events(event)?
                .map(EventResponse::into_inner)
                .into_iter()
                .collect());
        }

        let mut actions = Vec::new();
        if let Some(response) = self.nav.handle_events(event.clone())? {
            let stop = response.is_stop();
            actions.push(response.into_inner());
            if stop {
                return Ok(actions);
            }
        }
        if let Some(response) = self.page_mut(self.active_page).handle_events(event.clone())? {
            let stop = response.is_stop();
            actions.push(response.into_inner());
            if stop {
                return Ok(actions);
            }
        }

        if let Event::Key(key) = event {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            let global = match key.code {
                KeyCode::Char('n') if ctrl => Some(Action::NextPage),
                KeyCode::Char('p') if ctrl => Some(Action::PrevPage),
                _ if ctrl => None,
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::NextPage),
                KeyCode::Left | KeyCode::Char('h') => Some(Action::PrevPage),
                KeyCode::Char(c @ '1'..='3') => {
                    Some(Action::Navigate(PageKind::ALL[c as usize - '1' as usize]))
                }
                _ => None,
            };
            actions.extend(global);
        }
        Ok(actions)
    }

    /// Apply one action and return the follow-up actions it produced.
    pub fn update(&mut self, action: Action) -> Result<Vec<Action>> {
        let mut follow_ups = Vec::new();
        match &action {
            Action::Tick => {
                let effects = self.orchestrator.handle(ContactIntent::Poll);
                if !effects.is_empty() {
                    self.execute(effects);
                    follow_ups.push(self.contact_state());
                }
                self.celebration.advance();
            }
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => self.should_suspend = false,
            Action::Error(msg) => error!("{msg}"),
            Action::NextPage => follow_ups.push(Action::Navigate(self.active_page.next())),
            Action::PrevPage => follow_ups.push(Action::Navigate(self.active_page.prev())),
            Action::Navigate(kind) => self.switch_page(*kind)?,
            Action::FieldChanged(field, value) => {
                let effects = self
                    .orchestrator
                    .handle(ContactIntent::Edit(*field, value.clone()));
                self.execute(effects);
                follow_ups.push(self.contact_state());
            }
            Action::SubmitContact => {
                let effects = self.orchestrator.handle(ContactIntent::Submit);
                self.execute(effects);
                follow_ups.push(self.contact_state());
            }
            Action::CloseModal => {
                let effects = self.orchestrator.handle(ContactIntent::CloseModal);
                self.execute(effects);
                follow_ups.push(self.contact_state());
            }
            _ => {}
        }
        self.modal.set_state(self.orchestrator.modal());

        if let Action::ContactState(_) = action {
            // every page mirrors contact state, not just the visible one
            for page in self.pages.iter_mut() {
                follow_ups.extend(page.update(action.clone())?);
            }
        } else {
            follow_ups.extend(self.page_mut(self.active_page).update(action.clone())?);
        }
        follow_ups.extend(self.nav.update(action.clone())?);
        follow_ups.extend(self.footer.update(action)?);
        Ok(follow_ups)
    }

    fn contact_state(&self) -> Action {
        Action::ContactState(ContactSnapshot {
            form: self.orchestrator.form().clone(),
            submitting: self.orchestrator.is_submitting(),
        })
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Celebrate => self.celebration.trigger(),
                Effect::Log(msg) => info!("[effect] {msg}"),
                Effect::Warn(msg) => warn!("[effect] {msg}"),
            }
        }
    }

    fn switch_page(&mut self, kind: PageKind) -> Result<()> {
        if kind == self.active_page {
            return Ok(());
        }
        self.page_mut(self.active_page).on_exit()?;
        self.active_page = kind;
        self.page_mut(kind).on_enter()?;
        Ok(())
    }

    /// Pages, then the modal, then the celebration on top of everything.
    pub fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let area = frame.area();
        let [nav, body, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.nav.draw(frame, nav)?;
        let active = self.active_page;
        self.page_mut(active).draw(frame, body)?;
        self.footer.draw(frame, footer)?;

        self.modal.draw(frame, area)?;
        if self.celebration.is_active() {
            frame.render_widget(&self.celebration, area);
        }
        Ok(())
    }
}
