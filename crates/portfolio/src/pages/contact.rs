use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Paragraph, Wrap},
};
use tui_input::{Input, InputRequest};

use super::{Page, PageKind};
use crate::{
    action::{Action, ContactSnapshot},
    components::modal::ERROR_COLOR,
    contact::{Field, FieldIssue, FormInput},
    content::ContactDetails,
    tui::{Event, EventResponse, Frame},
};

const SEND_LABEL: &str = "[ Send Message ]";
const SENDING_LABEL: &str = "[ Sending... ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input(Field),
    Submit,
}

const FOCUS_ORDER: [Focus; 5] = [
    Focus::Input(Field::Name),
    Focus::Input(Field::Email),
    Focus::Input(Field::Subject),
    Focus::Input(Field::Message),
    Focus::Submit,
];

/// Contact details plus the contact form.
///
/// The page is the form layer: it owns the text inputs, runs the client-side
/// checks and only emits `Action::SubmitContact` for a complete form. Values
/// are mirrored from the orchestrator through `Action::ContactState`, so a
/// reset after a successful send clears the inputs here as well.
pub struct ContactPage {
    details: ContactDetails,
    inputs: [Input; 4],
    focus: Focus,
    submitting: bool,
    hint: Option<FieldIssue>,
    input_areas: Vec<(Field, Rect)>,
    submit_area: Rect,
}

impl ContactPage {
    pub fn new(details: ContactDetails) -> Self {
        Self {
            details,
            inputs: Default::default(),
            focus: Focus::Input(Field::Name),
            submitting: false,
            hint: None,
            input_areas: Vec::new(),
            submit_area: Rect::default(),
        }
    }

    fn input(&self, field: Field) -> &Input {
        &self.inputs[field as usize]
    }

    fn form(&self) -> FormInput {
        let mut form = FormInput::default();
        for field in Field::ALL {
            form.set(field, self.input(field).value());
        }
        form
    }

    fn move_focus(&mut self, forward: bool) {
        let current = FOCUS_ORDER
            .iter()
            .position(|f| *f == self.focus)
            .unwrap_or_default();
        let len = FOCUS_ORDER.len();
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.focus = FOCUS_ORDER[next];
    }

    fn try_submit(&mut self) -> Option<EventResponse<Action>> {
        if self.submitting {
            return Some(EventResponse::Stop(Action::Render));
        }
        if let Some(issue) = self.form().first_issue() {
            tracing::debug!("contact form blocked: {issue}");
            self.hint = Some(issue);
            self.focus = Focus::Input(issue.field);
            return Some(EventResponse::Stop(Action::Render));
        }
        self.hint = None;
        Some(EventResponse::Stop(Action::SubmitContact))
    }

    fn edit(&mut self, field: Field, request: InputRequest) -> Option<EventResponse<Action>> {
        // inputs are disabled while sending
        if self.submitting {
            return Some(EventResponse::Stop(Action::Render));
        }
        let input = &mut self.inputs[field as usize];
        let changed = input.handle(request).is_some_and(|c| c.value);
        if !changed {
            return Some(EventResponse::Stop(Action::Render));
        }
        if self.hint.is_some_and(|h| h.field == field) {
            self.hint = None;
        }
        Some(EventResponse::Stop(Action::FieldChanged(
            field,
            input.value().to_string(),
        )))
    }

    fn sync(&mut self, snapshot: &ContactSnapshot) {
        self.submitting = snapshot.submitting;
        for field in Field::ALL {
            let value = snapshot.form.get(field);
            if self.input(field).value() != value {
                self.inputs[field as usize] = Input::new(value.to_string());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<EventResponse<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return self.try_submit(),
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return Some(EventResponse::Stop(Action::Render));
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return Some(EventResponse::Stop(Action::Render));
            }
            KeyCode::Enter => {
                return match self.focus {
                    Focus::Submit => self.try_submit(),
                    Focus::Input(_) => {
                        self.move_focus(true);
                        Some(EventResponse::Stop(Action::Render))
                    }
                };
            }
            _ => {}
        }

        let Focus::Input(field) = self.focus else {
            return None;
        };
        let request = match key.code {
            KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => return None,
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace if ctrl => InputRequest::DeletePrevWord,
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left if ctrl => InputRequest::GoToPrevWord,
            KeyCode::Right if ctrl => InputRequest::GoToNextWord,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return None,
        };
        self.edit(field, request)
    }

    fn handle_paste(&mut self, text: &str) -> Option<EventResponse<Action>> {
        let Focus::Input(field) = self.focus else {
            return None;
        };
        let mut response = None;
        // line breaks become single spaces, other control chars are dropped
        for c in text.replace("\r\n", "\n").chars() {
            let c = match c {
                '\n' | '\r' | '\t' => ' ',
                c if c.is_control() => continue,
                c => c,
            };
            response = self.edit(field, InputRequest::InsertChar(c));
        }
        response
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<EventResponse<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let pos = Position::new(mouse.column, mouse.row);
        if self.submit_area.contains(pos) {
            self.focus = Focus::Submit;
            return self.try_submit();
        }
        let (field, _) = self.input_areas.iter().find(|(_, r)| r.contains(pos))?;
        self.focus = Focus::Input(*field);
        Some(EventResponse::Stop(Action::Render))
    }

    fn render_details(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(" Connect with me ").bold());

        let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(
                "I'm always interested in new opportunities, collaborations, and discussions \
                 about environmental engineering science. Feel free to reach out!",
            ),
            Line::raw(""),
        ];
        for (name, value) in [
            ("Email", self.details.email.as_str()),
            ("Phone", self.details.phone.as_str()),
            ("Location", self.details.location.as_str()),
            ("LinkedIn", self.details.linkedin.as_str()),
        ] {
            lines.push(Line::from(Span::styled(name, label)));
            lines.push(Line::from(value));
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(self.details.linkedin_url.as_str()).fg(Color::DarkGray));

        frame.render_widget(
            Paragraph::new(Text::from(lines))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }

    fn render_input(&self, frame: &mut Frame<'_>, field: Field, area: Rect) {
        let focused = self.focus == Focus::Input(field) && !self.submitting;
        let input = self.input(field);
        let (title_style, border_style, text_style) = if self.submitting {
            let dim = Style::default().fg(Color::DarkGray);
            (dim, dim, dim)
        } else if focused {
            (
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Cyan),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::White),
            )
        };
        let block = Block::bordered()
            .title(field.label())
            .title_style(title_style)
            .border_set(border::ROUNDED)
            .border_style(border_style);
        let inner = block.inner(area);

        if field == Field::Message {
            // wrapped by characters so the cursor position stays predictable
            let width = usize::from(inner.width.max(1));
            let chars: Vec<char> = input.value().chars().collect();
            let rows: Vec<Line> = chars
                .chunks(width)
                .map(|chunk| Line::from(chunk.iter().collect::<String>()))
                .collect();
            let cursor = input.visual_cursor();
            let cursor_row = (cursor / width) as u16;
            let scroll = cursor_row.saturating_sub(inner.height.saturating_sub(1));
            frame.render_widget(
                Paragraph::new(Text::from(rows))
                    .style(text_style)
                    .scroll((scroll, 0))
                    .block(block),
                area,
            );
            if focused {
                frame.set_cursor_position((
                    inner.x + (cursor % width) as u16,
                    inner.y + cursor_row - scroll,
                ));
            }
            return;
        }

        // keep 2 for borders and 1 for cursor
        let width = area.width.max(3) - 3;
        let scroll = input.visual_scroll(width as usize);
        frame.render_widget(
            Paragraph::new(input.value())
                .style(text_style)
                .scroll((0, scroll as u16))
                .block(block),
            area,
        );
        if focused {
            let x = input.visual_cursor().max(scroll) - scroll + 1;
            frame.set_cursor_position((area.x + x as u16, area.y + 1));
        }
    }

    fn render_form(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::bordered()
            .border_set(border::ROUNDED)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Line::from(" Send a Message ").bold());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [name, email, subject, message, hint, button] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.input_areas = vec![
            (Field::Name, name),
            (Field::Email, email),
            (Field::Subject, subject),
            (Field::Message, message),
        ];
        for (field, rect) in self.input_areas.clone() {
            self.render_input(frame, field, rect);
        }

        let hint_line = match &self.hint {
            Some(issue) => Line::from(issue.to_string()).fg(ERROR_COLOR),
            None => Line::from("All fields are required.").fg(Color::DarkGray),
        };
        frame.render_widget(Paragraph::new(hint_line), hint);

        let label = if self.submitting {
            SENDING_LABEL
        } else {
            SEND_LABEL
        };
        let style = if self.submitting {
            Style::default().fg(Color::DarkGray)
        } else if self.focus == Focus::Submit {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        self.submit_area = Rect {
            width: (label.chars().count() as u16).min(button.width),
            ..button
        };
        frame.render_widget(Paragraph::new(label).style(style), self.submit_area);
    }
}

impl Page for ContactPage {
    fn kind(&self) -> PageKind {
        PageKind::Contact
    }

    fn handle_events(&mut self, event: Event) -> Result<Option<EventResponse<Action>>> {
        Ok(match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => None,
        })
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::ContactState(snapshot) = action {
            self.sync(&snapshot);
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [details, form] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(area);
        self.render_details(frame, details);
        self.render_form(frame, form);
        Ok(())
    }
}
