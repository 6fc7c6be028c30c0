//! Detail screen rendering: option, price, title and description

use crate::draft::ServiceType;
use crate::ui::centered_rect;
use crate::ui::wizard::steps::footer;
use crate::ui::wizard::WizardScreen;
use crate::wizard::Field;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_detail_step(&mut self, frame: &mut Frame, service_type: ServiceType) {
        let area = centered_rect(70, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = self.screen_block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let screen = self.screen();
        let focused = self.focused_field();

        let mut constraints = Vec::new();
        for field in screen.fields() {
            constraints.push(Constraint::Length(1)); // Label
            let height = match field {
                Field::Option => self.option_field.render_height(),
                Field::Description => self.description_field.render_height(),
                _ => 1,
            };
            constraints.push(Constraint::Length(height));
            constraints.push(Constraint::Length(1)); // Spacer
        }
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1)); // Status
        constraints.push(Constraint::Length(1)); // Footer

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(constraints)
            .split(inner);

        for (i, field) in screen.fields().iter().enumerate() {
            let is_focused = focused == Some(*field);
            let label_style = if is_focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            let label = Paragraph::new(Line::from(vec![
                Span::styled(field.label(), label_style),
                Span::styled(
                    format!("  {}", field.key(screen)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            frame.render_widget(label, chunks[i * 3]);

            let input_area = chunks[i * 3 + 1];
            match field {
                Field::Option => self.option_field.render(frame, input_area, is_focused),
                Field::Price => self.price_field.render(frame, input_area, is_focused),
                Field::Title => self.title_field.render(frame, input_area, is_focused),
                Field::Description => {
                    self.description_field.render(frame, input_area, is_focused)
                }
                _ => {}
            }
        }

        let n = chunks.len();
        self.render_status(frame, chunks[n - 2]);

        let enter_hint = if focused == Some(Field::Description) {
            "new line"
        } else {
            "photos"
        };
        frame.render_widget(
            footer(&[
                ("Tab", "next field"),
                ("Enter", enter_hint),
                ("Esc", "back"),
                ("Ctrl+X", "discard"),
            ]),
            chunks[n - 1],
        );

        tracing::trace!(service_type = %service_type, "Rendered detail screen");
    }
}
