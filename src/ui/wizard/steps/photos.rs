//! Photo slots rendering

use crate::photos::{format_size, SLOT_COUNT};
use crate::ui::centered_rect;
use crate::ui::wizard::steps::footer;
use crate::ui::wizard::WizardScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_photos_step(&mut self, frame: &mut Frame) {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = self.screen_block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2),                  // Instructions
                Constraint::Length(SLOT_COUNT as u16), // Slots
                Constraint::Length(1),                  // Spacer
                Constraint::Length(3),                  // Path prompt
                Constraint::Min(0),
                Constraint::Length(1), // Status
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let photos = &self.controller.draft().photos;
        let instructions = Paragraph::new(Line::from(format!(
            "{} of {} photos, images up to {} each",
            photos.filled_count(),
            SLOT_COUNT,
            format_size(photos.max_bytes())
        )))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
        frame.render_widget(instructions, chunks[0]);

        let items: Vec<ListItem> = photos
            .previews()
            .iter()
            .enumerate()
            .map(|(i, preview)| {
                let label = Span::styled(
                    format!("Photo {}: ", i + 1),
                    Style::default().add_modifier(Modifier::BOLD),
                );
                let line = if self.loading_slot == Some(i) {
                    Line::from(vec![
                        label,
                        Span::styled("reading...", Style::default().fg(Color::Yellow)),
                    ])
                } else if let Some(p) = preview {
                    Line::from(vec![
                        label,
                        Span::styled(p.name.clone(), Style::default().fg(Color::Green)),
                        Span::styled(
                            format!("  {} {}", p.media_type, p.size_label),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                } else {
                    Line::from(vec![
                        label,
                        Span::styled("empty", Style::default().fg(Color::DarkGray)),
                    ])
                };
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.slot_state);

        if let Some(input) = self.path_input.as_mut() {
            let prompt = Block::default()
                .title(" Image path ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan));
            let prompt_inner = prompt.inner(chunks[3]);
            frame.render_widget(prompt, chunks[3]);
            input.render(frame, prompt_inner, true);
        }

        self.render_status(frame, chunks[5]);

        let hints: &[(&str, &str)] = if self.path_input.is_some() {
            &[("Enter", "load"), ("Esc", "cancel")]
        } else if self.controller.is_submitting() {
            &[("", "publishing...")]
        } else {
            &[
                ("Enter", "add"),
                ("d", "remove"),
                ("p", "publish"),
                ("Esc", "back"),
            ]
        };
        frame.render_widget(footer(hints), chunks[6]);
    }
}
