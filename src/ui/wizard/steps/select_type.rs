//! Service type selection rendering

use crate::draft::ServiceType;
use crate::ui::centered_rect;
use crate::ui::wizard::steps::footer;
use crate::ui::wizard::WizardScreen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, Paragraph},
    Frame,
};

impl WizardScreen {
    pub(crate) fn render_select_type_step(&mut self, frame: &mut Frame) {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);

        let block = self.screen_block();
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Instructions
                Constraint::Min(8),    // Service types
                Constraint::Length(1), // Status
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let instructions = Paragraph::new(Line::from("Which service are you offering?"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(instructions, chunks[0]);

        let chosen = self.controller.draft().service_type;
        let items: Vec<ListItem> = ServiceType::all()
            .iter()
            .map(|t| {
                let marker = if chosen == Some(*t) { "(*) " } else { "( ) " };
                let options = t
                    .options()
                    .iter()
                    .map(|o| o.label)
                    .collect::<Vec<_>>()
                    .join(", ");

                let mut lines = vec![
                    Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Green)),
                        Span::styled(t.label(), Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(vec![
                        Span::raw("    "),
                        Span::styled(options, Style::default().fg(Color::DarkGray)),
                    ]),
                ];
                if let Some(url) = self.thumbnails.get(t) {
                    lines.push(Line::from(vec![
                        Span::raw("    "),
                        Span::styled(url.clone(), Style::default().fg(Color::Blue)),
                    ]));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, chunks[1], &mut self.type_state);

        self.render_status(frame, chunks[2]);
        frame.render_widget(
            footer(&[
                ("Enter", "choose"),
                ("Space", "mark"),
                ("Ctrl+X", "discard"),
                ("Esc", "quit"),
            ]),
            chunks[3],
        );
    }
}
