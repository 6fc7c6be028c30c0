//! Tests for the wizard screen

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};

use super::types::*;
use super::WizardScreen;
use crate::api::{ApiError, CreatedListing, Thumbnails};
use crate::draft::{DraftStore, MemoryStorage, ServiceType, SessionStorage, DRAFT_KEY};
use crate::photos::PhotoFile;
use crate::submission::FIELD_TITLE;
use crate::wizard::{Field, Screen, WizardController};

fn screen_with_storage() -> (WizardScreen, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let controller = WizardController::new(DraftStore::new(storage.clone()));
    (WizardScreen::new(controller), storage)
}

fn wizard() -> WizardScreen {
    screen_with_storage().0
}

fn press(screen: &mut WizardScreen, code: KeyCode) -> WizardResult {
    screen.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(screen: &mut WizardScreen, c: char) -> WizardResult {
    screen.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn type_text(screen: &mut WizardScreen, text: &str) {
    for c in text.chars() {
        press(screen, KeyCode::Char(c));
    }
}

fn jpeg(name: &str) -> PhotoFile {
    PhotoFile::new(name, b"\xff\xd8\xff\xe0rest".to_vec())
}

/// Choose "Pintura de Paredes" (second in the list) and land on its detail screen
fn to_paredes_detail(screen: &mut WizardScreen) {
    press(screen, KeyCode::Down);
    press(screen, KeyCode::Enter);
    assert_eq!(
        screen.screen(),
        Screen::Detail(ServiceType::PinturaParedes)
    );
}

fn fill_detail(screen: &mut WizardScreen) {
    // Option
    press(screen, KeyCode::Down);
    press(screen, KeyCode::Tab);
    type_text(screen, "30,00");
    press(screen, KeyCode::Tab);
    type_text(screen, "Pintura Rápida");
    press(screen, KeyCode::Tab);
    type_text(screen, "Serviço completo");
}

/// Deliver a photo read started under the current draft
fn loaded(screen: &mut WizardScreen, slot: usize, result: Result<PhotoFile, String>) {
    let generation = screen.controller.generation();
    screen.photo_loaded(generation, slot, result);
}

fn answered(screen: &mut WizardScreen, result: Result<CreatedListing, ApiError>) {
    let generation = screen.controller.generation();
    screen.submission_finished(generation, result);
}

fn render(screen: &mut WizardScreen) {
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal.draw(|f| screen.render(f)).unwrap();
}

#[test]
fn test_starts_on_select_type() {
    let screen = wizard();
    assert_eq!(screen.screen(), Screen::SelectType);
    assert_eq!(screen.focused_field(), Some(Field::ServiceType));
    assert!(screen.status.is_none());
}

#[test]
fn test_esc_on_select_type_quits() {
    let mut screen = wizard();
    assert!(matches!(press(&mut screen, KeyCode::Esc), WizardResult::Quit));
}

#[test]
fn test_ctrl_c_quits_from_any_screen() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    assert!(matches!(ctrl(&mut screen, 'c'), WizardResult::Quit));
}

#[test]
fn test_type_list_wraps() {
    let mut screen = wizard();
    press(&mut screen, KeyCode::Up);
    assert_eq!(screen.type_state.selected(), Some(3));
    press(&mut screen, KeyCode::Down);
    assert_eq!(screen.type_state.selected(), Some(0));
}

#[test]
fn test_enter_selects_type_and_moves_forward() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    assert_eq!(
        screen.controller.draft().service_type,
        Some(ServiceType::PinturaParedes)
    );
    assert_eq!(screen.focused_field(), Some(Field::Option));
}

#[test]
fn test_typing_persists_each_field() {
    let (mut screen, storage) = screen_with_storage();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);

    let draft = screen.controller.draft();
    assert_eq!(draft.selected_option.as_deref(), Some("interna"));
    assert_eq!(draft.price, "30,00");
    assert_eq!(draft.title, "Pintura Rápida");
    assert_eq!(draft.description, "Serviço completo");

    let raw = storage.get_item(DRAFT_KEY).unwrap().unwrap();
    assert!(raw.contains("\"titulo\":\"Pintura Rápida\""));
}

#[test]
fn test_back_restores_detail_inputs() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);
    press(&mut screen, KeyCode::Tab); // back to the option list
    press(&mut screen, KeyCode::Enter);
    assert_eq!(screen.screen(), Screen::Photos);

    // Clobber the inputs, then come back
    screen.title_field.set_value("");
    press(&mut screen, KeyCode::Esc);

    assert_eq!(
        screen.screen(),
        Screen::Detail(ServiceType::PinturaParedes)
    );
    assert_eq!(screen.title_field.value(), "Pintura Rápida");
    assert_eq!(screen.option_field.value(), "interna");
}

#[test]
fn test_enter_in_description_inserts_newline() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    for _ in 0..3 {
        press(&mut screen, KeyCode::Tab);
    }
    assert_eq!(screen.focused_field(), Some(Field::Description));

    type_text(&mut screen, "linha");
    press(&mut screen, KeyCode::Enter);
    type_text(&mut screen, "outra");

    assert!(matches!(screen.screen(), Screen::Detail(_)));
    assert_eq!(screen.controller.draft().description, "linha\noutra");
}

#[test]
fn test_path_prompt_requests_photo_load() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Enter);
    press(&mut screen, KeyCode::Down);
    press(&mut screen, KeyCode::Enter);
    assert!(screen.path_input.is_some());

    type_text(&mut screen, "/tmp/sala.jpg");
    match press(&mut screen, KeyCode::Enter) {
        WizardResult::LoadPhoto { slot, path } => {
            assert_eq!(slot, 1);
            assert_eq!(path, std::path::PathBuf::from("/tmp/sala.jpg"));
        }
        other => panic!("expected LoadPhoto, got {:?}", other),
    }
    assert!(screen.path_input.is_none());
    assert_eq!(screen.loading_slot, Some(1));
}

#[test]
fn test_empty_path_is_rejected() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Enter);
    press(&mut screen, KeyCode::Enter);

    assert!(matches!(
        press(&mut screen, KeyCode::Enter),
        WizardResult::Continue
    ));
    assert_eq!(screen.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn test_photo_loaded_fills_slot_or_reports_error() {
    let mut screen = wizard();

    loaded(&mut screen, 3, Ok(jpeg("fachada.jpg")));
    assert!(screen.controller.draft().photos.get(3).is_some());
    assert_eq!(
        screen.status.as_ref().map(|s| s.kind),
        Some(StatusKind::Success)
    );

    loaded(&mut screen, 4, Ok(PhotoFile::new("orcamento.pdf", b"%PDF-1.4".to_vec())));
    assert!(screen.controller.draft().photos.get(4).is_none());
    assert_eq!(screen.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));

    loaded(&mut screen, 5, Err("No such file".to_string()));
    assert_eq!(screen.loading_slot, None);
    assert_eq!(
        screen.status.as_ref().map(|s| s.text.as_str()),
        Some("No such file")
    );
}

#[test]
fn test_remove_photo_key() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Enter);
    loaded(&mut screen, 0, Ok(jpeg("a.jpg")));

    press(&mut screen, KeyCode::Char('d'));
    assert_eq!(screen.controller.draft().photos.filled_count(), 0);
}

#[test]
fn test_publish_with_missing_title_focuses_title() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Down); // option
    press(&mut screen, KeyCode::Enter);
    assert_eq!(screen.screen(), Screen::Photos);

    assert!(matches!(
        press(&mut screen, KeyCode::Char('p')),
        WizardResult::Continue
    ));
    assert_eq!(
        screen.screen(),
        Screen::Detail(ServiceType::PinturaParedes)
    );
    assert_eq!(screen.focused_field(), Some(Field::Title));
    assert_eq!(screen.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn test_publish_then_success_resets_wizard() {
    let (mut screen, storage) = screen_with_storage();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);
    press(&mut screen, KeyCode::Tab);
    press(&mut screen, KeyCode::Enter);

    let payload = match ctrl(&mut screen, 's') {
        WizardResult::Submit(payload) => payload,
        other => panic!("expected Submit, got {:?}", other),
    };
    assert_eq!(payload.text(FIELD_TITLE), Some("Pintura Rápida"));

    // A second publish while the first is in flight is refused
    assert!(matches!(
        press(&mut screen, KeyCode::Char('p')),
        WizardResult::Continue
    ));

    answered(&mut screen, Ok(CreatedListing {
        id: "77".to_string(),
    }));
    assert_eq!(screen.screen(), Screen::SelectType);
    assert!(screen.controller.draft().is_empty());
    assert!(storage.get_item(DRAFT_KEY).unwrap().is_none());
    assert_eq!(
        screen.status.as_ref().map(|s| s.text.as_str()),
        Some("Listing published (id 77)")
    );
}

#[test]
fn test_failed_publish_keeps_draft() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);
    press(&mut screen, KeyCode::Tab);
    press(&mut screen, KeyCode::Enter);
    assert!(matches!(
        press(&mut screen, KeyCode::Char('p')),
        WizardResult::Submit(_)
    ));

    answered(&mut screen, Err(ApiError::network("/api/anuncios", "timed out")));

    assert_eq!(screen.screen(), Screen::Photos);
    assert_eq!(screen.controller.draft().title, "Pintura Rápida");
    assert!(!screen.controller.is_submitting());
    assert_eq!(screen.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
}

#[test]
fn test_discard_needs_confirmation() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);

    ctrl(&mut screen, 'x');
    assert!(screen.confirm_discard);
    press(&mut screen, KeyCode::Char('n'));
    assert_eq!(screen.controller.draft().title, "Pintura Rápida");

    ctrl(&mut screen, 'x');
    press(&mut screen, KeyCode::Char('y'));
    assert!(screen.controller.draft().is_empty());
    assert_eq!(screen.screen(), Screen::SelectType);
}

#[test]
fn test_discard_while_photo_is_loading() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Enter);
    press(&mut screen, KeyCode::Enter);
    type_text(&mut screen, "/tmp/sala.jpg");
    assert!(matches!(
        press(&mut screen, KeyCode::Enter),
        WizardResult::LoadPhoto { slot: 0, .. }
    ));
    let started = screen.controller.generation();

    ctrl(&mut screen, 'x');
    press(&mut screen, KeyCode::Char('y'));
    assert_eq!(screen.loading_slot, None);

    screen.photo_loaded(started, 0, Ok(jpeg("sala.jpg")));
    assert_eq!(screen.controller.draft().photos.filled_count(), 0);
    assert_eq!(
        screen.status.as_ref().map(|s| s.text.as_str()),
        Some("Draft discarded")
    );
}

#[test]
fn test_answer_for_discarded_draft_leaves_new_draft_alone() {
    let mut screen = wizard();
    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);
    press(&mut screen, KeyCode::Tab);
    press(&mut screen, KeyCode::Enter);
    assert!(matches!(
        press(&mut screen, KeyCode::Char('p')),
        WizardResult::Submit(_)
    ));
    let started = screen.controller.generation();

    ctrl(&mut screen, 'x');
    press(&mut screen, KeyCode::Char('y'));
    assert!(!screen.controller.is_submitting());

    // Start a new draft before the old answer arrives
    to_paredes_detail(&mut screen);
    press(&mut screen, KeyCode::Tab);
    press(&mut screen, KeyCode::Tab);
    type_text(&mut screen, "Portão novo");

    screen.submission_finished(
        started,
        Ok(CreatedListing {
            id: "9".to_string(),
        }),
    );

    assert_eq!(screen.controller.draft().title, "Portão novo");
    assert_eq!(
        screen.screen(),
        Screen::Detail(ServiceType::PinturaParedes)
    );
    assert_eq!(screen.status.as_ref().map(|s| s.kind), Some(StatusKind::Info));
}

#[test]
fn test_every_screen_renders() {
    let mut screen = wizard();
    let mut thumbnails = Thumbnails::new();
    thumbnails.insert(
        ServiceType::Assentamento,
        "https://cdn.example/assentamento.jpg".to_string(),
    );
    screen.set_thumbnails(thumbnails);
    render(&mut screen);

    to_paredes_detail(&mut screen);
    fill_detail(&mut screen);
    render(&mut screen);

    press(&mut screen, KeyCode::Tab);
    press(&mut screen, KeyCode::Enter);
    loaded(&mut screen, 0, Ok(jpeg("a.jpg")));
    press(&mut screen, KeyCode::Enter);
    render(&mut screen);
}
