mod common;

use common::{image, init_logging, pick};
use img2pdf_core::{
    format_file_size, sanitize_base_name, submission_filename, update, AppState, ConvertMode,
    Effect, Msg, Quality, SessionSettings, ValidationError,
};
use pretty_assertions::assert_eq;

#[test]
fn single_file_defaults_name_to_its_base_name() {
    init_logging();
    let (state, _) = pick(AppState::new(), vec![image("a.png", 1, 1)]);
    let options = state.view().options.expect("options visible");

    assert_eq!(options.base_name, "a");
    assert_eq!(options.extension, ".pdf");
    assert!(!options.mode_choice_offered);
}

#[test]
fn several_files_default_to_and_more_name() {
    init_logging();
    let (state, _) = pick(
        AppState::new(),
        vec![image("a.png", 1, 1), image("b.png", 2, 2)],
    );
    let options = state.view().options.expect("options visible");

    assert_eq!(options.base_name, "a_and_1_more");
    assert!(options.mode_choice_offered);
}

#[test]
fn empty_set_shows_no_options() {
    init_logging();
    let view = AppState::new().view();
    assert!(view.options.is_none());
    assert_eq!(view.quality, 95);
}

#[test]
fn shrinking_to_one_file_forces_merged() {
    init_logging();
    let (state, _) = pick(
        AppState::new(),
        vec![image("a.png", 1, 1), image("b.png", 2, 2)],
    );
    let (state, _) = update(state, Msg::ModeSelected(ConvertMode::Individual));
    let options = state.view().options.unwrap();
    assert_eq!(options.mode, ConvertMode::Individual);
    assert_eq!(options.extension, ".zip");

    let (state, _) = update(state, Msg::RemoveFileClicked(1));
    let options = state.view().options.unwrap();
    assert_eq!(options.mode, ConvertMode::Merged);
    assert_eq!(options.extension, ".pdf");
    assert_eq!(options.base_name, "a");
}

#[test]
fn individual_is_ignored_for_a_single_file() {
    init_logging();
    let (mut state, _) = pick(AppState::new(), vec![image("a.png", 1, 1)]);
    assert!(state.consume_dirty());
    let (mut state, effects) = update(state, Msg::ModeSelected(ConvertMode::Individual));

    assert!(effects.is_empty());
    assert_eq!(state.options().mode(), ConvertMode::Merged);
    assert!(!state.consume_dirty());
}

#[test]
fn accepted_mode_change_marks_state_dirty() {
    init_logging();
    let (mut state, _) = pick(
        AppState::new(),
        vec![image("a.png", 1, 1), image("b.png", 2, 2)],
    );
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::ModeSelected(ConvertMode::Individual));

    assert_eq!(state.options().mode(), ConvertMode::Individual);
    assert!(state.consume_dirty());
}

#[test]
fn edited_name_is_sanitized() {
    init_logging();
    let (state, _) = pick(AppState::new(), vec![image("a.png", 1, 1)]);
    let (state, _) = update(state, Msg::BaseNameEdited("a/b:c".to_string()));

    assert_eq!(state.options().base_name(), "abc");
}

#[test]
fn edited_name_survives_adds_until_cleared() {
    init_logging();
    let (state, _) = pick(AppState::new(), vec![image("a.png", 1, 1)]);
    let (state, _) = update(state, Msg::BaseNameEdited("album".to_string()));
    let (state, _) = pick(state, vec![image("b.png", 2, 2)]);
    assert_eq!(state.options().base_name(), "album");

    let (state, _) = update(state, Msg::ClearClicked);
    assert_eq!(state.options().base_name(), "");
    let (state, _) = pick(state, vec![image("c.png", 3, 3)]);
    assert_eq!(state.options().base_name(), "c");
}

#[test]
fn quality_outside_range_is_rejected() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::QualityChanged(80));
    assert_eq!(state.options().quality().get(), 80);

    let (state, effects) = update(state, Msg::QualityChanged(0));
    assert_eq!(state.options().quality().get(), 80);
    assert_eq!(
        effects,
        vec![Effect::Alert(
            ValidationError::QualityOutOfRange(0).to_string()
        )]
    );
    assert!(Quality::new(101).is_err());
}

#[test]
fn settings_quality_is_the_starting_value() {
    init_logging();
    let state = AppState::with_settings(SessionSettings {
        clear_after_success: false,
        default_quality: Quality::new(70).unwrap(),
    });
    assert_eq!(state.view().quality, 70);
}

#[test]
fn helpers_strip_and_fall_back() {
    assert_eq!(sanitize_base_name(r#"<a>:"b"/\|?*c"#), "abc");
    assert_eq!(submission_filename("   "), "converted");
    assert_eq!(submission_filename("  scan "), "scan");
    assert_eq!("Individual".parse::<ConvertMode>(), Ok(ConvertMode::Individual));
    assert!("both".parse::<ConvertMode>().is_err());
}

#[test]
fn file_sizes_use_binary_units() {
    assert_eq!(format_file_size(0), "0 Bytes");
    assert_eq!(format_file_size(1024), "1 KB");
    assert_eq!(format_file_size(1_572_864), "1.5 MB");
    assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
}
