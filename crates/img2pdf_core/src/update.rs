use crate::{AppState, Effect, Msg, Quality};

const NOTHING_TO_CONVERT: &str = "select at least one image to convert";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesPicked(files) => match state.add_files(files) {
            Ok(_) => picker_reset_when_idle(&state),
            Err(err) => vec![Effect::Alert(err.to_string())],
        },
        Msg::RemoveFileClicked(index) => match state.remove_file(index) {
            Ok(_) => Vec::new(),
            Err(err) => vec![Effect::Alert(err.to_string())],
        },
        Msg::ClearClicked => {
            state.clear_files();
            picker_reset_when_idle(&state)
        }
        Msg::ModeSelected(mode) => {
            // Individual is not offered for a single file; the click is dropped.
            if state.options().mode() != mode {
                state.select_mode(mode);
            }
            Vec::new()
        }
        Msg::BaseNameEdited(raw) => {
            state.options_mut().edit_base_name(&raw);
            Vec::new()
        }
        Msg::QualityChanged(value) => match Quality::new(value) {
            Ok(quality) => {
                state.options_mut().set_quality(quality);
                Vec::new()
            }
            Err(err) => vec![Effect::Alert(err.to_string())],
        },
        Msg::ConvertClicked => {
            // Re-entrant clicks are dropped without any trace.
            if state.is_in_flight() {
                return (state, Vec::new());
            }
            match state.begin_submission() {
                Some((submission_id, request)) => vec![Effect::Submit {
                    submission_id,
                    request,
                }],
                None => vec![Effect::Alert(NOTHING_TO_CONVERT.to_string())],
            }
        }
        Msg::CancelClicked => match state.in_flight_id() {
            Some(submission_id) => vec![Effect::CancelSubmission { submission_id }],
            None => Vec::new(),
        },
        Msg::ResultDismissed => {
            state.hide_result();
            Vec::new()
        }
        Msg::SubmissionProgress {
            submission_id,
            stage,
        } => {
            state.apply_progress(submission_id, stage);
            Vec::new()
        }
        Msg::SubmissionDone {
            submission_id,
            result,
        } => {
            let (settled, mut effects) = match result {
                Ok(saved) => (state.complete_submission(submission_id, saved), Vec::new()),
                Err(failure) => {
                    let settled = state.fail_submission(submission_id, &failure);
                    let alerts = if settled {
                        vec![Effect::Alert(failure.to_string())]
                    } else {
                        Vec::new()
                    };
                    (settled, alerts)
                }
            };
            // A set emptied during the submission gets its deferred picker reset.
            if settled && state.files().is_empty() {
                effects.push(Effect::ResetFilePicker);
            }
            effects
        }
    };

    (state, effects)
}

/// The pick mechanism still backs the outstanding request's files while a
/// submission is in flight; it is only reset once idle.
fn picker_reset_when_idle(state: &AppState) -> Vec<Effect> {
    if state.is_in_flight() {
        Vec::new()
    } else {
        vec![Effect::ResetFilePicker]
    }
}
