//! Terminal rendering of pipeline state.

use hlgen_models::{PipelineStage, PipelineState, StepStatus};

/// One-line progress indicator, e.g. `[x] Upload > [*] Processing > [ ] Editing ...`.
pub fn render_steps(current: PipelineStage) -> String {
    PipelineStage::ALL
        .iter()
        .map(|step| {
            let marker = match current.step_status(*step) {
                StepStatus::Done => "x",
                StepStatus::Active => "*",
                StepStatus::Pending => " ",
            };
            format!("[{}] {}", marker, step.label())
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Status line describing what the current stage is doing.
pub fn render_status(state: &PipelineState) -> Option<String> {
    if let Some(error) = &state.error {
        return Some(format!("Error: {}", error));
    }
    if state.is_busy() {
        return state.stage.busy_message().map(str::to_string);
    }
    match state.stage {
        PipelineStage::Editing => state
            .process_result
            .as_ref()
            .map(|r| format!("Edit your highlights: {}", r.spreadsheet_url)),
        PipelineStage::Complete => state
            .download_url
            .as_ref()
            .map(|url| format!("Your video is ready: {}", url)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlgen_models::ProcessResult;

    #[test]
    fn test_render_steps() {
        let line = render_steps(PipelineStage::Editing);
        assert_eq!(
            line,
            "[x] Upload > [x] Processing > [*] Editing > [ ] Generating > [ ] Complete"
        );
    }

    #[test]
    fn test_render_status_busy() {
        let state = PipelineState {
            stage: PipelineStage::Processing,
            is_processing: true,
            ..Default::default()
        };
        assert_eq!(render_status(&state).as_deref(), Some("Processing your video..."));
    }

    #[test]
    fn test_render_status_error_wins() {
        let state = PipelineState {
            stage: PipelineStage::Editing,
            process_result: Some(ProcessResult::new("id", "https://sheet")),
            error: Some("Server error: 500 - boom".into()),
            ..Default::default()
        };
        assert_eq!(
            render_status(&state).as_deref(),
            Some("Error: Server error: 500 - boom")
        );
    }

    #[test]
    fn test_render_status_upload_is_silent() {
        assert_eq!(render_status(&PipelineState::initial()), None);
    }
}
