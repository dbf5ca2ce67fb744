use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Selected(PathBuf),
    Cancelled,
}

/// Modal asking for a pack path. The app polls `ready()` every frame and
/// collects the outcome with `take_result()` once the user is done, so the
/// frame loop never blocks on it.
pub struct FileOpenPrompt {
    input: String,
    outcome: Option<PromptOutcome>,
}

impl FileOpenPrompt {
    pub fn new(initial: impl Into<String>) -> Self {
        Self { input: initial.into(), outcome: None }
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        if self.outcome.is_some() {
            return;
        }
        egui::Window::new("Open Pack")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Path to a pack file:");
                let response = ui.text_edit_singleline(&mut self.input);
                response.request_focus();
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("Open").clicked() || submitted {
                        self.outcome = Some(PromptOutcome::Selected(PathBuf::from(self.input.trim())));
                    }
                    if ui.button("Cancel").clicked() {
                        self.outcome = Some(PromptOutcome::Cancelled);
                    }
                });
            });
    }

    /// True once the user has confirmed or dismissed the prompt.
    pub fn ready(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn take_result(&mut self) -> Option<PromptOutcome> {
        self.outcome.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_pending_until_a_choice_is_made() {
        let mut prompt = FileOpenPrompt::new("assets/packs/demo_pack.json");
        assert!(!prompt.ready());
        assert!(prompt.take_result().is_none());
        prompt.outcome = Some(PromptOutcome::Cancelled);
        assert!(prompt.ready());
        assert_eq!(prompt.take_result(), Some(PromptOutcome::Cancelled));
        assert!(!prompt.ready());
    }
}
