use crate::player::{MediaBackend, PlaybackController, ViewState};
use egui::{Button, Slider, Ui};

pub struct PlayerControls;

impl PlayerControls {
    /// Draw the control bar. Returns true when the load button was clicked.
    pub fn show<B: MediaBackend>(
        ui: &mut Ui,
        player: &mut PlaybackController<B, ViewState>,
    ) -> bool {
        let mut load_clicked = false;

        ui.horizontal(|ui| {
            let view = player.view().clone();

            // Play/Stop toggle
            if ui
                .add_enabled(view.controls_enabled, Button::new(view.play_icon.glyph()))
                .clicked()
            {
                player.play_stop();
            }

            ui.separator();

            ui.label(view.elapsed_text.as_str());

            // Continuous: every change seeks
            let mut position = view.slider_value;
            let slider_response = ui.add_enabled(
                view.controls_enabled,
                Slider::new(&mut position, view.slider_min..=view.slider_max)
                    .show_value(false)
                    .trailing_fill(true),
            );
            if slider_response.changed() {
                player.scrub(position);
            }

            ui.label(view.remaining_text.as_str());

            ui.separator();

            if ui
                .add_enabled(view.load_enabled, Button::new("Load…"))
                .on_hover_text("Open a MOV or MP4 file")
                .clicked()
            {
                load_clicked = true;
            }
        });

        load_clicked
    }
}
