/// Glyph shown on the play/stop toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayIcon {
    Play,
    Stop,
}

impl PlayIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            PlayIcon::Play => "▶",
            PlayIcon::Stop => "⏹",
        }
    }
}

/// UI fields the controller writes to.
pub trait PlayerView {
    fn set_elapsed_text(&mut self, text: String);
    fn set_remaining_text(&mut self, text: String);
    fn set_slider_bounds(&mut self, min: f64, max: f64);
    fn set_slider_value(&mut self, value: f64);
    fn set_play_icon(&mut self, icon: PlayIcon);
    fn set_controls_enabled(&mut self, enabled: bool);
    fn set_load_enabled(&mut self, enabled: bool);
}

/// Plain record of the control bar, read back by whatever draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub elapsed_text: String,
    pub remaining_text: String,
    pub slider_min: f64,
    pub slider_max: f64,
    pub slider_value: f64,
    pub play_icon: PlayIcon,
    pub controls_enabled: bool,
    pub load_enabled: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            elapsed_text: "00:00".to_owned(),
            remaining_text: "00:00".to_owned(),
            slider_min: 0.0,
            slider_max: 0.0,
            slider_value: 0.0,
            play_icon: PlayIcon::Play,
            controls_enabled: false,
            load_enabled: true,
        }
    }
}

impl PlayerView for ViewState {
    fn set_elapsed_text(&mut self, text: String) {
        self.elapsed_text = text;
    }

    fn set_remaining_text(&mut self, text: String) {
        self.remaining_text = text;
    }

    fn set_slider_bounds(&mut self, min: f64, max: f64) {
        self.slider_min = min;
        self.slider_max = max;
        self.slider_value = self.slider_value.clamp(min, max);
    }

    fn set_slider_value(&mut self, value: f64) {
        self.slider_value = value.clamp(self.slider_min, self.slider_max);
    }

    fn set_play_icon(&mut self, icon: PlayIcon) {
        self.play_icon = icon;
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn set_load_enabled(&mut self, enabled: bool) {
        self.load_enabled = enabled;
    }
}
