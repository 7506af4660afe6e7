use egui::{CentralPanel, TopBottomPanel};
use egui_movie::player::{GstBackend, PlaybackController, PlayerState, PlayerView, ViewState};
use egui_movie::ui::{FilePicker, PickStatus};
use egui_movie::{PlayerConfig, PlayerControls, VideoSurface};
use std::path::{Path, PathBuf};

pub struct MoviePlayerApp {
    player: PlaybackController<GstBackend, ViewState>,
    surface: VideoSurface,
    picker: FilePicker,
}

impl MoviePlayerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: PlayerConfig) -> Self {
        let player = PlaybackController::new(GstBackend, ViewState::default(), config);

        let ctx = cc.egui_ctx.clone();
        player.set_waker(move || ctx.request_repaint());

        Self {
            player,
            surface: VideoSurface::new(),
            picker: FilePicker::new(),
        }
    }

    fn pick_file(&mut self, ctx: &egui::Context) {
        let extensions = self.player.config().allowed_extensions.clone();
        let ctx = ctx.clone();

        let started = self.picker.start(
            move || {
                let dialog = rfd::AsyncFileDialog::new()
                    .set_title("Select a MOV or MP4 file")
                    .add_filter("Movie", extensions.as_slice());
                futures::executor::block_on(dialog.pick_file())
                    .map(|handle| handle.path().to_path_buf())
            },
            move || ctx.request_repaint(),
        );

        // The load trigger stays disabled until the dialog resolves.
        if started {
            self.player.view_mut().set_load_enabled(false);
        }
    }

    fn poll_pick(&mut self) {
        if let PickStatus::Done(picked) = self.picker.poll() {
            self.player.view_mut().set_load_enabled(true);
            if let Some(path) = picked {
                self.open(&path);
            }
        }
    }

    fn open(&mut self, path: &Path) {
        match self.player.open(path) {
            Ok(()) => self.surface.clear(),
            Err(err) => {
                if !err.keeps_session() {
                    self.surface.clear();
                }
                // Nothing is shown to the user; the window just stays empty.
                log::debug!("open failed: {err}");
            }
        }
    }

    fn dropped_file(ctx: &egui::Context) -> Option<PathBuf> {
        ctx.input(|i| i.raw.dropped_files.first().and_then(|file| file.path.clone()))
    }
}

impl eframe::App for MoviePlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pick();
        self.player.pump();
        if let Some(frame) = self.player.take_video_frame() {
            self.surface.upload(ctx, frame);
        }

        // Menu bar
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    let load_enabled = self.player.view().load_enabled;
                    if ui
                        .add_enabled(load_enabled, egui::Button::new("Open..."))
                        .clicked()
                    {
                        ui.close_menu();
                        self.pick_file(ctx);
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Control bar at bottom
        let mut load_clicked = false;
        TopBottomPanel::bottom("controls").show(ctx, |ui| {
            load_clicked = PlayerControls::show(ui, &mut self.player);
        });
        if load_clicked {
            self.pick_file(ctx);
        }

        // Video display area
        CentralPanel::default().show(ctx, |ui| {
            if self.surface.has_frame() {
                self.surface.show(ui);
            } else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Load a MOV or MP4 file, or drop one here");
                });
            }
        });

        if let Some(path) = Self::dropped_file(ctx) {
            self.open(&path);
        }

        // Ticks wake us, but keep polling while a file is loaded in case one is missed
        if self.player.state() != PlayerState::Empty {
            ctx.request_repaint_after(self.player.config().tick_interval);
        }
    }
}
