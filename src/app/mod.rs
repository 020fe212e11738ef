use eframe::egui::{self, Align2, Color32, Context, FontId, Sense, Ui, vec2};

use crate::config::Settings;
use crate::palette::Palette;
use crate::sim::FrameDriver;

mod render_utils;
mod ui;

use render_utils::{PainterCanvas, draw_background};
use ui::FpsCounter;

pub struct ConstellationApp {
    settings: Settings,
    seed: Option<u64>,
    palette: Palette,
    state: EngineState,
    fps: Option<FpsCounter>,
}

enum EngineState {
    /// The surface size is only known once the first frame lays out.
    Waiting,
    Running(Box<FrameDriver>),
    Failed(String),
}

impl ConstellationApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        seed: Option<u64>,
        show_fps: bool,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        let palette = settings.palette;
        Self {
            settings,
            seed,
            palette,
            state: EngineState::Waiting,
            fps: show_fps.then(FpsCounter::default),
        }
    }

    fn start_engine(&self, width: f32, height: f32) -> EngineState {
        match FrameDriver::start(width, height, self.settings.tuning, self.seed) {
            Ok(driver) => EngineState::Running(Box::new(driver)),
            Err(error) => {
                log::error!("constellation not started: {error:#}");
                EngineState::Failed(error.to_string())
            }
        }
    }

    fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if matches!(self.state, EngineState::Waiting) {
            self.state = self.start_engine(rect.width(), rect.height());
        }

        match &mut self.state {
            EngineState::Running(driver) => {
                // A stopped engine neither listens nor schedules frames.
                if !driver.is_running() {
                    return;
                }

                if response.clicked_by(egui::PointerButton::Primary)
                    && let Some(pointer) = response.interact_pointer_pos()
                {
                    driver.spawn_at((pointer - rect.min).to_pos2());
                }

                let timestamp_ms = ui.input(|input| input.time) * 1000.0;
                driver.tick(timestamp_ms, rect.width(), rect.height());

                let mut canvas = PainterCanvas::new(&painter, rect.min);
                driver.draw(&mut canvas, &self.palette);
                ui.ctx().request_repaint();
            }
            EngineState::Failed(error) => {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    error.as_str(),
                    FontId::proportional(14.0),
                    Color32::from_gray(200),
                );
            }
            EngineState::Waiting => {}
        }

        if let Some(text) = self.fps.as_ref().and_then(FpsCounter::display_text) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}

impl eframe::App for ConstellationApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(fps) = self.fps.as_mut() {
            fps.record(ctx.input(|input| input.stable_dt));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_canvas(ui));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let EngineState::Running(driver) = &self.state
            && driver.stop()
        {
            log::info!("constellation stopped");
        }
    }
}
