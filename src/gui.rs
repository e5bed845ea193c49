use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use eframe::{
    egui::{self, TextureHandle},
    App,
};
use egui::{Color32, ColorImage, Pos2, Rect, Sense, TextureOptions, Vec2};
use rand::rngs::ThreadRng;

use crate::config::GalleryConfig;
use crate::load::{self, LoadMsg};
use crate::pool::ImagePool;
use crate::rotation::RotationTimer;

/* ───────────────────────── UI tuneables ─────────────────────────── */

// Keep the UI responsive by hard-capping per-frame texture uploads.
const UPLOADS_PER_FRAME: usize = 4;

const GRID_GAP: f32 = 4.0;
const PLACEHOLDER_FILL: Color32 = Color32::from_gray(38);

const ABOUT_TEXT: &str = concat!(
    "TuneWall ",
    env!("CARGO_PKG_VERSION"),
    "\n\nSearches the iTunes catalog for cover art and rotates a random\n\
     visible tile with a hidden one every couple of seconds.",
);

/* ───────────────────────── app state ────────────────────────────── */

pub struct GalleryApp {
    config: GalleryConfig,

    search_input: String,

    // Current partition of artwork urls; replaced wholesale when a load
    // finishes, untouched when one fails.
    pool: Option<ImagePool>,
    // GPU textures keyed by artwork url. A url with no entry here renders
    // as a placeholder tile (its download or decode failed).
    textures: HashMap<String, TextureHandle>,

    load_tx: Sender<LoadMsg>,
    load_rx: Receiver<LoadMsg>,

    // Generation token: bumped on every new load so stale workers and
    // stale messages can be recognized and dropped.
    current_gen: Arc<AtomicU64>,

    loading: bool,
    progress: f32,

    rotation: RotationTimer,
    rng: ThreadRng,

    last_error: Option<String>,
    about_open: bool,

    egui_ctx: egui::Context,
}

impl GalleryApp {
    pub fn new(egui_ctx: egui::Context, config: GalleryConfig) -> Self {
        let (load_tx, load_rx) = bounded::<LoadMsg>(load::LOAD_CHAN_CAP);

        Self {
            search_input: config.default_query.clone(),
            rotation: RotationTimer::new(config.rotation_period),
            config,
            pool: None,
            textures: HashMap::new(),
            load_tx,
            load_rx,
            current_gen: Arc::new(AtomicU64::new(0)),
            loading: false,
            progress: 0.0,
            rng: rand::thread_rng(),
            last_error: None,
            about_open: false,
            egui_ctx,
        }
    }

    /// Kicks off a background load for the current search text and disables
    /// the trigger control until a terminal message arrives.
    pub fn start_load(&mut self) {
        let query = self.search_input.clone();
        self.loading = true;
        self.progress = 0.0;

        let generation = self.current_gen.fetch_add(1, Ordering::Relaxed) + 1;
        load::spawn_load(
            query,
            self.config.clone(),
            self.load_tx.clone(),
            Arc::clone(&self.current_gen),
            generation,
            self.egui_ctx.clone(),
        );
    }

    /// Always runs on completion, success or failure: the trigger control
    /// comes back and the bar reads full.
    fn finish_load(&mut self) {
        self.loading = false;
        self.progress = 1.0;
    }

    fn install_pool(&mut self, pool: ImagePool) {
        // Textures belonging to the previous pool are dead weight now.
        self.textures.retain(|url, _| pool.contains(url));
        self.pool = Some(pool);
        self.finish_load();
    }

    /// Drain worker messages, uploading at most a handful of textures per
    /// frame. Whatever is left stays queued for the next frame.
    fn poll_incoming(&mut self, ctx: &egui::Context) {
        let mut uploaded = 0usize;
        loop {
            match self.load_rx.try_recv() {
                Ok(msg) => {
                    if msg.generation() != self.current_gen.load(Ordering::Relaxed) {
                        continue;
                    }
                    match msg {
                        LoadMsg::Image { url, image, .. } => {
                            let tex = ctx.load_texture(
                                &url,
                                ColorImage::from_rgba_unmultiplied(
                                    [image.width, image.height],
                                    &image.rgba,
                                ),
                                TextureOptions::default(),
                            );
                            self.textures.insert(url, tex);
                            uploaded += 1;
                            if uploaded >= UPLOADS_PER_FRAME {
                                ctx.request_repaint();
                                return;
                            }
                        }
                        LoadMsg::Progress {
                            attempted, total, ..
                        } => {
                            self.progress = load::progress_fraction(attempted, total);
                        }
                        LoadMsg::Finished { pool, .. } => {
                            self.install_pool(pool);
                        }
                        LoadMsg::Failed { error, .. } => {
                            self.last_error = Some(error.to_string());
                            self.finish_load();
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }

    fn tick_rotation(&mut self, now: Instant) {
        if !self.rotation.poll(now) {
            return;
        }
        if let Some(pool) = self.pool.as_mut() {
            if let Some(swap) = pool.swap_random(&mut self.rng) {
                log::debug!(
                    "rotation: visible[{}] <-> hidden[{}]",
                    swap.visible_idx,
                    swap.hidden_idx
                );
            }
        }
    }

    /* ──────────────────── chrome ──────────────────── */

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        ui.close_menu();
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.about_open = true;
                        ui.close_menu();
                    }
                });
            });
        });
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let toggle = egui::Button::new(self.rotation.button_label());
                if ui.add_enabled(self.pool.is_some(), toggle).clicked() {
                    self.rotation.toggle(Instant::now());
                    log::info!(
                        "rotation {}",
                        if self.rotation.is_running() {
                            "resumed"
                        } else {
                            "paused"
                        }
                    );
                }
                ui.separator();
                ui.label("Search Query:");
                ui.add(egui::TextEdit::singleline(&mut self.search_input).desired_width(200.0));
                if ui
                    .add_enabled(!self.loading, egui::Button::new("Update Images"))
                    .clicked()
                {
                    self.start_load();
                }
            });
        });
    }

    fn progress_row(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("progress").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::ProgressBar::new(self.progress).desired_width(160.0));
                ui.label("Images provided courtesy of iTunes");
            });
        });
    }

    fn artwork_grid(&self, ui: &mut egui::Ui) {
        let Some(pool) = &self.pool else {
            let text = if self.loading {
                "Loading images…"
            } else {
                "Search for artwork to get started."
            };
            ui.centered_and_justified(|ui| ui.label(text));
            return;
        };

        let cols = self.config.grid_columns.max(1);
        let tile = self.config.tile_size;
        let visible = pool.visible();
        let rows = (visible.len() + cols - 1) / cols;

        let grid_size = Vec2::new(
            cols as f32 * tile + (cols - 1) as f32 * GRID_GAP,
            rows as f32 * tile + rows.saturating_sub(1) as f32 * GRID_GAP,
        );
        let avail = ui.available_rect_before_wrap();
        let origin = avail.center() - 0.5 * grid_size;

        let painter = ui.painter();
        for (i, url) in visible.iter().enumerate() {
            let col = (i % cols) as f32;
            let row = (i / cols) as f32;
            let min = origin + Vec2::new(col * (tile + GRID_GAP), row * (tile + GRID_GAP));
            let rect = Rect::from_min_size(min, Vec2::splat(tile));

            match self.textures.get(url) {
                Some(tex) => painter.image(
                    tex.id(),
                    rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                ),
                None => painter.rect_filled(rect, 2.0, PLACEHOLDER_FILL),
            };
        }

        ui.allocate_rect(Rect::from_min_size(origin, grid_size), Sense::hover());
    }

    fn error_dialog(&mut self, ctx: &egui::Context) {
        let Some(message) = self.last_error.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.last_error = None;
        }
    }

    fn about_dialog(&mut self, ctx: &egui::Context) {
        egui::Window::new("About TuneWall")
            .open(&mut self.about_open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(ABOUT_TEXT);
            });
    }
}

/* ─────────────────── eframe integration ───────────────────────── */

impl App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let now = Instant::now();

        self.tick_rotation(now);
        self.poll_incoming(ctx);

        self.menu_bar(ctx);
        self.toolbar(ctx);
        self.progress_row(ctx);

        egui::CentralPanel::default().show(ctx, |ui| self.artwork_grid(ui));

        self.error_dialog(ctx);
        self.about_dialog(ctx);

        // Keep frames coming while playback is on so ticks fire on time.
        if let Some(wait) = self.rotation.time_until_tick(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
