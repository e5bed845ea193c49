use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use crossbeam_channel::Sender;
use eframe::egui;

use crate::config::GalleryConfig;
use crate::pool::{ImagePool, PoolError};
use crate::search::{self, FetchError};

/* ───────────────────────── channel types / caps ─────────────────── */

/// Decoded RGBA artwork ready for texture upload.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Messages emitted by a load worker. Every message carries the generation
/// of the load that produced it; the UI drops anything stale.
pub enum LoadMsg {
    /// One artwork decoded successfully.
    Image {
        generation: u64,
        url: String,
        image: ImageData,
    },
    /// Emitted after every fetch attempt, failed ones included.
    Progress {
        generation: u64,
        attempted: usize,
        total: usize,
    },
    /// Terminal: the whole pool, handed over to the UI thread.
    Finished { generation: u64, pool: ImagePool },
    /// Terminal: the query itself failed; prior grid state stays up.
    Failed { generation: u64, error: LoadError },
}

impl LoadMsg {
    pub fn generation(&self) -> u64 {
        match self {
            LoadMsg::Image { generation, .. }
            | LoadMsg::Progress { generation, .. }
            | LoadMsg::Finished { generation, .. }
            | LoadMsg::Failed { generation, .. } => *generation,
        }
    }
}

pub const LOAD_CHAN_CAP: usize = 256;

/// The two failure kinds a load can surface to the user.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    InsufficientResults(#[from] PoolError),

    #[error("could not fetch search results: {0}")]
    Fetch(#[from] FetchError),
}

/// Fraction shown by the progress bar. An empty batch counts as done.
pub fn progress_fraction(attempted: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        attempted as f32 / total as f32
    }
}

/* ───────────────────────── load worker ──────────────────────────── */

/// Spawns the background worker for one load. All HTTP and decode work
/// happens on this thread; results stream back over `tx` and the UI is
/// nudged awake after every send.
pub fn spawn_load(
    query: String,
    cfg: GalleryConfig,
    tx: Sender<LoadMsg>,
    current_gen: Arc<AtomicU64>,
    generation: u64,
    egui_ctx: egui::Context,
) {
    std::thread::spawn(move || {
        log::info!("load {generation}: query {query:?}");
        match run_load(&query, &cfg, &tx, &current_gen, generation, &egui_ctx) {
            Ok(Some(pool)) => {
                log::info!(
                    "load {generation}: done, {} visible / {} hidden",
                    pool.visible().len(),
                    pool.hidden().len()
                );
                let _ = tx.send(LoadMsg::Finished { generation, pool });
            }
            Ok(None) => {
                log::debug!("load {generation}: superseded, dropping results");
            }
            Err(error) => {
                log::error!("load {generation}: {error}");
                let _ = tx.send(LoadMsg::Failed { generation, error });
            }
        }
        egui_ctx.request_repaint();
    });
}

/// Body of the worker. `Ok(None)` means a newer load took over and this one
/// bowed out without a terminal message.
fn run_load(
    query: &str,
    cfg: &GalleryConfig,
    tx: &Sender<LoadMsg>,
    current_gen: &AtomicU64,
    generation: u64,
    egui_ctx: &egui::Context,
) -> Result<Option<ImagePool>, LoadError> {
    let client = search::http_client(cfg.http_timeout)?;

    let candidates =
        search::search_artwork_urls(&client, query, cfg.search_limit, &cfg.media_filter)?;
    log::debug!("load {generation}: {} candidate urls", candidates.len());

    let pool = ImagePool::partition(candidates, cfg.visible_slots)?;
    let total = pool.total();

    let mut attempted = 0usize;
    for url in pool.iter() {
        // Superseded by a newer load (generation bumped); drop the rest.
        if current_gen.load(Ordering::Relaxed) != generation {
            return Ok(None);
        }

        match search::fetch_bytes(&client, url) {
            Ok(bytes) => match decode_artwork(&bytes) {
                Ok(image) => {
                    let _ = tx.send(LoadMsg::Image {
                        generation,
                        url: url.to_string(),
                        image,
                    });
                }
                // Tolerated: the slot stays empty, the batch continues.
                Err(err) => log::warn!("load {generation}: decode failed, url={url} err={err}"),
            },
            Err(err) => log::warn!("load {generation}: fetch failed, url={url} err={err}"),
        }

        attempted += 1;
        let _ = tx.send(LoadMsg::Progress {
            generation,
            attempted,
            total,
        });
        egui_ctx.request_repaint();
    }

    Ok(Some(pool))
}

fn decode_artwork(bytes: &[u8]) -> Result<ImageData, image::ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(ImageData {
        width: width as usize,
        height: height as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_monotonic_and_completes_at_one() {
        let total = 21;
        let mut last = 0.0f32;
        for attempted in 0..=total {
            let f = progress_fraction(attempted, total);
            assert!(f >= last, "fraction regressed at {attempted}");
            last = f;
        }
        assert_eq!(progress_fraction(total, total), 1.0);
    }

    #[test]
    fn progress_of_empty_batch_is_done() {
        assert_eq!(progress_fraction(0, 0), 1.0);
    }

    #[test]
    fn messages_report_their_generation() {
        let msg = LoadMsg::Progress {
            generation: 4,
            attempted: 1,
            total: 21,
        };
        assert_eq!(msg.generation(), 4);

        let msg = LoadMsg::Failed {
            generation: 9,
            error: LoadError::InsufficientResults(PoolError::InsufficientResults {
                distinct: 3,
                required: 21,
            }),
        };
        assert_eq!(msg.generation(), 9);
    }

    #[test]
    fn load_error_display_names_the_shortfall() {
        let err = LoadError::from(PoolError::InsufficientResults {
            distinct: 12,
            required: 21,
        });
        let text = err.to_string();
        assert!(text.contains("12"), "unexpected message: {text}");
        assert!(text.contains("21"), "unexpected message: {text}");
    }
}
