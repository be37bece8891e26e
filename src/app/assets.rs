//! Background image decoding so the UI thread never blocks on disk or codecs.
//!
//! Priority logos are decoded first.  Each result comes back as an
//! [`AssetUpdate`]; failures are reported, not retried, and the renderer
//! swaps in a placeholder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::core::element::DecorativeElement;

/// Decoded images are downscaled to fit this many pixels on the long side.
pub const MAX_LOGO_PX: u32 = 96;

#[derive(Debug, Clone)]
pub enum AssetState {
    Loading,
    Ready(Arc<image::RgbaImage>),
    Failed,
}

#[derive(Debug)]
pub enum AssetUpdate {
    Loaded {
        id: String,
        image: Arc<image::RgbaImage>,
    },
    Failed {
        id: String,
        reason: String,
    },
}

/// Decode one logo and shrink it for terminal rendering.
pub fn decode_logo(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    Ok(img.thumbnail(MAX_LOGO_PX, MAX_LOGO_PX).to_rgba8())
}

/// Initial asset table: every element starts out `Loading`.
pub fn pending_assets(elements: &[DecorativeElement]) -> HashMap<String, AssetState> {
    elements
        .iter()
        .map(|el| (el.id.clone(), AssetState::Loading))
        .collect()
}

/// Decode all element images on a worker thread.
pub fn spawn_asset_loads(tx: mpsc::UnboundedSender<AssetUpdate>, elements: &[DecorativeElement]) {
    let mut jobs: Vec<(String, PathBuf, bool)> = elements
        .iter()
        .map(|el| (el.id.clone(), el.src.clone(), el.priority))
        .collect();
    // Stable sort keeps manifest order within each priority class.
    jobs.sort_by_key(|(_, _, priority)| !priority);

    std::thread::spawn(move || {
        for (id, path, _) in jobs {
            let t0 = std::time::Instant::now();
            let update = match decode_logo(&path) {
                Ok(img) => {
                    tracing::debug!("decoded {}: {:.2?}", path.display(), t0.elapsed());
                    AssetUpdate::Loaded {
                        id,
                        image: Arc::new(img),
                    }
                }
                Err(e) => {
                    tracing::warn!("logo {id} unavailable: {e:#}");
                    AssetUpdate::Failed {
                        id,
                        reason: format!("{e:#}"),
                    }
                }
            };
            if tx.send(update).is_err() {
                break; // UI gone
            }
        }
    });
}

/// Apply an update to the asset table.
pub fn apply_asset_update(assets: &mut HashMap<String, AssetState>, update: AssetUpdate) {
    match update {
        AssetUpdate::Loaded { id, image } => {
            assets.insert(id, AssetState::Ready(image));
        }
        AssetUpdate::Failed { id, reason } => {
            tracing::debug!(%id, %reason, "showing placeholder");
            assets.insert(id, AssetState::Failed);
        }
    }
}

/// `true` while any image is still decoding.
pub fn any_loading(assets: &HashMap<String, AssetState>) -> bool {
    assets.values().any(|a| matches!(a, AssetState::Loading))
}
