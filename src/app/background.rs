//! The mounted background layer: subscribes to the page's scroll feed and
//! turns frame ticks into element frames.
//!
//! Mounting takes a subscription on the [`ScrollFeed`].  Unmounting (or
//! dropping the layer) releases it and stops the spring and idle clocks;
//! after that [`BackgroundLayer::on_tick`] never produces another frame.

use std::sync::Arc;

use tokio::sync::watch;

use crate::core::element::DecorativeElement;
use crate::core::mapper::{ElementFrame, ParticleFrame, ScrollMapper};
use crate::core::scroll::ScrollFeed;
use crate::core::spring::SpringConfig;

/// Everything painted for one frame.
#[derive(Debug, Clone, Default)]
pub struct BackgroundFrame {
    pub elements: Vec<ElementFrame>,
    pub particles: Vec<ParticleFrame>,
    pub raw_scroll: f64,
    pub smoothed: f64,
    /// Spring velocity in px/s.
    pub velocity: f64,
    pub settled: bool,
}

pub struct BackgroundLayer {
    mapper: ScrollMapper,
    scroll: Option<watch::Receiver<f64>>,
    /// Seconds since mount; drives entrance and idle motion.
    clock: f64,
}

impl BackgroundLayer {
    /// Subscribe to `feed` and start with the smoothed value resting at the
    /// feed's current offset.
    pub fn mount(feed: &ScrollFeed, mut mapper: ScrollMapper) -> Self {
        let mut rx = feed.subscribe();
        let initial = *rx.borrow_and_update();
        mapper.jump_to(initial);
        tracing::debug!(
            elements = mapper.elements().len(),
            scroll = initial,
            "background mounted"
        );
        Self {
            mapper,
            scroll: Some(rx),
            clock: 0.0,
        }
    }

    /// Convenience constructor for the usual case.
    pub fn mount_elements(
        feed: &ScrollFeed,
        elements: Arc<[DecorativeElement]>,
        spring: SpringConfig,
        particles: usize,
    ) -> Self {
        Self::mount(feed, ScrollMapper::new(elements, spring, particles))
    }

    pub fn is_mounted(&self) -> bool {
        self.scroll.is_some()
    }

    pub fn mapper(&self) -> &ScrollMapper {
        &self.mapper
    }

    pub fn mapper_mut(&mut self) -> &mut ScrollMapper {
        &mut self.mapper
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Advance by `dt` seconds.  Pulls the latest scroll offset (all pushes
    /// since the previous tick coalesce into one retarget), steps the spring
    /// and composes a frame.  `None` once unmounted or if the page dropped
    /// its feed.
    pub fn on_tick(&mut self, dt: f64) -> Option<BackgroundFrame> {
        let rx = self.scroll.as_mut()?;
        match rx.has_changed() {
            Ok(true) => {
                let offset = *rx.borrow_and_update();
                self.mapper.set_scroll(offset);
            }
            Ok(false) => {}
            Err(_) => {
                tracing::debug!("scroll feed closed");
                self.unmount();
                return None;
            }
        }

        if dt > 0.0 {
            self.clock += dt;
        }
        self.mapper.step(dt);

        Some(BackgroundFrame {
            elements: self.mapper.compose(self.clock),
            particles: self.mapper.particles(self.clock),
            raw_scroll: self.mapper.target(),
            smoothed: self.mapper.smoothed(),
            velocity: self.mapper.velocity(),
            settled: self.mapper.is_settled(),
        })
    }

    /// Release the scroll subscription and halt all motion.  Idempotent.
    pub fn unmount(&mut self) {
        if self.scroll.take().is_some() {
            tracing::debug!(clock = self.clock, "background unmounted");
        }
    }
}

impl Drop for BackgroundLayer {
    fn drop(&mut self) {
        self.unmount();
    }
}
