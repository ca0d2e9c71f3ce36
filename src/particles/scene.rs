//! One mounted hero: the particle field, its pointer and its rebuild state.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::builder::build_particles;
use super::config::{FieldConfig, HeadlineStyle, PhysicsConfig, SamplingConfig};
use super::error::FieldError;
use super::mask::TextRasterizer;
use super::pointer::{CanvasRect, PointerState};
use super::render::{render_frame, FramePalette, Surface};
use super::simulation::ParticleField;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroOptions {
    pub physics: PhysicsConfig,
    pub sampling: SamplingConfig,
    pub headline: HeadlineStyle,
}

impl HeroOptions {
    pub fn validate(&self) -> Result<(), FieldError> {
        self.physics.validate()?;
        self.sampling.validate()
    }
}

/// Rendered size of the hero container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

#[derive(Debug)]
pub struct HeroScene {
    options: HeroOptions,
    field: ParticleField,
    pointer: PointerState,
    config: Option<FieldConfig>,
    rng: SmallRng,
    fonts_ready: bool,
    rebuild_pending: bool,
}

impl HeroScene {
    /// Fails with [`FieldError::InvalidOption`] when `options` would break
    /// the field's physics.
    pub fn new(options: HeroOptions, seed: u64) -> Result<Self, FieldError> {
        options.validate()?;
        let pointer = PointerState::new(options.sampling.interaction_radius);
        Ok(Self {
            options,
            field: ParticleField::default(),
            pointer,
            config: None,
            rng: SmallRng::seed_from_u64(seed),
            fonts_ready: false,
            rebuild_pending: true,
        })
    }

    pub fn options(&self) -> &HeroOptions {
        &self.options
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Geometry of the last successful build.
    pub fn config(&self) -> Option<&FieldConfig> {
        self.config.as_ref()
    }

    pub fn is_rebuild_pending(&self) -> bool {
        self.rebuild_pending
    }

    /// A rebuild is requested and fonts are ready, so the next
    /// [`rebuild_if_needed`](Self::rebuild_if_needed) call will attempt one.
    pub fn wants_rebuild(&self) -> bool {
        self.rebuild_pending && self.fonts_ready
    }

    /// Glyph metrics are trustworthy from here on; the first build may run.
    pub fn mark_fonts_ready(&mut self) {
        self.fonts_ready = true;
        self.rebuild_pending = true;
    }

    /// Marks the field dirty. Any number of requests between two frames
    /// collapse into one rebuild.
    pub fn request_rebuild(&mut self) {
        self.rebuild_pending = true;
    }

    /// Rebuilds the field if one was requested and fonts are ready.
    ///
    /// Returns the new geometry when a build happened. A zero-size container
    /// empties the field and leaves the request pending; any other failure
    /// drops the request.
    pub fn rebuild_if_needed<T: TextRasterizer + ?Sized>(
        &mut self,
        container: ContainerSize,
        rasterizer: &mut T,
    ) -> Result<Option<FieldConfig>, FieldError> {
        if !self.wants_rebuild() {
            return Ok(None);
        }

        match self.rebuild(container, rasterizer) {
            Ok(config) => {
                self.rebuild_pending = false;
                Ok(Some(config))
            }
            Err(err) if err.is_transient() => {
                trace!(%err, "field rebuild deferred");
                Err(err)
            }
            Err(err) => {
                self.rebuild_pending = false;
                warn!(%err, "field rebuild failed");
                Err(err)
            }
        }
    }

    fn rebuild<T: TextRasterizer + ?Sized>(
        &mut self,
        container: ContainerSize,
        rasterizer: &mut T,
    ) -> Result<FieldConfig, FieldError> {
        self.field = ParticleField::default();
        self.config = None;

        let config = FieldConfig::derive(
            container.css_width,
            container.css_height,
            container.dpr,
            &self.options.headline,
            &self.options.sampling,
        );
        let mask = rasterizer.rasterize(&config, &self.options.headline)?;
        if mask.width() != config.width || mask.height() != config.height {
            return Err(FieldError::MaskSize {
                expected: config.pixel_count(),
                got: mask.pixels().len(),
            });
        }

        let particles = build_particles(&mask, &config, &self.options.sampling, &mut self.rng);
        self.field = ParticleField::new(particles);
        self.pointer.set_radius(config.interaction_radius);
        self.config = Some(config);

        debug!(
            width = config.width,
            height = config.height,
            gap = config.gap,
            particles = self.field.len(),
            "particle field rebuilt"
        );
        Ok(config)
    }

    pub fn pointer_moved(&mut self, client_x: f64, client_y: f64, rect: CanvasRect) {
        let dpr = self.config.map_or(1.0, |config| config.dpr);
        self.pointer.track(client_x, client_y, rect, dpr);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Paints one frame. A zero-size surface is left untouched.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return;
        }
        let palette = FramePalette {
            background: self.options.headline.background,
            ink: self.options.headline.ink,
        };
        render_frame(
            surface,
            &mut self.field,
            &self.pointer,
            &self.options.physics,
            palette,
            &mut self.rng,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainerSize, HeroOptions, HeroScene};
    use crate::particles::config::{FieldConfig, HeadlineStyle};
    use crate::particles::error::FieldError;
    use crate::particles::glyphs::BitmapRasterizer;
    use crate::particles::mask::{MaskBuffer, Rgba, TextRasterizer};
    use crate::particles::pointer::CanvasRect;

    const CONTAINER: ContainerSize = ContainerSize {
        css_width: 600.0,
        css_height: 300.0,
        dpr: 1.0,
    };

    struct Counting {
        calls: usize,
    }

    impl TextRasterizer for Counting {
        fn rasterize(
            &mut self,
            config: &FieldConfig,
            style: &HeadlineStyle,
        ) -> Result<MaskBuffer, FieldError> {
            self.calls += 1;
            BitmapRasterizer.rasterize(config, style)
        }
    }

    struct WrongSize;

    impl TextRasterizer for WrongSize {
        fn rasterize(
            &mut self,
            _config: &FieldConfig,
            _style: &HeadlineStyle,
        ) -> Result<MaskBuffer, FieldError> {
            Ok(MaskBuffer::filled(1, 1, Rgba::TRANSPARENT))
        }
    }

    #[test]
    fn waits_for_fonts_before_first_build() {
        let mut scene = HeroScene::new(HeroOptions::default(), 1).unwrap();
        let mut rasterizer = Counting { calls: 0 };
        assert!(scene.is_rebuild_pending());
        assert!(!scene.wants_rebuild());
        assert_eq!(scene.rebuild_if_needed(CONTAINER, &mut rasterizer), Ok(None));
        assert_eq!(rasterizer.calls, 0);

        scene.mark_fonts_ready();
        assert!(scene.wants_rebuild());
        let config = scene.rebuild_if_needed(CONTAINER, &mut rasterizer).unwrap();
        assert!(config.is_some());
        assert!(!scene.wants_rebuild());
        assert!(!scene.field().is_empty());
        assert_eq!(rasterizer.calls, 1);
    }

    #[test]
    fn resize_storm_collapses_into_one_rebuild() {
        let mut scene = HeroScene::new(HeroOptions::default(), 1).unwrap();
        let mut rasterizer = Counting { calls: 0 };
        scene.mark_fonts_ready();
        scene.rebuild_if_needed(CONTAINER, &mut rasterizer).unwrap();

        for _ in 0..25 {
            scene.request_rebuild();
        }
        scene.rebuild_if_needed(CONTAINER, &mut rasterizer).unwrap();
        scene.rebuild_if_needed(CONTAINER, &mut rasterizer).unwrap();
        assert_eq!(rasterizer.calls, 2);
    }

    #[test]
    fn zero_size_container_defers_and_retries() {
        let mut scene = HeroScene::new(HeroOptions::default(), 1).unwrap();
        scene.mark_fonts_ready();
        let hidden = ContainerSize {
            css_width: 0.0,
            ..CONTAINER
        };
        let err = scene
            .rebuild_if_needed(hidden, &mut BitmapRasterizer)
            .unwrap_err();
        assert!(err.is_transient());
        assert!(scene.is_rebuild_pending());
        assert!(scene.field().is_empty());

        scene.rebuild_if_needed(CONTAINER, &mut BitmapRasterizer).unwrap();
        assert!(!scene.is_rebuild_pending());
        assert!(!scene.field().is_empty());
    }

    #[test]
    fn mismatched_mask_is_rejected_once() {
        let mut scene = HeroScene::new(HeroOptions::default(), 1).unwrap();
        scene.mark_fonts_ready();
        let err = scene.rebuild_if_needed(CONTAINER, &mut WrongSize).unwrap_err();
        assert_eq!(
            err,
            FieldError::MaskSize {
                expected: 600 * 300,
                got: 1
            }
        );
        assert!(!scene.is_rebuild_pending());
        assert!(scene.config().is_none());
    }

    #[test]
    fn pointer_uses_the_field_pixel_ratio() {
        let mut scene = HeroScene::new(HeroOptions::default(), 1).unwrap();
        scene.mark_fonts_ready();
        let retina = ContainerSize {
            dpr: 2.0,
            ..CONTAINER
        };
        scene.rebuild_if_needed(retina, &mut BitmapRasterizer).unwrap();
        assert_eq!(scene.pointer().radius(), 140.0);

        scene.pointer_moved(50.0, 60.0, CanvasRect { left: 10.0, top: 10.0 });
        assert_eq!(scene.pointer().position(), [80.0, 100.0]);
        scene.pointer_left();
        assert!(scene.pointer().is_away());
    }

    #[test]
    fn scenes_do_not_share_state() {
        let mut a = HeroScene::new(HeroOptions::default(), 1).unwrap();
        let b = HeroScene::new(HeroOptions::default(), 1).unwrap();
        a.mark_fonts_ready();
        a.rebuild_if_needed(CONTAINER, &mut BitmapRasterizer).unwrap();
        a.pointer_moved(5.0, 5.0, CanvasRect::default());
        assert!(b.field().is_empty());
        assert!(b.pointer().is_away());
    }

    #[test]
    fn options_accept_partial_documents() {
        let options: HeroOptions = serde_json::from_str(
            r#"{ "physics": { "friction": 0.8 }, "headline": { "lines": ["HELLO"] } }"#,
        )
        .unwrap();
        assert_eq!(options.physics.friction, 0.8);
        assert_eq!(options.physics.homing, 0.05);
        assert_eq!(options.headline.lines, vec!["HELLO".to_string()]);
        assert_eq!(options.headline.font_weight, 900);
        assert_eq!(options.sampling.base_gap, 3.0);
    }

    #[test]
    fn unstable_friction_is_refused() {
        let options: HeroOptions =
            serde_json::from_str(r#"{ "physics": { "friction": 1.5 } }"#).unwrap();
        let err = HeroScene::new(options, 1).unwrap_err();
        assert_eq!(
            err,
            FieldError::InvalidOption {
                field: "physics.friction",
                reason: "must be in (0, 1)",
            }
        );
    }

    #[test]
    fn negative_variance_is_refused() {
        let options: HeroOptions = serde_json::from_str(
            r#"{ "physics": { "variance_min": -2.0, "variance_max": -1.0 } }"#,
        )
        .unwrap();
        assert!(matches!(
            HeroScene::new(options, 1),
            Err(FieldError::InvalidOption { field: "physics.variance_min", .. })
        ));
    }

    #[test]
    fn oversized_interaction_radius_is_refused() {
        let options: HeroOptions =
            serde_json::from_str(r#"{ "sampling": { "interaction_radius": 15000 } }"#).unwrap();
        assert!(matches!(
            HeroScene::new(options, 1),
            Err(FieldError::InvalidOption { field: "sampling.interaction_radius", .. })
        ));
    }
}
