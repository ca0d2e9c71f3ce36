#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    cli::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::PathBuf;

    use clap::Parser;
    use hero_particles::particles::{
        BitmapRasterizer, CanvasRect, ContainerSize, HeadlineStyle, HeroOptions, HeroScene,
        PixelSurface,
    };
    use tracing::info;
    use tracing_subscriber::EnvFilter;

    /// Headless smoke run of the particle hero: builds the field from the
    /// built-in bitmap font and sweeps a synthetic pointer across it.
    #[derive(Parser, Debug)]
    #[command(name = "hero-particles", version)]
    struct Cli {
        /// Container width in CSS pixels
        #[arg(long, default_value_t = 960.0)]
        width: f64,

        /// Container height in CSS pixels
        #[arg(long, default_value_t = 540.0)]
        height: f64,

        /// Device pixel ratio
        #[arg(long, default_value_t = 1.0)]
        dpr: f64,

        #[arg(long, default_value_t = 3.0)]
        seconds: f32,

        #[arg(long, default_value_t = 60.0)]
        fps: f32,

        #[arg(long, default_value_t = 0x5EED)]
        seed: u64,

        /// Headline lines, top to bottom
        #[arg(long = "headline", num_args = 1..)]
        headline: Vec<String>,

        /// Write the last frame as a binary PPM
        #[arg(long)]
        dump: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error); RUST_LOG overrides
        #[arg(long, default_value = "info")]
        log_level: String,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let cli = Cli::parse();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();

        let mut options = HeroOptions::default();
        if !cli.headline.is_empty() {
            options.headline = HeadlineStyle {
                lines: cli.headline.clone(),
                ..HeadlineStyle::default()
            };
        }

        let container = ContainerSize {
            css_width: cli.width,
            css_height: cli.height,
            dpr: cli.dpr,
        };
        let mut scene = HeroScene::new(options, cli.seed)?;
        scene.mark_fonts_ready();
        let config = scene
            .rebuild_if_needed(container, &mut BitmapRasterizer)?
            .ok_or("field was not rebuilt")?;

        let mut surface = PixelSurface::new(config.width, config.height);
        let frames = (cli.seconds.max(0.0) * cli.fps.max(1.0)).round() as u32;
        info!(
            width = config.width,
            height = config.height,
            particles = scene.field().len(),
            frames,
            "particle hero smoke run"
        );

        // Sweep left to right along the headline's middle for the first
        // half, then leave and let the field settle.
        let sweep = frames / 2;
        for frame in 0..frames {
            if frame < sweep {
                let t = frame as f64 / sweep.max(1) as f64;
                scene.pointer_moved(cli.width * t, cli.height / 2.0, CanvasRect::default());
            } else if frame == sweep {
                scene.pointer_left();
            }
            scene.frame(&mut surface);

            if frame % cli.fps.max(1.0) as u32 == 0 {
                info!(
                    frame,
                    mean_displacement = scene.field().mean_displacement(),
                    "frame"
                );
            }
        }

        info!(
            mean_displacement = scene.field().mean_displacement(),
            "done"
        );

        if let Some(path) = cli.dump {
            surface.write_ppm(BufWriter::new(File::create(&path)?))?;
            info!(path = %path.display(), "wrote last frame");
        }

        Ok(())
    }
}
