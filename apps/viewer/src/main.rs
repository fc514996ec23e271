use anyhow::{Context, Result, bail};
use std::path::Path;
use viewer::ppm::save_ppm;
use viewer::{FrameClock, FsStorage, TickStatus, Viewer, ViewerConfig};

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> Result<()> {
    let config = ViewerConfig::from_args(std::env::args());
    init_logging(config.debug);

    // Serve from the model's directory so the asset path stays short
    let model = Path::new(&config.model);
    let root = model.parent().unwrap_or(Path::new("."));
    let file = model
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid model path {}", config.model))?;

    let mut viewer = Viewer::new(&config, file, FsStorage::new(root))
        .with_context(|| format!("failed to start viewer for {}", config.model))?;
    let mut clock = FrameClock::new(config.target_fps);
    let mut was_ready = false;

    log::info!("streaming {} for {} frames", config.model, config.frames);
    for _ in 0..config.frames {
        clock.begin_frame();
        let status = viewer.tick(clock.delta_ms());
        let on_time = clock.end_frame();

        match status {
            TickStatus::Loading { uploaded, size } => {
                log::debug!("loading {uploaded}/{size} bytes");
            }
            TickStatus::Ready if !was_ready => {
                was_ready = true;
                let stats = viewer.stats();
                log::info!(
                    "first frame: {} faces drawn, {} culled, {} pixels",
                    stats.drawn,
                    stats.culled,
                    stats.pixels
                );
            }
            TickStatus::Ready => {}
            TickStatus::LoadFailed(err) => bail!("failed to load {}: {err}", config.model),
            TickStatus::DecodeFailed(err) => bail!("failed to decode {}: {err}", config.model),
        }

        if !on_time {
            log::debug!("frame {} ran over budget", clock.frame_count());
        }
        if config.debug && clock.frame_count() % u64::from(clock.target_fps().max(1)) == 0 {
            log::debug!("{} fps, last frame {:.2} ms", clock.fps(), clock.delta_ms());
        }
    }

    if let Some(out) = &config.output {
        let swap = viewer.swap_chain();
        save_ppm(out, viewer.front(), swap.width(), swap.height(), swap.stride())
            .with_context(|| format!("failed to write {out}"))?;
        log::info!("wrote {out}");
    }

    Ok(())
}
