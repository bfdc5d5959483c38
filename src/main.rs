use std::rc::Rc;

use anyhow::{Context, Result};
use shimmer_config::ShimmerFileConfig;
use shimmer_paint::{Brush, Color, Painter, Rect, RoundedRadii, RoundedRect, Viewport, tessellate};
use shimmer_scene::{ContentBounds, DriverEvent, ManualScheduler, ShimmerConfig, ShimmerEffect};

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let file = ShimmerFileConfig::load();
    let config = ShimmerConfig::from_file_config(&file).context("invalid shimmer configuration")?;
    let demo = &file.demo;
    if !(demo.frame_ms.is_finite() && demo.frame_ms > 0.0) {
        anyhow::bail!("demo.frame_ms must be positive, got {}", demo.frame_ms);
    }
    log::info!(
        "shimmer demo: {:?} at {:.3} rad, period {}ms, delay {}ms, loops {:?}",
        config.direction(),
        config.angle(),
        config.period_ms(),
        config.delay_ms(),
        config.loop_count()
    );

    // Headless host: the scheduler doubles as the frame clock.
    let clock = Rc::new(ManualScheduler::new());
    let mut effect = ShimmerEffect::new(config, clock.clone())?;
    let bounds = ContentBounds::new(demo.width, demo.height);

    let dump_mesh = std::env::args().any(|a| a == "--mesh");
    let mut frames = 0usize;
    let mut repaints = 0usize;
    let mut now = 0.0;
    while now <= demo.duration_ms {
        clock.advance_to(now);
        let update = effect.frame(bounds, now);
        frames += 1;
        if update.repaint {
            repaints += 1;
            log::debug!(
                "t={now:>7.1}ms progress={:.3} mask=({:.1}, {:.1})",
                effect.progress(),
                update.frame.rect.dx,
                update.frame.rect.dy
            );
            if dump_mesh {
                paint_frame(&effect, bounds)?;
            }
        }
        for event in effect.drain_events() {
            match event {
                DriverEvent::Progress(_) => {}
                other => log::info!("t={now:.1}ms {other:?}"),
            }
        }
        if effect.driver().phase() == shimmer_scene::DriverPhase::Stopped {
            break;
        }
        now += demo.frame_ms;
    }

    log::info!(
        "{frames} frames, {repaints} repaints, {} sweeps completed",
        effect.driver().iteration_count()
    );
    effect.dispose();
    Ok(())
}

/// Record a placeholder row under the mask and report the flattened mesh size.
fn paint_frame(effect: &ShimmerEffect, bounds: ContentBounds) -> Result<()> {
    let (w, h) = (bounds.width as f32, bounds.height as f32);
    let mut painter = Painter::begin_frame(Viewport {
        width: w.ceil() as u32,
        height: h.ceil() as u32,
    });
    let placeholder = Brush::Solid(Color::rgba(0xe0, 0xe0, 0xe0, 0xff));
    effect.paint(&mut painter, [0.0, 0.0], bounds, |p| {
        p.circle([h * 0.5, h * 0.5], h * 0.4, placeholder.clone(), 0);
        p.rounded_rect(
            RoundedRect {
                rect: Rect::new(h * 1.2, h * 0.25, w - h * 1.4, h * 0.5),
                radii: RoundedRadii::uniform(h * 0.1),
            },
            placeholder.clone(),
            0,
        );
    })?;
    let mesh = tessellate(&painter.finish()?).context("tessellating shimmer frame")?;
    log::debug!(
        "  mesh: {} vertices, {} indices, {} batches ({} bytes to upload)",
        mesh.vertices.len(),
        mesh.indices.len(),
        mesh.batches.len(),
        mesh.vertex_bytes().len() + mesh.index_bytes().len()
    );
    Ok(())
}
