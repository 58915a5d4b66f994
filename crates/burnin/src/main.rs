mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Value};
use tracing::{info, warn};

use burnin_core::config::OverlayConfig;
use burnin_core::overlay::{self, Overlay};
use burnin_core::render::{self, ImageSurface};
use burnin_core::sequence::{Frame, Timecode};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Probe { input } => {
            let (width, height) = overlay::source_dimensions(&input)
                .with_context(|| format!("failed to probe {}", input.display()))?;
            println!("{width}x{height}");
            Ok(())
        }
        cli::Command::Frame {
            number,
            offset,
            padding,
            json,
        } => {
            let frame = match json {
                Some(json) => frame_from_json(&json)?,
                None => {
                    let number = number.context("--number or --json is required")?;
                    Frame::new(number, offset, padding).context("invalid frame")?
                }
            };
            println!("{}", frame.to_display_string());
            Ok(())
        }
        cli::Command::Timecode {
            hour,
            minute,
            second,
            frame,
            fps,
        } => {
            let timecode = Timecode::builder()
                .hour(hour)
                .minute(minute)
                .second(second)
                .frame(frame)
                .fps(fps)
                .build()
                .context("invalid timecode")?;
            println!("{timecode}");
            Ok(())
        }
        cli::Command::Burn {
            input,
            output,
            text,
            frame,
            frame_offset,
            timecode,
            fps,
            date,
            logo,
            font,
            x,
            y,
        } => {
            let mut config = OverlayConfig::default();
            if font.is_some() {
                config.font_path = font;
            }
            if let Some(format) = date.clone() {
                config.date_format = format;
            }

            let lines = BurnLines {
                text,
                frame: frame
                    .map(|n| Frame::new(n, frame_offset, Frame::DEFAULT_PADDING))
                    .transpose()
                    .context("invalid frame")?,
                timecode: timecode
                    .map(|tc| Timecode::parse(&tc, fps))
                    .transpose()
                    .context("invalid timecode")?,
                date: date.is_some(),
            };

            info!(?input, ?output, "starting burn-in");
            burn(&input, &output, config, &lines, logo.as_deref(), (x, y))
        }
    }
}

fn frame_from_json(json: &str) -> Result<Frame> {
    let map: Map<String, Value> =
        serde_json::from_str(json).context("frame JSON must be an object")?;
    Frame::from_mapping(&map).context("invalid frame mapping")
}

/// Text items for one burn-in, drawn top to bottom in this order.
struct BurnLines {
    text: Option<String>,
    frame: Option<Frame>,
    timecode: Option<Timecode>,
    date: bool,
}

fn burn(
    input: &Path,
    output: &Path,
    config: OverlayConfig,
    lines: &BurnLines,
    logo: Option<&Path>,
    origin: (Option<u32>, Option<u32>),
) -> Result<()> {
    let (width, height) = overlay::source_dimensions(input)
        .with_context(|| format!("failed to read dimensions of {}", input.display()))?;

    let font = config.font_path.as_deref().and_then(render::load_font);
    if font.is_none() {
        warn!("no usable font, text will be skipped");
    }

    let mut overlay = Overlay::new(ImageSurface::new(width, height, font), config);
    let (margin_x, margin_y) = overlay.margin();
    let x = origin.0.unwrap_or(margin_x);
    let mut y = origin.1.unwrap_or(margin_y);

    if let Some(text) = &lines.text {
        overlay.draw_text(x, y, text);
        y = overlay.next_line(y);
    }
    if let Some(frame) = &lines.frame {
        overlay.draw_frame(x, y, frame);
        y = overlay.next_line(y);
    }
    if let Some(timecode) = &lines.timecode {
        overlay.draw_timecode(x, y, timecode);
        y = overlay.next_line(y);
    }
    if lines.date {
        overlay.draw_date(x, y).context("failed to format date")?;
    }

    if let Some(path) = logo {
        let logo = render::load_logo(path)?;
        let logo_x = width.saturating_sub(logo.width().saturating_add(margin_x));
        overlay.draw_logo(logo_x, margin_y, &logo);
    }

    overlay.into_surface().save(output)?;
    info!(?output, ?logo, "burn-in complete");
    Ok(())
}
