//! Renders its input as a banner in the given FIGfont.
//!
//! Set `RUST_LOG` to see more than warnings about the font.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use figtext::font::Font;
use figtext::render::{PrintDirection, Renderer, layout};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let font = cli.font()?;
    let output = cli
        .renderer(&font)
        .render(&cli.input)
        .with_context(|| format!("cannot render {:?}", cli.input))?;
    println!("{output}");
    Ok(())
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Text to render
    input: String,
    /// Path to an `.flf` font
    #[arg(short = 'f', long)]
    font: PathBuf,
    /// Print direction, overriding the font's default
    #[arg(short = 'd', long)]
    direction: Option<Direction>,
    /// Raw full layout value, overriding the font's default
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    layout: Option<i32>,
}

impl Cli {
    fn font(&self) -> Result<Font> {
        let path = self.font.display();
        let file = File::open(&self.font).with_context(|| format!("cannot open {path}"))?;
        let font =
            Font::from_reader(BufReader::new(file)).with_context(|| format!("bad font {path}"))?;
        log::debug!("loaded {} FIGcharacters from {path}", font.len());
        Ok(font)
    }

    fn renderer<'font>(&self, font: &'font Font) -> Renderer<'font> {
        let mut renderer = Renderer::new(font);
        if let Some(direction) = self.direction {
            renderer = renderer.print_direction(direction.into());
        }
        if let Some(raw) = self.layout {
            renderer = renderer.layout(layout::from_raw(raw));
        }
        renderer
    }
}

#[derive(Clone, Copy, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum Direction {
    LeftToRight,
    RightToLeft,
}

impl From<Direction> for PrintDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::LeftToRight => Self::LeftToRight,
            Direction::RightToLeft => Self::RightToLeft,
        }
    }
}
