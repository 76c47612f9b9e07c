use clap::{Parser, Subcommand};
use clockwork::canvas::CairoCanvas;
use clockwork::chimes::{Chimes, Clip, FailurePolicy};
use clockwork::dial::Dial;
use clockwork::time::TimeSample;
use dudley::config;
use dudley::sys::clock::LocalClock;
use dudley::sys::server::SOCKET_PATH;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dudleyctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Resize the running clock.
    Diameter { pixels: f64 },
    /// Start the hands and chimes.
    Start,
    /// Stop the hands and chimes.
    Stop,
    /// Re-read the configuration file.
    Reload,
    /// Write the default configuration file if there is none.
    Init,
    /// Draw the clock into a PNG file.
    Render {
        output: PathBuf,
        #[arg(short, long)]
        diameter: Option<f64>,
        /// Time to show as HH:MM:SS; defaults to now.
        #[arg(short, long, value_parser = parse_time)]
        time: Option<TimeSample>,
    },
}

/// Renders without sound.
struct Mute;

impl Clip for Mute {
    fn play(&self) {}
    fn pause(&self) {}
    fn set_looping(&self, _looping: bool) {}
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Diameter { pixels } => send_command(&format!("diameter {pixels}")),
        Commands::Start => send_command("start"),
        Commands::Stop => send_command("stop"),
        Commands::Reload => send_command("reload"),
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Render {
            output,
            diameter,
            time,
        } => render(output, diameter, time),
    }
}

fn parse_time(s: &str) -> Result<TimeSample, String> {
    let parts = s
        .split(':')
        .map(|p| p.parse::<u32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    let sample = match parts[..] {
        [h, m] => TimeSample::from_24h(h, m, 0),
        [h, m, s] => TimeSample::from_24h(h, m, s),
        _ => return Err(format!("expected HH:MM[:SS], got '{s}'")),
    };
    sample.map_err(|e| e.to_string())
}

fn render(output: PathBuf, diameter: Option<f64>, time: Option<TimeSample>) -> anyhow::Result<()> {
    let config = config::load_or_default();
    let mut dial: Dial<Mute> = Dial::new(
        diameter.unwrap_or(config.diameter),
        config.face.into(),
        Chimes::silent(),
        FailurePolicy::Silence,
    )?;
    dial.start();
    match time {
        Some(t) => dial.tick(&|| t),
        None => dial.tick(&LocalClock),
    };

    // the hands layer clears itself, so it is drawn apart and laid on top
    let size = dial.diameter().ceil() as i32;
    let face = cairo::ImageSurface::create(cairo::Format::ARgb32, size, size)?;
    let hands = cairo::ImageSurface::create(cairo::Format::ARgb32, size, size)?;
    {
        let cr = cairo::Context::new(&hands)?;
        dial.draw_hands(&CairoCanvas::new(&cr))?;
    }
    {
        let cr = cairo::Context::new(&face)?;
        dial.draw_face(&CairoCanvas::new(&cr))?;
        cr.set_source_surface(&hands, 0.0, 0.0)?;
        cr.paint()?;
    }

    let mut file = fs_err::File::create(&output)?;
    face.write_to_png(&mut file)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to dudley at {}: {}. Is dudley running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_argument_parsing() {
        let t = parse_time("14:30:05").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (2, 30, 5));
        let t = parse_time("9:15").unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (9, 15, 0));
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
        assert!(parse_time("1:2:3:4").is_err());
    }
}
