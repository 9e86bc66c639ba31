use clap::Parser;
use conductor::messaging::{ForwardingListener, create_event_channel};
use conductor::{
    ClockSource, Conductor, ConductorConfig, HitJudge, MusicalPosition, NoteValue, SampleClock,
    Session, bare,
};
use ringbuf::traits::Consumer;
use std::path::PathBuf;
use std::process::ExitCode;

// Only beat-unit events are forwarded; drained after every simulated buffer
const EVENT_RINGBUFFER_CAPACITY: usize = 256;

/// Simulate audio playback and print the conductor's musical events.
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(about = "Musical-time scheduler demo")]
struct Args {
    /// Configuration file (.ron or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured tempo
    #[arg(long)]
    bpm: Option<f64>,

    /// Seconds of playback to simulate
    #[arg(long, default_value = "4.0", value_parser = parse_seconds)]
    seconds: f64,

    /// Sample rate of the simulated audio device
    #[arg(long, default_value = "48000")]
    sample_rate: f64,

    /// Frames per simulated audio callback
    #[arg(long, default_value = "512", value_parser = clap::value_parser!(u64).range(1..))]
    buffer_size: u64,
}

fn parse_seconds(value: &str) -> Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|e| format!("`{}` is not a number: {}", value, e))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("`{}` must be a finite, non-negative duration", value));
    }
    Ok(seconds)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ConductorConfig::load(path)?,
        None => ConductorConfig::default(),
    };
    if let Some(bpm) = args.bpm {
        config.bpm = bpm;
    }
    config.validate()?;

    let clock = SampleClock::new(args.sample_rate)?;
    let audio_clock = clock.clone();

    let mut session = Session::new();
    let conductor = session.install(Conductor::from_config(&config, clock)?);

    println!(
        "Simulating {:.1}s at {} BPM, {}",
        args.seconds, config.bpm, config.time_signature
    );

    // Beat events go through the ring buffer, as they would to a UI thread
    let beat_unit = config.time_signature.beat_unit;
    let (producer, mut consumer) = create_event_channel(EVENT_RINGBUFFER_CAPACITY);
    conductor.register(beat_unit, ForwardingListener::new(beat_unit, producer), false);

    conductor.register(
        NoteValue::Whole,
        |position: &MusicalPosition| println!("  -- whole note, measure {}", position.measure),
        false,
    );
    conductor.register(NoteValue::Half, bare(|| println!("  (first half note)")), true);
    conductor.register_repeating(
        NoteValue::Eighth,
        |position: &MusicalPosition| {
            println!(
                "  eighth countdown {} ({:.0}% done)",
                position.remaining_executions,
                position.execution_progress() * 100.0
            )
        },
        4,
    )?;

    let judge = HitJudge::default();
    let buffer_size = args.buffer_size as usize;
    let total_frames = (args.seconds * args.sample_rate) as usize;
    let mut frames = 0;

    while frames < total_frames {
        // Audio callback advances the clock, the frame driver ticks
        audio_clock.advance(buffer_size);
        frames += buffer_size;
        session.tick();

        for event in consumer.pop_iter() {
            println!(
                "{:>5.3}s  {} beat {}:{}  (a tap now: {})",
                audio_clock.current_time_seconds(),
                event.note,
                event.position.measure,
                event.position.beat,
                judge.judge(event.position.beat_fraction)
            );
        }
    }

    if let Some(conductor) = session.shutdown() {
        println!(
            "Stopped at measure {}, beat {}",
            conductor.measure(),
            conductor.beat()
        );
    }
    Ok(())
}
