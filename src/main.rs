//! Graffiti Wash entry point
//!
//! The browser build is driven from JavaScript through `graffiti_wash::web`.
//! Natively this runs a headless autoplay session and prints the result.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::io::Write;

    use anyhow::{Context, Result, bail};
    use clap::Parser;
    use graffiti_wash::consts::LEVEL_COUNT;
    use graffiti_wash::sim::{GameEvent, GamePhase, Session, TickInput, tick};
    use graffiti_wash::{MemoryProgress, PersistentProgress, ProgressStore, Settings};

    /// Simulated frame rate for headless runs
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 600;

    /// Play a level on autoplay and print how it went
    #[derive(Debug, Parser)]
    #[command(name = "graffiti-wash", version, about)]
    pub struct Args {
        /// Level to play (1-10)
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(LEVEL_COUNT)))]
        pub level: u32,

        /// RNG seed; the same seed replays the same questions
        #[arg(short, long, default_value_t = 0x6772_6166)]
        pub seed: u64,

        /// Record the result in the saved progress (level must be unlocked there)
        #[arg(long)]
        pub save: bool,
    }

    /// One printable line per interesting event
    fn describe(event: &GameEvent) -> Option<String> {
        match event {
            GameEvent::QuestionStarted { number, text } => Some(format!("Q{number}: {text}")),
            GameEvent::QuestionSolved { score_gained, .. } => Some(format!("  solved (+{score_gained})")),
            GameEvent::TransitionStarted { praise: Some(p), .. } => Some(format!("  {} {}", p.text, p.sub)),
            GameEvent::QuestionFailed { correct } => Some(format!("  failed, the answer was {correct}")),
            GameEvent::LevelComplete {
                level,
                score,
                time_secs,
                stars,
            } => Some(format!(
                "Level {level} complete: {score} points in {time_secs:.1}s, {stars} stars"
            )),
            _ => None,
        }
    }

    fn report(out: &mut impl Write, event: &GameEvent) -> Result<()> {
        match describe(event) {
            Some(line) => writeln!(out, "{line}")?,
            None => log::debug!("{:?}", event),
        }
        Ok(())
    }

    /// Play one level on autoplay; returns the final phase
    pub fn run<S: ProgressStore>(mut session: Session<S>, level: u32, out: &mut impl Write) -> Result<GamePhase> {
        let first = session
            .start_level(level)
            .with_context(|| format!("cannot start level {level}"))?;
        report(out, &first)?;

        let input = TickInput {
            autoplay: true,
            ..Default::default()
        };
        for _ in 0..MAX_FRAMES {
            for event in tick(&mut session, &input, FRAME_DT) {
                report(out, &event)?;
            }
            if session.phase.is_terminal() {
                break;
            }
        }
        Ok(session.phase)
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();
        let settings = Settings::load();
        log::info!("Graffiti Wash (headless) seed {}", args.seed);

        let mut out = std::io::stdout().lock();
        let phase = if args.save {
            let session = Session::new(PersistentProgress::load(), settings, args.seed, 1280.0, 720.0);
            run(session, args.level, &mut out)?
        } else {
            let session = Session::new(MemoryProgress::unlocked_through(args.level), settings, args.seed, 1280.0, 720.0);
            run(session, args.level, &mut out)?
        };

        if phase != GamePhase::LevelComplete {
            bail!("level {} ended in {:?}", args.level, phase);
        }
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is graffiti_wash::web::start, this is just to satisfy the compiler
}
