use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::mpsc;

use anyhow::Context;
use jobpulse_core::{update, AppState, Msg};
use jobpulse_engine::EngineHandle;
use pulse_logging::{pulse_debug, pulse_info, pulse_warn};

use super::config::{self, CONFIG_FILENAME};
use super::effects::EffectRunner;
use super::input::{self, AppInput, HELP};
use super::logging;
use super::ui::TerminalSurface;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Msg(Msg),
    Line(String),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = config::load(Path::new(CONFIG_FILENAME)).context("loading configuration")?;
    logging::initialize(config.log_destination, config.log_level());
    pulse_info!("Starting JobPulse against {}", config.api_base);

    let engine = EngineHandle::new(config.engine_settings()).context("starting engine")?;
    engine.check_health();

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(engine, event_tx.clone());
    input::spawn_reader(event_tx.clone());

    let mut surface = TerminalSurface::new(io::stdout());
    surface.notice(HELP)?;

    let mut state = AppState::with_settings(config.dashboard_settings());
    event_tx
        .send(AppEvent::Msg(Msg::Startup))
        .context("queueing startup")?;

    while let Ok(event) = event_rx.recv() {
        let msg = match event {
            AppEvent::Msg(msg) => msg,
            AppEvent::Line(line) => match input::parse_command(&line, state.filters()) {
                AppInput::Msg(msg) => msg,
                AppInput::Snapshot(path) => {
                    let written = File::create(&path).and_then(|file| surface.write_snapshot(file));
                    match written {
                        Ok(()) => surface.notice(&format!("wrote {}", path.display()))?,
                        Err(err) => {
                            pulse_warn!("Snapshot to {} failed: {}", path.display(), err);
                            surface.notice(&format!("could not write {}: {err}", path.display()))?;
                        }
                    }
                    continue;
                }
                AppInput::Help => {
                    surface.notice(HELP)?;
                    continue;
                }
                AppInput::Invalid(reason) => {
                    surface.notice(&reason)?;
                    continue;
                }
                AppInput::Empty => continue,
                AppInput::Quit => break,
            },
            AppEvent::InputClosed => break,
        };

        pulse_debug!("Dispatch {:?}", msg);
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);
        for command in state.take_ui_commands() {
            surface.apply(&command)?;
        }
    }

    pulse_info!(
        "Shutting down with {} charts live, phase {:?}",
        surface.live_charts(),
        state.phase()
    );
    Ok(())
}
