//! Tick loop thread: steps the simulation at a fixed interval and hands each
//! frame to a sink.
//!
//! The simulation is moved into the thread and owned there. Control arrives
//! over an `mpsc` channel; the wait between ticks is a `recv_timeout` on that
//! channel, so a `Shutdown` (or dropping the sender) ends the loop without
//! waiting out the interval.

use std::io;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use pursuit_core::error::SimResult;
use pursuit_sim::Simulation;

use crate::sink::FrameSink;

/// Commands sent to the loop thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    /// Stop ticking; the loop keeps waiting for commands.
    Pause,
    Resume,
    /// End the loop.
    Shutdown,
}

/// How the loop paces itself and when it stops on its own.
#[derive(Debug, Clone, Copy)]
pub struct LoopSettings {
    pub tick_interval: Duration,
    /// Stop after this many ticks. `None` runs until shut down.
    pub max_ticks: Option<u64>,
}

/// Summary returned when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub ticks: u64,
    pub respawns: u64,
}

/// Spawn the loop on its own thread.
///
/// Returns the command sender and the thread handle; joining yields the
/// loop's report, or the error that stopped it.
pub fn spawn_sim_loop<S>(
    mut sim: Simulation,
    mut sink: S,
    settings: LoopSettings,
) -> io::Result<(mpsc::Sender<LoopCommand>, JoinHandle<SimResult<LoopReport>>)>
where
    S: FrameSink + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();

    let handle = std::thread::Builder::new()
        .name("pursuit-sim-loop".into())
        .spawn(move || run_sim_loop(&mut sim, &mut sink, &cmd_rx, settings))?;

    Ok((cmd_tx, handle))
}

/// The loop. Runs until `Shutdown`, channel disconnect, the tick limit, or a
/// tick error.
pub fn run_sim_loop<S: FrameSink>(
    sim: &mut Simulation,
    sink: &mut S,
    cmd_rx: &Receiver<LoopCommand>,
    settings: LoopSettings,
) -> SimResult<LoopReport> {
    let mut report = LoopReport::default();
    let mut paused = false;
    let mut next_tick_time = Instant::now();

    info!(interval = ?settings.tick_interval, max_ticks = ?settings.max_ticks, "sim loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(cmd) => {
                    if apply(cmd, &mut paused).is_break() {
                        return Ok(finish(report, "shutdown requested"));
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Ok(finish(report, "command channel closed"));
                }
            }
        }

        if settings.max_ticks.is_some_and(|max| report.ticks >= max) {
            return Ok(finish(report, "tick limit reached"));
        }

        // 2. Advance one tick and hand the frame off
        if !paused {
            let frame = sim.tick().inspect_err(|e| error!(error = %e, "tick failed"))?;
            report.ticks += 1;
            report.respawns += frame.events.len() as u64;

            if let Err(e) = sink.present(&frame) {
                warn!(error = %e, tick = frame.time.tick, "frame sink failed");
            }
        }

        // 3. Wait for the next tick, still listening for commands
        next_tick_time += settings.tick_interval;
        let now = Instant::now();
        if now > next_tick_time + settings.tick_interval * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
            continue;
        }
        loop {
            let now = Instant::now();
            if now >= next_tick_time {
                break;
            }
            match cmd_rx.recv_timeout(next_tick_time - now) {
                Ok(cmd) => {
                    if apply(cmd, &mut paused).is_break() {
                        return Ok(finish(report, "shutdown requested"));
                    }
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => {
                    return Ok(finish(report, "command channel closed"));
                }
            }
        }
    }
}

fn apply(cmd: LoopCommand, paused: &mut bool) -> ControlFlow<()> {
    match cmd {
        LoopCommand::Pause => *paused = true,
        LoopCommand::Resume => *paused = false,
        LoopCommand::Shutdown => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

fn finish(report: LoopReport, reason: &str) -> LoopReport {
    info!(ticks = report.ticks, respawns = report.respawns, reason, "sim loop stopped");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use pursuit_core::components::{Robot, Target};
    use pursuit_core::config::{Scenario, SimConfig};
    use pursuit_core::enums::ControllerKind;
    use pursuit_core::error::SimError;
    use pursuit_core::state::RenderFrame;
    use pursuit_core::types::Vec2;

    use crate::sink::NullSink;

    /// Collects frames where the test can see them.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<RenderFrame>>>);

    impl FrameSink for SharedSink {
        fn present(&mut self, frame: &RenderFrame) -> io::Result<()> {
            self.0.lock().unwrap().push(frame.clone());
            Ok(())
        }
    }

    fn seeded_scenario() -> Simulation {
        let mut scenario = Scenario::default();
        scenario.sim.seed = Some(3);
        Simulation::from_scenario(&scenario).unwrap()
    }

    fn fast(max_ticks: Option<u64>) -> LoopSettings {
        LoopSettings {
            tick_interval: Duration::from_millis(1),
            max_ticks,
        }
    }

    #[test]
    fn test_stops_at_tick_limit() {
        let sink = SharedSink::default();
        let (_tx, handle) = spawn_sim_loop(seeded_scenario(), sink.clone(), fast(Some(25))).unwrap();

        let report = handle.join().unwrap().unwrap();
        assert_eq!(report.ticks, 25);

        let frames = sink.0.lock().unwrap();
        assert_eq!(frames.len(), 25);
        assert_eq!(frames.last().unwrap().time.tick, 25);
        let respawns: usize = frames.iter().map(|f| f.events.len()).sum();
        assert_eq!(report.respawns, respawns as u64);
    }

    #[test]
    fn test_shutdown_stops_unbounded_loop() {
        let (tx, handle) = spawn_sim_loop(seeded_scenario(), NullSink, fast(None)).unwrap();
        std::thread::sleep(Duration::from_millis(30));
        tx.send(LoopCommand::Shutdown).unwrap();

        let report = handle.join().unwrap().unwrap();
        assert!(report.ticks > 0);
    }

    #[test]
    fn test_dropping_sender_stops_loop() {
        let settings = LoopSettings {
            tick_interval: Duration::from_secs(60),
            max_ticks: None,
        };
        let (tx, handle) = spawn_sim_loop(seeded_scenario(), NullSink, settings).unwrap();
        drop(tx);

        // Returns promptly despite the minute-long interval.
        let report = handle.join().unwrap().unwrap();
        assert!(report.ticks <= 1);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoopCommand::Pause).unwrap();
        tx.send(LoopCommand::Shutdown).unwrap();

        let mut sim = seeded_scenario();
        let report = run_sim_loop(&mut sim, &mut NullSink, &rx, fast(Some(10))).unwrap();
        assert_eq!(report.ticks, 0);
        assert_eq!(sim.time().tick, 0);
    }

    #[test]
    fn test_resume_after_pause() {
        let (tx, rx) = mpsc::channel();
        tx.send(LoopCommand::Pause).unwrap();
        let resumer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            tx.send(LoopCommand::Resume).unwrap();
            // Keep the channel open until the loop hits its limit.
            std::thread::sleep(Duration::from_millis(200));
        });

        let mut sim = seeded_scenario();
        let report = run_sim_loop(&mut sim, &mut NullSink, &rx, fast(Some(3))).unwrap();
        assert_eq!(report.ticks, 3);
        resumer.join().unwrap();
    }

    #[test]
    fn test_missing_target_ends_loop() {
        let mut sim = Simulation::new(SimConfig::seeded(1)).unwrap();
        sim.add(Robot::new(Vec2::ZERO, Vec2::X, ControllerKind::P).unwrap());

        let (_tx, rx) = mpsc::channel();
        let err = run_sim_loop(&mut sim, &mut NullSink, &rx, fast(None)).unwrap_err();
        assert!(matches!(err, SimError::MissingTarget));
    }

    #[test]
    fn test_sink_errors_do_not_stop_loop() {
        struct FailingSink;
        impl FrameSink for FailingSink {
            fn present(&mut self, _frame: &RenderFrame) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let mut sim = Simulation::new(SimConfig::seeded(1)).unwrap();
        sim.add(Target::new(Vec2::new(500.0, 500.0), 30.0).unwrap());
        let (_tx, rx) = mpsc::channel();
        let report = run_sim_loop(&mut sim, &mut FailingSink, &rx, fast(Some(5))).unwrap();
        assert_eq!(report.ticks, 5);
    }
}
