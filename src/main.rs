//! Replays a scripted touch gesture through the transition engine.

#[macro_use]
extern crate tracing;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use serde::Deserialize;
use swipestate::animation::Clock;
use swipestate::input::{GestureSignal, SwipeTracker};
use swipestate::logging::TracingDispatcher;
use swipestate::policy::TouchEnvironment;
use swipestate::router::{GestureRouter, LayoutMode, TouchEvent};
use swipestate::state::{
    DiscoveryHints, StateChangeListener, StateManager, TransitionGeometry, UiState,
};
use swipestate::transition::{
    AnimatorPlan, ControllerConfig, ItemId, LongSwipe, TransitionCx, TransitionHost,
};
use swipestate_config::Config;
use tracing_subscriber::EnvFilter;

/// Settles still running after this much idle time are reported as stuck.
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gesture script (JSON).
    script: PathBuf,
    /// Path to config file (default: built-in defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Layout the gesture happens in.
    #[arg(short, long, value_enum, default_value_t = LayoutMode::Portrait)]
    layout: LayoutMode,
    /// Interval between simulated frames, in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct Script {
    #[serde(default)]
    start_state: ScriptState,
    #[serde(default)]
    geometry: ScriptGeometry,
    #[serde(default)]
    environment: ScriptEnvironment,
    /// Item that swiping down from the overview launches.
    #[serde(default)]
    focused_item: Option<u64>,
    events: Vec<ScriptEvent>,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
enum ScriptState {
    #[default]
    Normal,
    Overview,
    AllItems,
}

impl From<ScriptState> for UiState {
    fn from(state: ScriptState) -> Self {
        match state {
            ScriptState::Normal => UiState::Normal,
            ScriptState::Overview => UiState::Overview,
            ScriptState::AllItems => UiState::AllItems,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default, deny_unknown_fields)]
struct ScriptGeometry {
    vertical_shift_range: f64,
    horizontal_shift_range: f64,
    overview_swipe_height: f64,
}

impl Default for ScriptGeometry {
    fn default() -> Self {
        Self {
            vertical_shift_range: 1000.,
            horizontal_shift_range: 600.,
            overview_swipe_height: 250.,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
#[serde(default, deny_unknown_fields)]
struct ScriptEnvironment {
    blocking_overlay: bool,
    list_should_move: bool,
    /// Touches below this y coordinate are below the overview content.
    overview_content_bottom: Option<f64>,
}

impl TouchEnvironment for ScriptEnvironment {
    fn has_blocking_overlay(&self) -> bool {
        self.blocking_overlay
    }

    fn list_container_should_move(&self, _signal: &GestureSignal) -> bool {
        self.list_should_move
    }

    fn is_below_overview_content(&self, signal: &GestureSignal) -> bool {
        self.overview_content_bottom
            .is_some_and(|bottom| signal.position > bottom)
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ScriptEvent {
    Down {
        time_ms: u64,
        x: f64,
        y: f64,
        /// Whether the touch starts on the system edge (bottom bar or navigation bar).
        #[serde(default)]
        edge: bool,
        /// Whether the touch continues a swipe up from an app that already passed the overview.
        #[serde(default)]
        from_app: bool,
    },
    Move {
        time_ms: u64,
        x: f64,
        y: f64,
    },
    Up {
        time_ms: u64,
    },
    Cancel {
        time_ms: u64,
    },
    /// Lets frames run without touching anything.
    Wait {
        time_ms: u64,
    },
}

impl ScriptEvent {
    fn time(&self) -> Duration {
        let ms = match *self {
            ScriptEvent::Down { time_ms, .. }
            | ScriptEvent::Move { time_ms, .. }
            | ScriptEvent::Up { time_ms }
            | ScriptEvent::Cancel { time_ms }
            | ScriptEvent::Wait { time_ms } => time_ms,
        };
        Duration::from_millis(ms)
    }
}

struct SimulatedHost {
    geometry: TransitionGeometry,
    focused_item: Option<ItemId>,
    swipe_down_launch: bool,
    last_fraction: Option<f64>,
}

impl TransitionHost for SimulatedHost {
    fn geometry(&self) -> TransitionGeometry {
        self.geometry
    }

    fn apply_fraction(&mut self, plan: &AnimatorPlan, fraction: f64) {
        if self.last_fraction == Some(fraction) {
            return;
        }
        self.last_fraction = Some(fraction);

        let shown = match plan {
            AnimatorPlan::States { from, to, .. } => format!("{from} -> {to}"),
            AnimatorPlan::LaunchItem(item) => format!("launch {}", item.0),
            AnimatorPlan::Empty => String::from("nothing"),
        };
        trace!("{shown} at {fraction:.3}");
    }

    fn focused_item(&self) -> Option<ItemId> {
        self.focused_item
    }

    fn swipe_down_launches_item(&self) -> bool {
        self.swipe_down_launch && self.focused_item.is_some()
    }

    fn finish_item_launch(&mut self, item: ItemId, success: bool) {
        let outcome = if success { "launched" } else { "abandoned" };
        println!("item {}: {outcome}", item.0);
    }

    fn show_overview_hint(&mut self) {
        println!("overview hint shown");
    }

    fn enable_swipe_down_launch(&mut self) {
        self.swipe_down_launch = true;
    }
}

/// Prints every commit with the time it happened at.
struct CommitPrinter {
    clock: Clock,
}

impl StateChangeListener for CommitPrinter {
    fn on_state_transition_start(&mut self, target: UiState) {
        println!(
            "{:>6}ms  transition towards {target}",
            self.clock.now_unadjusted().as_millis()
        );
    }

    fn on_state_committed(&mut self, state: UiState, previous: UiState) {
        println!(
            "{:>6}ms  committed {state} (was {previous})",
            self.clock.now_unadjusted().as_millis()
        );
    }
}

/// Turns absolute touch coordinates into per-axis signals.
struct TouchTracker {
    last: (f64, f64),
    horizontal: SwipeTracker,
    vertical: SwipeTracker,
}

impl TouchTracker {
    fn new(x: f64, y: f64, time: Duration) -> Self {
        let mut horizontal = SwipeTracker::new();
        let mut vertical = SwipeTracker::new();
        horizontal.push(0., time);
        vertical.push(0., time);

        Self {
            last: (x, y),
            horizontal,
            vertical,
        }
    }

    fn push(&mut self, x: f64, y: f64, time: Duration) {
        self.horizontal.push(x - self.last.0, time);
        self.vertical.push(y - self.last.1, time);
        self.last = (x, y);
    }

    fn moved(&self) -> TouchEvent {
        TouchEvent {
            horizontal: GestureSignal::moved(self.horizontal.pos(), self.horizontal.velocity())
                .at(self.last.0),
            vertical: GestureSignal::moved(self.vertical.pos(), self.vertical.velocity())
                .at(self.last.1),
        }
    }

    fn released(&self) -> TouchEvent {
        let signal = |tracker: &SwipeTracker, position| {
            GestureSignal::released(tracker.pos(), tracker.velocity(), tracker.is_fling())
                .at(position)
        };

        TouchEvent {
            horizontal: signal(&self.horizontal, self.last.0),
            vertical: signal(&self.vertical, self.last.1),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let directives = std::env::var("RUST_LOG").unwrap_or_else(|_| "swipestate=debug".to_owned());
    let env_filter = EnvFilter::builder().parse_lossy(directives);
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(env_filter)
        .init();

    let cli = Cli::parse();
    ensure!(cli.frame_ms > 0, "frame interval must be positive");

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .map_err(|err| anyhow::anyhow!("{err:?}"))
            .context("error loading config")?,
        None => Config::default(),
    };
    let script = load_script(&cli.script)?;

    replay(&cli, &config, &script);
    Ok(())
}

fn load_script(path: &Path) -> anyhow::Result<Script> {
    let text = fs::read_to_string(path).with_context(|| format!("error reading {path:?}"))?;
    let script: Script =
        serde_json::from_str(&text).with_context(|| format!("error parsing {path:?}"))?;
    debug!("loaded {} events from {path:?}", script.events.len());
    Ok(script)
}

fn replay(cli: &Cli, config: &Config, script: &Script) {
    let _span = tracy_client::span!("replay");

    let mut clock = Clock::with_time(Duration::ZERO);
    clock.set_rate(1. / config.animations.slowdown.0.max(0.001));
    clock.set_complete_instantly(config.animations.off);

    let mut states = StateManager::new(script.start_state.into());
    states.add_listener(Box::new(DiscoveryHints::new(!config.gestures.disable_swipe_up)));
    states.add_listener(Box::new(CommitPrinter {
        clock: clock.clone(),
    }));

    let mut host = SimulatedHost {
        geometry: TransitionGeometry {
            vertical_shift_range: script.geometry.vertical_shift_range,
            horizontal_shift_range: script.geometry.horizontal_shift_range,
            overview_swipe_height: script.geometry.overview_swipe_height,
        },
        focused_item: script.focused_item.map(ItemId),
        swipe_down_launch: script.focused_item.is_some(),
        last_fraction: None,
    };
    let mut events = TracingDispatcher;
    let mut cx = TransitionCx {
        states: &mut states,
        host: &mut host,
        env: &script.environment,
        events: &mut events,
    };

    let mut router = GestureRouter::for_layout(cli.layout, &config.gestures, &clock);
    let controller_config = ControllerConfig::from(&config.gestures);
    let frame = Duration::from_millis(cli.frame_ms);
    let mut touch = None;
    let mut long_swipe: Option<LongSwipe> = None;

    for event in &script.events {
        let mut driven = Driven {
            router: &mut router,
            long_swipe: &mut long_swipe,
        };
        run_frames(&mut driven, &mut clock, &mut cx, frame, event.time());
        clock.set_unadjusted(event.time());

        let dragging_long_swipe = long_swipe
            .as_ref()
            .is_some_and(|swipe| swipe.plan().is_none());

        match *event {
            ScriptEvent::Down {
                x, y, from_app: true, ..
            } => {
                if let Some(previous) = long_swipe.take() {
                    previous.destroy(&mut cx);
                }
                touch = Some(TouchTracker::new(x, y, event.time()));
                long_swipe = Some(LongSwipe::start(&clock, &controller_config, &mut cx));
            }
            ScriptEvent::Move { x, y, .. } if dragging_long_swipe => {
                let (Some(tracker), Some(swipe)) = (&mut touch, &mut long_swipe) else {
                    continue;
                };
                tracker.push(x, y, event.time());
                swipe.on_move(tracker.vertical.pos(), &mut cx);
            }
            ScriptEvent::Up { .. } if dragging_long_swipe => {
                let (Some(tracker), Some(swipe)) = (touch.take(), &mut long_swipe) else {
                    continue;
                };
                let vertical = &tracker.vertical;
                if swipe.end(vertical.velocity(), vertical.is_fling(), &mut cx) {
                    long_swipe = None;
                }
            }
            ScriptEvent::Cancel { .. } if dragging_long_swipe => {
                touch = None;
                if let Some(swipe) = long_swipe.take() {
                    swipe.destroy(&mut cx);
                }
            }
            ScriptEvent::Down { x, y, edge, .. } => {
                let tracker = TouchTracker::new(x, y, event.time());
                let mut down = TouchEvent {
                    horizontal: GestureSignal::down(x),
                    vertical: GestureSignal::down(y),
                };
                if edge {
                    down.horizontal.edge_origin = true;
                    down.vertical.edge_origin = true;
                }

                if !router.on_gesture_start(&down, &mut cx) {
                    debug!("touch at ({x}, {y}) not taken");
                }
                touch = Some(tracker);
            }
            ScriptEvent::Move { x, y, .. } => {
                let Some(tracker) = &mut touch else {
                    warn!("move without a touch down, ignoring");
                    continue;
                };
                tracker.push(x, y, event.time());
                router.on_gesture_move(&tracker.moved(), &mut cx);
            }
            ScriptEvent::Up { .. } => {
                let Some(tracker) = touch.take() else {
                    warn!("release without a touch down, ignoring");
                    continue;
                };
                router.on_gesture_end(&tracker.released(), &mut cx);
            }
            ScriptEvent::Cancel { .. } => {
                touch = None;
                router.cancel(&mut cx);
            }
            ScriptEvent::Wait { .. } => (),
        }
    }

    let end = clock.now_unadjusted() + SETTLE_LIMIT;
    let mut driven = Driven {
        router: &mut router,
        long_swipe: &mut long_swipe,
    };
    run_frames(&mut driven, &mut clock, &mut cx, frame, end);
    if driven.are_animations_ongoing() {
        warn!("transition still settling after {SETTLE_LIMIT:?}");
    }

    println!("final state: {}", cx.states.state());
}

/// Everything that animates on its own once the finger lifts.
struct Driven<'a> {
    router: &'a mut GestureRouter,
    long_swipe: &'a mut Option<LongSwipe>,
}

impl Driven<'_> {
    fn are_animations_ongoing(&self) -> bool {
        self.router.are_animations_ongoing()
            || self.long_swipe.as_ref().is_some_and(LongSwipe::is_running)
    }

    fn advance_animations(&mut self, cx: &mut TransitionCx) {
        self.router.advance_animations(cx);

        if let Some(swipe) = self.long_swipe.as_mut() {
            if swipe.advance_animations(cx) {
                *self.long_swipe = None;
            }
        }
    }
}

/// Ticks frames up to `until` while some transition is settling.
fn run_frames(
    driven: &mut Driven,
    clock: &mut Clock,
    cx: &mut TransitionCx,
    frame: Duration,
    until: Duration,
) {
    while driven.are_animations_ongoing() {
        let next = clock.now_unadjusted() + frame;
        if next > until {
            break;
        }

        clock.set_unadjusted(next);
        driven.advance_animations(cx);
    }
}
