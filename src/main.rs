use std::error::Error;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use doalist_lib::capability::{
    SpeechRecognizer, SpeechSynthesizer, ToneEmitter, Transcript, Utterance, Waveform,
};
use doalist_lib::config::RuntimeConfig;
use doalist_lib::error::CapabilityError;
use doalist_lib::keys::KeyPress;
use doalist_lib::logging::init_logging;
use doalist_lib::scheduler::TokioScheduler;
use doalist_lib::storage::FileStore;
use doalist_lib::{App, AppEvent, AppSnapshot, Capabilities, Category, Priority, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

const HELP: &str = "\
commands:
  add [!low|!medium|!high] [#personal|#work|#school] <text>
  toggle <id> | remove <id> | edit <id> <text>
  say <utterance>       run a voice command (\"add task: ...\", \"focus mode\", \"read tasks\")
  listen | stop         start or stop the recognizer
  key <combo>           e.g. key ctrl+f, key space, key esc
  focus | next | prev | done | drop | exit
  theme | panel | dismiss | set <json> | chime <label> | voicehelp
  show | help | quit";

struct ConsoleSpeech;

impl SpeechSynthesizer for ConsoleSpeech {
    fn speak(&mut self, utterance: &Utterance) -> Result<(), CapabilityError> {
        println!("  (speech {}) {}", utterance.language_code, utterance.text);
        Ok(())
    }

    fn cancel(&mut self) {}
}

/// Typed `say` lines stand in for recognition results.
struct ConsoleRecognizer;

impl SpeechRecognizer for ConsoleRecognizer {
    fn start(&mut self, language_code: &'static str) -> Result<(), CapabilityError> {
        println!("  (listening {language_code})");
        Ok(())
    }

    fn stop(&mut self) {
        println!("  (stopped listening)");
    }
}

struct ConsoleTones;

impl ToneEmitter for ConsoleTones {
    fn play(
        &self,
        frequency_hz: f32,
        duration_sec: f32,
        waveform: Waveform,
    ) -> Result<(), CapabilityError> {
        log::debug!("tone {frequency_hz}Hz {waveform:?} {duration_sec}s");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = RuntimeConfig::from_env();
    let _logger = match init_logging(&config) {
        Ok(handle) => Some(handle),
        Err(error) => {
            eprintln!("file logging disabled: {error}");
            None
        }
    };

    let store = FileStore::new(config.data_dir.clone());
    store.ensure_dirs()?;

    let (events_tx, mut events_rx) = unbounded_channel();
    let caps = Capabilities {
        store: Box::new(store),
        recognizer: Box::new(ConsoleRecognizer),
        synthesizer: Box::new(ConsoleSpeech),
        tones: Arc::new(ConsoleTones),
        scheduler: Arc::new(TokioScheduler::new(tokio::runtime::Handle::current())),
    };
    let mut app = App::load(caps, events_tx.clone());
    let ui = app.subscribe();
    print_snapshot(&app.snapshot());
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !run_line(&mut app, line.trim(), &events_tx) {
                    break;
                }
            }
            Some(event) = events_rx.recv() => app.handle(event),
        }
        render(&ui);
    }
    log::info!("shutting down");
    Ok(())
}

/// Returns `false` when the driver should exit.
fn run_line(app: &mut App, line: &str, events: &UnboundedSender<AppEvent>) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match command {
        "" => {}
        "quit" | "q" => return false,
        "help" => println!("{HELP}"),
        "show" => print_snapshot(&app.snapshot()),
        "add" => {
            let (priority, category, text) = parse_add(rest);
            app.add_task(&text, priority, category);
        }
        "toggle" => {
            app.toggle_task(rest);
        }
        "remove" => {
            app.remove_task(rest);
        }
        "edit" => {
            let (id, text) = rest.split_once(' ').unwrap_or((rest, ""));
            app.edit_task(id, text);
        }
        "say" => {
            if !app.start_listening() && !app.snapshot().listening {
                println!("  voice input unavailable");
                return true;
            }
            for transcript in [Transcript::interim(rest), Transcript::final_result(rest)] {
                let _ = events.send(AppEvent::Transcript(transcript));
            }
            let _ = events.send(AppEvent::ListeningEnded);
        }
        "listen" => {
            if !app.start_listening() {
                println!("  voice input unavailable");
            }
        }
        "stop" => app.stop_listening(),
        "key" => match rest.parse::<KeyPress>() {
            Ok(press) => {
                if app.handle_key(press).is_none() {
                    println!("  no binding for {rest}");
                }
            }
            Err(error) => println!("  {error}"),
        },
        "focus" => {
            if !app.enter_focus() {
                println!("  nothing pending to focus on");
            }
        }
        "next" => app.focus_next(),
        "prev" => app.focus_previous(),
        "done" => {
            app.complete_focused();
        }
        "drop" => {
            app.remove_focused();
        }
        "exit" => app.exit_focus(),
        "theme" => {
            app.toggle_theme();
        }
        "panel" => {
            app.toggle_settings_panel();
        }
        "dismiss" => app.dismiss_notification(),
        "set" => {
            if let Err(error) = app.update_settings_json(rest) {
                println!("  {error}");
            }
        }
        "chime" => app.preview_feedback(rest),
        "voicehelp" => {
            app.speak_voice_help();
        }
        other => println!("  unknown command `{other}`; try `help`"),
    }
    true
}

fn parse_add(input: &str) -> (Priority, Category, String) {
    let mut priority = Priority::default();
    let mut category = Category::default();
    let mut words = Vec::new();
    for word in input.split_whitespace() {
        if let Some(parsed) = word.strip_prefix('!').and_then(|p| p.parse().ok()) {
            priority = parsed;
        } else if let Some(parsed) = word.strip_prefix('#').and_then(|c| c.parse().ok()) {
            category = parsed;
        } else {
            words.push(word);
        }
    }
    (priority, category, words.join(" "))
}

fn render(ui: &Receiver<UiEvent>) {
    let mut latest = None;
    for event in ui.try_iter() {
        match event {
            UiEvent::StateUpdated(snapshot) => latest = Some(snapshot),
            UiEvent::FocusAddTaskInput => println!("  (add-task input focused)"),
            UiEvent::Escape => println!("  (escape)"),
            UiEvent::ShowHelp => println!("{HELP}"),
        }
    }
    if let Some(snapshot) = latest {
        print_snapshot(&snapshot);
    }
}

fn print_snapshot(snapshot: &AppSnapshot) {
    let t = &snapshot.translation;
    println!(
        "== {} == [{:?} / {:?}]{}",
        t.title,
        snapshot.settings.theme,
        snapshot.settings.language,
        if snapshot.settings_open { " (settings open)" } else { "" }
    );
    if snapshot.pending.is_empty() && snapshot.completed.is_empty() {
        println!("  {}", t.no_tasks);
    }
    for task in snapshot.pending.iter().chain(&snapshot.completed) {
        println!(
            "  [{}] {} {} ({}, {})",
            if task.completed { "x" } else { " " },
            task.id,
            task.text,
            task.priority,
            task.category
        );
    }
    if let Some(focus) = &snapshot.focus {
        println!("  >> {}", focus.announcement);
    }
    if snapshot.listening {
        println!("  ... {}", snapshot.live_transcript);
    }
    if let Some(notification) = &snapshot.notification {
        println!("  * [{}] {}", notification.kind.as_str(), notification.message);
    }
}
