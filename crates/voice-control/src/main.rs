//! Console harness for the voice-chess core: stdin stands in for the
//! microphone, each line is one utterance, `:` lines are board commands.

use std::io::{self, BufRead};

use anyhow::Result;
use shakmaty::Square;
use tracing_subscriber::EnvFilter;

use chess_session::ShakmatyOracle;
use voice_control::app::VoiceChess;
use voice_control::config::Config;
use voice_control::language::RecognitionLanguage;
use voice_control::listening::{RecognitionError, RecognitionStream, StreamEvent};

/// Stdin "microphone". The handle only tracks open/close so the lifecycle
/// rules still apply; utterances are injected by the read loop below.
struct ConsoleStream;

impl RecognitionStream for ConsoleStream {
    fn open(&mut self, _language: RecognitionLanguage) -> Result<(), RecognitionError> {
        Ok(())
    }
    fn close(&mut self) {}
}

type App = VoiceChess<ShakmatyOracle, ConsoleStream>;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = Config::from_env();
    let mut app = App::new(ShakmatyOracle::new(), ConsoleStream, config.language);
    app.start_listening();

    println!("voice-chess console — speak by typing, e.g. \"knight f3\"");
    println!(":click <square>  :undo  :undoall  :restart  :listen on|off  :lang <tag>  :state  :quit");
    render(&app);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Some(command) = input.strip_prefix(':') {
            if !dispatch(&mut app, command) {
                break;
            }
        } else if app.is_listening() {
            app.handle_stream_event(StreamEvent::Transcript(input.to_string()));
        } else {
            println!("(voice commands are off — :listen on)");
            continue;
        }
        render(&app);
    }
    app.stop_listening();
    Ok(())
}

/// Returns false when the loop should exit.
fn dispatch(app: &mut App, command: &str) -> bool {
    let mut parts = command.split_whitespace();
    match (parts.next().unwrap_or(""), parts.next()) {
        ("quit", _) => return false,
        ("undo", _) => app.undo_one(),
        ("undoall", _) => app.undo_all(),
        ("restart", _) => app.restart(),
        ("listen", Some("on")) => app.start_listening(),
        ("listen", Some("off")) => app.stop_listening(),
        ("click", Some(square)) => match square.parse::<Square>() {
            Ok(square) => app.click_square(square),
            Err(_) => println!("not a square: {}", square),
        },
        ("lang", Some(tag)) => match tag.parse::<RecognitionLanguage>() {
            Ok(language) => app.set_language(language),
            Err(err) => println!("{}", err),
        },
        ("state", _) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&app.session_snapshot()).unwrap_or_default()
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&app.listening_snapshot()).unwrap_or_default()
            );
        }
        _ => println!("unknown command: :{}", command),
    }
    true
}

fn render(app: &App) {
    let snap = app.session_snapshot();
    print_board(&snap.fen);
    println!("turn: {}   moves: {}", snap.turn, snap.moves.join(" "));
    if let Some(message) = &snap.game_over_message {
        println!("{}", message);
    }
    if let Some(error) = &snap.error {
        println!("! {}", error);
    }
    let listening = app.listening_snapshot();
    if listening.listening {
        println!(
            "listening ({}), last heard: {}",
            listening.language,
            listening.last_heard.as_deref().unwrap_or("...")
        );
    }
    if let Some(message) = &listening.message {
        println!("! {}", message);
    }
}

fn print_board(fen: &str) {
    let placement = fen.split_whitespace().next().unwrap_or("");
    for (i, rank) in placement.split('/').enumerate() {
        let mut row = String::new();
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(n) => {
                    for _ in 0..n {
                        row.push_str(" .");
                    }
                }
                None => {
                    row.push(' ');
                    row.push(c);
                }
            }
        }
        println!("{}{}", 8 - i, row);
    }
    println!("  a b c d e f g h");
}
