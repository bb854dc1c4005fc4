use scicalc::command::parse_line;
use scicalc::engine::{AngleMode, Calculator, format_number};
use scicalc::saving::{SessionState, load_session, save_session};

use std::env;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

// How long a domain-error message stays on the display before it resets.
const ERROR_RECOVERY_DELAY: Duration = Duration::from_secs(2);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [session-file]", args[0]);
        return Ok(());
    }

    let mut dark_mode = false;
    let mut calculator = if args.len() == 2 {
        match load_session(&args[1]) {
            Ok(session) => {
                dark_mode = session.dark_mode;
                session.restore()
            }
            Err(e) => {
                eprintln!("Error: could not load session {}: {}", args[1], e);
                Calculator::create()
            }
        }
    } else {
        Calculator::create()
    };

    let mut start_time = Instant::now();
    let mut status = String::from("ok");
    loop {
        let mode = match calculator.angle_mode {
            AngleMode::Degrees => "deg",
            AngleMode::Radians => "rad",
        };
        println!("[{}] {}", mode, calculator.display);

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command)? == 0 {
            break;
        }
        let command = command.trim();

        start_time = Instant::now();

        if command.is_empty() {
            status = String::from("invalid command");
            continue;
        }

        if command == "help" {
            print_help();
            status = String::from("ok");
            continue;
        }

        if command == "q" {
            break;
        } else if command == "hist" {
            if calculator.history.is_empty() {
                println!("(no history)");
            } else {
                for (i, entry) in calculator.history.entries().iter().enumerate() {
                    println!("  h{}: {} = {}", i, entry.expression, entry.result);
                }
            }
            status = String::from("ok");
        } else if command == "mem" {
            println!("  memory: {}", format_number(calculator.memory));
            status = String::from("ok");
        } else if let Some(filename) = command.strip_prefix("save ") {
            let session = SessionState::capture(&calculator, dark_mode);
            status = match save_session(&session, filename.trim()) {
                Ok(()) => String::from("ok"),
                Err(e) => format!("save failed: {}", e),
            };
        } else if let Some(filename) = command.strip_prefix("load ") {
            status = match load_session(filename.trim()) {
                Ok(session) => {
                    dark_mode = session.dark_mode;
                    calculator = session.restore();
                    String::from("ok")
                }
                Err(e) => format!("load failed: {}", e),
            };
        } else if let Some(commands) = parse_line(command) {
            status = String::from("ok");
            for cmd in commands {
                if let Err(e) = calculator.apply(cmd) {
                    // Show the message for a moment, then fall back to a
                    // cleared display, dropping the rest of the line.
                    println!("[{}] {}", mode, calculator.display);
                    thread::sleep(ERROR_RECOVERY_DELAY);
                    calculator.clear_all();
                    status = e.to_string();
                    break;
                }
            }
        } else {
            status = String::from("invalid command");
        }
    }

    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  q: Quit");
    println!("  help: Show this help");
    println!("  hist: Show the calculation history");
    println!("  mem: Show the memory register");
    println!("  save <file>: Save the session (history, memory, angle mode)");
    println!("  load <file>: Load a previously saved session");
    println!("Keys (whitespace separated, e.g. `1 + 2.5 =`):");
    println!("  digits and decimal numbers: 0-9, 12.5, .5");
    println!("  operators: + - * / ^");
    println!("  functions: sqrt sin cos tan log ln");
    println!("  equals: =");
    println!("  clear: ac (all), ce (entry), bs (backspace)");
    println!("  memory: mc mr ms m+ m-");
    println!("  history recall: h0 .. h9");
    println!("  angle mode: mode (toggle degrees/radians)");
}
