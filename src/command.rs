use lazy_static::lazy_static;
use regex::Regex;

use crate::engine::{BinaryOp, Command, MemoryOp, UnaryFunction};

lazy_static! {
    static ref NUMBER_REGEX: Regex = Regex::new(r"^([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap();
    static ref HISTORY_REGEX: Regex = Regex::new(r"^h([0-9])$").unwrap();
}

/// Parse a single input token into engine commands.
///
/// Most tokens map to exactly one command; a whole numeric literal such as
/// `12.5` expands into the digit and decimal-point events that would have
/// produced it. Returns `None` for anything unrecognised.
pub fn parse_token(token: &str) -> Option<Vec<Command>> {
    let token = token.to_ascii_lowercase();

    let single = match token.as_str() {
        "+" => Some(Command::Operator(BinaryOp::Add)),
        "-" => Some(Command::Operator(BinaryOp::Subtract)),
        "*" => Some(Command::Operator(BinaryOp::Multiply)),
        "/" => Some(Command::Operator(BinaryOp::Divide)),
        "^" | "pow" => Some(Command::Operator(BinaryOp::Power)),
        "sqrt" => Some(Command::Function(UnaryFunction::Sqrt)),
        "sin" => Some(Command::Function(UnaryFunction::Sin)),
        "cos" => Some(Command::Function(UnaryFunction::Cos)),
        "tan" => Some(Command::Function(UnaryFunction::Tan)),
        "log" => Some(Command::Function(UnaryFunction::Log10)),
        "ln" => Some(Command::Function(UnaryFunction::Ln)),
        "=" => Some(Command::Equals),
        "ac" => Some(Command::ClearAll),
        "ce" => Some(Command::ClearEntry),
        "bs" | "del" => Some(Command::Backspace),
        "mc" => Some(Command::Memory(MemoryOp::Clear)),
        "mr" => Some(Command::Memory(MemoryOp::Recall)),
        "ms" => Some(Command::Memory(MemoryOp::Store)),
        "m+" => Some(Command::Memory(MemoryOp::Add)),
        "m-" => Some(Command::Memory(MemoryOp::Subtract)),
        "mode" | "drg" => Some(Command::ToggleAngleMode),
        "." => Some(Command::DecimalPoint),
        _ => None,
    };
    if let Some(command) = single {
        return Some(vec![command]);
    }

    if let Some(captures) = HISTORY_REGEX.captures(&token) {
        let index = captures.get(1).unwrap().as_str().parse::<usize>().ok()?;
        return Some(vec![Command::SelectHistory(index)]);
    }

    if NUMBER_REGEX.is_match(&token) {
        return Some(expand_number(&token));
    }

    None
}

/// Parse a whitespace-separated line of tokens, e.g. `1 + 2.5 =`.
///
/// The whole line is rejected if any token is unrecognised, so a typo never
/// half-applies.
pub fn parse_line(line: &str) -> Option<Vec<Command>> {
    let mut commands = Vec::new();
    for token in line.split_whitespace() {
        commands.extend(parse_token(token)?);
    }
    if commands.is_empty() { None } else { Some(commands) }
}

fn expand_number(literal: &str) -> Vec<Command> {
    literal
        .chars()
        .map(|c| {
            if c == '.' {
                Command::DecimalPoint
            } else {
                Command::Digit(c)
            }
        })
        .collect()
}
