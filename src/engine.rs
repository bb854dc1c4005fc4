use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::History;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Invalid input for square root")]
    NegativeSquareRoot,
    #[error("Invalid input for logarithm")]
    NonPositiveLogarithm,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Subtract => '-',
            BinaryOp::Multiply => '*',
            BinaryOp::Divide => '/',
            BinaryOp::Power => '^',
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum UnaryFunction {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Log10,
    Ln,
}

impl UnaryFunction {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryFunction::Sqrt => "sqrt",
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Log10 => "log",
            UnaryFunction::Ln => "ln",
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MemoryOp {
    Clear,
    Recall,
    Store,
    Add,
    Subtract,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum AngleMode {
    Degrees,
    Radians,
}

/// A single discrete input event, as produced by a host frontend.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Command {
    Digit(char),
    DecimalPoint,
    Operator(BinaryOp),
    Function(UnaryFunction),
    Equals,
    ClearAll,
    ClearEntry,
    Backspace,
    Memory(MemoryOp),
    SelectHistory(usize),
    ToggleAngleMode,
}

/// The calculator state machine.
///
/// Driven by discrete input events; after every event the current `display`,
/// `history`, `memory` and `angle_mode` are readable for rendering. `memory`,
/// `angle_mode` and `history` are the only fields meant to outlive a single
/// calculation (see the `saving` module).
#[derive(Clone, Debug)]
pub struct Calculator {
    pub display: String,
    pub first_operand: Option<String>,
    pub operator: Option<BinaryOp>,
    pub awaiting_second_operand: bool,
    pub error: bool,
    pub memory: f64,
    pub angle_mode: AngleMode,
    pub history: History,
}

impl Calculator {
    pub fn create() -> Self {
        Calculator {
            display: String::from("0"),
            first_operand: None,
            operator: None,
            awaiting_second_operand: false,
            error: false,
            memory: 0.0,
            angle_mode: AngleMode::Degrees,
            history: History::new(),
        }
    }

    /// Recreate a calculator around previously persisted session fields.
    pub fn restore(memory: f64, angle_mode: AngleMode, history: History) -> Self {
        let mut calculator = Calculator::create();
        calculator.memory = memory;
        calculator.angle_mode = angle_mode;
        calculator.history = history;
        calculator
    }

    /// Dispatch a single input event.
    ///
    /// On a domain error the display already carries the user-facing message
    /// when this returns; the caller decides when to restore it (the engine
    /// itself restores it as soon as the next event arrives).
    pub fn apply(&mut self, command: Command) -> Result<(), DomainError> {
        if self.error {
            // New input supersedes a displayed error message.
            self.clear_all();
        }
        log::debug!("input event: {:?}", command);
        match command {
            Command::Digit(d) => self.input_digit(d),
            Command::DecimalPoint => self.input_decimal_point(),
            Command::Operator(op) => return self.apply_binary_operator(op),
            Command::Function(function) => return self.apply_unary_function(function),
            Command::Equals => return self.evaluate_equals(),
            Command::ClearAll => self.clear_all(),
            Command::ClearEntry => self.clear_entry(),
            Command::Backspace => self.backspace(),
            Command::Memory(op) => self.apply_memory_op(op),
            Command::SelectHistory(index) => self.select_history(index),
            Command::ToggleAngleMode => self.toggle_angle_mode(),
        }
        Ok(())
    }

    pub fn input_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        if self.awaiting_second_operand {
            self.display = digit.to_string();
            self.awaiting_second_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    // At most one decimal point can appear in the display.
    pub fn input_decimal_point(&mut self) {
        if self.awaiting_second_operand {
            self.display = String::from("0.");
            self.awaiting_second_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    pub fn apply_binary_operator(&mut self, op: BinaryOp) -> Result<(), DomainError> {
        // Choosing another operator before any digit replaces the pending one.
        if self.operator.is_some() && self.awaiting_second_operand {
            self.operator = Some(op);
            return Ok(());
        }

        if let (Some(first), Some(pending)) = (self.first_operand.clone(), self.operator) {
            // An operator on a completed pair evaluates the pending expression
            // first; the new operator becomes pending against the result.
            let result = match evaluate(&first, pending, &self.display) {
                Ok(value) => value,
                Err(e) => return self.fail(e),
            };
            let formatted = format_number(result);
            let expression = format!("{}{}{}", first, pending.symbol(), self.display);
            self.history.record(expression, formatted.clone());
            self.display = formatted.clone();
            self.first_operand = Some(formatted);
        } else {
            self.first_operand = Some(self.display.clone());
        }

        self.operator = Some(op);
        self.awaiting_second_operand = true;
        Ok(())
    }

    /// Apply a unary function to the display value, ignoring any pending
    /// binary operator state.
    pub fn apply_unary_function(&mut self, function: UnaryFunction) -> Result<(), DomainError> {
        let value = parse_operand(&self.display);
        let result = match function {
            UnaryFunction::Sqrt if value < 0.0 => {
                return self.fail(DomainError::NegativeSquareRoot);
            }
            UnaryFunction::Sqrt => value.sqrt(),
            UnaryFunction::Log10 if value <= 0.0 => {
                return self.fail(DomainError::NonPositiveLogarithm);
            }
            UnaryFunction::Log10 => value.log10(),
            UnaryFunction::Ln if value <= 0.0 => {
                return self.fail(DomainError::NonPositiveLogarithm);
            }
            UnaryFunction::Ln => value.ln(),
            UnaryFunction::Sin => self.trig_operand(value).sin(),
            UnaryFunction::Cos => self.trig_operand(value).cos(),
            UnaryFunction::Tan => self.trig_operand(value).tan(),
        };

        let formatted = format_number(result);
        let expression = format!("{}({})", function.name(), self.display);
        self.history.record(expression, formatted.clone());
        self.display = formatted;
        self.first_operand = None;
        self.operator = None;
        self.awaiting_second_operand = false;
        Ok(())
    }

    pub fn evaluate_equals(&mut self) -> Result<(), DomainError> {
        // Nothing to do until a full `first op second` expression is present.
        let (first, pending) = match (self.first_operand.clone(), self.operator) {
            (Some(first), Some(pending)) if !self.awaiting_second_operand => (first, pending),
            _ => return Ok(()),
        };

        let result = match evaluate(&first, pending, &self.display) {
            Ok(value) => value,
            Err(e) => return self.fail(e),
        };
        let formatted = format_number(result);
        let expression = format!("{}{}{}", first, pending.symbol(), self.display);
        self.history.record(expression, formatted.clone());
        self.display = formatted;
        self.first_operand = None;
        self.operator = None;
        self.awaiting_second_operand = false;
        Ok(())
    }

    /// Reset everything except `memory`, `angle_mode` and `history`.
    pub fn clear_all(&mut self) {
        self.display = String::from("0");
        self.first_operand = None;
        self.operator = None;
        self.awaiting_second_operand = false;
        self.error = false;
    }

    /// Reset only the current entry, so a mistyped second operand can be
    /// corrected without losing the pending expression.
    pub fn clear_entry(&mut self) {
        self.display = String::from("0");
        self.awaiting_second_operand = false;
        self.error = false;
    }

    pub fn backspace(&mut self) {
        self.display.pop();
        if self.display.is_empty() {
            self.display = String::from("0");
        }
    }

    pub fn apply_memory_op(&mut self, op: MemoryOp) {
        match op {
            MemoryOp::Clear => self.memory = 0.0,
            MemoryOp::Recall => {
                self.display = format_number(self.memory);
                self.awaiting_second_operand = false;
            }
            MemoryOp::Store => {
                self.memory = parse_operand(&self.display);
                self.awaiting_second_operand = true;
            }
            MemoryOp::Add => {
                self.memory += parse_operand(&self.display);
                self.awaiting_second_operand = true;
            }
            MemoryOp::Subtract => {
                self.memory -= parse_operand(&self.display);
                self.awaiting_second_operand = true;
            }
        }
    }

    /// Start a fresh calculation from a previous result. Out-of-range
    /// indices are ignored.
    pub fn select_history(&mut self, index: usize) {
        if let Some(entry) = self.history.get(index) {
            self.display = entry.result.clone();
            self.first_operand = None;
            self.operator = None;
            self.awaiting_second_operand = false;
        }
    }

    pub fn toggle_angle_mode(&mut self) {
        self.angle_mode = match self.angle_mode {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        };
    }

    fn trig_operand(&self, value: f64) -> f64 {
        match self.angle_mode {
            AngleMode::Degrees => value.to_radians(),
            AngleMode::Radians => value,
        }
    }

    // Shows the message in the display and drops the pending expression;
    // the session itself always continues.
    fn fail(&mut self, err: DomainError) -> Result<(), DomainError> {
        self.display = err.to_string();
        self.first_operand = None;
        self.operator = None;
        self.awaiting_second_operand = false;
        self.error = true;
        Err(err)
    }
}

/// Evaluate `first op second`, with both operands parsed as doubles.
pub fn evaluate(first: &str, operator: BinaryOp, second: &str) -> Result<f64, DomainError> {
    let a = parse_operand(first);
    let b = parse_operand(second);
    match operator {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Subtract => Ok(a - b),
        BinaryOp::Multiply => Ok(a * b),
        BinaryOp::Divide => {
            if b == 0.0 {
                Err(DomainError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }
        // A negative base with a fractional exponent falls through as NaN.
        BinaryOp::Power => Ok(a.powf(b)),
    }
}

fn parse_operand(text: &str) -> f64 {
    match text.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("unparseable operand {:?} coerced to 0", text);
            0.0
        }
    }
}

/// Format a computed result for display.
///
/// Very small and very large magnitudes switch to exponential notation with
/// six fractional digits; everything else is rounded to nine decimal places
/// with trailing zeros stripped. Purely presentational, internal computation
/// keeps full precision.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return String::from("0");
    }
    if value.is_finite() && (value.abs() < 1e-7 || value.abs() > 1e7) {
        return format!("{:.6e}", value);
    }
    format!("{:.9}", value)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
