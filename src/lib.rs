/*!
# Scientific Calculator Engine

A session-scoped scientific calculator engine with an interactive
command-line host, built in Rust.

## Overview

This project reimplements the input/evaluation engine behind a single-page
scientific calculator application as a standalone library. The engine is a
finite-state evaluator driven by discrete input events (digits, decimal
point, binary operators, unary functions, equals, clears, backspace, memory
operations, history recall, angle-mode toggle) and produces a new display
string plus an optional history entry after each event.

## Architecture

### Engine Layer
- **Calculator State Machine** - Tracks the display, the pending first
  operand, the pending binary operator and the awaiting-second-operand flag
- **Evaluator** - Binary arithmetic (+, -, *, /, ^) and unary functions
  (sqrt, sin, cos, tan, log, ln) with domain checking
- **Display Formatter** - Exponential notation for extreme magnitudes,
  fixed-point with trailing-zero stripping otherwise
- **Error Handler** - Domain errors (division by zero, sqrt of a negative,
  log of a non-positive) surface as transient display messages; the session
  always continues

### Session Layer
- **Bounded History** - The last 10 calculations, newest-first
- **Memory Register** - MC/MR/MS/M+/M- operations, persisted across
  calculations
- **Persistence** - Gzip-compressed binary snapshots plus a JSON layout
  matching the original browser key-value storage schema

### Host Layer
- **Command Parser** - Maps text tokens (`1`, `12.5`, `+`, `sqrt`, `m+`,
  `h0`, ...) to engine input events
- **REPL** - Interactive prompt with status reporting, timed domain-error
  recovery and session save/load

## Key Features

- Implicit chained-operator evaluation (`5 + 3 *` evaluates `5+3` and
  continues with `8 *`)
- Degree/radian angle modes for the trigonometric functions
- Calculation history capped at 10 entries with recall
- Memory register arithmetic
- Session persistence (history, memory, angle mode, dark-mode flag)

## Modules

- **engine**: Calculator state machine, evaluator, display formatting and
  domain errors
- **history**: Bounded calculation history
- **command**: Text-token command parsing for hosts
- **saving**: Session persistence (binary snapshot and JSON layout)
*/

// Re-export all modules so they appear in the documentation
pub mod command;
pub mod engine;
pub mod history;
pub mod saving;

/// Re-export everything from these modules to make it easier to use
pub use command::*;
pub use engine::*;
pub use history::*;
pub use saving::*;
