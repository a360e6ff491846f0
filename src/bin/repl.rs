use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use monkey_lang::ast::Statement;
use monkey_lang::lexer::KEYWORDS;
use monkey_lang::{Environment, TokenKind, evaluate, parse_str, tokenize};
use rustyline::error::ReadlineError;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Cmd, Completer, Context, Editor, EventHandler, KeyCode, KeyEvent, Modifiers};
use rustyline::{EditMode, Helper, Highlighter, Hinter, Validator};

const PROMPT: &str = ">> ";

// --- Configuration ---

struct ReplConfig {
    history_file: String,
    edit_mode: EditMode,
}

impl ReplConfig {
    /// Defaults, overridable through `MONKEY_HISTORY` and `MONKEY_EDIT_MODE`.
    fn from_env() -> Self {
        let history_file =
            std::env::var("MONKEY_HISTORY").unwrap_or_else(|_| "monkey_history.txt".to_string());
        let edit_mode = match std::env::var("MONKEY_EDIT_MODE").as_deref() {
            Ok("emacs") => EditMode::Emacs,
            _ => EditMode::Vi,
        };
        ReplConfig {
            history_file,
            edit_mode,
        }
    }
}

/// Installs a tracing subscriber only when `RUST_LOG` is set, so the
/// default REPL output stays clean.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

// --- Line editor helpers ---

struct MonkeyCompleter {
    env: Rc<RefCell<Environment>>,
}

impl rustyline::completion::Completer for MonkeyCompleter {
    type Candidate = String;
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let Some(prefix) = completion_prefix(line, pos) else {
            return Ok((pos, vec![]));
        };

        let mut candidates: Vec<String> = self
            .env
            .borrow()
            .get_identifiers()
            .into_iter()
            .chain(KEYWORDS.iter().map(|k| k.to_string()))
            .filter(|id| id.starts_with(&prefix) && id.len() > prefix.len())
            .map(|id| id[prefix.len()..].to_string())
            .collect();
        candidates.sort();
        Ok((pos, candidates))
    }
}

// The word being typed: an identifier or keyword ending right at the cursor.
fn completion_prefix(line: &str, pos: usize) -> Option<String> {
    match tokenize(&line[..pos]).pop() {
        Some(token)
            if token.span.end == pos
                && (token.kind == TokenKind::Ident || token.kind.is_keyword()) =>
        {
            Some(token.literal)
        }
        _ => None,
    }
}

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct ReplHelper {
    #[rustyline(Validator)]
    validator: BracketValidator,
    #[rustyline(Highlighter)]
    highlighter: TokenHighlighter,
    #[rustyline(Completer)]
    completer: MonkeyCompleter,
}

/// Keeps reading lines while `(` or `{` are left open, so multi-line
/// function bodies can be typed naturally.
struct BracketValidator;

impl Validator for BracketValidator {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let mut stack = Vec::new();

        for token in tokenize(ctx.input()) {
            match token.kind {
                TokenKind::LParen | TokenKind::LBrace => stack.push(token.kind),
                TokenKind::RParen | TokenKind::RBrace => {
                    let expected = match token.kind {
                        TokenKind::RParen => TokenKind::LParen,
                        _ => TokenKind::LBrace,
                    };
                    if stack.pop() != Some(expected) {
                        return Ok(ValidationResult::Invalid(Some(format!(
                            "  - Unmatched '{}' at position {}",
                            token.literal, token.span.start
                        ))));
                    }
                }
                _ => {}
            }
        }

        if stack.is_empty() {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

struct TokenHighlighter;

impl Highlighter for TokenHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let mut highlighted = String::with_capacity(line.len());
        let mut last = 0;

        for token in tokenize(line) {
            highlighted.push_str(&line[last..token.span.start]);
            let text = &line[token.span.start..token.span.end];
            match token.kind {
                kind if kind.is_keyword() => {
                    highlighted.push_str(&format!("\x1b[1;35m{}\x1b[0m", text)) // Bold magenta for keywords
                }
                TokenKind::Int => highlighted.push_str(&format!("\x1b[33m{}\x1b[0m", text)), // Yellow for numbers
                TokenKind::Illegal => highlighted.push_str(&format!("\x1b[31m{}\x1b[0m", text)), // Red for junk
                _ => highlighted.push_str(text),
            }
            last = token.span.end;
        }
        highlighted.push_str(&line[last..]);

        Cow::Owned(highlighted)
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

// A line that ends in `let` has nothing useful to print.
fn ends_with_let(statements: &[Statement]) -> bool {
    matches!(statements.last(), Some(Statement::Let(_)))
}

fn main() -> rustyline::Result<()> {
    init_tracing();
    let config = ReplConfig::from_env();

    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "there".to_string());
    println!("Hello {}! This is the Monkey programming language!", user);
    println!("Feel free to type in commands. Type 'exit' or press Ctrl-D to quit.");

    let env = Environment::new();
    let helper = ReplHelper {
        validator: BracketValidator,
        highlighter: TokenHighlighter,
        completer: MonkeyCompleter { env: env.clone() },
    };
    let editor_config = rustyline::config::Config::builder()
        .edit_mode(config.edit_mode)
        .auto_add_history(true)
        .build();
    let mut rl = Editor::with_config(editor_config)?;
    rl.set_helper(Some(helper));
    rl.bind_sequence(
        KeyEvent(KeyCode::Char('s'), Modifiers::CTRL),
        EventHandler::Simple(Cmd::Newline),
    );
    if rl.load_history(&config.history_file).is_err() {
        tracing::debug!(path = %config.history_file, "no previous history");
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                if input.eq_ignore_ascii_case("exit") {
                    break;
                }

                let (program, errors) = parse_str(input);
                if !errors.is_empty() {
                    for error in &errors {
                        error.pretty_print(input)?;
                    }
                    continue;
                }

                let result = evaluate(&program, &env);
                if !ends_with_let(&program.statements) {
                    println!("{}", result.inspect());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C
                println!("Interrupted. Type 'exit' or Ctrl-D to quit.");
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D
                println!("\nExiting.");
                break;
            }
            Err(err) => {
                eprintln!("Readline Error: {:?}", err);
                break;
            }
        }
    }
    rl.save_history(&config.history_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_prefix_at_cursor() {
        assert_eq!(completion_prefix("foo x", 5).as_deref(), Some("x"));
        assert_eq!(completion_prefix("let ab = 1", 6).as_deref(), Some("ab"));
        assert_eq!(completion_prefix("re", 2).as_deref(), Some("re"));
    }

    #[test]
    fn test_no_completion_after_whitespace_or_operator() {
        assert_eq!(completion_prefix("foo x ", 6), None);
        assert_eq!(completion_prefix("x +", 3), None);
        assert_eq!(completion_prefix("", 0), None);
    }
}
