//! Built-in token-level JavaScript minifier.
//!
//! # Passes
//! - every level: comments dropped, whitespace minimized
//! - `SIMPLE_OPTIMIZATIONS`: `debugger` statements removed, `true`/`false`
//!   folded to `!0`/`!1`, redundant `;` before `}` removed
//! - `ADVANCED_OPTIMIZATIONS`: adds empty statement collapsing and decimal
//!   literal shortening

use std::borrow::Cow;

use crate::optimizer::lexer::{self, is_ident_byte, Token, TokenKind, CONTROL_HEADS};
use crate::optimizer::{CompilationLevel, CompileOutcome, Optimizer, OptimizerFactory, INPUT_NAME};

/// Words that may not be followed by a line break without changing meaning.
const RESTRICTED_WORDS: &[&str] = &["return", "break", "continue", "throw", "yield", "async"];

#[derive(Debug, Clone, Copy, Default)]
struct Passes {
    strip_debugger: bool,
    fold_booleans: bool,
    drop_semicolon_before_brace: bool,
    collapse_empty_statements: bool,
    shorten_numbers: bool,
}

impl Passes {
    fn for_level(level: Option<CompilationLevel>) -> Self {
        match level {
            None | Some(CompilationLevel::WhitespaceOnly) => Self::default(),
            Some(CompilationLevel::SimpleOptimizations) => Self {
                strip_debugger: true,
                fold_booleans: true,
                drop_semicolon_before_brace: true,
                ..Self::default()
            },
            Some(CompilationLevel::AdvancedOptimizations) => Self {
                strip_debugger: true,
                fold_booleans: true,
                drop_semicolon_before_brace: true,
                collapse_empty_statements: true,
                shorten_numbers: true,
            },
        }
    }
}

/// A token on its way to the output.
#[derive(Debug)]
struct Emitted<'a> {
    kind: TokenKind,
    text: Cow<'a, str>,
    newline_before: bool,
    /// `)` that closes the head of an `if`/`for`/`while`/`with`.
    closes_control_head: bool,
}

/// Minifier with per-invocation diagnostics.
#[derive(Debug, Default)]
pub struct Minifier {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl Minifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn error(&mut self, line: usize, message: impl std::fmt::Display) {
        self.errors.push(format!("{INPUT_NAME}:{line}: ERROR - {message}"));
    }

    fn warning(&mut self, line: usize, message: impl std::fmt::Display) {
        self.warnings.push(format!("{INPUT_NAME}:{line}: WARNING - {message}"));
    }

    /// Check bracket balance and note the `)` tokens closing control heads.
    fn check_structure(&mut self, tokens: &[Token<'_>]) -> Vec<bool> {
        let mut closes_control = vec![false; tokens.len()];
        // (opener, line, is control head)
        let mut stack: Vec<(&str, usize, bool)> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.kind == TokenKind::Word {
                let member =
                    i > 0 && (tokens[i - 1].is_punct(".") || tokens[i - 1].is_punct("?."));
                if !member && token.text == "debugger" {
                    self.warning(token.line, "debugger statement");
                }
                if !member
                    && token.text == "with"
                    && tokens.get(i + 1).is_some_and(|t| t.is_punct("("))
                {
                    self.warning(token.line, "dangerous use of the with statement");
                }
                continue;
            }
            if token.kind != TokenKind::Punct {
                continue;
            }

            match token.text {
                "(" | "[" | "{" => {
                    let control = token.text == "("
                        && i > 0
                        && tokens[i - 1].kind == TokenKind::Word
                        && CONTROL_HEADS.contains(&tokens[i - 1].text)
                        && !(i > 1 && tokens[i - 2].is_punct("."));
                    stack.push((token.text, token.line, control));
                }
                ")" | "]" | "}" => {
                    let expected = match token.text {
                        ")" => "(",
                        "]" => "[",
                        _ => "{",
                    };
                    match stack.pop() {
                        Some((open, _, control)) if open == expected => {
                            closes_control[i] = control;
                        }
                        Some((open, line, _)) => {
                            self.error(
                                token.line,
                                format_args!(
                                    "Parse error. mismatched '{}' closing '{}' from line {}",
                                    token.text, open, line
                                ),
                            );
                            return closes_control;
                        }
                        None => {
                            self.error(
                                token.line,
                                format_args!(
                                    "Parse error. syntax error: unexpected '{}'",
                                    token.text
                                ),
                            );
                            return closes_control;
                        }
                    }
                }
                _ => {}
            }
        }

        if let Some((open, line, _)) = stack.pop() {
            self.error(line, format_args!("Parse error. '{open}' is never closed"));
        }
        closes_control
    }

    fn transform<'a>(
        &self,
        tokens: &[Token<'a>],
        closes_control: &[bool],
        passes: Passes,
    ) -> Vec<Emitted<'a>> {
        let mut out: Vec<Emitted<'a>> = Vec::with_capacity(tokens.len());
        let mut pending_newline = false;
        let mut paren_depth = 0usize;
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];
            let next = tokens.get(i + 1);
            let prev = out.last();
            let newline_before = token.newline_before || pending_newline;
            i += 1;

            if token.is_punct("(") {
                paren_depth += 1;
            } else if token.is_punct(")") {
                paren_depth = paren_depth.saturating_sub(1);
            }

            if passes.strip_debugger && token.is_word("debugger") {
                let at_statement_start = match prev {
                    None => true,
                    Some(p) => p.kind == TokenKind::Punct && matches!(&*p.text, ";" | "{" | "}"),
                };
                let after_block = prev.is_some_and(|p| p.text == "}");
                let terminated = next.is_some_and(|n| n.is_punct(";"));

                if at_statement_start && (terminated || !after_block) {
                    if terminated && !after_block {
                        i += 1;
                    }
                    pending_newline = newline_before;
                    continue;
                }
            }

            if token.kind == TokenKind::Punct && token.text == ";" {
                if passes.collapse_empty_statements
                    && paren_depth == 0
                    && prev.is_some_and(|p| p.kind == TokenKind::Punct && p.text == ";")
                {
                    pending_newline = newline_before;
                    continue;
                }
                if passes.drop_semicolon_before_brace
                    && next.is_some_and(|n| n.is_punct("}"))
                    && !prev.is_some_and(|p| {
                        p.closes_control_head || matches!(&*p.text, "else" | "do" | ":")
                    })
                {
                    pending_newline = newline_before;
                    continue;
                }
            }

            let text = match token.kind {
                TokenKind::Word
                    if passes.fold_booleans && matches!(token.text, "true" | "false") =>
                {
                    if foldable_boolean(prev, next) {
                        Cow::Borrowed(if token.text == "true" { "!0" } else { "!1" })
                    } else {
                        Cow::Borrowed(token.text)
                    }
                }
                TokenKind::Number if passes.shorten_numbers => shorten_number(token.text)
                    .map(Cow::Owned)
                    .unwrap_or(Cow::Borrowed(token.text)),
                _ => Cow::Borrowed(token.text),
            };

            pending_newline = false;
            out.push(Emitted {
                kind: token.kind,
                text,
                newline_before,
                closes_control_head: closes_control.get(i - 1).copied().unwrap_or(false),
            });
        }

        out
    }
}

impl Optimizer for Minifier {
    fn optimize(&mut self, source: &str, level: Option<CompilationLevel>) -> CompileOutcome {
        let output = match lexer::tokenize(source) {
            Ok(tokens) => {
                let closes_control = self.check_structure(&tokens);
                if self.errors.is_empty() {
                    let passes = Passes::for_level(level);
                    print(&self.transform(&tokens, &closes_control, passes))
                } else {
                    String::new()
                }
            }
            Err(err) => {
                self.error(err.line, &err);
                String::new()
            }
        };

        tracing::trace!(
            level = level.map(|l| l.as_str()).unwrap_or("none"),
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            "Source optimized"
        );

        CompileOutcome {
            output,
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }
}

/// Creates a fresh [`Minifier`] per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifierFactory;

impl OptimizerFactory for MinifierFactory {
    fn create(&self) -> Box<dyn Optimizer> {
        Box::new(Minifier::new())
    }
}

/// `true`/`false` can become `!0`/`!1` unless used as a property name, or
/// where the lower precedence of `!` would change the expression.
fn foldable_boolean(prev: Option<&Emitted<'_>>, next: Option<&Token<'_>>) -> bool {
    if prev.is_some_and(|p| p.kind == TokenKind::Punct && matches!(&*p.text, "." | "?.")) {
        return false;
    }
    match next {
        None => true,
        Some(n) => match n.kind {
            TokenKind::Template => false,
            TokenKind::Punct => !matches!(n.text, "." | "?." | "[" | "(" | "**" | ":"),
            _ => true,
        },
    }
}

/// Shorten a plain decimal literal, e.g. `0.50` → `.5`, `2.0` → `2`,
/// `1000` → `1e3`. Returns `None` when nothing shorter exists.
fn shorten_number(text: &str) -> Option<String> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    // Legacy octal.
    if int.len() > 1 && int.starts_with('0') {
        return None;
    }

    let frac = frac.trim_end_matches('0');
    let int = int.trim_start_matches('0');

    let shortened = if frac.is_empty() {
        if int.is_empty() {
            "0".to_string()
        } else {
            let digits = int.trim_end_matches('0');
            let zeros = int.len() - digits.len();
            if zeros >= 3 {
                format!("{digits}e{zeros}")
            } else {
                int.to_string()
            }
        }
    } else {
        format!("{int}.{frac}")
    };

    (shortened.len() < text.len()).then_some(shortened)
}

/// A line break before `next` can be dropped when either side forces the
/// expression to continue.
fn newline_needed(prev: &Emitted<'_>, next: &Emitted<'_>) -> bool {
    if prev.kind == TokenKind::Word && RESTRICTED_WORDS.contains(&&*prev.text) {
        return true;
    }
    let prev_continues = prev.kind == TokenKind::Punct
        && !matches!(&*prev.text, ")" | "]" | "}" | "++" | "--");
    let next_continues = next.kind == TokenKind::Punct
        && !matches!(&*next.text, "++" | "--" | "!" | "~" | "{" | "..." | "#" | "@");
    !(prev_continues || next_continues)
}

fn needs_space(prev: &Emitted<'_>, next: &Emitted<'_>) -> bool {
    let (Some(&a), Some(&b)) = (prev.text.as_bytes().last(), next.text.as_bytes().first()) else {
        return false;
    };
    (is_ident_byte(a) && is_ident_byte(b))
        || (a == b'+' && b == b'+')
        || (a == b'-' && b == b'-')
        || (a == b'/' && (b == b'/' || b == b'*'))
        // `<!--` and `-->` open HTML-like comments.
        || (a == b'<' && b == b'!')
        || (prev.text.ends_with("--") && b == b'>')
        || (prev.kind == TokenKind::Regex && is_ident_byte(b))
        || (prev.kind == TokenKind::Number && b == b'.')
}

fn print(tokens: &[Emitted<'_>]) -> String {
    let mut output = String::new();
    let mut prev: Option<&Emitted<'_>> = None;

    for token in tokens {
        if let Some(p) = prev {
            if token.newline_before && newline_needed(p, token) {
                output.push('\n');
            } else if needs_space(p, token) {
                output.push(' ');
            }
        }
        output.push_str(&token.text);
        prev = Some(token);
    }

    output
}
