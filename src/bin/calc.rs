//! A small arithmetic calculator demonstrating the parse runtime from a consumer's point
//! of view: reads one expression per line from stdin, parses it against a hand-written
//! grammar compiled in-process, evaluates the resulting tree, and prints the result.
//!
//! Supplements the core grammar-compiler/parse-runtime pipeline the way the reference
//! implementation's own calculator example does, reusing its error-message wording.

use parsegen::{parse, CompiledGrammar, ParseTree};
use std::io::{self, BufRead, Write};

const GRAMMAR_SOURCE: &str = r#"
expr = term, { addop } ;
addop = op_add, term ;
op_add = "+" | "-" ;
term = value, { mulop } ;
mulop = op_mul, value ;
op_mul = "*" | "/" ;
value = number | group ;
group = "(", expr, ")" ;
number = sign, unsigned ;
sign = [ "-" ] ;
unsigned = digit, { digit } ;
digit = <"0", "9"> ;
"#;

fn main() {
    let grammar = parsegen::compile(GRAMMAR_SOURCE, "expr")
        .expect("the bundled calculator grammar is known to compile");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("calc: error reading standard input: {}", err);
                break;
            }
        };
        report(&grammar, &line, &mut out, &mut err);
    }
}

/// Writes the evaluated result, and only the evaluated result, to `out`; every diagnostic
/// goes to `err` instead, so piping stdout never mixes error lines in with results.
fn report(grammar: &CompiledGrammar, line: &str, out: &mut impl Write, err: &mut impl Write) {
    let outcome = parse(grammar, line.as_bytes());

    let root = match outcome.root {
        None => {
            writeln!(err, "didn't find anything to parse").ok();
            return;
        }
        Some(root) => root,
    };

    if root.end < line.len() {
        let code = parsegen::position::Code::new(line);
        let position = code.obtain_position(root.end);
        writeln!(err, "line could not be parsed, stopped at column {}", position.column).ok();
        return;
    }

    if !outcome.terminated_normally {
        writeln!(err, "premature end of line").ok();
        return;
    }

    // `root` is the synthetic `@start` wrapper; its first child is the actual `expr` match.
    match eval(&root.children[0], line.as_bytes()) {
        Ok(value) => {
            writeln!(out, "{}", value).ok();
        }
        Err(message) => {
            writeln!(err, "{}", message).ok();
        }
    }
}

fn eval(node: &ParseTree, input: &[u8]) -> Result<f64, String> {
    match node.rule {
        Some("expr") => eval_chain(node, input, eval_add_term),
        Some("term") => eval_chain(node, input, eval_mul_term),
        Some("value") | Some("group") => eval(&node.children[0], input),
        Some("number") => eval_number(node, input),
        other => Err(format!("calc: internal error, unexpected node {:?}", other)),
    }
}

fn eval_chain(
    node: &ParseTree,
    input: &[u8],
    apply: impl Fn(f64, &ParseTree, &[u8]) -> Result<f64, String>,
) -> Result<f64, String> {
    let mut value = eval(&node.children[0], input)?;
    for op_node in &node.children[1..] {
        value = apply(value, op_node, input)?;
    }
    Ok(value)
}

fn eval_add_term(lhs: f64, addop: &ParseTree, input: &[u8]) -> Result<f64, String> {
    let op = operator_byte(&addop.children[0], input);
    let rhs = eval(&addop.children[1], input)?;
    match op {
        b'+' => Ok(lhs + rhs),
        b'-' => Ok(lhs - rhs),
        other => Err(format!("calc: internal error, unexpected operator '{}'", other as char)),
    }
}

fn eval_mul_term(lhs: f64, mulop: &ParseTree, input: &[u8]) -> Result<f64, String> {
    let op = operator_byte(&mulop.children[0], input);
    let rhs = eval(&mulop.children[1], input)?;
    match op {
        b'*' => Ok(lhs * rhs),
        b'/' => {
            if rhs == 0.0 {
                Err("calc: division by zero".to_string())
            } else {
                Ok(lhs / rhs)
            }
        }
        other => Err(format!("calc: internal error, unexpected operator '{}'", other as char)),
    }
}

fn operator_byte(node: &ParseTree, input: &[u8]) -> u8 {
    input[node.start]
}

fn eval_number(node: &ParseTree, input: &[u8]) -> Result<f64, String> {
    let sign_node = &node.children[0];
    let unsigned_node = &node.children[1];
    let negative = sign_node.end > sign_node.start;
    let digits = std::str::from_utf8(&input[unsigned_node.start..unsigned_node.end])
        .map_err(|_| "calc: internal error, non-utf8 digits".to_string())?;
    let magnitude: f64 = digits
        .parse()
        .map_err(|_| format!("calc: '{}' is not a valid number", digits))?;
    Ok(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> (String, String) {
        let grammar = parsegen::compile(GRAMMAR_SOURCE, "expr").unwrap();
        let mut out = Vec::new();
        let mut err = Vec::new();
        report(&grammar, line, &mut out, &mut err);
        (
            String::from_utf8(out).unwrap().trim_end().to_string(),
            String::from_utf8(err).unwrap().trim_end().to_string(),
        )
    }

    #[test]
    fn evaluates_simple_addition() {
        let (out, err) = run("1+2");
        assert_eq!(out, "3");
        assert_eq!(err, "");
    }

    #[test]
    fn honors_operator_precedence() {
        let (out, err) = run("2+3*4");
        assert_eq!(out, "14");
        assert_eq!(err, "");
    }

    #[test]
    fn honors_parenthesized_grouping() {
        let (out, err) = run("(2+3)*4");
        assert_eq!(out, "20");
        assert_eq!(err, "");
    }

    #[test]
    fn handles_negative_numbers() {
        let (out, err) = run("-5+2");
        assert_eq!(out, "-3");
        assert_eq!(err, "");
    }

    #[test]
    fn reports_unparsable_input() {
        let (out, err) = run("");
        assert_eq!(out, "");
        assert_eq!(err, "didn't find anything to parse");
    }

    #[test]
    fn reports_trailing_garbage() {
        let (out, err) = run("1+2)");
        assert_eq!(out, "");
        assert_eq!(err, "line could not be parsed, stopped at column 3");
    }

    #[test]
    fn reports_division_by_zero_to_stderr_not_stdout() {
        let (out, err) = run("1/0");
        assert_eq!(out, "");
        assert_eq!(err, "calc: division by zero");
    }
}
