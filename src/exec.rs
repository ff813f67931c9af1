// ABOUTME: Control-flow executor: drives if-chains, function def/call, and built-in verbs

use crate::block::{collect_block, collect_block_until_terminator};
use crate::condition::eval_condition;
use crate::dispatcher::Dispatcher;
use crate::env::{display_token, get_val, Environment, FunctionTable};
use crate::error::SpokeError;
use crate::lexer::lex;
use crate::value::Value;
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::{self, Write};
use std::path::PathBuf;

pub struct Interpreter {
    pub env: Environment,
    pub functions: FunctionTable,
    pub dispatcher: Dispatcher,
}

impl Interpreter {
    pub fn new(commands_dir: PathBuf) -> Self {
        Interpreter {
            env: Environment::new(),
            functions: FunctionTable::new(),
            dispatcher: Dispatcher::new(&commands_dir),
        }
    }

    /// Walks `lines`, dispatching each one per spec §4.5. `line_offset` is
    /// added to the in-list index to produce 1-based source line numbers
    /// for error reporting, so nested calls (function bodies, if-branches)
    /// report positions relative to the original file.
    pub fn execute_lines(&mut self, lines: &[String], line_offset: usize) -> Result<(), SpokeError> {
        let mut i = 0;
        while i < lines.len() {
            let raw = lines[i].trim();
            let line_num = line_offset + i + 1;

            if raw.is_empty()
                || raw.starts_with('#')
                || raw.starts_with('@')
                || raw.starts_with("} else")
                || raw == "}"
            {
                i += 1;
                continue;
            }

            let tokens = lex(raw);
            if tokens.is_empty() {
                i += 1;
                continue;
            }
            let verb = tokens[0].clone();
            log::trace!("line {line_num}: verb '{verb}'");

            if verb == "function"
                && tokens.len() >= 4
                && tokens[2] == "("
                && raw.contains(')')
                && raw.contains('{')
            {
                i = self.define_function(&tokens, lines, i, line_num, raw)?;
                continue;
            }

            if self.functions.get(&verb).is_some() && tokens.get(1).map(String::as_str) == Some("(")
            {
                self.call_function(&verb, &tokens, line_num, raw)?;
                i += 1;
                continue;
            }

            if verb == "if" && raw.contains("then") && raw.contains('{') {
                i = self.exec_if_chain(lines, i, line_offset)?;
                continue;
            }

            if self.try_builtin(&verb, &tokens, line_num, raw)?.is_some() {
                i += 1;
                continue;
            }

            self.dispatcher
                .dispatch(&tokens, &mut self.env, &self.functions, line_num, raw)?;
            i += 1;
        }
        Ok(())
    }

    fn define_function(
        &mut self,
        tokens: &[String],
        lines: &[String],
        i: usize,
        line_num: usize,
        raw: &str,
    ) -> Result<usize, SpokeError> {
        let name = tokens[1].clone();
        let open = tokens
            .iter()
            .position(|t| t == "(")
            .ok_or_else(|| SpokeError::syntax(line_num, raw, "missing '(' in function def"))?;
        let close = tokens[open..]
            .iter()
            .position(|t| t == ")")
            .map(|p| p + open)
            .ok_or_else(|| SpokeError::syntax(line_num, raw, "missing ')' in function def"))?;
        let params: Vec<String> = tokens[open + 1..close]
            .iter()
            .filter(|t| *t != ",")
            .cloned()
            .collect();
        let (body, next) = collect_block(lines, i);
        self.functions.define(name, params, body);
        Ok(next)
    }

    fn call_function(
        &mut self,
        name: &str,
        tokens: &[String],
        line_num: usize,
        line: &str,
    ) -> Result<(), SpokeError> {
        let def = self
            .functions
            .get(name)
            .expect("caller already checked function exists")
            .clone();
        let open = tokens.iter().position(|t| t == "(").unwrap();
        let close = tokens[open..]
            .iter()
            .position(|t| t == ")")
            .map(|p| p + open)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "missing ')' in function call"))?;
        let args: Vec<Value> = tokens[open + 1..close]
            .iter()
            .filter(|t| *t != ",")
            .map(|t| get_val(&self.env, t))
            .collect();
        if args.len() != def.params.len() {
            return Err(SpokeError::syntax(
                line_num,
                line,
                format!(
                    "function '{name}' expects {} argument(s), got {}",
                    def.params.len(),
                    args.len()
                ),
            ));
        }

        let saved: Vec<(String, Option<Value>)> = def
            .params
            .iter()
            .map(|p| (p.clone(), self.env.get(p).cloned()))
            .collect();
        for (p, v) in def.params.iter().zip(args) {
            self.env.set(p.clone(), v);
        }

        let result = self.execute_lines(&def.body, 0);

        for (p, saved_val) in saved {
            match saved_val {
                Some(v) => self.env.set(p, v),
                None => {
                    self.env.delete(&p);
                }
            }
        }
        result
    }

    fn exec_if_chain(
        &mut self,
        lines: &[String],
        start: usize,
        line_offset: usize,
    ) -> Result<usize, SpokeError> {
        enum Branch {
            Cond(bool, Vec<String>),
            Else(Vec<String>),
        }

        let mut branches = Vec::new();
        let mut i = start;

        let first_line = lines[i].trim().to_string();
        let line_num = line_offset + i + 1;
        let cond_tokens = extract_condition(&first_line)
            .ok_or_else(|| SpokeError::syntax(line_num, &first_line, "malformed if condition"))?;
        let cond_result = eval_condition(&cond_tokens, &self.env);
        let (body, term) = collect_block_until_terminator(lines, i)
            .ok_or_else(|| SpokeError::syntax(line_num, &first_line, "unterminated if block"))?;
        branches.push(Branch::Cond(cond_result, body));
        i = term;

        loop {
            if i >= lines.len() {
                break;
            }
            let trimmed = lines[i].trim().to_string();
            if !trimmed.starts_with("} else") {
                break;
            }
            let line_num = line_offset + i + 1;
            let remainder = trimmed[1..].trim();
            if let Some(rest) = remainder.strip_prefix("else if") {
                let cond_tokens = extract_condition(rest).ok_or_else(|| {
                    SpokeError::syntax(line_num, &trimmed, "malformed else-if condition")
                })?;
                let cond_result = eval_condition(&cond_tokens, &self.env);
                let (body, term) = collect_block_until_terminator(lines, i).ok_or_else(|| {
                    SpokeError::syntax(line_num, &trimmed, "unterminated else-if block")
                })?;
                branches.push(Branch::Cond(cond_result, body));
                i = term;
            } else {
                let (body, term) = collect_block_until_terminator(lines, i).ok_or_else(|| {
                    SpokeError::syntax(line_num, &trimmed, "unterminated else block")
                })?;
                branches.push(Branch::Else(body));
                i = term + 1;
                break;
            }
        }

        for branch in &branches {
            match branch {
                Branch::Cond(true, body) => {
                    self.execute_lines(body, 0)?;
                    return Ok(i);
                }
                Branch::Cond(false, _) => continue,
                Branch::Else(body) => {
                    self.execute_lines(body, 0)?;
                    return Ok(i);
                }
            }
        }
        Ok(i)
    }

    /// Returns `Some(())` once a built-in has handled the verb; `None` means
    /// the caller should fall through to the command dispatcher.
    fn try_builtin(
        &mut self,
        verb: &str,
        tokens: &[String],
        line_num: usize,
        line: &str,
    ) -> Result<Option<()>, SpokeError> {
        match verb {
            "let" => self.builtin_let(tokens, line_num, line)?,
            "print" => self.builtin_print(tokens, line_num, line)?,
            "input" => self.builtin_input(tokens, line_num, line)?,
            "pause" => self.builtin_pause(tokens),
            "sleep" => self.builtin_sleep(tokens, line_num, line)?,
            "countdown" => self.builtin_countdown(tokens, line_num, line)?,
            "clear" => self.env.clear(),
            "quit" => self.builtin_quit(tokens),
            "delete" => {
                if let Some(name) = tokens.get(1) {
                    self.env.delete(name);
                }
            }
            "toggle" => self.builtin_toggle(tokens, line_num, line)?,
            "swap" => self.builtin_swap(tokens, line_num, line)?,
            "compare" => self.builtin_compare(tokens, line_num, line)?,
            "length" => self.builtin_length(tokens, line_num, line)?,
            "shuffle" => self.builtin_shuffle(tokens, line_num, line)?,
            "random" => self.builtin_random(tokens, line_num, line)?,
            "time" => self.builtin_time(tokens),
            "math" => self.builtin_math(tokens, line_num, line)?,
            _ => return Ok(None),
        }
        Ok(Some(()))
    }

    fn builtin_let(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        if tokens.len() < 4 || tokens[2] != "=" {
            return Err(SpokeError::syntax(line_num, line, "malformed let statement"));
        }
        let name = tokens[1].clone();
        let value = if tokens.len() == 4 {
            get_val(&self.env, &tokens[3])
        } else if tokens.len() == 6 {
            let l = get_val(&self.env, &tokens[3]);
            let r = get_val(&self.env, &tokens[5]);
            apply_arith(&l, &tokens[4], &r, line_num, line)?
        } else {
            return Err(SpokeError::syntax(line_num, line, "malformed let statement"));
        };
        self.env.set(name, value);
        Ok(())
    }

    fn builtin_print(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        if tokens.len() >= 2 && tokens[1] == "(" {
            let close = tokens.iter().position(|t| t == ")").unwrap_or(tokens.len());
            let rendered: Vec<String> = tokens[2..close].iter().map(|t| display_token(t)).collect();
            println!("{}", rendered.join(" "));
            Ok(())
        } else if tokens.len() == 2 {
            let name = &tokens[1];
            match self.env.get(name) {
                Some(v) => {
                    println!("{v}");
                    Ok(())
                }
                None => Err(SpokeError::runtime(
                    line_num,
                    line,
                    format!("undefined variable '{name}'"),
                )),
            }
        } else {
            Err(SpokeError::syntax(line_num, line, "malformed print statement"))
        }
    }

    fn builtin_input(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        if tokens.len() < 2 {
            return Err(SpokeError::syntax(line_num, line, "malformed input statement"));
        }
        let var = tokens.last().unwrap().clone();
        if tokens.len() > 2 {
            let prompt: Vec<String> = tokens[1..tokens.len() - 1]
                .iter()
                .map(|t| display_token(t))
                .collect();
            print!("{} ", prompt.join(" "));
        } else {
            print!("? ");
        }
        io::stdout().flush().ok();
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .map_err(|e| SpokeError::internal(line_num, line, e.to_string()))?;
        let trimmed = buf.trim_end_matches(['\n', '\r']);
        let value = if let Ok(i) = trimmed.parse::<i64>() {
            Value::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            Value::Float(f)
        } else {
            Value::Str(trimmed.to_string())
        };
        self.env.set(var, value);
        Ok(())
    }

    fn builtin_pause(&mut self, tokens: &[String]) {
        if tokens.get(1).map(String::as_str) == Some("loud") {
            let msg: Vec<String> = tokens[2..].iter().map(|t| display_token(t)).collect();
            if !msg.is_empty() {
                print!("{} ", msg.join(" "));
                io::stdout().flush().ok();
            }
        }
        let mut buf = String::new();
        let _ = io::stdin().read_line(&mut buf);
    }

    fn builtin_sleep(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let secs = tokens
            .get(1)
            .map(|t| get_val(&self.env, t))
            .and_then(|v| v.as_f64())
            .ok_or_else(|| SpokeError::runtime(line_num, line, "sleep requires a numeric duration"))?;
        std::thread::sleep(std::time::Duration::from_secs_f64(secs.max(0.0)));
        Ok(())
    }

    fn builtin_countdown(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let n = tokens
            .get(1)
            .map(|t| get_val(&self.env, t))
            .and_then(|v| v.as_f64())
            .ok_or_else(|| SpokeError::runtime(line_num, line, "countdown requires a numeric count"))?
            as i64;
        let loud = tokens.get(2).map(String::as_str) == Some("loud");
        let mut remaining = n;
        while remaining >= 1 {
            if loud {
                println!("{remaining}");
            }
            std::thread::sleep(std::time::Duration::from_secs(1));
            remaining -= 1;
        }
        Ok(())
    }

    fn builtin_quit(&mut self, tokens: &[String]) {
        if tokens.get(1).map(String::as_str) == Some("loud") {
            let msg: Vec<String> = tokens[2..].iter().map(|t| display_token(t)).collect();
            if !msg.is_empty() {
                println!("{}", msg.join(" "));
            }
        }
        std::process::exit(0);
    }

    fn builtin_toggle(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let name = tokens
            .get(1)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "toggle requires a variable"))?;
        let current = self.env.get(name).cloned().ok_or_else(|| {
            SpokeError::runtime(line_num, line, format!("undefined variable '{name}'"))
        })?;
        let toggled = match &current {
            Value::Int(0) => Value::Int(1),
            Value::Int(1) => Value::Int(0),
            Value::Str(s) if s == "true" => Value::Str("false".to_string()),
            Value::Str(s) if s == "false" => Value::Str("true".to_string()),
            _ => {
                return Err(SpokeError::runtime(
                    line_num,
                    line,
                    "toggle requires a 0/1 or true/false variable",
                ))
            }
        };
        self.env.set(name.clone(), toggled.clone());
        if tokens.get(2).map(String::as_str) == Some("loud") {
            println!("{toggled}");
        }
        Ok(())
    }

    fn builtin_swap(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let a = tokens
            .get(1)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "swap requires two variables"))?;
        let b = tokens
            .get(2)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "swap requires two variables"))?;
        let va = self
            .env
            .get(a)
            .cloned()
            .ok_or_else(|| SpokeError::runtime(line_num, line, format!("undefined variable '{a}'")))?;
        let vb = self
            .env
            .get(b)
            .cloned()
            .ok_or_else(|| SpokeError::runtime(line_num, line, format!("undefined variable '{b}'")))?;
        self.env.set(a.clone(), vb);
        self.env.set(b.clone(), va);
        Ok(())
    }

    fn builtin_compare(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let a = tokens
            .get(1)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "compare requires two variables"))?;
        let b = tokens
            .get(2)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "compare requires two variables"))?;
        let va = self
            .env
            .get(a)
            .cloned()
            .ok_or_else(|| SpokeError::runtime(line_num, line, format!("undefined variable '{a}'")))?;
        let vb = self
            .env
            .get(b)
            .cloned()
            .ok_or_else(|| SpokeError::runtime(line_num, line, format!("undefined variable '{b}'")))?;
        let (fa, fb) = match (va.as_f64(), vb.as_f64()) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(SpokeError::runtime(line_num, line, "compare requires numeric variables")),
        };
        let verdict = if fa == fb {
            "Equal"
        } else if fa > fb {
            "Greater Than"
        } else {
            "Less than"
        };
        if tokens.get(3).map(String::as_str) == Some("names") {
            println!("{a} {verdict} {b}");
        } else {
            println!("{verdict}");
        }
        Ok(())
    }

    fn builtin_length(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let name = tokens
            .get(1)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "length requires a variable"))?;
        let value = self.env.get(name).cloned().ok_or_else(|| {
            SpokeError::runtime(line_num, line, format!("undefined variable '{name}'"))
        })?;
        let len = value.to_string().chars().count() as i64;
        if let Some(out) = tokens.get(2) {
            self.env.set(out.clone(), Value::Int(len));
        } else {
            println!("{len}");
        }
        Ok(())
    }

    fn builtin_shuffle(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        let name = tokens
            .get(1)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "shuffle requires a variable"))?;
        let value = self.env.get(name).cloned().ok_or_else(|| {
            SpokeError::runtime(line_num, line, format!("undefined variable '{name}'"))
        })?;
        let mut chars: Vec<char> = value.to_string().chars().collect();
        chars.shuffle(&mut rand::thread_rng());
        let shuffled: String = chars.into_iter().collect();
        self.env.set(name.clone(), Value::Str(shuffled.clone()));
        if tokens.get(2).map(String::as_str) == Some("loud") {
            println!("{shuffled}");
        }
        Ok(())
    }

    fn builtin_random(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        if tokens.len() < 6 || tokens[1] != "(" || tokens[4] != ")" {
            return Err(SpokeError::syntax(line_num, line, "malformed random statement"));
        }
        let low = get_val(&self.env, &tokens[2]);
        let high = get_val(&self.env, &tokens[3]);
        let (low, high) = match (low.as_f64(), high.as_f64()) {
            (Some(l), Some(h)) => (l as i64, h as i64),
            _ => return Err(SpokeError::runtime(line_num, line, "random bounds must be numeric")),
        };
        if low > high {
            return Err(SpokeError::runtime(line_num, line, "random low bound exceeds high bound"));
        }
        let name = tokens
            .get(5)
            .ok_or_else(|| SpokeError::syntax(line_num, line, "random requires an output variable"))?;
        let value = rand::thread_rng().gen_range(low..=high);
        self.env.set(name.clone(), Value::Int(value));
        if tokens.get(6).map(String::as_str) == Some("loud") {
            println!("{value}");
        }
        Ok(())
    }

    fn builtin_time(&mut self, tokens: &[String]) {
        let now = format_timestamp(std::time::SystemTime::now());
        if let Some(name) = tokens.get(1) {
            self.env.set(name.clone(), Value::Str(now));
        } else {
            println!("{now}");
        }
    }

    fn builtin_math(&mut self, tokens: &[String], line_num: usize, line: &str) -> Result<(), SpokeError> {
        if tokens.len() < 4 {
            return Err(SpokeError::syntax(line_num, line, "malformed math statement"));
        }
        let l = get_val(&self.env, &tokens[1]);
        let r = get_val(&self.env, &tokens[3]);
        let result = apply_arith(&l, &tokens[2], &r, line_num, line)?;
        // A bare `math a + b` implicitly means loud, mirroring the original's
        // `if len(tokens) == 4: tokens.append('loud')`.
        let loud = if tokens.len() == 4 { true } else { tokens[4] == "loud" };
        if let Some(out) = tokens.get(5) {
            self.env.set(out.clone(), result.clone());
        }
        if loud {
            println!("{result}");
        }
        Ok(())
    }
}

/// Formats a `SystemTime` as `YYYY-MM-DD HH:MM:SS` UTC, matching
/// `time.strftime("%Y-%m-%d %H:%M:%S")` from the original source (there is
/// no calendar-formatting crate anywhere in this codebase's lineage to
/// reach for, so this is a direct civil-calendar conversion from a Unix
/// timestamp rather than a borrowed dependency).
fn format_timestamp(t: std::time::SystemTime) -> String {
    let secs = t
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    let days = secs.div_euclid(86_400);
    let time_of_day = secs.rem_euclid(86_400);
    let (hour, minute, second) = (time_of_day / 3600, (time_of_day / 60) % 60, time_of_day % 60);

    // Howard Hinnant's civil_from_days algorithm.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { y + 1 } else { y };

    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}")
}

fn extract_condition(line: &str) -> Option<Vec<String>> {
    let open = line.find('(')?;
    let close_rel = line[open..].find(')')?;
    Some(lex(&line[open + 1..open + close_rel]))
}

/// Shared arithmetic for `let NAME = L OP R` and `math`. Int/int stays int
/// except division, which always yields float; mixing int and float
/// promotes to float.
fn apply_arith(l: &Value, op: &str, r: &Value, line_num: usize, line: &str) -> Result<Value, SpokeError> {
    let lf = l
        .as_f64()
        .ok_or_else(|| SpokeError::runtime(line_num, line, "arithmetic on non-numeric value"))?;
    let rf = r
        .as_f64()
        .ok_or_else(|| SpokeError::runtime(line_num, line, "arithmetic on non-numeric value"))?;

    if op == "/" {
        if rf == 0.0 {
            return Err(SpokeError::runtime(line_num, line, "division by zero"));
        }
        return Ok(Value::Float(lf / rf));
    }

    if l.is_int() && r.is_int() {
        let (li, ri) = match (l, r) {
            (Value::Int(a), Value::Int(b)) => (*a, *b),
            _ => unreachable!(),
        };
        return match op {
            "+" => Ok(Value::Int(li + ri)),
            "-" => Ok(Value::Int(li - ri)),
            "*" => Ok(Value::Int(li * ri)),
            "%" => {
                if ri == 0 {
                    Err(SpokeError::runtime(line_num, line, "division by zero"))
                } else {
                    Ok(Value::Int(li % ri))
                }
            }
            _ => Err(SpokeError::syntax(line_num, line, format!("unknown operator '{op}'"))),
        };
    }

    match op {
        "+" => Ok(Value::Float(lf + rf)),
        "-" => Ok(Value::Float(lf - rf)),
        "*" => Ok(Value::Float(lf * rf)),
        "%" => {
            if rf == 0.0 {
                Err(SpokeError::runtime(line_num, line, "division by zero"))
            } else {
                Ok(Value::Float(lf % rf))
            }
        }
        _ => Err(SpokeError::syntax(line_num, line, format!("unknown operator '{op}'"))),
    }
}
