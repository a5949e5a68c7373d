use std::{collections::HashMap, rc::Rc};

use crate::{
    error::{Error, EvalError},
    expr::{Ctx, Operands},
    lexer::{tokenize, Lexeme, Token},
    statement::{classify, StatementKind},
    store::VariableStore,
    turtle::{palette_index, Canvas, MoveCmd, PenState},
    value::Value,
};

/// What to do when a statement fails in a way that doesn't break the rest of the program.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Stop at the first error.
    #[default]
    Abort,
    /// Skip the failing statement, remember the error, and carry on.
    Continue,
}

#[derive(Clone, Debug)]
pub struct Config {
    /// The maximum number of statements (including loop tests) a run may execute.
    pub max_steps: u64,
    /// How deeply procedure calls and `if`/`while` bodies may nest.
    pub max_call_depth: usize,
    pub error_policy: ErrorPolicy,
    pub start: PenState,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            max_steps: 1_000_000,
            max_call_depth: 128,
            error_policy: ErrorPolicy::Abort,
            start: PenState::default(),
        }
    }
}

/// A line of the program, remembering where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    /// 1-based.
    pub number: usize,
    pub text: String,
}

impl Line {
    fn error(&self, source: EvalError) -> Error {
        Error {
            line: self.number,
            content: self.text.trim().to_owned(),
            source,
        }
    }
}

pub fn lines(program: &str) -> Vec<Line> {
    program
        .lines()
        .enumerate()
        .map(|(i, text)| Line {
            number: i + 1,
            text: text.to_owned(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Procedure {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Line>,
}

/// The outcome of a successful run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub steps: u64,
    pub segments: usize,
    /// Errors that were skipped under [`ErrorPolicy::Continue`].
    pub diagnostics: Vec<Error>,
}

/// An interpreter session: one turtle, its variables and its procedures.
///
/// Sessions share nothing, so any number of them can run side by side.
#[derive(Debug)]
pub struct Interpreter {
    config: Config,
    pen: PenState,
    store: VariableStore,
    procs: HashMap<String, Rc<Procedure>>,
    steps: u64,
    depth: usize,
    segments: usize,
    diagnostics: Vec<Error>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(Config::default())
    }
}

/// Which line closes a block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Closer {
    Brace,
    End,
}

impl Closer {
    fn word(self) -> &'static str {
        match self {
            Closer::Brace => "}",
            Closer::End => "end",
        }
    }

    fn closes(self, lexemes: &[Lexeme]) -> bool {
        let tok = match self {
            Closer::Brace => Token::RBrace,
            Closer::End => Token::End,
        };
        matches!(lexemes, [only] if only.token == tok)
    }
}

fn opens(lexemes: &[Lexeme]) -> Option<Closer> {
    match (lexemes.first(), lexemes.last()) {
        (Some(first), _) if first.token == Token::Comment => None,
        (Some(first), _) if first.token == Token::To => Some(Closer::End),
        (_, Some(last)) if last.token == Token::LBrace => Some(Closer::Brace),
        _ => None,
    }
}

fn check_brace(line: &Line, lexemes: &[Lexeme]) -> Result<(), Error> {
    match lexemes.last() {
        Some(last) if lexemes.len() > 1 && last.token == Token::LBrace => Ok(()),
        _ => Err(line.error(EvalError::MissingBrace {
            proc: lexemes[0].word.to_lowercase(),
        })),
    }
}

/// Find the index of the line closing the block opened by `lines[start]`.
fn block_end(lines: &[Line], start: usize, closer: Closer) -> Result<usize, Error> {
    let mut open = vec![closer];
    for (i, line) in lines.iter().enumerate().skip(start + 1) {
        let lexemes = tokenize(&line.text);
        if let Some(&innermost) = open.last() {
            if innermost.closes(&lexemes) {
                open.pop();
                if open.is_empty() {
                    return Ok(i);
                }
                continue;
            }
        }
        if let Some(inner) = opens(&lexemes) {
            open.push(inner);
        }
    }

    let keyword = tokenize(&lines[start].text)
        .first()
        .map(|l| l.word.to_lowercase())
        .unwrap_or_default();
    Err(lines[start].error(EvalError::UnterminatedBlock {
        keyword,
        closer: closer.word(),
    }))
}

impl Interpreter {
    pub fn new(config: Config) -> Interpreter {
        Interpreter {
            pen: config.start.clone(),
            config,
            store: VariableStore::default(),
            procs: HashMap::new(),
            steps: 0,
            depth: 0,
            segments: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    pub fn store(&self) -> &VariableStore {
        &self.store
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procs.get(&name.to_lowercase()).map(|p| p.as_ref())
    }

    /// Run a whole program, drawing onto `canvas`.
    ///
    /// Pen state, variables and procedures carry over between runs of the same session; the step
    /// budget does not.
    pub fn run(&mut self, program: &str, canvas: &mut dyn Canvas) -> Result<Report, Error> {
        self.steps = 0;
        self.segments = 0;
        self.depth = 0;
        self.diagnostics.clear();

        self.exec_lines(&lines(program), canvas)?;

        log::debug!(
            "finished after {} steps, {} segments",
            self.steps,
            self.segments
        );
        Ok(Report {
            steps: self.steps,
            segments: self.segments,
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }

    fn ctx(&self) -> Ctx<'_> {
        Ctx {
            store: &self.store,
            pen: &self.pen,
        }
    }

    fn tick(&mut self, line: &Line) -> Result<(), Error> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(line.error(EvalError::StepLimit(self.config.max_steps)));
        }
        Ok(())
    }

    /// Apply the error policy to the result of a statement.
    ///
    /// Returns `Ok(None)` if the statement failed but the run should go on.
    fn check<T>(&mut self, line: &Line, res: Result<T, EvalError>) -> Result<Option<T>, Error> {
        match res {
            Ok(x) => Ok(Some(x)),
            Err(e) if e.is_recoverable() && self.config.error_policy == ErrorPolicy::Continue => {
                let e = line.error(e);
                log::warn!("skipping statement: {e}");
                self.diagnostics.push(e);
                Ok(None)
            }
            Err(e) => Err(line.error(e)),
        }
    }

    pub fn exec_lines(&mut self, lines: &[Line], canvas: &mut dyn Canvas) -> Result<(), Error> {
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let lexemes = tokenize(&line.text);
            let Some(first) = lexemes.first() else {
                i += 1;
                continue;
            };

            let kind = classify(first.token);
            if kind == StatementKind::Comment {
                i += 1;
                continue;
            }
            self.tick(line)?;
            log::debug!("{}: {}", line.number, line.text.trim());

            match kind {
                StatementKind::Comment => {}
                StatementKind::PenMovement(cmd) => {
                    let res = self.movement(cmd, &lexemes, canvas);
                    self.check(line, res)?;
                }
                StatementKind::PenColor => {
                    let res = self.pen_color(&lexemes);
                    self.check(line, res)?;
                }
                StatementKind::VariableDeclaration => {
                    let res = self.make(&lexemes);
                    self.check(line, res)?;
                }
                StatementKind::AddAssign => {
                    let res = self.add_assign(&lexemes);
                    self.check(line, res)?;
                }
                StatementKind::If => {
                    check_brace(line, &lexemes)?;
                    let end = block_end(lines, i, Closer::Brace)?;
                    self.exec_if(line, &lexemes, &lines[i + 1..end], canvas)?;
                    i = end;
                }
                StatementKind::While => {
                    check_brace(line, &lexemes)?;
                    let end = block_end(lines, i, Closer::Brace)?;
                    self.exec_while(line, &lexemes, &lines[i + 1..end], canvas)?;
                    i = end;
                }
                StatementKind::FunctionDeclaration => {
                    let end = block_end(lines, i, Closer::End)?;
                    let proc = parse_header(&lexemes, &lines[i + 1..end])
                        .map_err(|e| line.error(e))?;
                    log::debug!("defined {}", proc.name);
                    self.procs.insert(proc.name.clone(), Rc::new(proc));
                    i = end;
                }
                StatementKind::Erroneous => {
                    let proc = match first.token {
                        Token::Ident => self.procs.get(&first.word.to_lowercase()).cloned(),
                        _ => None,
                    };
                    let Some(proc) = proc else {
                        return Err(line.error(EvalError::Erroneous {
                            word: first.word.to_owned(),
                        }));
                    };
                    self.call(line, &proc, &lexemes[1..], canvas)?;
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn movement(
        &mut self,
        cmd: MoveCmd,
        lexemes: &[Lexeme],
        canvas: &mut dyn Canvas,
    ) -> Result<(), EvalError> {
        let mut args = Operands::new(cmd.name(), &lexemes[1..]);
        let amount = if cmd.takes_amount() {
            args.next_num(self.ctx())?
        } else {
            0.0
        };
        args.finish()?;

        if self.pen.apply(cmd, amount, canvas).is_some() {
            self.segments += 1;
        }
        Ok(())
    }

    fn pen_color(&mut self, lexemes: &[Lexeme]) -> Result<(), EvalError> {
        let mut args = Operands::new("setpencolor", &lexemes[1..]);
        let x = args.next_num(self.ctx())?;
        args.finish()?;
        self.pen.color = palette_index(x).ok_or(EvalError::BadColor(x))?;
        Ok(())
    }

    fn make(&mut self, lexemes: &[Lexeme]) -> Result<(), EvalError> {
        let mut args = Operands::new("make", &lexemes[1..]);
        let name = args.next_name()?;

        // A lone reference is stored as-is, and only followed when the variable is used.
        let lone_ref = args.remaining() == 1 && args.peek().map(|l| l.token) == Some(Token::Var);
        let val = if lone_ref {
            Value::Text(args.next_raw()?.word.to_owned())
        } else {
            args.next_value(self.ctx())?
        };
        args.finish()?;
        self.store.make(name, val);
        Ok(())
    }

    fn add_assign(&mut self, lexemes: &[Lexeme]) -> Result<(), EvalError> {
        let mut args = Operands::new("addassign", &lexemes[1..]);
        let name = args.next_name()?;
        let delta = args.next_num(self.ctx())?;
        args.finish()?;

        let cur = f64::try_from(self.store.lookup(name)?).map_err(|arg| {
            EvalError::TypeMismatch {
                proc: "addassign".to_owned(),
                expected: "number",
                arg,
            }
        })?;
        self.store.make(name, Value::Num(cur + delta));
        Ok(())
    }

    /// Evaluate the test of an `if` or `while` line. The caller has checked for the trailing `{`.
    fn condition(&self, lexemes: &[Lexeme]) -> Result<bool, EvalError> {
        let proc = lexemes[0].word;
        let test = &lexemes[1..lexemes.len() - 1];
        let mut args = Operands::new(proc, test);
        let cond = args.next_bool(self.ctx())?;
        args.finish()?;
        Ok(cond)
    }

    fn exec_if(
        &mut self,
        line: &Line,
        lexemes: &[Lexeme],
        body: &[Line],
        canvas: &mut dyn Canvas,
    ) -> Result<(), Error> {
        let res = self.condition(lexemes);
        if let Some(true) = self.check(line, res)? {
            self.nested(line, |interp| interp.exec_lines(body, canvas))?;
        }
        Ok(())
    }

    fn exec_while(
        &mut self,
        line: &Line,
        lexemes: &[Lexeme],
        body: &[Line],
        canvas: &mut dyn Canvas,
    ) -> Result<(), Error> {
        loop {
            let res = self.condition(lexemes);
            if self.check(line, res)? != Some(true) {
                return Ok(());
            }
            self.nested(line, |interp| interp.exec_lines(body, canvas))?;
            self.tick(line)?;
        }
    }

    fn call(
        &mut self,
        line: &Line,
        proc: &Procedure,
        inputs: &[Lexeme],
        canvas: &mut dyn Canvas,
    ) -> Result<(), Error> {
        let res = self.bind_args(proc, inputs);
        let Some(vars) = self.check(line, res)? else {
            return Ok(());
        };

        self.nested(line, |interp| {
            interp.scoped(vars, |interp| interp.exec_lines(&proc.body, canvas))
        })
    }

    fn bind_args(
        &self,
        proc: &Procedure,
        inputs: &[Lexeme],
    ) -> Result<HashMap<String, Value>, EvalError> {
        let mut args = Operands::new(&proc.name, inputs);
        let mut vars = HashMap::new();
        for param in &proc.params {
            vars.insert(param.clone(), args.next_value(self.ctx())?);
        }
        args.finish()?;
        Ok(vars)
    }

    /// Run `f` one level deeper, failing if that's deeper than the configured limit.
    fn nested<U>(
        &mut self,
        line: &Line,
        f: impl FnOnce(&mut Interpreter) -> Result<U, Error>,
    ) -> Result<U, Error> {
        if self.depth >= self.config.max_call_depth {
            return Err(line.error(EvalError::CallDepth(self.config.max_call_depth)));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    fn scoped<U>(
        &mut self,
        vars: HashMap<String, Value>,
        f: impl FnOnce(&mut Interpreter) -> U,
    ) -> U {
        self.store.push_frame(vars);
        let res = f(self);
        self.store.pop_frame();
        res
    }
}

/// Read `to name :param ...` and the lines of its body.
fn parse_header(lexemes: &[Lexeme], body: &[Line]) -> Result<Procedure, EvalError> {
    let mut args = Operands::new("to", &lexemes[1..]);
    let name = args.next_raw()?;
    if name.token != Token::Ident {
        return Err(EvalError::BadInput {
            proc: "to".to_owned(),
            word: name.word.to_owned(),
        });
    }

    let mut params = Vec::new();
    while args.peek().is_some() {
        let param = args.next_raw()?;
        let Some(var) = param.var_name() else {
            return Err(EvalError::BadInput {
                proc: "to".to_owned(),
                word: param.word.to_owned(),
            });
        };
        params.push(var.to_owned());
    }

    Ok(Procedure {
        name: name.word.to_lowercase(),
        params,
        body: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::Segment;

    fn exec_with(
        config: Config,
        program: &str,
    ) -> (Interpreter, Vec<Segment>, Result<Report, Error>) {
        let mut interp = Interpreter::new(config);
        let mut segs = Vec::new();
        let res = interp.run(program, &mut segs);
        (interp, segs, res)
    }

    fn exec(program: &str) -> (Interpreter, Vec<Segment>, Result<Report, Error>) {
        exec_with(Config::default(), program)
    }

    fn assert_approx(p: (f32, f32), x: f32, y: f32) {
        assert!((p.0 - x).abs() < 1e-4 && (p.1 - y).abs() < 1e-4, "{p:?} != ({x}, {y})");
    }

    #[test]
    fn blank_and_comment_lines_do_nothing() {
        let (interp, segs, res) = exec("\n   \n// forward 10\n\t\n");
        let report = res.unwrap();
        assert_eq!(report.steps, 0);
        assert!(segs.is_empty());
        assert_eq!(interp.pen(), &PenState::default());
        assert!(!interp.store().contains("x"));
    }

    #[test]
    fn pendown_forward_draws() {
        let (interp, segs, res) = exec("pendown\nforward 5");
        assert_eq!(res.unwrap().segments, 1);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].start, (1.0, 0.0));
        assert_eq!(segs[0].end, (6.0, 0.0));
        assert_eq!(interp.pen().pos.x, 6.0);

        let (_, segs, _) = exec("penup\nforward 5");
        assert!(segs.is_empty());
    }

    #[test]
    fn left_moves_sideways() {
        let (interp, segs, res) = exec("left 90\npendown\nforward 1");
        res.unwrap();
        // `left 90` itself moves 90 units sideways; the heading stays at 0.
        assert_eq!(interp.pen().heading, 0.0);
        assert_approx(segs[0].start, 1.0, 90.0);
        assert_approx(segs[0].end, 2.0, 90.0);

        let (interp, _, res) = exec("turn 90\nleft 1");
        res.unwrap();
        assert!((interp.pen().pos.x - 0.0).abs() < 1e-9);
        assert!((interp.pen().pos.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn quoted_amounts() {
        let (interp, _, res) = exec("forward \"10\nsetheading \"90\nsety -3");
        res.unwrap();
        assert_eq!(interp.pen().pos.x, 11.0);
        assert_eq!(interp.pen().pos.y, -3.0);
        assert_eq!(interp.pen().heading, 90.0);
    }

    #[test]
    fn variables() {
        let (interp, _, res) = exec(
            "make \"len 3\nmake \"alias :len\nforward :alias\naddassign \"len 2\nforward :alias",
        );
        res.unwrap();
        assert_eq!(interp.pen().pos.x, 9.0);
        assert_eq!(interp.store().get("alias"), Some(&Value::reference("len")));
        assert_eq!(interp.store().lookup("len"), Ok(Value::Num(5.0)));
    }

    #[test]
    fn cyclic_references() {
        let (_, _, res) = exec("make \"a :b\nmake \"b :a\nforward :a");
        let err = res.unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.content, "forward :a");
        assert!(matches!(err.source, EvalError::CyclicReference { .. }));
    }

    #[test]
    fn undefined_variable() {
        let (interp, _, res) = exec("forward 1\nforward :nope\nforward 1");
        let err = res.unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.source,
            EvalError::Undefined {
                name: "nope".to_owned()
            }
        );
        assert_eq!(interp.pen().pos.x, 2.0);
    }

    #[test]
    fn keep_going() {
        let config = Config {
            error_policy: ErrorPolicy::Continue,
            ..Config::default()
        };
        let program = "forward 1\nforward :nope\nsetpencolor 99\nforward 1";
        let (interp, _, res) = exec_with(config, program);
        let report = res.unwrap();
        assert_eq!(interp.pen().pos.x, 3.0);
        assert_eq!(report.diagnostics.len(), 2);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.diagnostics[1].source, EvalError::BadColor(99.0));

        // Broken statements still stop the run.
        let config = Config {
            error_policy: ErrorPolicy::Continue,
            ..Config::default()
        };
        let (_, _, res) = exec_with(config, "forward\nforward 1");
        assert!(matches!(
            res.unwrap_err().source,
            EvalError::NotEnoughInputs { .. }
        ));
    }

    #[test]
    fn erroneous_lines_abort() {
        let (interp, _, res) = exec("forward 1\nfly 10\nforward 1");
        let err = res.unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.source,
            EvalError::Erroneous {
                word: "fly".to_owned()
            }
        );
        assert_eq!(interp.pen().pos.x, 2.0);
    }

    #[test]
    fn pen_color() {
        let (interp, segs, res) =
            exec("setpencolor 4\npendown\nforward 1\nsetpencolor + color 1\nforward 1");
        res.unwrap();
        assert_eq!(interp.pen().color, 5);
        assert_eq!(segs[0].color, crate::turtle::PALETTE[4]);
        assert_eq!(segs[1].color, crate::turtle::PALETTE[5]);
    }

    #[test]
    fn if_blocks() {
        let program = "make \"x 2
if == :x 2 {
  forward 1
  if > :x 5 {
    forward 100
  }
}
if false {
  forward 1000
}
forward 1";
        let (interp, _, res) = exec(program);
        res.unwrap();
        assert_eq!(interp.pen().pos.x, 3.0);
    }

    #[test]
    fn if_needs_a_boolean() {
        let (_, _, res) = exec("if 1 {\n}");
        assert!(matches!(
            res.unwrap_err().source,
            EvalError::TypeMismatch { expected: "boolean", .. }
        ));
        let (_, _, res) = exec("if {\n}");
        assert!(matches!(
            res.unwrap_err().source,
            EvalError::NotEnoughInputs { .. }
        ));
        let (_, _, res) = exec("if true\nforward 1\n}");
        assert_eq!(
            res.unwrap_err().source,
            EvalError::MissingBrace {
                proc: "if".to_owned()
            }
        );
    }

    #[test]
    fn while_loops() {
        let program = "make \"n 0
pendown
while < :n 4 {
  forward 1
  addassign \"n 1
}";
        let (interp, segs, res) = exec(program);
        res.unwrap();
        assert_eq!(segs.len(), 4);
        assert_eq!(interp.pen().pos.x, 5.0);
        assert_eq!(interp.store().lookup("n"), Ok(Value::Num(4.0)));
    }

    #[test]
    fn runaway_loops_stop() {
        let config = Config {
            max_steps: 100,
            ..Config::default()
        };
        let (_, _, res) = exec_with(config, "while true {\n}");
        let err = res.unwrap_err();
        assert_eq!(err.source, EvalError::StepLimit(100));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn unterminated_blocks() {
        let (_, _, res) = exec("forward 1\nwhile true {\nforward 1");
        let err = res.unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.source,
            EvalError::UnterminatedBlock {
                keyword: "while".to_owned(),
                closer: "}"
            }
        );

        let (_, _, res) = exec("to f\nforward 1\n");
        assert!(matches!(
            res.unwrap_err().source,
            EvalError::UnterminatedBlock { closer: "end", .. }
        ));
    }

    #[test]
    fn stray_closers_are_erroneous() {
        let (_, _, res) = exec("}");
        assert!(matches!(res.unwrap_err().source, EvalError::Erroneous { .. }));
        let (_, _, res) = exec("end");
        assert!(matches!(res.unwrap_err().source, EvalError::Erroneous { .. }));
    }

    #[test]
    fn procedures() {
        let program = "to step :len :times
  make \"i 0
  while < :i :times {
    forward :len
    addassign \"i 1
  }
end
step 2 3
Step :i 1";
        let (interp, _, res) = exec(program);
        res.unwrap();
        // `i` wasn't a parameter, so `make` created a global.
        assert_eq!(interp.store().lookup("i"), Ok(Value::Num(1.0)));
        assert!(!interp.store().contains("len"));
        assert_eq!(interp.pen().pos.x, 1.0 + 6.0 + 3.0);
        assert_eq!(interp.procedure("STEP").unwrap().params, vec!["len", "times"]);
    }

    #[test]
    fn procedure_errors() {
        let (_, _, res) = exec("to f :x\nforward :x\nend\nf");
        let err = res.unwrap_err();
        assert_eq!(err.line, 4);
        assert!(matches!(err.source, EvalError::NotEnoughInputs { .. }));

        let (_, _, res) = exec("to f\nforward :nope\nend\nf");
        assert_eq!(res.unwrap_err().line, 2);

        let (_, _, res) = exec("to forward\nend");
        assert!(matches!(res.unwrap_err().source, EvalError::BadInput { .. }));

        let (_, _, res) = exec("f\nto f\nend");
        assert!(matches!(res.unwrap_err().source, EvalError::Erroneous { .. }));
    }

    #[test]
    fn recursion_is_bounded() {
        let config = Config {
            max_call_depth: 32,
            ..Config::default()
        };
        let (_, _, res) = exec_with(config, "to f\nf\nend\nf");
        let err = res.unwrap_err();
        assert_eq!(err.source, EvalError::CallDepth(32));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn comments_ending_in_a_brace() {
        let (interp, segs, res) =
            exec("pendown\nif true {\n// draw a side {\nforward 1\n}\nforward 1");
        res.unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(interp.pen().pos.x, 3.0);

        let (interp, _, res) = exec("to f\n// while true {\nforward 2\nend\nf\nf");
        res.unwrap();
        assert_eq!(interp.pen().pos.x, 5.0);
    }

    #[test]
    fn block_nesting_is_bounded() {
        let config = Config {
            max_call_depth: 50,
            ..Config::default()
        };
        let program = format!("{}{}", "if true {\n".repeat(3_000), "}\n".repeat(3_000));
        let (_, _, res) = exec_with(config, &program);
        let err = res.unwrap_err();
        assert_eq!(err.source, EvalError::CallDepth(50));
        assert_eq!(err.line, 51);

        let program = format!("{}{}", "while true {\n".repeat(3_000), "}\n".repeat(3_000));
        let (_, _, res) = exec(&program);
        assert_eq!(res.unwrap_err().source, EvalError::CallDepth(128));
    }

    #[test]
    fn recursion_through_blocks_is_bounded() {
        let (interp, _, res) = exec("to f\nif true {\nwhile true {\nf\n}\n}\nend\nf");
        assert_eq!(res.unwrap_err().source, EvalError::CallDepth(128));
        assert_eq!(interp.depth, 0);
    }

    #[test]
    fn sessions_are_independent() {
        let mut a = Interpreter::default();
        let mut b = Interpreter::default();
        let mut segs = Vec::new();
        a.run("make \"x 1\nforward 10", &mut segs).unwrap();
        b.run("forward 1", &mut segs).unwrap();
        assert_eq!(a.pen().pos.x, 11.0);
        assert_eq!(b.pen().pos.x, 2.0);
        assert!(!b.store().contains("x"));

        // A session keeps its state between runs.
        a.run("forward :x", &mut segs).unwrap();
        assert_eq!(a.pen().pos.x, 12.0);
    }
}
