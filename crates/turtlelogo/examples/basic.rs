use turtlelogo::Interpreter;

const SQUARE: &str = r#"
to square :n
  make "i 0
  while < :i 4 {
    forward :n
    turn 90
    addassign "i 1
  }
end
pendown
square 90
"#;

fn main() {
    let mut interp = Interpreter::default();
    let mut output = Vec::new();
    interp.run(SQUARE, &mut output).unwrap();
    dbg!(output);
}
