use std::collections::{HashMap, HashSet};

use crate::value::Value;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ResolveError {
    #[error("{0} has no value")]
    Undefined(String),
    #[error(":{0} refers back to itself")]
    CyclicReference(String),
}

#[derive(Debug)]
pub struct VariableStore {
    // Invariant: this is always non-empty, and the first frame holds the globals.
    frames: Vec<HashMap<String, Value>>,
}

impl Default for VariableStore {
    fn default() -> Self {
        VariableStore {
            frames: vec![HashMap::new()],
        }
    }
}

impl VariableStore {
    /// The raw (unresolved) value bound to `name`, searching the innermost frame first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Bind `name`, overwriting the innermost existing binding or else creating a global.
    pub fn make(&mut self, name: &str, val: Value) {
        let frame = match self
            .frames
            .iter()
            .rposition(|frame| frame.contains_key(name))
        {
            Some(i) => &mut self.frames[i],
            None => &mut self.frames[0],
        };
        frame.insert(name.to_owned(), val);
    }

    pub fn push_frame(&mut self, vars: HashMap<String, Value>) {
        self.frames.push(vars);
    }

    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Follow references until reaching a number or a boolean.
    ///
    /// Plain text never resolves: a variable can hold a word, but it isn't a usable value.
    pub fn resolve(&self, value: &Value) -> Result<Value, ResolveError> {
        let mut seen = HashSet::new();
        let mut cur = value;
        loop {
            match cur {
                Value::Num(_) | Value::Bool(_) => return Ok(cur.clone()),
                Value::Text(s) => {
                    let Some(name) = s.strip_prefix(':') else {
                        return Err(ResolveError::Undefined(s.clone()));
                    };
                    if !seen.insert(name) {
                        return Err(ResolveError::CyclicReference(name.to_owned()));
                    }
                    cur = self
                        .get(name)
                        .ok_or_else(|| ResolveError::Undefined(name.to_owned()))?;
                }
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Value, ResolveError> {
        self.resolve(&Value::reference(name))
    }
}
