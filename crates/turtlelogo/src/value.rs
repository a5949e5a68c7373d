#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Num(f64),
    Bool(bool),
    /// Plain text, or a reference to another variable when it starts with `:`.
    Text(String),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Text(_) => "word",
        }
    }

    pub fn reference(name: &str) -> Value {
        Value::Text(format!(":{name}"))
    }

    /// The name this value refers to, if it is a reference.
    pub fn referent(&self) -> Option<&str> {
        match self {
            Value::Text(s) => s.strip_prefix(':'),
            _ => None,
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Value> {
        match value {
            Value::Num(x) => Ok(x),
            other => Err(other),
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(x) => Ok(x),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Num(x) => x.fmt(f),
            Value::Bool(x) => x.fmt(f),
            Value::Text(s) if s.starts_with(':') => s.fmt(f),
            Value::Text(s) => write!(f, "\"{s}"),
        }
    }
}
