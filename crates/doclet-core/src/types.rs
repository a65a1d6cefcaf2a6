//! Type expression AST.
//!
//! Every node serializes with a `"type"` discriminator naming its variant
//! (`{"type": "NameExpression", "name": "string"}`), which is the shape
//! downstream documentation renderers consume. [`Type`] also implements
//! [`fmt::Display`], producing a canonical type string that parses back to an
//! equal tree.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// A parsed JSDoc / Closure Compiler type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Type {
    /// Identifier or namepath: `Foo.Bar`, `module:m/x`, `event:Foo`.
    NameExpression { name: String },
    /// `*`
    AllLiteral,
    /// Bare `?`
    NullableLiteral,
    /// Bare `!`
    NonNullableLiteral,
    BooleanLiteralType { value: bool },
    NumericLiteralType { value: f64 },
    StringLiteralType { value: String },
    /// `A|B|C` or `(A|B)`.
    UnionType { elements: Vec<Type> },
    /// Bracket-literal array `[A, B, ...C]`.
    ArrayType { elements: Vec<Type> },
    /// `{key: Type, ...}`
    RecordType { fields: Vec<FieldType> },
    /// `function(...)` / `function(...): R`
    FunctionType {
        params: Vec<Type>,
        result: Option<Box<Type>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        this: Option<Box<Type>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new: Option<Box<Type>>,
    },
    /// Named function parameter `a:b`.
    ParameterType { name: String, expression: Box<Type> },
    /// `...T`, or a bare `...` with no expression.
    RestType {
        #[serde(default)]
        expression: Option<Box<Type>>,
    },
    /// `T=`
    OptionalType { expression: Box<Type> },
    /// `?T` (prefix) or `T?` (postfix).
    NullableType { expression: Box<Type>, prefix: bool },
    /// `!T` (prefix) or `T!` (postfix).
    NonNullableType { expression: Box<Type>, prefix: bool },
    /// `Array<T>`, `Array.<T>`, or the `T[]` sugar.
    TypeApplication {
        expression: Box<Type>,
        applications: Vec<Type>,
    },
}

/// One record entry. Keys that look numeric are stored in canonical decimal
/// form (`0x2` → `"2"`, `.2` → `"0.2"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FieldType")]
pub struct FieldType {
    pub key: String,
    pub value: Option<Box<Type>>,
}

impl FieldType {
    pub fn new(key: impl Into<String>, value: Type) -> Self {
        Self {
            key: key.into(),
            value: Some(Box::new(value)),
        }
    }
}

impl Type {
    pub fn name(name: impl Into<String>) -> Self {
        Self::NameExpression { name: name.into() }
    }

    pub fn union(elements: Vec<Type>) -> Self {
        Self::UnionType { elements }
    }

    pub fn nullable(expression: Type, prefix: bool) -> Self {
        Self::NullableType {
            expression: Box::new(expression),
            prefix,
        }
    }

    pub fn non_nullable(expression: Type, prefix: bool) -> Self {
        Self::NonNullableType {
            expression: Box::new(expression),
            prefix,
        }
    }

    pub fn optional(expression: Type) -> Self {
        Self::OptionalType {
            expression: Box::new(expression),
        }
    }

    pub fn rest(expression: Option<Type>) -> Self {
        Self::RestType {
            expression: expression.map(Box::new),
        }
    }

    pub fn application(expression: Type, applications: Vec<Type>) -> Self {
        Self::TypeApplication {
            expression: Box::new(expression),
            applications,
        }
    }

    /// `T[]` sugar: `Array<T>`.
    pub fn array_of(element: Type) -> Self {
        Self::application(Self::name("Array"), vec![element])
    }

    /// Variant name as it appears in the serialized `"type"` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameExpression { .. } => "NameExpression",
            Self::AllLiteral => "AllLiteral",
            Self::NullableLiteral => "NullableLiteral",
            Self::NonNullableLiteral => "NonNullableLiteral",
            Self::BooleanLiteralType { .. } => "BooleanLiteralType",
            Self::NumericLiteralType { .. } => "NumericLiteralType",
            Self::StringLiteralType { .. } => "StringLiteralType",
            Self::UnionType { .. } => "UnionType",
            Self::ArrayType { .. } => "ArrayType",
            Self::RecordType { .. } => "RecordType",
            Self::FunctionType { .. } => "FunctionType",
            Self::ParameterType { .. } => "ParameterType",
            Self::RestType { .. } => "RestType",
            Self::OptionalType { .. } => "OptionalType",
            Self::NullableType { .. } => "NullableType",
            Self::NonNullableType { .. } => "NonNullableType",
            Self::TypeApplication { .. } => "TypeApplication",
        }
    }

    /// The identifier when this is a plain [`Type::NameExpression`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::NameExpression { name } => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self, true)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_key(f, &self.key)?;
        if let Some(value) = &self.value {
            f.write_str(": ")?;
            write_type(f, value, false)?;
        }
        Ok(())
    }
}

fn write_type(f: &mut fmt::Formatter<'_>, ty: &Type, top_level: bool) -> fmt::Result {
    match ty {
        Type::NameExpression { name } => f.write_str(name),
        Type::AllLiteral => f.write_char('*'),
        Type::NullableLiteral => f.write_char('?'),
        Type::NonNullableLiteral => f.write_char('!'),
        Type::BooleanLiteralType { value } => write!(f, "{value}"),
        Type::NumericLiteralType { value } => f.write_str(&format_number(*value)),
        Type::StringLiteralType { value } => write_quoted(f, value),
        Type::UnionType { elements } => {
            let bare = top_level && elements.len() > 1;
            if !bare {
                f.write_char('(')?;
            }
            write_list(f, elements, "|")?;
            if !bare {
                f.write_char(')')?;
            }
            Ok(())
        }
        Type::ArrayType { elements } => {
            f.write_char('[')?;
            write_list(f, elements, ", ")?;
            f.write_char(']')
        }
        Type::RecordType { fields } => {
            f.write_char('{')?;
            for (idx, field) in fields.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{field}")?;
            }
            f.write_char('}')
        }
        Type::FunctionType {
            params,
            result,
            this,
            new,
        } => {
            f.write_str("function(")?;
            let mut first = true;
            for (label, bound) in [("this", this), ("new", new)] {
                if let Some(bound) = bound {
                    if !first {
                        f.write_str(", ")?;
                    }
                    write!(f, "{label}: ")?;
                    write_type(f, bound, false)?;
                    first = false;
                }
            }
            for param in params {
                if !first {
                    f.write_str(", ")?;
                }
                write_type(f, param, false)?;
                first = false;
            }
            f.write_char(')')?;
            if let Some(result) = result {
                f.write_str(": ")?;
                write_type(f, result, false)?;
            }
            Ok(())
        }
        Type::ParameterType { name, expression } => {
            write!(f, "{name}: ")?;
            write_type(f, expression, false)
        }
        Type::RestType { expression } => {
            f.write_str("...")?;
            match expression {
                Some(expression) => write_type(f, expression, false),
                None => Ok(()),
            }
        }
        Type::OptionalType { expression } => {
            write_type(f, expression, false)?;
            f.write_char('=')
        }
        Type::NullableType { expression, prefix } => {
            write_flagged(f, '?', expression, *prefix)
        }
        Type::NonNullableType { expression, prefix } => {
            write_flagged(f, '!', expression, *prefix)
        }
        Type::TypeApplication {
            expression,
            applications,
        } => {
            write_type(f, expression, false)?;
            f.write_char('<')?;
            write_list(f, applications, ", ")?;
            f.write_char('>')
        }
    }
}

fn write_flagged(f: &mut fmt::Formatter<'_>, flag: char, expression: &Type, prefix: bool) -> fmt::Result {
    if prefix {
        f.write_char(flag)?;
        write_type(f, expression, false)
    } else {
        write_type(f, expression, false)?;
        f.write_char(flag)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, elements: &[Type], separator: &str) -> fmt::Result {
    for (idx, element) in elements.iter().enumerate() {
        if idx > 0 {
            f.write_str(separator)?;
        }
        write_type(f, element, false)?;
    }
    Ok(())
}

fn write_key(f: &mut fmt::Formatter<'_>, key: &str) -> fmt::Result {
    if is_plain_key(key) {
        f.write_str(key)
    } else {
        write_quoted(f, key)
    }
}

/// Keys that lex back to themselves without quoting.
fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        Some(_) => key
            .parse::<f64>()
            .map(|n| n.is_finite() && format_number(n) == key)
            .unwrap_or(false),
        None => false,
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Format a number the way JavaScript's `Number.prototype.toString` does
/// (`1e202` → `"1e+202"`, `0.2` → `"0.2"`, `2.0` → `"2"`).
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_number(-value));
    }

    // `{:e}` yields the shortest round-tripping digits, e.g. "1.25e-7".
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let sign = if e >= 0 { '+' } else { '-' };
        if k == 1 {
            format!("{digits}e{sign}{}", e.abs())
        } else {
            let (lead, rest) = digits.split_at(1);
            format!("{lead}.{rest}e{sign}{}", e.abs())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_matches_javascript() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.2), "0.2");
        assert_eq!(format_number(1e202), "1e+202");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-9), "1.5e-9");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_display_union_parenthesization() {
        let union = Type::union(vec![Type::name("string"), Type::name("number")]);
        assert_eq!(union.to_string(), "string|number");

        let nested = Type::nullable(union, true);
        assert_eq!(nested.to_string(), "?(string|number)");

        assert_eq!(Type::union(vec![]).to_string(), "()");
        assert_eq!(Type::union(vec![Type::name("a")]).to_string(), "(a)");
    }

    #[test]
    fn test_display_function_and_record() {
        let func = Type::FunctionType {
            params: vec![
                Type::optional(Type::ParameterType {
                    name: "a".into(),
                    expression: Box::new(Type::name("b")),
                }),
                Type::rest(Some(Type::name("c"))),
            ],
            result: Some(Box::new(Type::name("d"))),
            this: Some(Box::new(Type::name("Foo"))),
            new: None,
        };
        assert_eq!(func.to_string(), "function(this: Foo, a: b=, ...c): d");

        let record = Type::RecordType {
            fields: vec![
                FieldType::new("a", Type::name("string")),
                FieldType::new("0.2", Type::AllLiteral),
                FieldType::new("with space", Type::name("x")),
            ],
        };
        assert_eq!(record.to_string(), r#"{a: string, 0.2: *, "with space": x}"#);
    }

    #[test]
    fn test_display_string_literal_escapes() {
        let lit = Type::StringLiteralType {
            value: "a\"b\n".into(),
        };
        assert_eq!(lit.to_string(), r#""a\"b\n""#);
    }

    #[test]
    fn test_serialize_shape() {
        let ty = Type::nullable(Type::name("string"), false);
        let json = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "NullableType",
                "expression": {"type": "NameExpression", "name": "string"},
                "prefix": false
            })
        );

        let record = Type::RecordType {
            fields: vec![FieldType::new("a", Type::AllLiteral)],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fields"][0]["type"], "FieldType");
        assert_eq!(json["fields"][0]["key"], "a");
    }

    #[test]
    fn test_function_result_serializes_as_null() {
        let func = Type::FunctionType {
            params: vec![],
            result: None,
            this: None,
            new: None,
        };
        let json = serde_json::to_value(&func).unwrap();
        assert!(json["result"].is_null());
        assert!(json.get("this").is_none());
    }
}
