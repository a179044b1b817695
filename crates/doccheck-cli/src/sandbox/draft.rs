// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! `draft`: a plain type with examples, method checks and a module docstring.

use doccheck_interp::{Args, AsAny, ClassRef, NativeClass, Namespace, Object, RuntimeError, Value};

const MODULE: &str = "draft";

const CLASS_DOC: &str = "\
A three-part draft label.

>>example1: cls(2, 6, \"hello\")
>>example2: DraftClass(
    1,
    2,
    \"bye\")
>>test: cls.example1.a == 2 and cls.example2.c == \"bye\"";

const FORMAT_DOC: &str = "\
Join the parts with dots, then append `additional_text`.

>>test: cls.example1.draft_format() == \"2.6.hello.\"
>>test: cls.example1.draft_format(\"ADD\") == \"2.6.hello.ADD\"
>>test: cls.example2.draft_format(additional_text=\"x\") == \"1.2.bye.x\"
>>error: cls.example1.draft_format(1)
>>error: 10/0";

const FROM_DOTTED_DOC: &str = "\
Parse `a.b.c`.

>>test: cls.from_dotted(\"2.6.hello\") == cls.example1
>>error: cls.from_dotted(\"2.six.hello\")
>>error: cls.from_dotted(\"2.6\")";

const MODULE_DOC: &str = "\
Module documentation is owned by no declaration.
>>test: False";

/// An instance of `DraftClass`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    a: i64,
    b: i64,
    c: String,
}

impl Draft {
    fn from_args(args: &Args) -> Result<Self, RuntimeError> {
        args.expect_at_most(&["a", "b", "c"], "DraftClass")?;
        Ok(Self {
            a: args.int(0, "a", "DraftClass")?,
            b: args.int(1, "b", "DraftClass")?,
            c: args.string(2, "c", "DraftClass")?.to_string(),
        })
    }

    fn from_dotted(text: &str) -> Result<Self, RuntimeError> {
        let parts: Vec<&str> = text.splitn(3, '.').collect();
        let [a, b, c] = parts.as_slice() else {
            return Err(RuntimeError::ValueError(format!(
                "expected `a.b.c`, got '{}'",
                text
            )));
        };
        let number = |s: &str| {
            s.parse::<i64>()
                .map_err(|_| RuntimeError::ValueError(format!("invalid literal for int(): '{}'", s)))
        };
        Ok(Self {
            a: number(a)?,
            b: number(b)?,
            c: c.to_string(),
        })
    }
}

impl Object for Draft {
    fn type_name(&self) -> &str {
        "DraftClass"
    }

    fn get_attr(&self, name: &str) -> Option<Value> {
        match name {
            "a" => Some(Value::Int(self.a)),
            "b" => Some(Value::Int(self.b)),
            "c" => Some(Value::str(self.c.as_str())),
            _ => None,
        }
    }

    fn has_method(&self, name: &str) -> bool {
        name == "draft_format"
    }

    fn call_method(&self, name: &str, args: Args) -> Result<Value, RuntimeError> {
        match name {
            "draft_format" => {
                args.expect_at_most(&["additional_text"], name)?;
                let extra = match args.get(0, "additional_text") {
                    Some(_) => args.string(0, "additional_text", name)?.to_string(),
                    None => String::new(),
                };
                Ok(Value::str(format!("{}.{}.{}.{}", self.a, self.b, self.c, extra)))
            }
            _ => Err(RuntimeError::AttributeError {
                ty: self.type_name().to_string(),
                attr: name.to_string(),
            }),
        }
    }

    fn equals(&self, other: &Value) -> bool {
        match other {
            Value::Object(o) => AsAny::as_any(&**o).downcast_ref::<Draft>() == Some(self),
            _ => false,
        }
    }

    fn repr(&self) -> String {
        format!("DraftClass({}, {}, '{}')", self.a, self.b, self.c)
    }
}

pub(super) fn draft_class() -> ClassRef {
    NativeClass::new("DraftClass")
        .in_module(MODULE)
        .doc(CLASS_DOC)
        .constructor(|args| Ok(Value::object(Draft::from_args(&args)?)))
        .method("draft_format", Some(FORMAT_DOC))
        .class_method("from_dotted", Some(FROM_DOTTED_DOC), |args| {
            args.expect_at_most(&["text"], "from_dotted")?;
            let text = args.string(0, "text", "from_dotted")?;
            Ok(Value::object(Draft::from_dotted(&text)?))
        })
        .build()
}

pub(super) fn namespace(draft_class: ClassRef) -> Namespace {
    let mut ns = Namespace::new(MODULE);
    ns.bind("__doc__", Value::str(MODULE_DOC));
    ns.bind_class(draft_class);
    ns
}
