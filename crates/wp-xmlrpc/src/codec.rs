//! XML-RPC envelope encoding and decoding.
//!
//! Requests are written directly as strings; responses are read with
//! [`quick_xml`] into a small element tree and then interpreted.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;

use crate::client::ApiError;
use crate::value::Value;

const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Formats accepted when decoding `<dateTime.iso8601>`. Servers disagree on
/// separators, so the compact XML-RPC form is tried first.
const DATETIME_INPUT_FORMATS: &[&str] = &[DATETIME_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y%m%dT%H%M%S"];

/// Encode a `<methodCall>` document.
pub fn encode_call(method: &str, params: &[Value]) -> String {
    let mut out = String::from(r#"<?xml version="1.0"?><methodCall><methodName>"#);
    out.push_str(&escape(method));
    out.push_str("</methodName>");
    if params.is_empty() {
        out.push_str("<params/>");
    } else {
        out.push_str("<params>");
        for param in params {
            out.push_str("<param>");
            encode_value(&mut out, param);
            out.push_str("</param>");
        }
        out.push_str("</params>");
    }
    out.push_str("</methodCall>");
    out
}

fn encode_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(i) => match i32::try_from(*i) {
            Ok(small) => out.push_str(&format!("<int>{small}</int>")),
            Err(_) => out.push_str(&format!("<i8>{i}</i8>")),
        },
        Value::Boolean(b) => out.push_str(if *b {
            "<boolean>1</boolean>"
        } else {
            "<boolean>0</boolean>"
        }),
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Double(d) => out.push_str(&format!("<double>{d}</double>")),
        Value::DateTime(dt) => out.push_str(&format!(
            "<dateTime.iso8601>{}</dateTime.iso8601>",
            dt.format(DATETIME_FORMAT)
        )),
        Value::Base64(bytes) => {
            out.push_str("<base64>");
            out.push_str(&STANDARD.encode(bytes));
            out.push_str("</base64>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                encode_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                encode_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

/// Decode a `<methodResponse>` document.
///
/// A `<fault>` response is returned as [`ApiError::Fault`] with the
/// server's `faultString` untouched.
pub fn decode_response(xml: &str) -> Result<Value, ApiError> {
    let root = parse_document(xml)?;
    if root.name != "methodResponse" {
        return Err(malformed(format!(
            "expected <methodResponse>, found <{}>",
            root.name
        )));
    }

    if let Some(fault) = root.child("fault") {
        let value = fault
            .child("value")
            .ok_or_else(|| malformed("<fault> without <value>"))?;
        return Err(fault_error(decode_value(value)?)?);
    }

    let param = root
        .child("params")
        .and_then(|params| params.child("param"))
        .ok_or_else(|| malformed("response carries neither <params> nor <fault>"))?;
    let value = param
        .child("value")
        .ok_or_else(|| malformed("<param> without <value>"))?;
    decode_value(value)
}

/// Build a fault from its struct. Only `faultString` is required; a code
/// sent as a string is parsed, and a missing or unreadable code becomes 0.
fn fault_error(value: Value) -> Result<ApiError, ApiError> {
    let code = match value.get("faultCode") {
        Some(Value::Int(code)) => *code,
        Some(Value::String(code)) => code.trim().parse().unwrap_or(0),
        _ => 0,
    };
    let message = value
        .get("faultString")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("fault struct is missing a string faultString"))?;
    Ok(ApiError::Fault {
        code,
        message: message.to_string(),
    })
}

fn decode_value(element: &Element) -> Result<Value, ApiError> {
    // An untyped <value> is a string.
    let Some(typed) = element.children.first() else {
        return Ok(Value::String(element.text.clone()));
    };
    let text = typed.text.as_str();

    match typed.name.as_str() {
        "i4" | "int" | "i8" => text
            .trim()
            .parse()
            .map(Value::Int)
            .map_err(|_| malformed(format!("invalid <{}> value {text:?}", typed.name))),
        "boolean" => match text.trim() {
            "1" | "true" => Ok(Value::Boolean(true)),
            "0" | "false" => Ok(Value::Boolean(false)),
            other => Err(malformed(format!("invalid <boolean> value {other:?}"))),
        },
        "string" => Ok(Value::String(text.to_string())),
        "double" => text
            .trim()
            .parse()
            .map(Value::Double)
            .map_err(|_| malformed(format!("invalid <double> value {text:?}"))),
        "dateTime.iso8601" => parse_datetime(text).map(Value::DateTime),
        "base64" => {
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD
                .decode(compact)
                .map(Value::Base64)
                .map_err(|e| malformed(format!("invalid <base64> value: {e}")))
        }
        "struct" => {
            let mut members = BTreeMap::new();
            for member in typed.children.iter().filter(|c| c.name == "member") {
                let name = member
                    .child("name")
                    .ok_or_else(|| malformed("<member> without <name>"))?;
                let value = member
                    .child("value")
                    .ok_or_else(|| malformed("<member> without <value>"))?;
                members.insert(name.text.trim().to_string(), decode_value(value)?);
            }
            Ok(Value::Struct(members))
        }
        "array" => {
            let data = typed
                .child("data")
                .ok_or_else(|| malformed("<array> without <data>"))?;
            data.children
                .iter()
                .filter(|c| c.name == "value")
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        "nil" => Ok(Value::Nil),
        other => Err(malformed(format!("unknown value type <{other}>"))),
    }
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime, ApiError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    DATETIME_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| malformed(format!("invalid <dateTime.iso8601> value {text:?}")))
}

fn malformed(msg: impl Into<String>) -> ApiError {
    ApiError::Malformed(msg.into())
}

// --- Element tree ---

#[derive(Debug, Default)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn named(raw: &[u8]) -> Self {
        Self {
            name: String::from_utf8_lossy(raw).into_owned(),
            ..Default::default()
        }
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Read the document into a tree and return its root element.
fn parse_document(xml: &str) -> Result<Element, ApiError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let finished = match reader.read_event()? {
            Event::Start(e) => {
                stack.push(Element::named(e.name().as_ref()));
                None
            }
            Event::Empty(e) => Some(Element::named(e.name().as_ref())),
            Event::End(_) => Some(
                stack
                    .pop()
                    .ok_or_else(|| malformed("unbalanced closing tag"))?,
            ),
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
                None
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
                None
            }
            Event::Eof => return Err(malformed("unexpected end of document")),
            _ => None,
        };

        if let Some(element) = finished {
            match stack.last_mut() {
                Some(parent) => parent.children.push(element),
                None => return Ok(element),
            }
        }
    }
}
