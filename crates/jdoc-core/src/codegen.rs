//! Code sample generator: one endpoint, five client languages.
//!
//! Every sample is a fixed template filled from the same inputs: the
//! uppercased method, the URL as authored, the headers in author order, and
//! the body of the first valid example (or `{}`). Output is deterministic and
//! generation never fails.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::model::ApiEndpointSpec;

/// Header every sample sends before the endpoint's own headers.
pub const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Lang {
    #[serde(rename = "HTTP")]
    Http,
    JavaScript,
    #[serde(rename = "PHP")]
    Php,
    Python,
    Go,
}

impl Lang {
    /// Tab order in the code panel.
    pub const ALL: [Lang; 5] = [Lang::Http, Lang::JavaScript, Lang::Php, Lang::Python, Lang::Go];

    pub fn label(self) -> &'static str {
        match self {
            Lang::Http => "HTTP",
            Lang::JavaScript => "JavaScript",
            Lang::Php => "PHP",
            Lang::Python => "Python",
            Lang::Go => "Go",
        }
    }

    /// Fence/highlighting hint for renderers.
    pub fn syntax(self) -> &'static str {
        match self {
            Lang::Http => "http",
            Lang::JavaScript => "javascript",
            Lang::Php => "php",
            Lang::Python => "python",
            Lang::Go => "go",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLang(pub String);

impl fmt::Display for UnknownLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Lang::ALL.iter().map(|l| l.label()).collect();
        write!(f, "unknown language: {}. Use {}", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownLang {}

impl FromStr for Lang {
    type Err = UnknownLang;

    /// Accepts tab labels case-insensitively (`http`, `JavaScript`, `php`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Lang::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLang(s.to_string()))
    }
}

/// Generate the sample for `lang`.
pub fn generate(spec: &ApiEndpointSpec, lang: Lang) -> String {
    let sample = Sample::from_spec(spec);
    let mut out = String::new();
    match write_sample(&mut out, &sample, lang) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

fn write_sample(out: &mut String, sample: &Sample, lang: Lang) -> fmt::Result {
    match lang {
        Lang::Http => write_http(out, sample),
        Lang::JavaScript => write_javascript(out, sample),
        Lang::Php => write_php(out, sample),
        Lang::Python => write_python(out, sample),
        Lang::Go => write_go(out, sample),
    }
}

/// Generate by tab label. Labels outside the supported set yield `""`.
pub fn generate_for(spec: &ApiEndpointSpec, label: &str) -> String {
    match label.parse::<Lang>() {
        Ok(lang) => generate(spec, lang),
        Err(_) => String::new(),
    }
}

/// Body of the first valid example, or an empty object.
pub fn sample_body(spec: &ApiEndpointSpec) -> Value {
    spec.valid_examples
        .first()
        .and_then(|example| example.body_send.clone())
        .unwrap_or_else(|| Value::Object(Map::new()))
}

/// Default content type followed by the endpoint headers.
///
/// An endpoint header with the exact key `Content-Type` replaces the default
/// value without moving it.
pub fn merged_headers(spec: &ApiEndpointSpec) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert(
        DEFAULT_CONTENT_TYPE.0.to_string(),
        Value::String(DEFAULT_CONTENT_TYPE.1.to_string()),
    );
    if let Some(headers) = &spec.headers {
        for (key, value) in headers.iter() {
            merged.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    merged
}

/// JSON with two-space indentation, as shown in example panels.
pub fn pretty_json(value: &Value) -> String {
    pretty_with_indent(value, b"  ")
}

fn pretty_with_indent(value: &impl Serialize, indent: &[u8]) -> String {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent));
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}

/// Inputs shared by every template.
struct Sample<'a> {
    spec: &'a ApiEndpointSpec,
    method: String,
    url: &'a str,
    body: String,
}

impl<'a> Sample<'a> {
    fn from_spec(spec: &'a ApiEndpointSpec) -> Self {
        Self {
            spec,
            method: spec.display_method(),
            url: &spec.url_definition,
            body: pretty_json(&sample_body(spec)),
        }
    }

    fn merged_headers(&self) -> Map<String, Value> {
        merged_headers(self.spec)
    }
}

fn header_value(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

fn four_space<S: Serialize>(value: &S) -> String {
    pretty_with_indent(value, b"    ")
}

// -- Templates ----------------------------------------------------------------

fn write_http(out: &mut String, s: &Sample) -> fmt::Result {
    writeln!(out, "{} {}", s.method, s.url)?;
    write!(out, "{}: {}", DEFAULT_CONTENT_TYPE.0, DEFAULT_CONTENT_TYPE.1)?;
    if let Some(headers) = &s.spec.headers {
        for (key, value) in headers.iter() {
            write!(out, "\n{}: {}", key, value)?;
        }
    }
    write!(out, "\n\n{}", s.body)
}

fn write_javascript(out: &mut String, s: &Sample) -> fmt::Result {
    writeln!(out, "const response = await fetch('{}', {{", s.url)?;
    writeln!(out, "  method: '{}',", s.method)?;
    writeln!(out, "  headers: {},", four_space(&s.merged_headers()))?;
    writeln!(out, "  body: JSON.stringify({})", s.body)?;
    writeln!(out, "}});")?;
    writeln!(out)?;
    writeln!(out, "const data = await response.json();")?;
    write!(out, "console.log(data);")
}

fn write_php(out: &mut String, s: &Sample) -> fmt::Result {
    let header_literals: Vec<String> = s
        .merged_headers()
        .iter()
        .map(|(key, value)| format!("\"{}: {}\\r\\n\"", key, header_value(value)))
        .collect();
    // Naive quote swap: sample payloads are not expected to contain quotes.
    let data = s.body.replace('"', "'");

    writeln!(out, "<?php")?;
    writeln!(out, "$url = '{}';", s.url)?;
    writeln!(out, "$data = {};", data)?;
    writeln!(out)?;
    writeln!(out, "$options = [")?;
    writeln!(out, "    'http' => [")?;
    writeln!(out, "        'header' => {},", header_literals.join(" . "))?;
    writeln!(out, "        'method' => '{}',", s.method)?;
    writeln!(out, "        'content' => json_encode($data)")?;
    writeln!(out, "    ]")?;
    writeln!(out, "];")?;
    writeln!(out)?;
    writeln!(out, "$context = stream_context_create($options);")?;
    writeln!(out, "$result = file_get_contents($url, false, $context);")?;
    writeln!(out, "$response = json_decode($result, true);")?;
    writeln!(out)?;
    writeln!(out, "print_r($response);")?;
    write!(out, "?>")
}

fn write_python(out: &mut String, s: &Sample) -> fmt::Result {
    writeln!(out, "import requests")?;
    writeln!(out, "import json")?;
    writeln!(out)?;
    writeln!(out, "url = '{}'", s.url)?;
    writeln!(out, "headers = {}", four_space(&s.merged_headers()))?;
    writeln!(out, "data = {}", s.body)?;
    writeln!(out)?;
    writeln!(out, "response = requests.{}(url, ", s.method.to_lowercase())?;
    writeln!(out, "    headers=headers,")?;
    writeln!(out, "    json=data")?;
    writeln!(out, ")")?;
    writeln!(out)?;
    write!(out, "print(response.json())")
}

fn write_go(out: &mut String, s: &Sample) -> fmt::Result {
    writeln!(out, "package main")?;
    writeln!(out)?;
    writeln!(out, "import (")?;
    writeln!(out, "    \"bytes\"")?;
    writeln!(out, "    \"encoding/json\"")?;
    writeln!(out, "    \"fmt\"")?;
    writeln!(out, "    \"net/http\"")?;
    writeln!(out, ")")?;
    writeln!(out)?;
    writeln!(out, "func main() {{")?;
    writeln!(out, "    url := \"{}\"", s.url)?;
    writeln!(out, "    data := {}", s.body)?;
    writeln!(out, "    ")?;
    writeln!(out, "    jsonData, _ := json.Marshal(data)")?;
    writeln!(out, "    ")?;
    writeln!(
        out,
        "    req, _ := http.NewRequest(\"{}\", url, bytes.NewBuffer(jsonData))",
        s.method
    )?;
    for (key, value) in s.merged_headers().iter() {
        writeln!(out, "    req.Header.Set(\"{}\", \"{}\")", key, header_value(value))?;
    }
    writeln!(out, "    ")?;
    writeln!(out, "    client := &http.Client{{}}")?;
    writeln!(out, "    resp, _ := client.Do(req)")?;
    writeln!(out, "    defer resp.Body.Close()")?;
    writeln!(out, "    ")?;
    writeln!(out, "    fmt.Println(\"Response Status:\", resp.Status)")?;
    write!(out, "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(headers: Value) -> ApiEndpointSpec {
        serde_json::from_value(json!({
            "title": "Create New User",
            "description": "Create a user",
            "method": "post",
            "urlDefinition": "https://api.example.com/v1/users",
            "headers": headers,
            "requirements": [],
            "validExamples": [{
                "title": "ok",
                "description": "",
                "bodySend": {"name": "Alice", "age": 30},
                "bodyResponse": {"success": true}
            }],
            "invalidExamples": []
        }))
        .unwrap()
    }

    #[test]
    fn http_without_headers_has_no_extra_lines() {
        let out = generate(&spec(json!({})), Lang::Http);
        assert_eq!(
            out,
            "POST https://api.example.com/v1/users\n\
             Content-Type: application/json\n\
             \n\
             {\n  \"name\": \"Alice\",\n  \"age\": 30\n}"
        );
    }

    #[test]
    fn http_with_header_follows_content_type() {
        let out = generate(&spec(json!({"X": "Y"})), Lang::Http);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "Content-Type: application/json");
        assert_eq!(lines[2], "X: Y");
        assert_eq!(lines[3], "");
        assert_eq!(out.matches("X: Y").count(), 1);
    }

    #[test]
    fn missing_headers_behave_like_empty() {
        let mut s = spec(json!({}));
        s.headers = None;
        assert_eq!(generate(&s, Lang::Http), generate(&spec(json!({})), Lang::Http));
    }

    #[test]
    fn empty_examples_fall_back_to_empty_object() {
        let mut s = spec(json!({}));
        s.valid_examples.clear();
        assert!(generate(&s, Lang::Http).ends_with("\n\n{}"));

        let mut s = spec(json!({}));
        s.valid_examples[0].body_send = None;
        assert!(generate(&s, Lang::Go).contains("    data := {}\n"));
    }

    #[test]
    fn generation_is_deterministic() {
        let s = spec(json!({"Authorization": "Bearer t", "X-API-Version": "v1"}));
        for lang in Lang::ALL {
            assert_eq!(generate(&s, lang), generate(&s, lang));
        }
    }

    #[test]
    fn javascript_content_type_override_keeps_position() {
        let out = generate(
            &spec(json!({"Authorization": "Bearer t", "Content-Type": "text/plain"})),
            Lang::JavaScript,
        );
        assert!(out.starts_with("const response = await fetch('https://api.example.com/v1/users', {\n  method: 'POST',\n"));
        assert!(out.contains(
            "  headers: {\n    \"Content-Type\": \"text/plain\",\n    \"Authorization\": \"Bearer t\"\n},\n"
        ));
        assert!(!out.contains("application/json"));
        assert!(out.contains("  body: JSON.stringify({\n  \"name\": \"Alice\",\n  \"age\": 30\n})\n"));
        assert!(out.ends_with("console.log(data);"));
    }

    #[test]
    fn php_headers_and_quote_swap() {
        let out = generate(&spec(json!({"Authorization": "Bearer t"})), Lang::Php);
        assert!(out.contains(
            "'header' => \"Content-Type: application/json\\r\\n\" . \"Authorization: Bearer t\\r\\n\","
        ));
        assert!(out.contains("$data = {\n  'name': 'Alice',\n  'age': 30\n};"));
        assert!(out.contains("'method' => 'POST',"));
        assert!(out.starts_with("<?php\n$url = 'https://api.example.com/v1/users';\n"));
        assert!(out.ends_with("?>"));
    }

    #[test]
    fn python_uses_lowercase_verb() {
        let out = generate(&spec(json!({"Authorization": "Bearer t"})), Lang::Python);
        assert!(out.contains("response = requests.post(url, \n    headers=headers,\n    json=data\n)"));
        assert!(out.contains(
            "headers = {\n    \"Content-Type\": \"application/json\",\n    \"Authorization\": \"Bearer t\"\n}\n"
        ));
    }

    #[test]
    fn go_sets_each_merged_header() {
        let out = generate(&spec(json!({"Authorization": "Bearer t", "X-Trace": "1"})), Lang::Go);
        let sets: Vec<&str> = out.lines().filter(|l| l.contains("req.Header.Set")).collect();
        assert_eq!(
            sets,
            vec![
                "    req.Header.Set(\"Content-Type\", \"application/json\")",
                "    req.Header.Set(\"Authorization\", \"Bearer t\")",
                "    req.Header.Set(\"X-Trace\", \"1\")",
            ]
        );
        assert!(out.contains("http.NewRequest(\"POST\", url, bytes.NewBuffer(jsonData))"));
    }

    #[test]
    fn go_keeps_indented_blank_lines() {
        let out = generate(&spec(json!({})), Lang::Go);
        assert!(out.contains("    data := {\n  \"name\": \"Alice\",\n  \"age\": 30\n}\n    \n    jsonData"));
        assert!(out.contains(
            "    req.Header.Set(\"Content-Type\", \"application/json\")\n    \n    client := &http.Client{}\n"
        ));
        assert!(out.ends_with("    defer resp.Body.Close()\n    \n    fmt.Println(\"Response Status:\", resp.Status)\n}"));
        assert_eq!(out.lines().filter(|l| l.is_empty()).count(), 2);
    }

    #[test]
    fn unknown_label_yields_empty_string() {
        let s = spec(json!({}));
        assert_eq!(generate_for(&s, "Rust"), "");
        assert_eq!(generate_for(&s, "python"), generate(&s, Lang::Python));
    }

    #[test]
    fn lang_labels_round_trip() {
        for lang in Lang::ALL {
            assert_eq!(lang.label().parse::<Lang>(), Ok(lang));
        }
        let err = "cobol".parse::<Lang>().unwrap_err();
        assert!(err.to_string().contains("HTTP, JavaScript, PHP, Python, Go"));
    }

    #[test]
    fn pretty_json_matches_two_space_layout() {
        let value = json!({"data": {"ids": [1, 2]}, "ok": true});
        let text = pretty_json(&value);
        assert_eq!(
            text,
            "{\n  \"data\": {\n    \"ids\": [\n      1,\n      2\n    ]\n  },\n  \"ok\": true\n}"
        );
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed, value);
    }
}
