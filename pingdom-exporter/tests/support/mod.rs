//! 統合テスト共通ユーティリティ

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::{json, Value};

/// Prometheusテキスト形式の1サンプル
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}

/// テキスト形式をサンプル列に分解する（コメント行は無視）
pub fn parse_exposition(text: &str) -> Vec<Sample> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| parse_sample(line).unwrap_or_else(|| panic!("bad sample line: {line}")))
        .collect()
}

fn parse_sample(line: &str) -> Option<Sample> {
    let (head, value) = line.rsplit_once(' ')?;
    let value = match value {
        "+Inf" => f64::INFINITY,
        "-Inf" => f64::NEG_INFINITY,
        other => other.parse().ok()?,
    };

    let (name, labels) = match head.find('{') {
        Some(open) => {
            let body = head[open + 1..].strip_suffix('}')?;
            (head[..open].to_string(), parse_labels(body)?)
        }
        None => (head.to_string(), BTreeMap::new()),
    };

    Some(Sample {
        name,
        labels,
        value,
    })
}

fn parse_labels(body: &str) -> Option<BTreeMap<String, String>> {
    let mut labels = BTreeMap::new();
    let mut rest = body;
    while !rest.is_empty() {
        let (key, after) = rest.split_once("=\"")?;
        let mut value = String::new();
        let mut chars = after.char_indices();
        let end = loop {
            let (i, c) = chars.next()?;
            match c {
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    value.push(match escaped {
                        'n' => '\n',
                        other => other,
                    });
                }
                '"' => break i,
                other => value.push(other),
            }
        };
        labels.insert(key.to_string(), value);
        rest = after[end + 1..].trim_start_matches(',');
    }
    Some(labels)
}

/// 名前とラベルが一致するサンプルの値
pub fn sample_value(text: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    parse_exposition(text)
        .into_iter()
        .find(|sample| {
            sample.name == name
                && sample.labels.len() == labels.len()
                && labels
                    .iter()
                    .all(|(k, v)| sample.labels.get(*k).map(String::as_str) == Some(*v))
        })
        .map(|sample| sample.value)
}

/// 指定名のサンプル数
pub fn sample_count(text: &str, name: &str) -> usize {
    parse_exposition(text)
        .iter()
        .filter(|sample| sample.name == name)
        .count()
}

/// id 42 の "site" チェックのラベル
pub const SITE_LABELS: [(&str, &str); 6] = [
    ("id", "42"),
    ("name", "site"),
    ("hostname", "x.com"),
    ("resolution", "5"),
    ("paused", "false"),
    ("tags", "prod"),
];

/// SITE_LABELS に le を加えたもの
pub fn site_labels_with_le(le: &'static str) -> Vec<(&'static str, &'static str)> {
    let mut labels = SITE_LABELS.to_vec();
    labels.push(("le", le));
    labels
}

/// Pingdom APIのチェック1件（余分なフィールド込み）
pub fn check_json(id: i64, name: &str, status: &str, response_time: i64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "created": 1_500_000_000,
        "name": name,
        "hostname": "x.com",
        "resolution": 5,
        "type": "http",
        "lasttesttime": 1_700_000_000,
        "lastresponsetime": response_time,
        "status": status,
        "paused": false,
        "tags": tags
            .iter()
            .map(|tag| json!({"name": tag, "type": "u", "count": 1}))
            .collect::<Vec<_>>(),
    })
}

/// `GET /api/2.0/checks` のレスポンス本文
pub fn checks_body(checks: Vec<Value>) -> Value {
    let total = checks.len();
    json!({ "checks": checks, "counts": { "total": total } })
}

/// Pingdom APIのエラー本文
pub fn error_body(code: u16, statusdesc: &str, message: &str) -> Value {
    json!({
        "error": {
            "statuscode": code,
            "statusdesc": statusdesc,
            "errormessage": message,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_containing_commas_and_escapes() {
        let text = "# TYPE m gauge\nm{a=\"x,y\",b=\"q\\\"z\"} 3\nplain 1\n";
        let samples = parse_exposition(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].labels["a"], "x,y");
        assert_eq!(samples[0].labels["b"], "q\"z");
        assert_eq!(sample_value(text, "plain", &[]), Some(1.0));
    }
}
