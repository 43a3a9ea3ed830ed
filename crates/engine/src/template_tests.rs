// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn fields(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[yare::parameterized(
    braced            = { "echo {{ $json.slug }}",        "echo a" },
    braced_no_space   = { "echo {{$json.slug}}",          "echo a" },
    braced_wide_space = { "echo {{   $json.slug   }}",    "echo a" },
    bare              = { "echo $json.slug",              "echo a" },
    both_forms        = { "{{ $json.slug }}:$json.slug",  "a:a" },
    repeated          = { "$json.slug $json.slug",        "a a" },
    no_references     = { "echo plain",                   "echo plain" },
)]
fn resolve_present_field(template: &str, expected: &str) {
    let f = fields(&[("slug", json!("a"))]);
    assert_eq!(resolve(template, &f), expected);
}

#[yare::parameterized(
    braced = { "echo {{ $json.missing }}!", "echo !" },
    bare   = { "echo $json.missing!",       "echo !" },
)]
fn absent_field_resolves_to_empty(template: &str, expected: &str) {
    let f = fields(&[("slug", json!("a"))]);
    assert_eq!(resolve(template, &f), expected);
}

#[yare::parameterized(
    number  = { json!(42),             "42" },
    float   = { json!(1.5),            "1.5" },
    boolean = { json!(true),           "true" },
    null    = { json!(null),           "null" },
    object  = { json!({"k": 1}),       r#"{"k":1}"# },
    array   = { json!([1, "two"]),     r#"[1,"two"]"# },
)]
fn structured_values_flatten_to_stable_strings(value: Value, expected: &str) {
    let f = fields(&[("v", value)]);
    assert_eq!(resolve("$json.v", &f), expected);
}

#[test]
fn string_values_are_not_quoted() {
    let f = fields(&[("msg", json!("hello world"))]);
    assert_eq!(resolve("echo {{ $json.msg }}", &f), "echo hello world");
}

#[yare::parameterized(
    other_namespace = { "{{ $node.name }}" },
    no_field        = { "$json." },
    lone_braces     = { "{{ }}" },
    incomplete      = { "{{ $json" },
)]
fn unknown_syntax_left_verbatim(template: &str) {
    let f = fields(&[("slug", json!("a"))]);
    assert_eq!(resolve(template, &f), template);
}

#[test]
fn substituted_values_are_not_rescanned() {
    // Single-pass substitution: a value containing reference-like text must
    // come through literally, not get resolved against the record again.
    let f = fields(&[("a", json!("$json.b")), ("b", json!("boom"))]);
    assert_eq!(resolve("echo {{ $json.a }}", &f), "echo $json.b");
}

#[test]
fn multiple_distinct_fields() {
    let f = fields(&[("user", json!("amy")), ("host", json!("db1"))]);
    assert_eq!(
        resolve("ssh {{ $json.user }}@$json.host uptime", &f),
        "ssh amy@db1 uptime"
    );
}

#[test]
fn word_characters_only_in_field_names() {
    // `a.b` is not a valid field path; the bare form stops at the first
    // non-word character, so only `a` is substituted.
    let f = fields(&[("a", json!("x"))]);
    assert_eq!(resolve("$json.a.b", &f), "x.b");
}
