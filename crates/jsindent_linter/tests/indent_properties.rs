//! Behavioural properties of the indent rule: worked scenarios, fix
//! idempotence, exemptions and same-line alignment.

mod rule_tester;

use rule_tester::{Reported, assert_valid, expected_errors, fix, lint};
use serde_json::json;

#[test]
fn test_unindented_block_body_is_reported_and_fixed() {
    let source = "if (a) {\nb();\n}";
    assert_eq!(
        lint(source, &json!([2])),
        expected_errors("space", &[(2, 2, "0")])
    );
    assert_eq!(fix(source, &json!([2])), "if (a) {\n  b();\n}");
}

#[test]
fn test_array_literal_baseline() {
    assert_valid("var x = [\n    'a',\n    'b'\n];", &json!([4]));
}

#[test]
fn test_switch_case_offset() {
    let source = "switch(x){\ncase 1:\nfoo();\n}";
    let options = json!([4, { "SwitchCase": 1 }]);
    assert_eq!(
        lint(source, &options),
        expected_errors("space", &[(2, 4, "0"), (3, 8, "0")])
    );
    assert_eq!(fix(source, &options), "switch(x){\n    case 1:\n        foo();\n}");
}

#[test]
fn test_member_chain_offset() {
    let source = "Buffer\n.toString()";
    let options = json!([4, { "MemberExpression": 1 }]);
    assert_eq!(
        lint(source, &options),
        expected_errors("space", &[(2, 4, "0")])
    );
    assert_eq!(fix(source, &options), "Buffer\n    .toString()");
}

#[test]
fn test_binary_continuation_is_exempt() {
    assert_valid("var x = 0 &&\n    {\n        a: 1\n    };", &json!([4]));
}

#[test]
fn test_comment_may_follow_the_next_line() {
    assert_valid("if (a) {\n  b();\n// comment\n}\nc();", &json!([2]));
}

#[test]
fn test_comment_may_follow_the_previous_line() {
    assert_valid(
        "switch (a) {\n  case 1:\n    b();\n    // falls through\n  case 2:\n    c();\n}",
        &json!([2, { "SwitchCase": 1 }]),
    );
}

const MESSY_SOURCES: &[&str] = &[
    "if (a) {\nb();\n}",
    "function f() {\nif (a) {\nb();\n} else {\nc();\n}\n}",
    "if (a) {\nif (b) {\nif (c) {\nd();\n}\n}\n}",
    "require('http').request({hostname: 'localhost',\n                  port: 80}, function(res) {\n    res.end();\n  });",
    "lmn = [{\n        a: 1\n    },\n    {\n        b: 2\n    },\n    {\n        x: 2\n}];",
    "switch (a) {\ncase '1':\nb();\nbreak;\ndefault:\nc();\nbreak;\n}",
    "var x = {\n      a: [\n  1,\n        2\n      ],\n  b: function () {\n          return 1;\n      }\n};",
    "class A {\n      constructor() {\n  this.a = 1;\n      }\n}",
];

#[test]
fn test_fixing_is_idempotent() {
    for options in [json!([2]), json!([4]), json!(["tab"])] {
        for source in MESSY_SOURCES {
            let fixed = fix(source, &options);
            assert_eq!(
                lint(&fixed, &options),
                Vec::<Reported>::new(),
                "fixed output still has errors with {options}:\n{fixed}"
            );
            assert_eq!(fix(&fixed, &options), fixed);
        }
    }
}

#[test]
fn test_fix_output_for_nested_else() {
    assert_eq!(
        fix(MESSY_SOURCES[1], &json!([2])),
        "function f() {\n  if (a) {\n    b();\n  } else {\n    c();\n  }\n}"
    );
}

#[test]
fn test_nested_blocks_add_one_level_each() {
    assert_valid(
        "if (a) {\n  if (b) {\n    if (c) {\n      d();\n    }\n  }\n}",
        &json!([2]),
    );
    let reported = lint("if (a) {\n  if (b) {\n  c();\n  }\n}", &json!([2]));
    assert_eq!(reported, expected_errors("space", &[(3, 4, "2")]));
}

#[test]
fn test_ignored_tokens_are_never_reported() {
    // The object after `&&` and unconfigured call arguments keep whatever
    // indentation they have.
    for indent in ["", "  ", "        "] {
        let source = format!("var x = 0 &&\n{indent}{{\n{indent}    a: 1\n{indent}}};");
        assert_valid(&source, &json!([4]));
    }
    assert_valid("foo(\n  a,\n      b\n);", &json!([2]));
    assert_valid("Buffer\n        .toString()", &json!([4]));
}

#[test]
fn test_same_line_anchor_ignores_multiplier() {
    assert_valid(
        "foo(function () {\n  return 1;\n});",
        &json!([2, { "CallExpression": { "arguments": 4 } }]),
    );
    assert_valid(
        "var a = [{\n  b: 1\n}];",
        &json!([2, { "ArrayExpression": 3, "ObjectExpression": 1 }]),
    );
}

#[test]
fn test_aligned_elements_follow_each_other() {
    // The second element lines up with the first once the first ends
    // below the opening bracket.
    let reported = lint("var a = [\n  {\n  },\n    b\n];", &json!([2]));
    assert_eq!(reported, expected_errors("space", &[(4, 2, "4")]));
}

#[test]
fn test_disable_directive_suppresses_reports() {
    let source = "/* eslint-disable indent */\nif (a) {\nb();\n}\n/* eslint-enable indent */\nif (a) {\nb();\n}";
    assert_eq!(
        lint(source, &json!([2])),
        expected_errors("space", &[(7, 2, "0")])
    );
}

#[test]
fn test_syntax_error_is_not_a_style_report() {
    let result = rule_tester::linter(&json!([2])).lint("if (a {\nb();\n}");
    assert!(result.is_err());
}
