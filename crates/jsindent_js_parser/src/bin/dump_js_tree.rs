//! Print the tree-sitter tree of a JavaScript file, one node per line.

use jsindent_js_parser::JsParser;

fn main() {
    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: dump_js_tree <file.js>");
        std::process::exit(2);
    };
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{path}: {err}");
            std::process::exit(1);
        }
    };

    let mut parser = JsParser::new();
    let Some(result) = parser.parse(&source) else {
        eprintln!("{path}: failed to parse");
        std::process::exit(1);
    };

    let mut cursor = result.tree.walk();
    let mut depth = 0usize;
    loop {
        let node = cursor.node();
        let start = node.start_position();
        let field = cursor.field_name().map(|f| format!("{f}: ")).unwrap_or_default();
        if node.child_count() == 0 {
            println!(
                "{:indent$}{field}{} {:?} @{}:{}",
                "",
                node.kind(),
                &source[node.byte_range()],
                start.row + 1,
                start.column,
                indent = depth * 2
            );
        } else {
            println!(
                "{:indent$}{field}{} @{}:{}",
                "",
                node.kind(),
                start.row + 1,
                start.column,
                indent = depth * 2
            );
        }

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
            depth -= 1;
        }
    }
}
