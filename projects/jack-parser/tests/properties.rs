use jack_ast::{Event, TokenKind};
use jack_parser::lexer::{is_keyword, tokenize};
use jack_parser::parse;
use proptest::prelude::*;

const SAMPLE: &str = r#"class Counter {
    field int count;
    method void add(int amount) {
        let count = count + (amount * 2) - "x".length();
        if (count > 10) { do Output.printInt(count); }
        return;
    }
}"#;

fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}".prop_filter("keywords are reserved", |name| !is_keyword(name))
}

fn class_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,6}"
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..=32767).prop_map(|value| value.to_string()),
        identifier(),
        "[a-zA-Z ,.]{0,8}".prop_map(|text| format!("\"{}\"", text)),
        prop::sample::select(vec!["true", "false", "null", "this"]).prop_map(String::from),
    ];

    leaf.prop_recursive(4, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/", "&", "|", "<", ">", "="]), inner.clone())
                .prop_map(|(left, op, right)| format!("{} {} {}", left, op, right)),
            inner.clone().prop_map(|expr| format!("({})", expr)),
            (prop::sample::select(vec!["-", "~", "^", "#"]), inner.clone())
                .prop_map(|(op, expr)| format!("{}({})", op, expr)),
            (identifier(), inner.clone()).prop_map(|(name, index)| format!("{}[{}]", name, index)),
            (class_name(), identifier(), prop::collection::vec(inner, 0..3))
                .prop_map(|(class, method, args)| format!("{}.{}({})", class, method, args.join(", "))),
        ]
    })
}

fn wrap(expr: &str) -> String {
    format!("class T {{ function int f() {{ var int x; let x = {expr}; return {expr}; }} }}")
}

fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
    tokenize(source).unwrap().into_iter().map(|token| (token.kind, token.text)).collect()
}

fn comment(kind: usize, body: &str) -> String {
    match kind {
        0 => format!("//{}\n", body),
        1 => format!("/*{}*/", body),
        _ => format!("/**{}*/", body),
    }
}

proptest! {
    #[test]
    fn test_comments_are_transparent(
        insertions in prop::collection::vec((any::<prop::sample::Index>(), 0..3usize, "[a-zA-Z0-9 ,.;(){}]{0,12}"), 0..8)
    ) {
        let tokens = tokenize(SAMPLE).unwrap();
        let mut gaps: Vec<Vec<String>> = vec![Vec::new(); tokens.len() + 1];
        for (index, kind, body) in &insertions {
            gaps[index.index(tokens.len() + 1)].push(comment(*kind, body));
        }

        let mut source = String::new();
        for (gap, comments) in gaps.iter().enumerate() {
            for comment in comments {
                source.push_str(comment);
                source.push(' ');
            }
            if let Some(token) = tokens.get(gap) {
                source.push_str(&token.to_source());
                source.push(' ');
            }
        }

        prop_assert_eq!(kinds_and_texts(&source), kinds_and_texts(SAMPLE));
    }

    #[test]
    fn test_brackets_balance(expr in expression()) {
        let events = parse(&wrap(&expr)).unwrap();
        let mut stack = Vec::new();
        for event in &events {
            match event {
                Event::Open(kind) => stack.push(*kind),
                Event::Close(kind) => {
                    prop_assert_eq!(stack.pop(), Some(*kind));
                }
                Event::Leaf { .. } => {
                    prop_assert!(!stack.is_empty());
                }
            }
        }
        prop_assert!(stack.is_empty());
    }

    #[test]
    fn test_relexing_leaves_is_idempotent(expr in expression()) {
        let source = wrap(&expr);
        let events = parse(&source).unwrap();

        let relexed: Vec<String> = events
            .iter()
            .filter_map(|event| match event {
                Event::Leaf { kind: TokenKind::StringConstant, text } => Some(format!("\"{}\"", text)),
                Event::Leaf { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();

        prop_assert_eq!(kinds_and_texts(&relexed.join(" ")), kinds_and_texts(&source));
    }
}
