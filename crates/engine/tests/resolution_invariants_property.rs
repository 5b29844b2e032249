use proptest::collection::vec;
use proptest::prelude::*;

use docplace_engine::document::Document;
use docplace_engine::{
    resolve, EditOperation, OperationKind, ResolutionResult, ResolverConfig, Selection,
};

fn interesting_char() -> impl Strategy<Value = char> {
    prop_oneof![
        (b'a'..=b'z').prop_map(char::from),
        (b'A'..=b'Z').prop_map(char::from),
        Just(' '),
        Just('\n'),
        Just('\t'),
        Just('#'),
        Just('-'),
        Just('*'),
        Just('.'),
        Just('é'),
        Just('中'),
        Just('🙂'),
    ]
}

fn text_string(min_len: usize, max_len: usize) -> impl Strategy<Value = String> {
    vec(interesting_char(), min_len..max_len).prop_map(|chars| chars.into_iter().collect())
}

fn frontmatter() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("---\ntitle: Draft\n---\n".to_string()),
        Just("+++\ntitle = \"Draft\"\n+++\n".to_string()),
    ]
}

fn kind() -> impl Strategy<Value = OperationKind> {
    prop_oneof![
        Just(OperationKind::ReplaceRange),
        Just(OperationKind::DeleteRange),
        Just(OperationKind::InsertAfter),
        Just(OperationKind::InsertAfterHeading),
    ]
}

/// A substring of `text` picked by two fractions, snapped to char boundaries.
fn pick(text: &str, a: f64, b: f64) -> &str {
    let floor = |index: usize| {
        let mut index = index.min(text.len());
        while !text.is_char_boundary(index) {
            index -= 1;
        }
        index
    };
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let start = floor((lo * text.len() as f64) as usize);
    let end = floor((hi * text.len() as f64) as usize);
    &text[start..end]
}

fn assert_well_formed(text: &str, result: &ResolutionResult) {
    assert!((0.0..=1.0).contains(&result.confidence));
    if result.is_failure() {
        assert_eq!((result.start, result.end, result.confidence), (-1, -1, 0.0));
        return;
    }
    let fm = Document::new(text).frontmatter_end() as i64;
    assert!(result.start >= fm, "start {} before frontmatter end {fm}", result.start);
    assert!(result.end >= result.start);
    assert!(result.end as usize <= text.len());
    assert!(text.is_char_boundary(result.start as usize));
    assert!(text.is_char_boundary(result.end as usize));
    assert!(result.confidence > 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn results_are_well_formed_and_deterministic(
        header in frontmatter(),
        body in text_string(0, 300),
        noise in text_string(0, 40),
        kind in kind(),
        from_doc in any::<bool>(),
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
        occurrence in 0usize..4,
        cursor in proptest::option::of(0usize..400),
        hint in proptest::option::of(0usize..400),
    ) {
        let text = format!("{header}{body}");
        let reference = if from_doc { pick(&text, a, b).to_string() } else { noise.clone() };

        let mut op = EditOperation::new(kind, noise.clone()).with_occurrence(occurrence);
        if kind.targets_span() {
            op.original_text = Some(reference.clone());
        } else {
            op.anchor_text = Some(reference.clone());
        }
        if let Some(hint) = hint {
            op = op.with_hint(hint, hint + reference.len());
        }

        let config = ResolverConfig::default();
        let first = resolve(&text, &op, None, cursor, &config);
        let second = resolve(&text, &op, None, cursor, &config);

        assert_well_formed(&text, &first);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.confidence.to_bits(), second.confidence.to_bits());
        prop_assert_eq!(&first.text, &op.text);
    }

    #[test]
    fn selections_anywhere_respect_frontmatter(
        header in frontmatter(),
        body in text_string(1, 200),
        start in 0usize..300,
        len in 0usize..300,
    ) {
        let text = format!("{header}{body}");
        let op = EditOperation::replace("unlikely-snippet-§", "x");
        let result = resolve(
            &text,
            &op,
            Some(Selection::new(start, start + len)),
            None,
            &ResolverConfig::default(),
        );
        assert_well_formed(&text, &result);
    }

    #[test]
    fn unique_snippets_resolve_exactly(
        prefix in text_string(0, 80),
        suffix in text_string(0, 80),
    ) {
        let marker = "<<target-snippet>>";
        // Leading underscore keeps random text from opening a frontmatter block.
        let text = format!("_{prefix}{marker}{suffix}");
        let result = resolve(
            &text,
            &EditOperation::replace(marker, "x"),
            None,
            None,
            &ResolverConfig::default(),
        );
        prop_assert_eq!(result.start, prefix.len() as i64 + 1);
        prop_assert_eq!(result.end, (prefix.len() + 1 + marker.len()) as i64);
        prop_assert_eq!(result.confidence, 1.0);
    }
}
