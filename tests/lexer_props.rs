use proptest::prelude::*;
use wgsl_parse::{parse, tokenize, Parser, TokenKind};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_ends_with_eof(s in ".*") {
        let tokens = tokenize(&s);

        prop_assert!(!tokens.is_empty(), "no tokens for input={s:?}");
        prop_assert_eq!(&tokens.last().unwrap().kind, &TokenKind::Eof);

        // Exactly one Eof, at the end
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1, "input={:?}", s);

        // Anti-hang guard: at most one token per char, plus Eof
        prop_assert!(
            tokens.len() <= s.chars().count() + 1,
            "too many tokens: {} for len={} input={s:?}",
            tokens.len(),
            s.chars().count()
        );
    }

    #[test]
    fn locations_never_move_backwards(s in "[a-z0-9_ +*/<>=!&|^%(){};:,.@\\[\\]\n-]{0,64}") {
        let tokens = tokenize(&s);
        for pair in tokens.windows(2) {
            let (a, b) = (pair[0].location, pair[1].location);
            prop_assert!(
                (a.line, a.column) <= (b.line, b.column),
                "location regressed: {a} then {b} input={s:?}"
            );
        }
    }

    #[test]
    fn parsing_is_deterministic(s in "[a-z0-9 +*<>=(){};:,@]{0,48}") {
        prop_assert_eq!(parse(&s), parse(&s));
        prop_assert_eq!(Parser::new(&s).parse_module(), parse(&s));
    }
}
